//! simple-agent console demo
//!
//! Builds an agent from the environment (`.env` is honoured) and runs a
//! fixed set of example queries through it.

use agent_core::logging::{init_logging, LogConfig};
use agent_core::AgentConfig;
use simple_agent::{QueryStatus, SimpleAgent};

const EXAMPLE_QUERIES: [&str; 4] = [
    "What is agent ops?",
    "Calculate 15 * 7 + 3",
    "Search for information about MLflow",
    "Tell me about deployment pipelines",
];

fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    init_logging(&LogConfig::from_env())?;

    let config = AgentConfig::from_env();
    tracing::info!(
        model = config.model(),
        temperature = config.temperature(),
        max_tokens = config.max_tokens(),
        "Loaded agent configuration"
    );

    let agent = SimpleAgent::new(config);

    tracing::info!(started_at = %agent.created_at(), "Enabled {} tools:", agent.tools().len());
    for schema in agent.tools().schemas() {
        tracing::info!("  • {}: {}", schema.name, schema.description);
    }

    println!("🤖 Simple Agent Demo");
    println!("{}", "=".repeat(50));

    for query in EXAMPLE_QUERIES {
        println!("\n👤 User: {query}");
        let result = agent.process_query(query);
        println!("🤖 Agent: {}", result.response);

        if result.status == QueryStatus::Error {
            println!(
                "❌ Error: {}",
                result.error.as_deref().unwrap_or("Unknown error")
            );
        }
    }

    Ok(())
}
