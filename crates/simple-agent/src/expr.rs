//! Arithmetic Evaluator
//!
//! Recursive-descent evaluator for `+ - * / // ** ( )` over integer and
//! decimal literals. Integers are arbitrary precision and stay integers until
//! an operation needs a float; `/` always produces a float.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/' | '//') unary)*
//! unary  := ('+' | '-') unary | power
//! power  := atom ('**' unary)?
//! atom   := number | '(' expr ')'
//! ```

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{EvalError, EvalResult};

/// Maximum nesting of parentheses, unary signs and exponents
pub const MAX_DEPTH: usize = 200;

/// Largest intermediate integer, in bits
pub const MAX_INT_BITS: u64 = 1 << 20;

/// Most decimal digits an integer literal or result may have
pub const MAX_INT_DIGITS: usize = 4300;

/// Any integer wider than this has more than `MAX_INT_DIGITS` digits
const PRINTABLE_BITS: u64 = 14_300;

/// A computed number
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(BigInt),
    Float(f64),
}

impl Value {
    fn int(i: BigInt) -> EvalResult<Self> {
        if i.bits() > MAX_INT_BITS {
            Err(EvalError::Overflow)
        } else {
            Ok(Self::Int(i))
        }
    }

    fn float(f: f64) -> EvalResult<Self> {
        if f.is_finite() {
            Ok(Self::Float(f))
        } else {
            Err(EvalError::Overflow)
        }
    }

    /// Integers too large for an `f64` fail rather than become infinite
    fn as_f64(&self) -> EvalResult<f64> {
        match self {
            Self::Int(i) => i.to_f64().filter(|f| f.is_finite()).ok_or(EvalError::Overflow),
            Self::Float(f) => Ok(*f),
        }
    }

    #[allow(clippy::float_cmp)]
    fn is_zero(&self) -> bool {
        match self {
            Self::Int(i) => i.is_zero(),
            Self::Float(f) => *f == 0.0,
        }
    }

    /// JSON form; integers outside `i64` are carried as decimal strings
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(i) => i
                .to_i64()
                .map_or_else(|| serde_json::json!(i.to_string()), |v| serde_json::json!(v)),
            Self::Float(f) => serde_json::json!(f),
        }
    }

    fn add(&self, rhs: &Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::int(a + b),
            _ => Self::float(self.as_f64()? + rhs.as_f64()?),
        }
    }

    fn sub(&self, rhs: &Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::int(a - b),
            _ => Self::float(self.as_f64()? - rhs.as_f64()?),
        }
    }

    fn mul(&self, rhs: &Self) -> EvalResult<Self> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Self::int(a * b),
            _ => Self::float(self.as_f64()? * rhs.as_f64()?),
        }
    }

    fn div(&self, rhs: &Self) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Self::float(self.as_f64()? / rhs.as_f64()?)
    }

    fn floor_div(&self, rhs: &Self) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(a.div_floor(b))),
            _ => Self::float((self.as_f64()? / rhs.as_f64()?).floor()),
        }
    }

    fn negate(self) -> Self {
        match self {
            Self::Int(i) => Self::Int(-i),
            Self::Float(f) => Self::Float(-f),
        }
    }

    fn pow(&self, rhs: &Self) -> EvalResult<Self> {
        if let (Self::Int(base), Self::Int(exp)) = (self, rhs) {
            if !exp.is_negative() {
                return int_pow(base, exp);
            }
        }

        let base = self.as_f64()?;
        let exp = rhs.as_f64()?;
        if self.is_zero() && exp < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        if base < 0.0 && exp.fract() != 0.0 {
            return Err(EvalError::Domain(format!("{self} ** {rhs}")));
        }
        Self::float(base.powf(exp))
    }

    /// Reject integers too long to render
    fn printable(self) -> EvalResult<Self> {
        if let Self::Int(i) = &self {
            if i.bits() > PRINTABLE_BITS || i.magnitude().to_string().len() > MAX_INT_DIGITS {
                return Err(EvalError::TooManyDigits(MAX_INT_DIGITS));
            }
        }
        Ok(self)
    }
}

/// `base ** exp` for a non-negative integer exponent
fn int_pow(base: &BigInt, exp: &BigInt) -> EvalResult<Value> {
    if base.bits() <= 1 {
        // 0, 1 and -1: only the exponent's parity matters
        let parity = if exp.is_zero() {
            0
        } else if exp.is_odd() {
            1
        } else {
            2
        };
        return Ok(Value::Int(base.pow(parity)));
    }

    let exp = exp
        .to_u32()
        .filter(|&e| (base.bits() - 1).saturating_mul(u64::from(e)) <= MAX_INT_BITS)
        .ok_or(EvalError::Overflow)?;
    Value::int(base.pow(exp))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&float_repr(*x)),
        }
    }
}

/// Shortest round-trip form that always reads as a float: `5.0`, `2.5`,
/// `1e+16`, `1e-05`.
fn float_repr(x: f64) -> String {
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(Value),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::DoubleStar => f.write_str("**"),
            Self::Slash => f.write_str("/"),
            Self::DoubleSlash => f.write_str("//"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> EvalResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => {
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    Token::DoubleStar
                } else {
                    Token::Star
                }
            }
            '/' => {
                if chars.next_if(|&(_, c)| c == '/').is_some() {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let mut end = pos + 1;
                let mut seen_dot = ch == '.';
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || (c == '.' && !seen_dot) {
                        seen_dot |= c == '.';
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Number(parse_number(&input[pos..end])?)
            }
            other => return Err(EvalError::UnexpectedChar { ch: other, pos }),
        };
        tokens.push((token, pos));
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> EvalResult<Value> {
    let invalid = || EvalError::InvalidNumber(literal.into());

    if literal == "." {
        return Err(invalid());
    }
    if literal.contains('.') {
        return literal.parse::<f64>().map(Value::Float).map_err(|_| invalid());
    }

    // integer literals: `0`, `000` and `10` are fine, `01` is not
    let significant = literal.trim_start_matches('0');
    if significant.len() < literal.len() && !significant.is_empty() {
        return Err(invalid());
    }
    if significant.len() > MAX_INT_DIGITS {
        return Err(EvalError::TooManyDigits(MAX_INT_DIGITS));
    }
    literal.parse::<BigInt>().map(Value::Int).map_err(|_| invalid())
}

fn unexpected(found: &Token, pos: usize) -> EvalError {
    EvalError::UnexpectedToken {
        found: found.to_string(),
        pos,
    }
}

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [(Token, usize)]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<&'a (Token, usize)> {
        let item = self.tokens.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn expr(&mut self) -> EvalResult<Value> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    acc = acc.add(&self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    acc = acc.sub(&self.term()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> EvalResult<Value> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    acc = acc.mul(&self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    acc = acc.div(&self.unary()?)?;
                }
                Some(Token::DoubleSlash) => {
                    self.advance();
                    acc = acc.floor_div(&self.unary()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> EvalResult<Value> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.nested(Self::unary)
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(self.nested(Self::unary)?.negate())
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> EvalResult<Value> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::DoubleStar) {
            self.advance();
            let exp = self.nested(Self::unary)?;
            return base.pow(&exp);
        }
        Ok(base)
    }

    fn atom(&mut self) -> EvalResult<Value> {
        match self.advance() {
            Some((Token::Number(v), _)) => Ok(v.clone()),
            Some((Token::LParen, open)) => {
                let open = *open;
                let value = self.nested(Self::expr)?;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((found, pos)) => Err(unexpected(found, *pos)),
                    None => Err(EvalError::UnclosedParen(open)),
                }
            }
            Some((found, pos)) => Err(unexpected(found, *pos)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(input: &str) -> EvalResult<Value> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser::new(&tokens);
    let value = parser.expr()?;

    match parser.advance() {
        None => value.printable(),
        Some((Token::RParen, pos)) => Err(EvalError::UnmatchedParen(*pos)),
        Some((found, pos)) => Err(unexpected(found, *pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> String {
        evaluate(input).unwrap().to_string()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval("2+2"), "4");
        assert_eq!(eval("15 * 7 + 3"), "108");
        assert_eq!(eval("2 + 3 * 4"), "14");
        assert_eq!(eval("(2 + 3) * 4"), "20");
        assert_eq!(eval("10 - 4 - 3"), "3");
    }

    #[test]
    fn test_true_division_is_float() {
        assert_eq!(eval("10 / 4"), "2.5");
        assert_eq!(eval("10/2"), "5.0");
        assert_eq!(eval("1/3"), "0.3333333333333333");
        assert_eq!(eval("8 / 2 / 2"), "2.0");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(eval(".5 + 2."), "2.5");
        assert_eq!(eval("0.1 + 0.2"), "0.30000000000000004");
        assert_eq!(eval("1.5 * 2"), "3.0");
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("-3"), "-3");
        assert_eq!(eval("--3"), "3");
        assert_eq!(eval("2 - -3"), "5");
        assert_eq!(eval("2 * -3"), "-6");
        assert_eq!(eval("+(4)"), "4");
    }

    #[test]
    fn test_power() {
        assert_eq!(eval("2 ** 10"), "1024");
        assert_eq!(eval("2 ** 3 ** 2"), "512");
        assert_eq!(eval("-2 ** 2"), "-4");
        assert_eq!(eval("(-2) ** 2"), "4");
        assert_eq!(eval("2 ** -1"), "0.5");
        assert_eq!(eval("4 ** 0.5"), "2.0");
        assert_eq!(eval("0 ** 0"), "1");
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(eval("7 // 2"), "3");
        assert_eq!(eval("-7 // 2"), "-4");
        assert_eq!(eval("7 // -2"), "-4");
        assert_eq!(eval("-7 // -2"), "3");
        assert_eq!(eval("7.5 // 2"), "3.0");
    }

    #[test]
    fn test_float_exponent_format() {
        assert_eq!(eval("10000000000000000.0"), "1e+16");
        assert_eq!(eval("1 / 100000"), "1e-05");
        assert_eq!(eval("1000000000000000.0"), "1000000000000000.0");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("2/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("2.0 / 0.0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5 // 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("0 ** -1"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("   "), Err(EvalError::Empty));
        assert_eq!(evaluate("2 +"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(EvalError::UnclosedParen(0)));
        assert_eq!(evaluate("1 + 2)"), Err(EvalError::UnmatchedParen(5)));
        assert_eq!(evaluate("."), Err(EvalError::InvalidNumber(".".into())));
        assert!(matches!(evaluate("1.2.3"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("2 3"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("()"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("* 2"), Err(EvalError::UnexpectedToken { .. })));
        assert_eq!(evaluate("01 + 1"), Err(EvalError::InvalidNumber("01".into())));
        assert_eq!(evaluate("2 * 007"), Err(EvalError::InvalidNumber("007".into())));
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(eval("0 + 1"), "1");
        assert_eq!(eval("00 + 000"), "0");
        assert_eq!(eval("10 * 100"), "1000");
        assert_eq!(eval("01.5"), "1.5");
        assert_eq!(eval("00.25 * 4"), "1.0");
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(
            evaluate("2 + x"),
            Err(EvalError::UnexpectedChar { ch: 'x', pos: 4 })
        );
    }

    #[test]
    fn test_big_integers() {
        assert_eq!(eval("99999999999 * 99999999999"), "9999999999800000000001");
        assert_eq!(eval("3000000000 * 4000000000"), "12000000000000000000");
        assert_eq!(eval("2 ** 64"), "18446744073709551616");
        assert_eq!(eval("9223372036854775807 + 1"), "9223372036854775808");
        assert_eq!(eval("-9223372036854775808 // -1"), "9223372036854775808");
        assert_eq!(eval("99999999999999999999 - 1"), "99999999999999999998");
        assert_eq!(eval("10 ** 100"), format!("1{}", "0".repeat(100)));
        assert_eq!(eval("-(2 ** 70) // 3"), "-393530540239137101142");
        assert_eq!(eval("2 ** 64 / 2"), "9.223372036854776e+18");
    }

    #[test]
    fn test_unit_bases_ignore_exponent_size() {
        assert_eq!(eval("1 ** 99999999999"), "1");
        assert_eq!(eval("(-1) ** 99999999999"), "-1");
        assert_eq!(eval("(-1) ** 99999999998"), "1");
        assert_eq!(eval("0 ** 99999999999"), "0");
    }

    #[test]
    fn test_overflow() {
        assert_eq!(evaluate("2 ** 99999999999"), Err(EvalError::Overflow));
        assert_eq!(evaluate("10 ** 400 / 1"), Err(EvalError::Overflow));
        assert_eq!(evaluate("10 ** 400 + 0.5"), Err(EvalError::Overflow));
        assert_eq!(evaluate("10.0 ** 400"), Err(EvalError::Overflow));
    }

    #[test]
    fn test_digit_limit() {
        assert_eq!(evaluate("10 ** 5000"), Err(EvalError::TooManyDigits(MAX_INT_DIGITS)));
        assert_eq!(evaluate("10 ** 5000 // 10 ** 4990"), Ok(Value::Int(BigInt::from(10_000_000_000_u64))));

        let long = "9".repeat(MAX_INT_DIGITS + 1);
        assert_eq!(evaluate(&long), Err(EvalError::TooManyDigits(MAX_INT_DIGITS)));
        assert_eq!(eval(&"9".repeat(MAX_INT_DIGITS)), "9".repeat(MAX_INT_DIGITS));
    }

    #[test]
    fn test_non_real_result() {
        assert!(matches!(evaluate("(-8) ** 0.5"), Err(EvalError::Domain(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}1{}", "(".repeat(150), ")".repeat(150));
        assert_eq!(eval(&ok), "1");

        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&deep), Err(EvalError::TooDeep(MAX_DEPTH)));

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&signs), Err(EvalError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_json_value() {
        assert_eq!(evaluate("6 * 7").unwrap().to_json(), serde_json::json!(42));
        assert_eq!(evaluate("3 / 2").unwrap().to_json(), serde_json::json!(1.5));
        assert_eq!(
            evaluate("2 ** 64").unwrap().to_json(),
            serde_json::json!("18446744073709551616")
        );
    }
}
