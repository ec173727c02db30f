use std::fmt::Display;

use miette::Result;

use crate::{lexer::Lexer, parser::Parser};

/// Numeric literal as written in a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Equality by numeric value, across kinds: `1 == 1.0` holds, `1 == 1.5` does not.
    pub fn numeric_eq(&self, other: &Number) -> bool {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Integer(int), Number::Float(float))
            | (Number::Float(float), Number::Integer(int)) => {
                // i64 -> f64 rounds, so compare on the integer side instead
                float.fract() == 0.0
                    && float >= i64::MIN as f64
                    && float < i64::MAX as f64
                    && float as i64 == int
            }
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(int) => write!(f, "{int}"),
            Number::Float(float) if float.fract() == 0.0 && float.is_finite() => {
                write!(f, "{float:.1}")
            }
            Number::Float(float) => write!(f, "{float}"),
        }
    }
}

/// Runtime value tested against a matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// Parses a candidate written in the literal syntax, e.g. `[1, "two", 3.0, nil]`.
    pub fn parse(code: &str) -> Result<Value> {
        let tokens = Lexer::new(code).lex()?;
        Parser::new(code, tokens).parse_candidate()
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Value::Integer(int) => Some(Number::Integer(int)),
            Value::Float(float) => Some(Number::Float(float)),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(int) => Value::Integer(int),
            Number::Float(float) => Value::Float(float),
        }
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Value::Integer(int)
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Value::Float(float)
    }
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Value::Boolean(boolean)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::String(string.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(boolean) => write!(f, "{boolean}"),
            Value::Integer(int) => Number::Integer(*int).fmt(f),
            Value::Float(float) => Number::Float(*float).fmt(f),
            Value::String(string) => write!(f, "{string:?}"),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    value.fmt(f)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_equals_integral_float() {
        assert!(Number::Integer(1).numeric_eq(&Number::Float(1.0)));
        assert!(Number::Float(-3.0).numeric_eq(&Number::Integer(-3)));
        assert!(!Number::Integer(1).numeric_eq(&Number::Float(1.5)));
        assert!(!Number::Integer(i64::MAX).numeric_eq(&Number::Float(i64::MAX as f64)));
        assert!(!Number::Float(f64::NAN).numeric_eq(&Number::Float(f64::NAN)));
    }

    #[test]
    fn parse_candidate() {
        let value = Value::parse(r#"[1, -2.5, "three", [true, nil], 'four']"#).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Integer(1),
                Value::Float(-2.5),
                Value::String("three".into()),
                Value::Array(vec![Value::Boolean(true), Value::Nil]),
                Value::String("four".into()),
            ])
        );
    }

    #[test]
    fn display_uses_literal_syntax() {
        let value: Value = vec![Value::Integer(1), Value::Float(2.0), "x".into(), Value::Nil].into();
        assert_eq!(value.to_string(), r#"[1, 2.0, "x", nil]"#);
        assert_eq!(Value::parse(&value.to_string()).unwrap(), value);
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert!(Value::parse("1 2").is_err());
        assert!(Value::parse("[1,").is_err());
        assert!(Value::parse("[1,]").is_err());
    }

    #[test]
    fn parse_rejects_deep_nesting() {
        let depth = 20_000;
        let code = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let error = Value::parse(&code).unwrap_err();
        assert!(error
            .downcast_ref::<crate::parser::errors::NestingTooDeep>()
            .is_some());
    }
}
