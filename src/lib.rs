//! Structural pattern matching with extraction.
//!
//! A pattern such as `[head, *tail]` is lexed, parsed and compiled once into a
//! [`Matcher`] tree, which is then evaluated against any number of candidate
//! [`Value`]s. A successful match yields the [`Bindings`] of the names the
//! pattern declares.
//!
//! ```
//! use extractor::{Pattern, Value};
//!
//! let pattern = Pattern::new("[head, *tail]").unwrap();
//! let bindings = pattern.extract(&Value::parse("[1, 2, 3]").unwrap()).unwrap();
//! assert_eq!(bindings.to_string(), "{head: 1, tail: [2, 3]}");
//! assert!(!pattern.is_defined_at(&Value::parse("[]").unwrap()));
//! ```

pub mod compiler;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod shared;
pub mod value;

pub use compiler::compile;
pub use matcher::{Bindings, Literal, Matcher, MatcherKind};
pub use pattern::Pattern;
pub use shared::span::Interval;
pub use value::{Number, Value};
