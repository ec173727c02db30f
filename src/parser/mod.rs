mod ast;
pub mod errors;

use std::sync::Arc;

pub use ast::{Node, NodeKind};

use crate::{
    dbg_line,
    lexer::{Token, TokenSpan},
    shared::span::Interval,
    value::{Number, Value},
};
use errors::ParserError;

use miette::{Result, SourceSpan};
use tracing::trace;

/// Deepest array nesting either parser accepts, for patterns and candidates alike.
pub const MAX_NESTING: usize = 128;

/// Recursive descent parser over lexed tokens.
///
/// Grammar of a pattern:
///
/// ```text
/// element    := array | integer | float | string | identifier
/// array      := "[" list? "]"
/// list       := item continuation?
/// continuation := "," item continuation?
/// item       := element | "*" identifier
/// ```
///
/// A splat item has to be the last item of its array. Only nesting recurses,
/// the items of one array are read in a loop.
pub struct Parser<'a> {
    cursor: usize,
    depth: usize,
    code: &'a str,
    source: Arc<str>,
    input: Vec<TokenSpan<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str, tokens: Vec<TokenSpan<'a>>) -> Self {
        Parser {
            cursor: 0,
            depth: 0,
            code,
            source: code.into(),
            input: tokens,
        }
    }

    fn error<T>(&self, error: ParserError) -> Result<T> {
        Err(error.into_err_report())
    }

    fn interval(&self, from: usize, to: usize) -> Interval {
        Interval::new(self.source.clone(), from, to)
    }

    fn end_position(&self) -> SourceSpan {
        (self.code.len(), 0).into()
    }

    pub fn current_span(&self, expected: &str) -> Result<&TokenSpan<'a>> {
        match self.input.get(self.cursor) {
            Some(span) => Ok(span),
            None => self.error(ParserError::UnexpectedEndOfFile(errors::UnexpectedEndOfFile {
                dbg_line: dbg_line!(),
                expected: expected.to_string(),
                src: self.code.to_string(),
                position: self.end_position(),
            })),
        }
    }

    pub fn current_is(&self, token: &Token) -> bool {
        self.input
            .get(self.cursor)
            .is_some_and(|span| span.token.eq_type(token))
    }

    pub fn expect_current(&self, token: &Token, expected: &str) -> Result<&TokenSpan<'a>> {
        self.expect_either_current(&[token], expected)
    }

    pub fn expect_either_current(
        &self,
        tokens: &[&Token],
        expected: &str,
    ) -> Result<&TokenSpan<'a>> {
        let actual = self.current_span(expected)?;

        for token in tokens {
            if actual.token.eq_type(token) {
                return Ok(actual);
            }
        }

        self.error(ParserError::UnexpectedToken(errors::UnexpectedToken {
            dbg_line: dbg_line!(),
            actual: format!("{:?}", actual),
            expected: expected.to_string(),
            src: self.code.to_string(),
            position: actual.into(),
        }))
    }

    pub fn expect_end(&self) -> Result<()> {
        if let (Some(first), Some(last)) = (self.input.get(self.cursor), self.input.last()) {
            return self.error(ParserError::TrailingInput(errors::TrailingInput {
                dbg_line: dbg_line!(),
                src: self.code.to_string(),
                position: (first.from..last.to).into(),
            }));
        }
        Ok(())
    }

    /// Enters one more level of array nesting, opened by the bracket at `from..to`.
    fn descend(&mut self, from: usize, to: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return self.error(ParserError::NestingTooDeep(errors::NestingTooDeep {
                dbg_line: dbg_line!(),
                limit: MAX_NESTING,
                src: self.code.to_string(),
                position: (from..to).into(),
            }));
        }
        Ok(())
    }

    /// Parses the whole input as one pattern.
    pub fn parse_pattern(mut self) -> Result<Node> {
        let node = self.parse_element()?;
        self.expect_end()?;
        trace!("parsed pattern {:?} into {}", self.code, node.name());
        Ok(node)
    }

    pub fn parse_element(&mut self) -> Result<Node> {
        let span = self.current_span("a pattern")?;
        let (token, from, to) = (span.token.clone(), span.from, span.to);

        let kind = match token {
            Token::LeftBracket => return self.parse_array(),
            Token::Integer(text) => NodeKind::NumberLiteral(self.parse_integer(text, from, to)?),
            Token::Float(text) => NodeKind::NumberLiteral(self.parse_float(text, from, to)?),
            Token::String(text) => NodeKind::StringLiteral(text.to_string()),
            Token::Identifier(name) => NodeKind::Identifier(name.to_string()),
            Token::Star => {
                return self.error(ParserError::MisplacedSplat(errors::MisplacedSplat {
                    dbg_line: dbg_line!(),
                    reason: "Splats may only appear inside an array".to_string(),
                    src: self.code.to_string(),
                    position: (from..to).into(),
                }))
            }
            token => {
                return self.error(ParserError::UnexpectedToken(errors::UnexpectedToken {
                    dbg_line: dbg_line!(),
                    actual: format!("{token:?}"),
                    expected: "an array, a number, a string or an identifier".to_string(),
                    src: self.code.to_string(),
                    position: (from..to).into(),
                }))
            }
        };

        self.cursor += 1;
        Ok(Node::new(kind, self.interval(from, to)))
    }

    fn parse_integer(&self, text: &str, from: usize, to: usize) -> Result<Number> {
        match text.parse::<i64>() {
            Ok(int) => Ok(Number::Integer(int)),
            Err(_) => self.error(ParserError::InvalidNumber(errors::InvalidNumber {
                dbg_line: dbg_line!(),
                number: text.to_string(),
                kind: "64-bit integer".to_string(),
                src: self.code.to_string(),
                position: (from..to).into(),
            })),
        }
    }

    fn parse_float(&self, text: &str, from: usize, to: usize) -> Result<Number> {
        match text.parse::<f64>() {
            Ok(float) if float.is_finite() => Ok(Number::Float(float)),
            _ => self.error(ParserError::InvalidNumber(errors::InvalidNumber {
                dbg_line: dbg_line!(),
                number: text.to_string(),
                kind: "finite 64-bit float".to_string(),
                src: self.code.to_string(),
                position: (from..to).into(),
            })),
        }
    }

    pub fn parse_array(&mut self) -> Result<Node> {
        let open = self.expect_current(&Token::LeftBracket, "`[`")?;
        let (open, open_to) = (open.from, open.to);
        self.descend(open, open_to)?;
        self.cursor += 1;

        let list = if self.current_is(&Token::RightBracket) {
            None
        } else {
            Some(Box::new(self.parse_value_list()?))
        };

        let close = self.expect_current(&Token::RightBracket, "`,` or `]`")?.to;
        self.cursor += 1;
        self.depth -= 1;

        Ok(Node::new(
            NodeKind::ArrayLiteral { list },
            self.interval(open, close),
        ))
    }

    fn parse_value_list(&mut self) -> Result<Node> {
        let head = self.parse_list_item()?;
        if head.is_splat() {
            self.reject_non_trailing_splat(&head)?;
        }

        let tail = self.parse_continuation()?;
        let interval = match &tail {
            Some(tail) => head.interval.cover(&tail.interval),
            None => head.interval.clone(),
        };

        Ok(Node::new(
            NodeKind::ArrayValueList {
                head: Box::new(head),
                tail: tail.map(Box::new),
            },
            interval,
        ))
    }

    /// Reads every `, item` up to the closing bracket, then links them back to front.
    ///
    /// Each link spans from its comma to the end of the list.
    fn parse_continuation(&mut self) -> Result<Option<Node>> {
        let mut items = Vec::new();
        while let Some(span) = self.input.get(self.cursor) {
            if !matches!(span.token, Token::Comma) {
                break;
            }
            let from = span.from;
            self.cursor += 1;

            let item = self.parse_list_item()?;
            if item.is_splat() {
                self.reject_non_trailing_splat(&item)?;
            }
            items.push((from, item));
        }

        let mut continuation: Option<Node> = None;
        for (from, item) in items.into_iter().rev() {
            let (kind, to) = match continuation.take() {
                _ if item.is_splat() => {
                    let to = item.interval.end;
                    (NodeKind::ArrayTailSplat { splat: Box::new(item) }, to)
                }
                Some(tail) => {
                    let to = tail.interval.end;
                    (
                        NodeKind::ArrayTail {
                            element: Box::new(item),
                            tail: Box::new(tail),
                        },
                        to,
                    )
                }
                None => {
                    let to = item.interval.end;
                    (NodeKind::ArrayHead { element: Box::new(item) }, to)
                }
            };
            continuation = Some(Node::new(kind, self.interval(from, to)));
        }

        Ok(continuation)
    }

    fn parse_list_item(&mut self) -> Result<Node> {
        let span = self.current_span("an array element")?;
        if !matches!(span.token, Token::Star) {
            return self.parse_element();
        }
        let from = span.from;
        self.cursor += 1;

        let span = self.current_span("a name after `*`")?;
        let (name_from, to) = (span.from, span.to);
        let name = match span.token {
            Token::Identifier(name) => name,
            ref token => {
                return self.error(ParserError::UnexpectedToken(errors::UnexpectedToken {
                    dbg_line: dbg_line!(),
                    actual: format!("{token:?}"),
                    expected: "a name after `*`".to_string(),
                    src: self.code.to_string(),
                    position: (name_from..to).into(),
                }))
            }
        };
        self.cursor += 1;

        let kind = if name == "_" {
            NodeKind::AnonymousArraySplat
        } else {
            NodeKind::ArraySplat {
                inner: Box::new(Node::new(
                    NodeKind::Identifier(name.to_string()),
                    self.interval(name_from, to),
                )),
            }
        };

        Ok(Node::new(kind, self.interval(from, to)))
    }

    fn reject_non_trailing_splat(&self, splat: &Node) -> Result<()> {
        if self.current_is(&Token::Comma) {
            return self.error(ParserError::MisplacedSplat(errors::MisplacedSplat {
                dbg_line: dbg_line!(),
                reason: "A splat must be the last element of its array".to_string(),
                src: self.code.to_string(),
                position: (&splat.interval).into(),
            }));
        }
        Ok(())
    }

    /// Parses the whole input as a candidate value.
    pub fn parse_candidate(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        self.expect_end()?;
        Ok(value)
    }

    /// Candidate arrays follow the pattern grammar: comma separated, no trailing comma.
    pub fn parse_value(&mut self) -> Result<Value> {
        let span = self.current_span("a value")?;
        let (token, from, to) = (span.token.clone(), span.from, span.to);

        let value = match token {
            Token::LeftBracket => {
                self.descend(from, to)?;
                self.cursor += 1;

                let mut values = Vec::new();
                if !self.current_is(&Token::RightBracket) {
                    loop {
                        values.push(self.parse_value()?);

                        let closed = self
                            .expect_either_current(
                                &[&Token::Comma, &Token::RightBracket],
                                "`,` or `]`",
                            )?
                            .token
                            .eq_type(&Token::RightBracket);
                        if closed {
                            break;
                        }
                        self.cursor += 1;
                    }
                }

                self.expect_current(&Token::RightBracket, "`]`")?;
                self.depth -= 1;
                Value::Array(values)
            }
            Token::Integer(text) => self.parse_integer(text, from, to)?.into(),
            Token::Float(text) => self.parse_float(text, from, to)?.into(),
            Token::String(text) => Value::String(text.to_string()),
            Token::Boolean(boolean) => Value::Boolean(boolean),
            Token::Nil => Value::Nil,
            token => {
                return self.error(ParserError::UnexpectedToken(errors::UnexpectedToken {
                    dbg_line: dbg_line!(),
                    actual: format!("{token:?}"),
                    expected: "a value".to_string(),
                    src: self.code.to_string(),
                    position: (from..to).into(),
                }))
            }
        };

        self.cursor += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(code: &str) -> Result<Node> {
        Parser::new(code, Lexer::new(code).lex()?).parse_pattern()
    }

    /// Strips intervals so trees can be compared structurally.
    fn shape(node: &Node) -> String {
        match &node.kind {
            NodeKind::ArrayLiteral { list: None } => "[]".to_string(),
            NodeKind::ArrayLiteral { list: Some(list) } => format!("[{}]", shape(list)),
            NodeKind::ArrayValueList { head, tail: None } => shape(head),
            NodeKind::ArrayValueList {
                head,
                tail: Some(tail),
            } => format!("{}{}", shape(head), shape(tail)),
            NodeKind::ArrayHead { element } => format!(" head({})", shape(element)),
            NodeKind::ArrayTail { element, tail } => {
                format!(" tail({}){}", shape(element), shape(tail))
            }
            NodeKind::ArrayTailSplat { splat } => format!(" tail_splat({})", shape(splat)),
            NodeKind::ArraySplat { inner } => format!("*{}", shape(inner)),
            NodeKind::AnonymousArraySplat => "*_".to_string(),
            NodeKind::NumberLiteral(number) => number.to_string(),
            NodeKind::StringLiteral(string) => format!("{string:?}"),
            NodeKind::Identifier(name) => name.clone(),
        }
    }

    #[test]
    fn parse_empty_array() {
        let node = parse("[]").unwrap();
        assert_eq!(node.kind, NodeKind::ArrayLiteral { list: None });
        assert_eq!(node.interval.range(), 0..2);
    }

    #[test]
    fn parse_array_spine() {
        assert_eq!(shape(&parse("[a]").unwrap()), "[a]");
        assert_eq!(shape(&parse("[a, b]").unwrap()), "[a head(b)]");
        assert_eq!(
            shape(&parse("[1, 2.5, 'x', y]").unwrap()),
            "[1 tail(2.5) tail(\"x\") head(y)]"
        );
    }

    #[test]
    fn parse_splats() {
        assert_eq!(shape(&parse("[*_]").unwrap()), "[*_]");
        assert_eq!(shape(&parse("[*rest]").unwrap()), "[*rest]");
        assert_eq!(
            shape(&parse("[head, *tail]").unwrap()),
            "[head tail_splat(*tail)]"
        );
        assert_eq!(
            shape(&parse("[[a, *_], *_]").unwrap()),
            "[[a tail_splat(*_)] tail_splat(*_)]"
        );
    }

    #[test]
    fn parse_scalar_patterns() {
        assert_eq!(
            parse("42").unwrap().kind,
            NodeKind::NumberLiteral(Number::Integer(42))
        );
        assert_eq!(
            parse("-1.5").unwrap().kind,
            NodeKind::NumberLiteral(Number::Float(-1.5))
        );
        assert_eq!(
            parse("\"foo\"").unwrap().kind,
            NodeKind::StringLiteral("foo".to_string())
        );
        assert_eq!(
            parse("x").unwrap().kind,
            NodeKind::Identifier("x".to_string())
        );
    }

    #[test]
    fn intervals_point_into_source() {
        let node = parse("[a, *rest]").unwrap();
        let NodeKind::ArrayLiteral { list: Some(list) } = &node.kind else {
            panic!("expected a non-empty array literal, got {node:?}");
        };
        let NodeKind::ArrayValueList {
            head,
            tail: Some(tail),
        } = &list.kind
        else {
            panic!("expected a value list with a tail, got {list:?}");
        };
        assert_eq!(head.interval.text(), "a");
        assert_eq!(tail.interval.text(), ", *rest");
        assert_eq!(tail.show_position(), "[a, *rest]\n~~^");
    }

    #[test]
    fn splat_must_be_last() {
        let error = parse("[*a, b]").unwrap_err();
        let error = error
            .downcast_ref::<errors::MisplacedSplat>()
            .expect("misplaced splat error");
        assert_eq!(error.position, SourceSpan::from(1..3));

        assert!(parse("[a, *b, c]").is_err());
        assert!(parse("[a, *b, *c]").is_err());
    }

    #[test]
    fn splat_outside_array() {
        let error = parse("*rest").unwrap_err();
        assert!(error.downcast_ref::<errors::MisplacedSplat>().is_some());
    }

    #[test]
    fn unclosed_array() {
        let error = parse("[a, b").unwrap_err();
        let error = error
            .downcast_ref::<errors::UnexpectedEndOfFile>()
            .expect("unexpected end of input error");
        assert_eq!(error.position, SourceSpan::from((5, 0)));
    }

    #[test]
    fn unexpected_tokens() {
        assert!(parse("[a b]")
            .unwrap_err()
            .downcast_ref::<errors::UnexpectedToken>()
            .is_some());
        assert!(parse("[,]")
            .unwrap_err()
            .downcast_ref::<errors::UnexpectedToken>()
            .is_some());
        assert!(parse("[a,]")
            .unwrap_err()
            .downcast_ref::<errors::UnexpectedToken>()
            .is_some());
        assert!(parse("[*1]")
            .unwrap_err()
            .downcast_ref::<errors::UnexpectedToken>()
            .is_some());
    }

    #[test]
    fn trailing_input() {
        let error = parse("[a] [b]").unwrap_err();
        let error = error
            .downcast_ref::<errors::TrailingInput>()
            .expect("trailing input error");
        assert_eq!(error.position, SourceSpan::from(4..7));
    }

    #[test]
    fn integer_overflow() {
        let error = parse("[99999999999999999999]").unwrap_err();
        assert!(error.downcast_ref::<errors::InvalidNumber>().is_some());
    }

    #[test]
    fn empty_input() {
        let error = parse("").unwrap_err();
        assert!(error
            .downcast_ref::<errors::UnexpectedEndOfFile>()
            .is_some());
    }

    fn candidate(code: &str) -> Result<Value> {
        Parser::new(code, Lexer::new(code).lex()?).parse_candidate()
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn long_flat_pattern() {
        let names: Vec<String> = (0..10_000).map(|i| format!("a{i}")).collect();
        let code = format!("[{}]", names.join(", "));
        let node = parse(&code).unwrap();
        assert_eq!(node.interval.range(), 0..code.len());
    }

    #[test]
    fn nesting_limit() {
        assert!(parse(&nested(MAX_NESTING)).is_ok());

        let error = parse(&nested(20_000)).unwrap_err();
        let error = error
            .downcast_ref::<errors::NestingTooDeep>()
            .expect("nesting too deep error");
        assert_eq!(error.limit, MAX_NESTING);
        assert_eq!(
            error.position,
            SourceSpan::from(MAX_NESTING..MAX_NESTING + 1)
        );
    }

    #[test]
    fn candidate_nesting_limit() {
        assert!(candidate(&nested(MAX_NESTING)).is_ok());
        let error = candidate(&nested(20_000)).unwrap_err();
        assert!(error.downcast_ref::<errors::NestingTooDeep>().is_some());
    }

    #[test]
    fn candidate_rejects_trailing_comma() {
        assert!(candidate("[1,]")
            .unwrap_err()
            .downcast_ref::<errors::UnexpectedToken>()
            .is_some());
        assert!(candidate("[,]").is_err());
        assert!(candidate("[1 2]").is_err());
        assert_eq!(
            candidate("[1, [], 'x']").unwrap(),
            Value::Array(vec![
                Value::Integer(1),
                Value::Array(vec![]),
                Value::String("x".into())
            ])
        );
    }

    #[test]
    fn errors_convert_into_reports() {
        let report = errors::ParserError::TrailingInput(errors::TrailingInput {
            dbg_line: dbg_line!(),
            src: "a b".to_string(),
            position: (2..3).into(),
        })
        .into_err_report();
        assert!(report.downcast_ref::<errors::TrailingInput>().is_some());
    }
}
