mod error;
pub use error::{CompilerError, DuplicateBinding, MalformedPattern, MisplacedSplat};

use miette::Result;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    dbg_line,
    matcher::{Literal, Matcher, MatcherKind, ANONYMOUS},
    parser::{Node, NodeKind},
    shared::span::Interval,
};

/// Compiles a parsed pattern into its matcher tree.
pub fn compile(node: &Node) -> Result<Matcher> {
    let matcher = Compiler::default().compile_element(node)?;
    debug!(pattern = node.interval.source(), %matcher, "compiled");
    Ok(matcher)
}

/// Single compile pass over one pattern, tracking the names bound so far.
#[derive(Default)]
struct Compiler<'n> {
    names: FxHashMap<&'n str, &'n Interval>,
}

impl<'n> Compiler<'n> {
    fn error<T>(&self, error: CompilerError) -> Result<T> {
        Err(error.into_err_report())
    }

    fn compile_element(&mut self, node: &'n Node) -> Result<Matcher> {
        let kind = match &node.kind {
            NodeKind::ArrayLiteral { list: None } => MatcherKind::EmptyList { index: 0 },
            NodeKind::ArrayLiteral { list: Some(list) } => return self.compile_value_list(list),
            NodeKind::NumberLiteral(number) => MatcherKind::Literal(Literal::Number(*number)),
            NodeKind::StringLiteral(string) => {
                MatcherKind::Literal(Literal::String(string.clone()))
            }
            NodeKind::Identifier(name) => {
                self.bind(name, &node.interval)?;
                MatcherKind::Identifier(name.clone())
            }
            NodeKind::ArraySplat { .. } | NodeKind::AnonymousArraySplat => {
                return self.error(misplaced_splat(node))
            }
            NodeKind::ArrayValueList { .. }
            | NodeKind::ArrayHead { .. }
            | NodeKind::ArrayTail { .. }
            | NodeKind::ArrayTailSplat { .. } => {
                return self.error(malformed(node, "an array element"))
            }
        };

        Ok(Matcher::new(kind, node.interval.clone()))
    }

    /// Position 0 is the head, the continuation chain covers positions 1 and up.
    ///
    /// Elements are compiled front to back so duplicate names are reported in
    /// source order, then the `ArrayList` links are built back to front.
    fn compile_value_list(&mut self, node: &'n Node) -> Result<Matcher> {
        let NodeKind::ArrayValueList { head, tail } = &node.kind else {
            return self.error(malformed(node, "a list of array elements"));
        };

        if head.is_splat() {
            if let Some(tail) = tail {
                return self.error(misplaced_splat(tail));
            }
            return self.compile_splat(head, 0);
        }

        let mut links = vec![(self.compile_element(head)?, &node.interval)];
        let mut next = tail.as_deref();
        let end = loop {
            let index = links.len();
            let Some(link) = next else {
                break Matcher::new(MatcherKind::EmptyList { index }, node.interval.clone());
            };

            match &link.kind {
                NodeKind::ArrayTail { element, tail } => {
                    links.push((self.compile_element(element)?, &link.interval));
                    next = Some(tail.as_ref());
                }
                NodeKind::ArrayHead { element } => {
                    let kind = MatcherKind::ArrayHead {
                        element: Box::new(self.compile_element(element)?),
                        index,
                    };
                    break Matcher::new(kind, link.interval.clone());
                }
                // the splat takes everything from `index` on, so the chain ends here
                NodeKind::ArrayTailSplat { splat } => break self.compile_splat(splat, index)?,
                _ => return self.error(malformed(link, "the rest of an array")),
            }
        };

        let mut matcher = end;
        for (index, (head, interval)) in links.into_iter().enumerate().rev() {
            let kind = MatcherKind::ArrayList {
                head: Box::new(head),
                tail: Box::new(matcher),
                index,
            };
            matcher = Matcher::new(kind, interval.clone());
        }
        Ok(matcher)
    }

    fn compile_splat(&mut self, node: &'n Node, index: usize) -> Result<Matcher> {
        let kind = match &node.kind {
            NodeKind::ArraySplat { inner } => {
                if inner.is_splat() {
                    return self.error(misplaced_splat(inner));
                }
                MatcherKind::Splat {
                    inner: Box::new(self.compile_element(inner)?),
                    index,
                }
            }
            NodeKind::AnonymousArraySplat => MatcherKind::AnonymousSplat { index },
            _ => return self.error(malformed(node, "a splat")),
        };

        Ok(Matcher::new(kind, node.interval.clone()))
    }

    fn bind(&mut self, name: &'n str, interval: &'n Interval) -> Result<()> {
        if name == ANONYMOUS {
            return Ok(());
        }

        if let Some(first) = self.names.insert(name, interval) {
            return self.error(CompilerError::DuplicateBinding(DuplicateBinding {
                dbg_line: dbg_line!(),
                name: name.to_string(),
                src: interval.source().to_string(),
                first: first.into(),
                second: interval.into(),
            }));
        }
        Ok(())
    }
}

fn misplaced_splat(node: &Node) -> CompilerError {
    CompilerError::MisplacedSplat(MisplacedSplat {
        dbg_line: dbg_line!(),
        src: node.interval.source().to_string(),
        position: (&node.interval).into(),
    })
}

fn malformed(node: &Node, expected: &str) -> CompilerError {
    CompilerError::MalformedPattern(MalformedPattern {
        dbg_line: dbg_line!(),
        expected: expected.to_string(),
        actual: node.name().to_string(),
        src: node.interval.source().to_string(),
        position: (&node.interval).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser::Parser, value::Number};
    use miette::SourceSpan;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn compile_str(code: &str) -> Result<Matcher> {
        let ast = Parser::new(code, Lexer::new(code).lex()?).parse_pattern()?;
        compile(&ast)
    }

    fn tree(code: &str) -> String {
        compile_str(code).unwrap().to_string()
    }

    #[test]
    fn compile_arrays() {
        assert_eq!(tree("[]"), "EmptyList[0]");
        assert_eq!(tree("[a]"), "ArrayList[0](a, EmptyList[1])");
        assert_eq!(tree("[a, b]"), "ArrayList[0](a, ArrayHead[1](b))");
        assert_eq!(
            tree("[1, 'x', c]"),
            r#"ArrayList[0](1, ArrayList[1]("x", ArrayHead[2](c)))"#
        );
        assert_eq!(
            tree("[[], [x]]"),
            "ArrayList[0](EmptyList[0], ArrayHead[1](ArrayList[0](x, EmptyList[1])))"
        );
    }

    #[test]
    fn compile_splats() {
        assert_eq!(tree("[*_]"), "AnonymousSplat[0]");
        assert_eq!(tree("[*rest]"), "Splat[0](rest)");
        assert_eq!(tree("[head, *tail]"), "ArrayList[0](head, Splat[1](tail))");
        assert_eq!(
            tree("[a, b, *_]"),
            "ArrayList[0](a, ArrayList[1](b, AnonymousSplat[2]))"
        );
    }

    #[test]
    fn compile_scalars() {
        assert_eq!(
            compile_str("2.5").unwrap().kind,
            MatcherKind::Literal(Literal::Number(Number::Float(2.5)))
        );
        assert_eq!(
            compile_str("'s'").unwrap().kind,
            MatcherKind::Literal(Literal::String("s".into()))
        );
        assert_eq!(
            compile_str("name").unwrap().kind,
            MatcherKind::Identifier("name".into())
        );
    }

    #[test]
    fn matchers_keep_their_interval() {
        let matcher = compile_str("[a, *rest]").unwrap();
        let MatcherKind::ArrayList { head, tail, .. } = &matcher.kind else {
            panic!("expected an array list, got {matcher}");
        };
        assert_eq!(head.interval.text(), "a");
        assert_eq!(tail.interval.text(), "*rest");
        assert_eq!(matcher.interval.text(), "a, *rest");
    }

    #[test]
    fn duplicate_binding() {
        let error = compile_str("[a, [b, a]]").unwrap_err();
        let error = error
            .downcast_ref::<DuplicateBinding>()
            .expect("duplicate binding error");
        assert_eq!(error.name, "a");
        assert_eq!(error.first, SourceSpan::from(1..2));
        assert_eq!(error.second, SourceSpan::from(8..9));

        assert!(compile_str("[x, *x]").is_err());
    }

    #[test]
    fn anonymous_identifier_may_repeat() {
        assert_eq!(
            tree("[_, _, *_]"),
            "ArrayList[0](_, ArrayList[1](_, AnonymousSplat[2]))"
        );
    }

    #[test]
    fn rejects_hand_built_non_trailing_splat() {
        let source: Arc<str> = "[*a, b]".into();
        let interval = |from, to| Interval::new(source.clone(), from, to);
        let ident = |name: &str, from, to| {
            Node::new(NodeKind::Identifier(name.into()), interval(from, to))
        };

        let ast = Node::new(
            NodeKind::ArrayLiteral {
                list: Some(Box::new(Node::new(
                    NodeKind::ArrayValueList {
                        head: Box::new(Node::new(
                            NodeKind::ArraySplat {
                                inner: Box::new(ident("a", 2, 3)),
                            },
                            interval(1, 3),
                        )),
                        tail: Some(Box::new(Node::new(
                            NodeKind::ArrayHead {
                                element: Box::new(ident("b", 5, 6)),
                            },
                            interval(3, 6),
                        ))),
                    },
                    interval(1, 6),
                ))),
            },
            interval(0, 7),
        );

        let error = compile(&ast).unwrap_err();
        assert!(error.downcast_ref::<MisplacedSplat>().is_some());
    }

    #[test]
    fn rejects_malformed_tree() {
        let source: Arc<str> = "x".into();
        let node = Node::new(
            NodeKind::ArrayHead {
                element: Box::new(Node::new(
                    NodeKind::Identifier("x".into()),
                    Interval::new(source.clone(), 0, 1),
                )),
            },
            Interval::new(source, 0, 1),
        );

        let error = compile(&node).unwrap_err();
        let error = error
            .downcast_ref::<MalformedPattern>()
            .expect("malformed pattern error");
        assert_eq!(error.actual, "ArrayHead");
    }

    #[test]
    fn compile_long_array() {
        let names: Vec<String> = (0..10_000).map(|i| format!("a{i}")).collect();
        let matcher = compile_str(&format!("[{}, *rest]", names.join(", "))).unwrap();
        let tree = matcher.to_string();
        assert!(tree.starts_with("ArrayList[0](a0, ArrayList[1](a1, "));
        assert!(tree.contains("ArrayList[9999](a9999, Splat[10000](rest))"));

        let error = compile_str(&format!("[{}, a0]", names.join(", "))).unwrap_err();
        assert!(error.downcast_ref::<DuplicateBinding>().is_some());
    }

    #[test]
    fn errors_convert_into_reports() {
        let source: Arc<str> = "*_".into();
        let node = Node::new(NodeKind::AnonymousArraySplat, Interval::new(source, 0, 2));
        let report = misplaced_splat(&node).into_err_report();
        let error = report
            .downcast_ref::<MisplacedSplat>()
            .expect("misplaced splat error");
        assert_eq!(error.position, SourceSpan::from(0..2));
    }
}
