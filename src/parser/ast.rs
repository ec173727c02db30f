use crate::{shared::span::Interval, value::Number};

/// Parsed pattern. Every node owns its children and the interval it was parsed from.
#[derive(Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub interval: Interval,
}

#[derive(Debug, PartialEq)]
pub enum NodeKind {
    /// `[` list? `]`
    ArrayLiteral { list: Option<Box<Node>> },
    /// First element of a non-empty array and whatever follows it.
    ArrayValueList {
        head: Box<Node>,
        tail: Option<Box<Node>>,
    },
    /// `, element` closing the array.
    ArrayHead { element: Box<Node> },
    /// `, element` followed by more elements.
    ArrayTail { element: Box<Node>, tail: Box<Node> },
    /// `, *rest` closing the array.
    ArrayTailSplat { splat: Box<Node> },
    /// `*name`
    ArraySplat { inner: Box<Node> },
    /// `*_`
    AnonymousArraySplat,

    NumberLiteral(Number),
    StringLiteral(String),
    Identifier(String),
}

impl Node {
    pub fn new(kind: NodeKind, interval: Interval) -> Self {
        Node { kind, interval }
    }

    pub fn is_splat(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::ArraySplat { .. } | NodeKind::AnonymousArraySplat
        )
    }

    pub fn show_position(&self) -> String {
        self.interval.show_position()
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            NodeKind::ArrayLiteral { .. } => "ArrayLiteral",
            NodeKind::ArrayValueList { .. } => "ArrayValueList",
            NodeKind::ArrayHead { .. } => "ArrayHead",
            NodeKind::ArrayTail { .. } => "ArrayTail",
            NodeKind::ArrayTailSplat { .. } => "ArrayTailSplat",
            NodeKind::ArraySplat { .. } => "ArraySplat",
            NodeKind::AnonymousArraySplat => "AnonymousArraySplat",
            NodeKind::NumberLiteral(Number::Integer(_)) => "IntegerLiteral",
            NodeKind::NumberLiteral(Number::Float(_)) => "FloatLiteral",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::Identifier(_) => "Identifier",
        }
    }
}

/// An `ArrayTail` chain is as long as its array, so it is unlinked one node at a time.
impl Drop for Node {
    fn drop(&mut self) {
        let mut kind = std::mem::replace(&mut self.kind, NodeKind::AnonymousArraySplat);
        while let NodeKind::ArrayTail { element, mut tail } = kind {
            drop(element);
            kind = std::mem::replace(&mut tail.kind, NodeKind::AnonymousArraySplat);
        }
    }
}
