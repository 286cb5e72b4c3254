//! The document tree: typed, position-annotated nodes produced by the tree source.
//!
//! The tree is immutable once built. The decode engine only reads it, so callers with
//! their own YAML front end can construct a [`Stream`] by hand and pass it to
//! [`crate::bind_stream`].

use std::borrow::Cow;
use std::fmt;

use crate::location::Location;

/// A single node of the document tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: Location,
}

/// Everything a node can be.
///
/// The last six variants are YAML features that are recognized but never bound;
/// decoding a document that contains one of them fails with
/// [`crate::Error::UnsupportedFeature`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Null,
    /// Integer literal text, as written (`30`, `-7`, `0x1F`).
    Integer(String),
    /// Float literal text, as written (`3.14159`, `1e3`).
    Float(String),
    String(String),
    Boolean(bool),
    /// `.inf`, `+.inf` or `-.inf`.
    Infinity { negative: bool },
    NaN,
    /// Block scalar (`|` or `>`), wrapping the string node with its content.
    LiteralBlock(Box<Node>),
    Comment(String),
    /// Ordered mapping entries, normally [`NodeKind::MappingEntry`] nodes.
    Mapping(Vec<Node>),
    MappingEntry { key: Box<Node>, value: Box<Node> },
    Sequence(Vec<Node>),

    /// The `<<` merge key.
    MergeKey,
    /// A `%YAML` / `%TAG` directive line.
    Directive(String),
    /// A node with an explicit `!tag`.
    Tag { tag: String, value: Box<Node> },
    /// A node defining an `&anchor`.
    Anchor { id: usize, value: Box<Node> },
    /// A `*alias` reference.
    Alias { id: usize },
    /// A complex (sequence or mapping) key of a mapping entry.
    MappingKey(Box<Node>),
}

/// YAML features the engine recognizes but does not bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    MergeKey,
    Directive,
    Tag,
    Anchor,
    Alias,
    MappingKey,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::MergeKey => "MergeKeyNode",
            Feature::Directive => "DirectiveNode",
            Feature::Tag => "TagNode",
            Feature::Anchor => "AnchorNode",
            Feature::Alias => "AliasNode",
            Feature::MappingKey => "MappingKeyNode",
        };
        f.write_str(name)
    }
}

impl Node {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Convenience constructor for a string scalar.
    pub fn string<S: Into<String>>(value: S, location: Location) -> Self {
        Self::new(NodeKind::String(value.into()), location)
    }

    /// Build a mapping entry; the entry takes the given location (conventionally the
    /// position of the `:` indicator).
    pub fn entry(key: Node, value: Node, location: Location) -> Self {
        Self::new(
            NodeKind::MappingEntry {
                key: Box::new(key),
                value: Box::new(value),
            },
            location,
        )
    }

    /// Canonical text handed to converters for scalar nodes.
    ///
    /// Booleans become `true`/`false`, infinities `Inf`/`-Inf` and not-a-number `NaN`;
    /// other scalars pass their literal text. Non-scalar nodes (and null) have none.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match &self.kind {
            NodeKind::Integer(text) | NodeKind::Float(text) | NodeKind::String(text) => {
                Some(Cow::Borrowed(text.as_str()))
            }
            NodeKind::Boolean(true) => Some(Cow::Borrowed("true")),
            NodeKind::Boolean(false) => Some(Cow::Borrowed("false")),
            NodeKind::Infinity { negative: false } => Some(Cow::Borrowed("Inf")),
            NodeKind::Infinity { negative: true } => Some(Cow::Borrowed("-Inf")),
            NodeKind::NaN => Some(Cow::Borrowed("NaN")),
            _ => None,
        }
    }

    /// The unsupported feature this node represents, if any.
    pub fn feature(&self) -> Option<Feature> {
        match &self.kind {
            NodeKind::MergeKey => Some(Feature::MergeKey),
            NodeKind::Directive(_) => Some(Feature::Directive),
            NodeKind::Tag { .. } => Some(Feature::Tag),
            NodeKind::Anchor { .. } => Some(Feature::Anchor),
            NodeKind::Alias { .. } => Some(Feature::Alias),
            NodeKind::MappingKey(_) => Some(Feature::MappingKey),
            _ => None,
        }
    }
}

/// One top-level YAML document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Directive nodes that appeared before the document start marker.
    pub directives: Vec<Node>,
    /// Document content; `None` for a document with no content at all.
    pub body: Option<Node>,
    pub location: Location,
}

/// All documents of one input, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stream {
    pub documents: Vec<Document>,
}
