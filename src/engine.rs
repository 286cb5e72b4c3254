//! The tree walk: binds document nodes into a destination.
//!
//! Dispatch is on the node kind first. Each arm reports whether it handled the node;
//! an unhandled node is retried against the inner value of an indirect destination
//! (`Option`, `Box`, ...) and otherwise becomes [`Error::UnsupportedType`].

use std::borrow::Cow;

use log::{debug, trace};

use crate::destination::{Destination, Target, find_field};
use crate::error::Error;
use crate::node::{Document, Node, NodeKind};
use crate::registry::ValueSetter;

/// Check the top-level destination before any input is read.
///
/// A `&mut` handle is always a reference, so only absence and shared ownership can be
/// rejected here. Nested destinations are not checked.
pub(crate) fn check_destination(
    out: Option<&mut dyn Destination>,
) -> Result<&mut dyn Destination, Error> {
    let Some(out) = out else {
        return Err(Error::invalid_destination("must not be nil"));
    };
    if let Target::Nested(indirect) = out.target() {
        if !indirect.is_writable() {
            return Err(Error::invalid_destination("must be settable"));
        }
    }
    Ok(out)
}

pub(crate) struct Binder<'s> {
    setter: &'s dyn ValueSetter,
}

impl<'s> Binder<'s> {
    pub(crate) fn new(setter: &'s dyn ValueSetter) -> Self {
        Self { setter }
    }

    /// Bind one document: its directives first, then its body.
    pub(crate) fn bind_document(
        &self,
        document: &Document,
        out: &mut dyn Destination,
    ) -> Result<(), Error> {
        for directive in &document.directives {
            self.bind(directive, out)?;
        }
        match &document.body {
            Some(body) => self.bind(body, out),
            None => Ok(()),
        }
    }

    pub(crate) fn bind(&self, node: &Node, out: &mut dyn Destination) -> Result<(), Error> {
        let handled = match &node.kind {
            NodeKind::Null | NodeKind::Comment(_) => true,
            NodeKind::Integer(_)
            | NodeKind::Float(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::Infinity { .. }
            | NodeKind::NaN => self.convert(node, out)?,
            NodeKind::LiteralBlock(inner) => {
                self.bind(inner, out)?;
                true
            }
            NodeKind::Mapping(entries) => {
                for entry in entries {
                    self.bind(entry, out)?;
                }
                true
            }
            NodeKind::MappingEntry { key, value } => self.bind_entry(key, value, out)?,
            NodeKind::Sequence(items) => self.bind_sequence(items, out)?,
            NodeKind::MergeKey
            | NodeKind::Directive(_)
            | NodeKind::Tag { .. }
            | NodeKind::Anchor { .. }
            | NodeKind::Alias { .. }
            | NodeKind::MappingKey(_) => return Err(unsupported_feature(node)),
        };
        if handled {
            return Ok(());
        }

        if let Target::Nested(indirect) = out.target() {
            if let Some(inner) = indirect.inner_mut() {
                trace!(
                    "{}:{}: descending into {}",
                    node.location.line,
                    node.location.column,
                    inner.type_name()
                );
                return self.bind(node, inner);
            }
        }

        let field = match &node.kind {
            NodeKind::MappingEntry { key, .. } => Some(key_text(key)),
            _ => None,
        };
        Err(Error::UnsupportedType {
            location: node.location,
            field,
            type_name: out.type_name(),
        })
    }

    /// Hand a scalar's canonical text to the registry.
    fn convert(&self, node: &Node, out: &mut dyn Destination) -> Result<bool, Error> {
        let Some(text) = node.scalar_text() else {
            return Ok(false);
        };
        let consumed = self
            .setter
            .set_value(out.as_any_mut(), &text)
            .map_err(|cause| Error::Convert {
                cause,
                location: node.location,
            })?;
        trace!(
            "{}:{}: {:?} into {}: {}",
            node.location.line,
            node.location.column,
            text,
            out.type_name(),
            if consumed { "converted" } else { "no converter" }
        );
        Ok(consumed)
    }

    fn bind_entry(
        &self,
        key: &Node,
        value: &Node,
        out: &mut dyn Destination,
    ) -> Result<bool, Error> {
        if key.feature().is_some() {
            return Err(unsupported_feature(key));
        }
        match out.target() {
            Target::Record(record) => {
                let NodeKind::String(name) = &key.kind else {
                    return Ok(false);
                };
                let Some(index) = find_field(record.fields(), name) else {
                    debug!(
                        "{}:{}: no field matches key {name:?}",
                        key.location.line, key.location.column
                    );
                    return Ok(false);
                };
                if let Some(field) = record.fields().get(index) {
                    trace!("key {name:?} binds field {}", field.external_name());
                }
                let Some(field) = record.field_mut(index) else {
                    return Ok(false);
                };
                self.bind(value, field)?;
                Ok(true)
            }
            Target::Map(map) => {
                let Some(text) = key.scalar_text() else {
                    return Ok(false);
                };
                self.bind(value, map.entry_mut(&text))?;
                Ok(true)
            }
            Target::Sequence(_) | Target::Nested(_) | Target::Leaf => Ok(false),
        }
    }

    fn bind_sequence(&self, items: &[Node], out: &mut dyn Destination) -> Result<bool, Error> {
        let Target::Sequence(sequence) = out.target() else {
            return Ok(false);
        };
        sequence.reset(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(element) = sequence.element_mut(index) else {
                return Ok(false);
            };
            self.bind(item, element)?;
        }
        Ok(true)
    }
}

fn unsupported_feature(node: &Node) -> Error {
    match node.feature() {
        Some(feature) => Error::UnsupportedFeature {
            feature,
            location: node.location,
        },
        None => Error::parse("not an unsupported feature").with_location(node.location),
    }
}

/// Key text reported in errors for an unbindable mapping entry.
fn key_text(key: &Node) -> String {
    match &key.kind {
        NodeKind::LiteralBlock(inner) => key_text(inner),
        NodeKind::Null => "null".to_owned(),
        _ => key.scalar_text().map(Cow::into_owned).unwrap_or_default(),
    }
}
