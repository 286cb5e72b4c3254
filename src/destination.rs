//! Destination descriptors: how the engine sees the value it is filling.
//!
//! Every destination type implements [`Destination`], which classifies it by its static
//! type into one [`Target`] shape. The engine never inspects document content to decide
//! the shape, and it never needs runtime reflection: records describe their fields
//! through a static [`Field`] table (usually generated by [`crate::record!`]).

use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// A value the decoder can populate.
pub trait Destination: Any {
    /// Classify this destination.
    fn target(&mut self) -> Target<'_>;

    /// The same value as `Any`, handed to converters so they can downcast it.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Fully-qualified type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The shape of a destination at one recursion step.
pub enum Target<'a> {
    /// Named fields, bound from mapping entries.
    Record(&'a mut dyn Record),
    /// Ordered collection, bound from a sequence.
    Sequence(&'a mut dyn SequenceTarget),
    /// String-keyed collection, bound entry by entry from a mapping.
    Map(&'a mut dyn MapTarget),
    /// A destination behind an indirection (`Option`, `Box`, `Rc`, `Arc`).
    Nested(&'a mut dyn Indirect),
    /// Bound only by a registered converter.
    Leaf,
}

/// Static description of one record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    ident: &'static str,
    name: Option<&'static str>,
}

impl Field {
    pub const fn new(ident: &'static str, name: Option<&'static str>) -> Self {
        Self { ident, name }
    }

    /// The field's own identifier.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// The declared external name, if any.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The name this field is primarily addressed by in documents.
    pub fn external_name(&self) -> &'static str {
        self.name.unwrap_or(self.ident)
    }

    fn matches(&self, candidate: &str) -> bool {
        self.name == Some(candidate) || self.ident == candidate
    }
}

/// Index of the first field addressed by `candidate`, scanning in declaration order.
///
/// A field matches by its declared external name or by its identifier. Ambiguous
/// declarations resolve to whichever matching field is listed first.
pub fn find_field(fields: &[Field], candidate: &str) -> Option<usize> {
    fields.iter().position(|field| field.matches(candidate))
}

/// A destination with named fields.
pub trait Record {
    /// Participating fields, in declaration order.
    fn fields(&self) -> &'static [Field];

    /// Mutable access to the field at `index` of [`Record::fields`].
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Destination>;
}

/// A destination holding an ordered, homogeneous collection.
pub trait SequenceTarget {
    /// Replace the contents with exactly `len` default elements.
    fn reset(&mut self, len: usize);

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Destination>;
}

/// A destination holding string-keyed values.
pub trait MapTarget {
    /// The value stored under `key`, inserting a default value first if absent.
    fn entry_mut(&mut self, key: &str) -> &mut dyn Destination;
}

/// A destination reached through an indirection.
pub trait Indirect {
    /// The inner destination, allocating a default value when there is none yet.
    /// `None` when the inner value cannot be written (e.g. a shared `Rc`).
    fn inner_mut(&mut self) -> Option<&mut dyn Destination>;

    /// Whether [`Indirect::inner_mut`] can succeed, without allocating.
    fn is_writable(&self) -> bool {
        true
    }
}

crate::leaf!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

crate::leaf!(std::path::PathBuf);

impl<T: Destination + Default> SequenceTarget for Vec<T> {
    fn reset(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, T::default);
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Destination> {
        self.get_mut(index).map(|v| v as &mut dyn Destination)
    }
}

impl<T: Destination + Default> Destination for Vec<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Destination + Default> SequenceTarget for VecDeque<T> {
    fn reset(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, T::default);
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Destination> {
        self.get_mut(index).map(|v| v as &mut dyn Destination)
    }
}

impl<T: Destination + Default> Destination for VecDeque<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<V, S> MapTarget for HashMap<String, V, S>
where
    V: Destination + Default,
    S: BuildHasher + 'static,
{
    fn entry_mut(&mut self, key: &str) -> &mut dyn Destination {
        self.entry(key.to_owned()).or_default()
    }
}

impl<V, S> Destination for HashMap<String, V, S>
where
    V: Destination + Default,
    S: BuildHasher + 'static,
{
    fn target(&mut self) -> Target<'_> {
        Target::Map(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<V: Destination + Default> MapTarget for BTreeMap<String, V> {
    fn entry_mut(&mut self, key: &str) -> &mut dyn Destination {
        self.entry(key.to_owned()).or_default()
    }
}

impl<V: Destination + Default> Destination for BTreeMap<String, V> {
    fn target(&mut self) -> Target<'_> {
        Target::Map(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Destination + Default> Indirect for Option<T> {
    fn inner_mut(&mut self) -> Option<&mut dyn Destination> {
        Some(self.get_or_insert_with(T::default))
    }
}

impl<T: Destination + Default> Destination for Option<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Nested(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Destination> Indirect for Box<T> {
    fn inner_mut(&mut self) -> Option<&mut dyn Destination> {
        Some(&mut **self)
    }
}

impl<T: Destination> Destination for Box<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Nested(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Destination> Indirect for Rc<T> {
    fn inner_mut(&mut self) -> Option<&mut dyn Destination> {
        Rc::get_mut(self).map(|v| v as &mut dyn Destination)
    }

    fn is_writable(&self) -> bool {
        Rc::strong_count(self) == 1 && Rc::weak_count(self) == 0
    }
}

impl<T: Destination> Destination for Rc<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Nested(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Destination> Indirect for Arc<T> {
    fn inner_mut(&mut self) -> Option<&mut dyn Destination> {
        Arc::get_mut(self).map(|v| v as &mut dyn Destination)
    }

    fn is_writable(&self) -> bool {
        Arc::strong_count(self) == 1 && Arc::weak_count(self) == 0
    }
}

impl<T: Destination> Destination for Arc<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Nested(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
