//! Source location utilities.

use saphyr_parser::{Marker, Span as ParserSpan};
use serde::Deserialize;

/// Row/column location within the source YAML document (1-indexed, character-based).
///
/// Every node of the document tree carries one, and errors that originate from a
/// node report it through [`crate::Error::location`].
///
/// # Example
///
/// ```
/// use yaml_registry::{Registry, from_str, record};
///
/// #[derive(Debug, Default)]
/// struct Doc {
///     val: String,
/// }
/// record!(Doc { val });
///
/// let registry = Registry::primitives();
/// let err = from_str::<Doc>("other: 1\n", &registry).unwrap_err();
/// let loc = err.location().unwrap();
/// assert_eq!((loc.line(), loc.column()), (1, 6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Location {
    /// 1-indexed row number in the input stream.
    pub(crate) line: u32,
    /// 1-indexed column number in the input stream.
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Create a new location record from 1-indexed line and column.
    pub const fn new(line: usize, column: usize) -> Self {
        // 4 billion lines is well past anything this crate will be fed, and this is
        // diagnostics only.
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column.
    #[inline]
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    #[inline]
    pub(crate) fn is_known(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

/// Convert a parser marker (1-based line, 0-based column) to a [`Location`].
pub(crate) fn location_from_marker(marker: &Marker) -> Location {
    Location::new(marker.line(), marker.col() + 1)
}

/// Location of the first character covered by a parser span.
pub(crate) fn location_from_span(span: &ParserSpan) -> Location {
    location_from_marker(&span.start)
}

/// Location just past the last character covered by a parser span.
///
/// For a block mapping key this is the position of the `:` indicator.
pub(crate) fn end_location_from_span(span: &ParserSpan) -> Location {
    location_from_marker(&span.end)
}
