//! Decode errors.
use std::fmt;

use saphyr_parser::ScanError;

use crate::budget::BudgetBreach;
use crate::location::{Location, location_from_marker};
use crate::node::Feature;
use crate::registry::ConvertError;

/// Everything that can go wrong while decoding.
///
/// Decoding is fail-fast: the first error is returned and the destination must then be
/// treated as partially written.
#[derive(Debug)]
pub enum Error {
    /// The top-level destination cannot receive a value.
    InvalidDestination {
        /// `"must be a reference"`, `"must not be nil"` or `"must be settable"`.
        reason: &'static str,
    },
    /// The document uses a YAML feature the engine does not bind.
    UnsupportedFeature {
        feature: Feature,
        location: Location,
    },
    /// A node could not be bound to the destination at this point of the walk.
    UnsupportedType {
        location: Location,
        /// Key text when the node was a mapping entry.
        field: Option<String>,
        /// Fully-qualified Rust type name of the destination.
        type_name: &'static str,
    },
    /// A registered converter rejected the scalar's text.
    Convert {
        cause: ConvertError,
        location: Location,
    },
    /// The input is not well-formed YAML.
    Parse {
        msg: String,
        location: Location,
    },
    /// A YAML budget limit was exceeded.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// Reading the input failed.
    Io {
        cause: std::io::Error,
    },
    /// Wrap an error with a pre-rendered source snippet.
    WithSnippet {
        text: String,
        error: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_destination(reason: &'static str) -> Self {
        Error::InvalidDestination { reason }
    }

    pub(crate) fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse {
            msg: msg.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn budget(breach: BudgetBreach) -> Self {
        Error::Budget {
            breach,
            location: Location::UNKNOWN,
        }
    }

    /// Map a `saphyr_parser::ScanError` into our error type with location.
    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        Error::Parse {
            msg: err.info().to_owned(),
            location: location_from_marker(err.marker()),
        }
    }

    /// Attach/override a concrete location to this error and return it.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::UnsupportedFeature { location, .. }
            | Error::UnsupportedType { location, .. }
            | Error::Convert { location, .. }
            | Error::Parse { location, .. }
            | Error::Budget { location, .. } => {
                *location = set_location;
            }
            Error::InvalidDestination { .. } | Error::Io { .. } | Error::WithSnippet { .. } => {}
        }
        self
    }

    /// Wrap this error with a rendered snippet of `input` around its location.
    ///
    /// Errors without a known location are returned unchanged, and an existing wrapper
    /// is replaced rather than nested.
    #[cfg(feature = "snippets")]
    pub(crate) fn with_snippet(self, input: &str, crop_radius: usize) -> Self {
        let inner = match self {
            Error::WithSnippet { error, .. } => *error,
            other => other,
        };
        let Some(location) = inner.location() else {
            return inner;
        };
        let text = crate::snippet::render(input, &location, &inner.to_string(), crop_radius);
        Error::WithSnippet {
            text,
            error: Box::new(inner),
        }
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::UnsupportedFeature { location, .. }
            | Error::UnsupportedType { location, .. }
            | Error::Convert { location, .. }
            | Error::Parse { location, .. }
            | Error::Budget { location, .. } => location.is_known().then_some(*location),
            Error::WithSnippet { error, .. } => error.location(),
            Error::InvalidDestination { .. } | Error::Io { .. } => None,
        }
    }

    /// The error with any snippet wrapper removed.
    pub fn without_snippet(&self) -> &Error {
        match self {
            Error::WithSnippet { error, .. } => error.without_snippet(),
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDestination { reason } => {
                write!(f, "invalid parameter 'out' {reason}")
            }
            Error::UnsupportedFeature { feature, .. } => {
                write!(f, "unsupported YAML feature: {feature}")
            }
            Error::UnsupportedType {
                location,
                field: None,
                type_name,
            } => write!(
                f,
                "unsupported type at {}:{}: into golang type \"{type_name}\"",
                location.line, location.column
            ),
            Error::UnsupportedType {
                location,
                field: Some(field),
                type_name,
            } => write!(
                f,
                "unsupported type at {}:{}: for yaml field named \"{field}\" into golang type \"{type_name}\"",
                location.line, location.column
            ),
            Error::Convert { cause, .. } => write!(f, "{cause}"),
            Error::Parse { msg, location } => fmt_with_location(f, msg, location),
            Error::Budget { breach, location } => {
                fmt_with_location(f, &format!("YAML budget breached: {breach:?}"), location)
            }
            Error::Io { cause } => write!(f, "IO error: {cause}"),
            Error::WithSnippet { text, .. } => write!(f, "{text}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Convert { cause, .. } => Some(cause.as_ref()),
            Error::Io { cause } => Some(cause),
            Error::WithSnippet { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::Io { cause }
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(
            f,
            "{msg} at line {}, column {}",
            location.line, location.column
        )
    } else {
        write!(f, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_messages() {
        assert_eq!(
            Error::invalid_destination("must not be nil").to_string(),
            "invalid parameter 'out' must not be nil"
        );
        let err = Error::UnsupportedFeature {
            feature: Feature::Anchor,
            location: Location::new(1, 1),
        };
        assert_eq!(err.to_string(), "unsupported YAML feature: AnchorNode");

        let err = Error::UnsupportedType {
            location: Location::new(2, 8),
            field: Some("missing".into()),
            type_name: "app::Config",
        };
        assert_eq!(
            err.to_string(),
            "unsupported type at 2:8: for yaml field named \"missing\" into golang type \"app::Config\""
        );
    }

    #[test]
    fn location_only_when_known() {
        assert_eq!(Error::parse("bad").location(), None);
        let err = Error::parse("bad").with_location(Location::new(3, 4));
        assert_eq!(err.location(), Some(Location::new(3, 4)));
        assert_eq!(err.to_string(), "bad at line 3, column 4");
    }

    #[test]
    fn convert_error_is_shown_unchanged() {
        let err = Error::Convert {
            cause: "my converter says no".into(),
            location: Location::new(1, 7),
        };
        assert_eq!(err.to_string(), "my converter says no");
        assert!(std::error::Error::source(&err).is_some());
    }
}
