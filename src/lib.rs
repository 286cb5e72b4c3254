#![forbid(unsafe_code)]
//! Decode YAML into typed values through a registry of string converters.
//!
//! The input is parsed into a tree of typed, position-annotated nodes, which is then
//! walked against a destination value. Records, sequences, string-keyed maps and
//! optional values are bound structurally; every scalar is handed, as text, to the
//! converter registered for the destination's type.
//!
//! ```rust
//! use std::collections::HashMap;
//! use yaml_registry::{Registry, from_str, record};
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     name: String,
//!     retries: Option<u32>,
//!     tags: Vec<String>,
//!     limits: HashMap<String, f64>,
//! }
//! record!(Config { name, retries as "max_retries", tags, limits });
//!
//! let yaml = "name: api\nmax_retries: 3\ntags: [a, b]\nlimits:\n  cpu: 0.5\n";
//! let cfg: Config = from_str(yaml, &Registry::primitives()).unwrap();
//! assert_eq!(cfg.retries, Some(3));
//! assert_eq!(cfg.tags, ["a", "b"]);
//! assert_eq!(cfg.limits["cpu"], 0.5);
//! ```
//!
//! Anchors, aliases, tags, merge keys, directives and complex keys are recognized but
//! not bound; they fail with [`Error::UnsupportedFeature`].

pub use budget::{Budget, BudgetBreach, BudgetReport, check_budget};
pub use decoder::{Decoder, bind_stream, from_reader, from_str, from_str_with_options};
pub use destination::{
    Destination, Field, Indirect, MapTarget, Record, SequenceTarget, Target, find_field,
};
pub use error::Error;
pub use location::Location;
pub use node::{Document, Feature, Node, NodeKind, Stream};
pub use options::Options;
pub use registry::{ConvertError, Registry, ValueSetter};
pub use tree::parse_stream;

pub mod budget;
mod decoder;
mod destination;
mod engine;
mod error;
mod location;
mod macros;
mod node;
mod options;
mod parse_scalars;
mod registry;
mod resolve;
#[cfg(feature = "snippets")]
mod snippet;
mod tree;
