//! Decoder configuration.

use serde::Deserialize;

use crate::budget::{Budget, BudgetReport};

/// Decoder configuration options.
///
/// Use this to configure the input [`Budget`] and error rendering. Options can be built
/// with struct update syntax, with the [`crate::options!`] macro, or deserialized from
/// a configuration source through `serde` (missing fields take their defaults).
///
/// ```rust
/// use yaml_registry::{Budget, Registry, from_str_with_options, record};
///
/// #[derive(Debug, Default)]
/// struct Config {
///     name: String,
///     retries: i32,
/// }
/// record!(Config { name, retries });
///
/// let yaml = "name: My Application\nretries: 5\n";
///
/// let options = yaml_registry::options! {
///     budget: Some(Budget { max_documents: 2, ..Budget::default() }),
///     with_snippet: false,
/// };
///
/// let registry = Registry::primitives();
/// let cfg: Config = from_str_with_options(yaml, &registry, options).unwrap();
/// assert_eq!(cfg.name, "My Application");
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Optional YAML budget enforced while building the document tree (counts raw
    /// parser events).
    pub budget: Option<Budget>,
    /// Optional callback invoked with the final budget report after a successful parse.
    #[serde(skip)]
    pub budget_report: Option<fn(&BudgetReport)>,
    /// If true, entry points that have access to the original YAML input wrap returned
    /// errors with a rendered source snippet when a location is available.
    ///
    /// Default: false, so error messages keep their plain single-line form.
    pub with_snippet: bool,
    /// Horizontal crop radius (in character columns) when rendering snippets.
    /// If set to `0`, snippet wrapping is disabled.
    pub crop_radius: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            budget_report: None,
            with_snippet: false,
            crop_radius: 64,
        }
    }
}
