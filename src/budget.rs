//! Streaming YAML budget checker over saphyr-parser events.
//!
//! The tree source feeds every raw parser event through a [`BudgetEnforcer`] before
//! turning it into a node, so pathological inputs are rejected before the tree (and
//! the recursive bind that walks it) grows without bound.

use std::borrow::Cow;
use std::collections::HashSet;

use saphyr_parser::{Event, Parser, ScalarStyle, ScanError};
use serde::Deserialize;

/// Limits for a streaming YAML scan.
///
/// The defaults are permissive for typical configuration files while stopping
/// obviously resource-amplifying inputs. `max_depth` also bounds the recursion depth
/// of both tree building and binding.
///
/// ```rust
/// use yaml_registry::{Budget, Options, Registry, from_str_with_options, record};
///
/// #[derive(Debug, Default)]
/// struct Config {
///     retries: i32,
/// }
/// record!(Config { retries });
///
/// let options = yaml_registry::options! {
///     budget: Some(Budget { max_depth: 8, ..Budget::default() }),
/// };
/// let registry = Registry::primitives();
/// let cfg: Config = from_str_with_options("retries: 5\n", &registry, options).unwrap();
/// assert_eq!(cfg.retries, 5);
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Maximum total parser events (counting every event).
    ///
    /// Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of alias (`*ref`) events allowed.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximal total number of anchors (distinct `&anchor` definitions).
    ///
    /// Default: 50,000
    pub max_anchors: usize,
    /// Maximum structural nesting depth (sequences + mappings).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream.
    ///
    /// Default: 1,024
    pub max_documents: usize,
    /// Maximum number of *nodes* (SequenceStart/MappingStart/Scalar).
    ///
    /// Default: 250,000
    pub max_nodes: usize,
    /// Maximum total bytes of scalar contents (sum of `Scalar.value.len()`).
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
    /// Maximum number of merge keys (`<<`) allowed across the stream.
    ///
    /// Default: 10,000
    pub max_merge_keys: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000, // plenty for normal configs
            max_aliases: 50_000,   // liberal absolute cap
            max_anchors: 50_000,
            max_depth: 2_000,                         // protects stack/CPU
            max_documents: 1_024,                     // doc separator storms
            max_nodes: 250_000,                       // sequences + maps + scalars
            max_total_scalar_bytes: 64 * 1024 * 1024, // 64 MiB of scalar text
            max_merge_keys: 10_000,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BudgetBreach {
    /// The total number of parser events exceeded [`Budget::max_events`].
    Events { events: usize },
    /// The number of alias events exceeded [`Budget::max_aliases`].
    Aliases { aliases: usize },
    /// The number of distinct anchors exceeded [`Budget::max_anchors`].
    Anchors { anchors: usize },
    /// The structural nesting depth exceeded [`Budget::max_depth`].
    Depth { depth: usize },
    /// The number of YAML documents exceeded [`Budget::max_documents`].
    Documents { documents: usize },
    /// The number of nodes exceeded [`Budget::max_nodes`].
    Nodes { nodes: usize },
    /// The cumulative size of scalar contents exceeded [`Budget::max_total_scalar_bytes`].
    ScalarBytes { total_scalar_bytes: usize },
    /// The number of merge keys exceeded [`Budget::max_merge_keys`].
    MergeKeys { merge_keys: usize },
    /// A closing event was seen without a matching opening event.
    SequenceUnbalanced,
}

/// Summary of the scan (even if no breach).
#[derive(Clone, Debug, Default)]
pub struct BudgetReport {
    /// `Some(..)` if a limit was exceeded.
    pub breached: Option<BudgetBreach>,
    pub events: usize,
    pub aliases: usize,
    pub anchors: usize,
    pub documents: usize,
    pub nodes: usize,
    /// Maximum structural nesting depth reached at any point in the stream.
    pub max_depth: usize,
    pub total_scalar_bytes: usize,
    pub merge_keys: usize,
}

/// Stateful helper that enforces a [`Budget`] while consuming a stream of [`Event`]s.
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    depth: usize,
    defined_anchors: HashSet<usize>,
    // One entry per open container; `Some(expecting_key)` for mappings.
    containers: Vec<Option<bool>>,
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            depth: 0,
            defined_anchors: HashSet::with_capacity(64),
            containers: Vec::with_capacity(64),
        }
    }

    /// Observe a parser [`Event`], updating the counters.
    ///
    /// Returns `Err(BudgetBreach)` as soon as a limit is exceeded.
    pub fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        self.report.events += 1;
        if self.report.events > self.budget.max_events {
            return Err(BudgetBreach::Events {
                events: self.report.events,
            });
        }

        match ev {
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd | Event::Nothing => {}
            Event::DocumentStart(_explicit) => {
                self.report.documents += 1;
                if self.report.documents > self.budget.max_documents {
                    return Err(BudgetBreach::Documents {
                        documents: self.report.documents,
                    });
                }
            }
            Event::Alias(_anchor_id) => {
                self.report.aliases += 1;
                if self.report.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::Aliases {
                        aliases: self.report.aliases,
                    });
                }
                self.after_node();
            }
            Event::Scalar(value, style, anchor_id, tag) => {
                self.bump_nodes()?;
                self.report.total_scalar_bytes =
                    self.report.total_scalar_bytes.saturating_add(value.len());
                if self.report.total_scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::ScalarBytes {
                        total_scalar_bytes: self.report.total_scalar_bytes,
                    });
                }
                self.record_anchor(*anchor_id)?;
                if self.expecting_key() && is_merge_key(value, style, tag.is_some()) {
                    self.report.merge_keys += 1;
                    if self.report.merge_keys > self.budget.max_merge_keys {
                        return Err(BudgetBreach::MergeKeys {
                            merge_keys: self.report.merge_keys,
                        });
                    }
                }
                self.after_node();
            }
            Event::SequenceStart(anchor_id, _) | Event::MappingStart(anchor_id, _) => {
                self.bump_nodes()?;
                self.depth = self.depth.saturating_add(1);
                self.report.max_depth = self.report.max_depth.max(self.depth);
                if self.depth > self.budget.max_depth {
                    return Err(BudgetBreach::Depth { depth: self.depth });
                }
                self.record_anchor(*anchor_id)?;
                let is_mapping = matches!(ev, Event::MappingStart(..));
                self.containers.push(is_mapping.then_some(true));
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or(BudgetBreach::SequenceUnbalanced)?;
                self.containers
                    .pop()
                    .ok_or(BudgetBreach::SequenceUnbalanced)?;
                // The closed container was itself a key or a value of its parent.
                self.after_node();
            }
        }

        Ok(())
    }

    fn bump_nodes(&mut self) -> Result<(), BudgetBreach> {
        self.report.nodes += 1;
        if self.report.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::Nodes {
                nodes: self.report.nodes,
            });
        }
        Ok(())
    }

    fn record_anchor(&mut self, anchor_id: usize) -> Result<(), BudgetBreach> {
        if anchor_id != 0 && self.defined_anchors.insert(anchor_id) {
            let count = self.defined_anchors.len();
            if count > self.budget.max_anchors {
                self.report.anchors = count;
                return Err(BudgetBreach::Anchors { anchors: count });
            }
        }
        self.report.anchors = self.defined_anchors.len();
        Ok(())
    }

    fn expecting_key(&self) -> bool {
        matches!(self.containers.last(), Some(Some(true)))
    }

    /// Flip key/value expectation of the innermost mapping after a complete node.
    fn after_node(&mut self) {
        if let Some(Some(expecting_key)) = self.containers.last_mut() {
            *expecting_key = !*expecting_key;
        }
    }

    /// Consume the enforcer and return the accumulated [`BudgetReport`].
    pub fn finalize(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();
        self.report
    }
}

pub(crate) fn is_merge_key(value: &Cow<'_, str>, style: &ScalarStyle, has_tag: bool) -> bool {
    !has_tag && matches!(style, ScalarStyle::Plain) && value.as_ref() == "<<"
}

/// Check an input `&str` against the given `Budget` without building a tree.
///
/// Returns `Ok(report)`; `report.breached.is_none()` means the input is within budget.
/// Scanner failures are returned as `Err(ScanError)`.
pub fn check_budget(input: &str, budget: &Budget) -> Result<BudgetReport, ScanError> {
    let mut parser = Parser::new_from_str(input);
    let mut enforcer = BudgetEnforcer::new(budget.clone());

    while let Some(item) = parser.next() {
        let (ev, _span) = item?;
        if let Err(breach) = enforcer.observe(&ev) {
            let mut report = enforcer.finalize();
            report.breached = Some(breach);
            return Ok(report);
        }
    }

    Ok(enforcer.finalize())
}
