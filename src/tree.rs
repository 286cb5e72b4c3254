//!
//! Tree source: builds the typed document tree from the `saphyr_parser::Parser` event
//! stream.
//!
//! Responsibilities
//! - Pull raw events, enforce the optional [`crate::Budget`], and track source locations.
//! - Turn scalars into typed nodes (plain scalars are resolved with the core schema,
//!   quoted scalars are strings, block scalars become literal blocks).
//! - Keep anchors, aliases, tags, merge keys and complex keys visible as their own
//!   node kinds instead of resolving them; binding reports them as unsupported.
//! - Attach `%` directives to the document they precede.
//!
//! Locations
//! - Every node carries the location of its first character. Mapping entries carry
//!   the location just past their key, i.e. the `:` indicator of a block mapping.

use std::borrow::Cow;

use log::{debug, trace};
use saphyr_parser::{Event, Parser, ScalarStyle, StrInput};

use crate::budget::{BudgetEnforcer, BudgetReport, is_merge_key};
use crate::error::Error;
use crate::location::{Location, end_location_from_span, location_from_span};
use crate::node::{Document, Node, NodeKind, Stream};
use crate::options::Options;
use crate::resolve::resolve_plain;

/// Owned, simplified parser event with its source span.
#[derive(Clone, Debug)]
enum Ev {
    DocStart {
        location: Location,
    },
    DocEnd,
    Scalar {
        value: String,
        style: ScalarStyle,
        anchor: usize,
        tag: Option<String>,
        location: Location,
        end: Location,
    },
    SeqStart {
        anchor: usize,
        tag: Option<String>,
        location: Location,
    },
    SeqEnd,
    MapStart {
        anchor: usize,
        tag: Option<String>,
        location: Location,
    },
    MapEnd,
    Alias {
        id: usize,
        location: Location,
        end: Location,
    },
}

/// Event source wrapping `saphyr_parser::Parser`:
/// - Skips stream markers
/// - Applies the budget to every raw event
/// - Keeps a single-item lookahead
struct LiveEvents<'a> {
    input: &'a str,
    /// Underlying streaming parser that produces raw events from the input.
    parser: Parser<'a, StrInput<'a>>,
    /// Single-item lookahead buffer (peeked event not yet consumed).
    look: Option<Ev>,
    budget: Option<BudgetEnforcer>,
    /// Location of the last yielded event (for EOF and structural errors).
    last_location: Location,
}

impl<'a> LiveEvents<'a> {
    fn new(input: &'a str, options: &Options) -> Self {
        Self {
            input,
            parser: Parser::new_from_str(input),
            look: None,
            budget: options.budget.clone().map(BudgetEnforcer::new),
            last_location: Location::UNKNOWN,
        }
    }

    fn next_impl(&mut self) -> Result<Option<Ev>, Error> {
        while let Some(item) = self.parser.next() {
            let (raw, span) = item.map_err(Error::from_scan_error)?;
            let location = location_from_span(&span);

            if let Some(ref mut budget) = self.budget {
                if let Err(breach) = budget.observe(&raw) {
                    return Err(Error::budget(breach).with_location(location));
                }
            }
            self.last_location = location;

            let ev = match raw {
                Event::StreamStart | Event::StreamEnd | Event::Nothing => continue,
                Event::DocumentStart(_explicit) => Ev::DocStart { location },
                Event::DocumentEnd => Ev::DocEnd,
                Event::Scalar(value, style, anchor, tag) => Ev::Scalar {
                    value: match style {
                        ScalarStyle::Literal | ScalarStyle::Folded => {
                            clip_block(value.into_owned(), block_header(self.input, location))
                        }
                        _ => value.into_owned(),
                    },
                    style,
                    anchor,
                    tag: tag.map(|t| t.to_string()),
                    location,
                    end: end_location_from_span(&span),
                },
                Event::SequenceStart(anchor, tag) => Ev::SeqStart {
                    anchor,
                    tag: tag.map(|t| t.to_string()),
                    location,
                },
                Event::SequenceEnd => Ev::SeqEnd,
                Event::MappingStart(anchor, tag) => Ev::MapStart {
                    anchor,
                    tag: tag.map(|t| t.to_string()),
                    location,
                },
                Event::MappingEnd => Ev::MapEnd,
                Event::Alias(id) => Ev::Alias {
                    id,
                    location,
                    end: end_location_from_span(&span),
                },
            };
            return Ok(Some(ev));
        }
        Ok(None)
    }

    fn next(&mut self) -> Result<Option<Ev>, Error> {
        if let Some(ev) = self.look.take() {
            return Ok(Some(ev));
        }
        self.next_impl()
    }

    fn peek(&mut self) -> Result<Option<&Ev>, Error> {
        if self.look.is_none() {
            self.look = self.next_impl()?;
        }
        Ok(self.look.as_ref())
    }

    fn eof(&self) -> Error {
        Error::parse("unexpected end of input").with_location(self.last_location)
    }

    fn finish(&mut self) -> Option<BudgetReport> {
        self.budget.take().map(BudgetEnforcer::finalize)
    }
}

/// Builds nodes from the live event stream.
struct TreeBuilder<'a> {
    events: LiveEvents<'a>,
    /// Directive lines not yet attached to a document, in input order.
    directives: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn stream(&mut self) -> Result<Stream, Error> {
        let mut documents = Vec::new();
        while let Some(ev) = self.events.next()? {
            match ev {
                Ev::DocStart { location } => {
                    let directives = self.take_directives(location);
                    let body = match self.events.peek()? {
                        Some(Ev::DocEnd) | None => None,
                        Some(_) => Some(self.node()?),
                    };
                    match self.events.next()? {
                        Some(Ev::DocEnd) => {}
                        Some(_) => {
                            return Err(Error::parse("expected end of document")
                                .with_location(self.events.last_location));
                        }
                        None => return Err(self.events.eof()),
                    }
                    debug!(
                        "document {} at {}:{} ({} directives)",
                        documents.len(),
                        location.line,
                        location.column,
                        directives.len()
                    );
                    documents.push(Document {
                        directives,
                        body,
                        location,
                    });
                }
                _ => {
                    return Err(Error::parse("expected start of document")
                        .with_location(self.events.last_location));
                }
            }
        }
        Ok(Stream { documents })
    }

    /// Directives that precede a document starting at `location`.
    fn take_directives(&mut self, location: Location) -> Vec<Node> {
        let split = self
            .directives
            .iter()
            .position(|d| d.location.line >= location.line)
            .unwrap_or(self.directives.len());
        self.directives.drain(..split).collect()
    }

    fn node(&mut self) -> Result<Node, Error> {
        let ev = self.events.next()?.ok_or_else(|| self.events.eof())?;
        match ev {
            Ev::Scalar {
                value,
                style,
                anchor,
                tag,
                location,
                ..
            } => {
                let node = scalar_node(value, style, location);
                Ok(decorate(node, anchor, tag, location))
            }
            Ev::SeqStart {
                anchor,
                tag,
                location,
            } => {
                let mut items = Vec::new();
                loop {
                    match self.events.peek()? {
                        Some(Ev::SeqEnd) => {
                            self.events.next()?;
                            break;
                        }
                        Some(_) => items.push(self.node()?),
                        None => return Err(self.events.eof()),
                    }
                }
                trace!("sequence of {} at {}:{}", items.len(), location.line, location.column);
                let node = Node::new(NodeKind::Sequence(items), location);
                Ok(decorate(node, anchor, tag, location))
            }
            Ev::MapStart {
                anchor,
                tag,
                location,
            } => {
                let mut entries = Vec::new();
                loop {
                    match self.events.peek()? {
                        Some(Ev::MapEnd) => {
                            self.events.next()?;
                            break;
                        }
                        Some(_) => entries.push(self.entry()?),
                        None => return Err(self.events.eof()),
                    }
                }
                trace!("mapping of {} at {}:{}", entries.len(), location.line, location.column);
                let node = Node::new(NodeKind::Mapping(entries), location);
                Ok(decorate(node, anchor, tag, location))
            }
            Ev::Alias { id, location, .. } => Ok(Node::new(NodeKind::Alias { id }, location)),
            Ev::DocStart { location } => {
                Err(Error::parse("unexpected start of document").with_location(location))
            }
            Ev::DocEnd | Ev::SeqEnd | Ev::MapEnd => Err(Error::parse("unexpected end of node")
                .with_location(self.events.last_location)),
        }
    }

    /// One key/value pair of a mapping.
    fn entry(&mut self) -> Result<Node, Error> {
        let (key, entry_location) = match self.events.peek()? {
            Some(Ev::Scalar {
                value,
                style,
                tag: None,
                anchor: 0,
                location,
                end,
            }) if is_merge_key(&Cow::Borrowed(value.as_str()), style, false) => {
                let (location, end) = (*location, *end);
                self.events.next()?;
                (Node::new(NodeKind::MergeKey, location), end)
            }
            Some(Ev::Scalar { end, .. }) | Some(Ev::Alias { end, .. }) => {
                let end = *end;
                (self.node()?, end)
            }
            Some(_) => {
                let key = self.node()?;
                let location = key.location;
                let complex = Node::new(NodeKind::MappingKey(Box::new(key)), location);
                (complex, location)
            }
            None => return Err(self.events.eof()),
        };
        let value = self.node()?;
        Ok(Node::entry(key, value, entry_location))
    }
}

fn scalar_node(value: String, style: ScalarStyle, location: Location) -> Node {
    match style {
        ScalarStyle::Plain => resolve_plain(&value, location),
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => Node::string(value, location),
        ScalarStyle::Literal | ScalarStyle::Folded => Node::new(
            NodeKind::LiteralBlock(Box::new(Node::string(value, location))),
            location,
        ),
    }
}

/// Header of the block scalar starting at `location` (`|`, `>-`, `|2+`, ...).
fn block_header(input: &str, location: Location) -> Option<&str> {
    let line = input.lines().nth(usize::try_from(location.line()).ok()?.checked_sub(1)?)?;
    let skip = usize::try_from(location.column()).ok()?.saturating_sub(1);
    let offset = line.char_indices().nth(skip).map_or(line.len(), |(at, _)| at);
    let start = line[offset..]
        .find(['|', '>'])
        .map(|at| offset + at)
        .or_else(|| line.rfind(['|', '>']))?;
    let header = &line[start..];
    let end = header[1..]
        .find(|c: char| !(c.is_ascii_digit() || c == '+' || c == '-'))
        .map_or(header.len(), |at| at + 1);
    Some(&header[..end])
}

/// Clip chomping drops the final line break; only `+` keeps it.
fn clip_block(mut value: String, header: Option<&str>) -> String {
    let keep = header.is_some_and(|h| h.contains('+'));
    if !keep && value.ends_with('\n') {
        value.pop();
    }
    value
}

/// Wrap a node in its tag and anchor, innermost tag first.
fn decorate(node: Node, anchor: usize, tag: Option<String>, location: Location) -> Node {
    let node = match tag {
        Some(tag) => Node::new(
            NodeKind::Tag {
                tag,
                value: Box::new(node),
            },
            location,
        ),
        None => node,
    };
    if anchor != 0 {
        Node::new(
            NodeKind::Anchor {
                id: anchor,
                value: Box::new(node),
            },
            location,
        )
    } else {
        node
    }
}

/// Find `%` directive lines.
///
/// A directive is only recognized in a document prefix: at the start of the stream or
/// after a `...` document end marker, up to the next `---`.
fn scan_directives(input: &str) -> Vec<Node> {
    let mut directives = Vec::new();
    let mut in_prefix = true;
    for (idx, line) in input.lines().enumerate() {
        if line.starts_with("...") {
            in_prefix = true;
        } else if line.starts_with("---") {
            in_prefix = false;
        } else if in_prefix && line.starts_with('%') {
            let location = Location::new(idx + 1, 1);
            directives.push(Node::new(
                NodeKind::Directive(line.trim_end().to_owned()),
                location,
            ));
        } else if in_prefix {
            let trimmed = line.trim_start();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                // Bare document content ends the prefix.
                in_prefix = false;
            }
        }
    }
    directives
}

/// Parse `input` into a [`Stream`] of documents.
///
/// A leading UTF-8 byte order mark is ignored. The optional [`crate::Budget`] in
/// `options` is enforced on the raw event stream; the final report is passed to
/// `options.budget_report` when set.
pub fn parse_stream(input: &str, options: &Options) -> Result<Stream, Error> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let mut builder = TreeBuilder {
        events: LiveEvents::new(input, options),
        directives: scan_directives(input),
    };
    let stream = builder.stream()?;
    if let (Some(report), Some(callback)) = (builder.events.finish(), options.budget_report) {
        callback(&report);
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_only_in_document_prefix() {
        let found = scan_directives("%YAML 1.2\n---\nkey: '%not'\n...\n%TAG ! tag:x,2000:\n---\na: 1\n");
        let lines: Vec<u32> = found.iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![1, 5]);
        assert_eq!(found[0].kind, NodeKind::Directive("%YAML 1.2".into()));
    }

    #[test]
    fn bare_document_ends_prefix() {
        assert!(scan_directives("# leading comment\na: 1\n%b\n").is_empty());
    }

    #[test]
    fn block_headers_are_found_past_the_key() {
        let input = "a>b: |+\n  x\nc: >2-\n   y\n";
        assert_eq!(block_header(input, Location::new(1, 6)), Some("|+"));
        assert_eq!(block_header(input, Location::new(3, 4)), Some(">2-"));
        assert_eq!(block_header(input, Location::new(9, 1)), None);
    }

    #[test]
    fn clip_drops_one_final_break() {
        assert_eq!(clip_block("x\n".into(), Some(">")), "x");
        assert_eq!(clip_block("x\n\n".into(), Some("|")), "x\n");
        assert_eq!(clip_block("x\n".into(), Some("|+")), "x\n");
        assert_eq!(clip_block("x".into(), Some("|-")), "x");
    }

    #[test]
    fn decorate_puts_anchor_outside_tag() {
        let at = Location::new(1, 1);
        let node = decorate(Node::string("x", at), 3, Some("!t".into()), at);
        match node.kind {
            NodeKind::Anchor { id: 3, value } => {
                assert!(matches!(value.kind, NodeKind::Tag { .. }))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
