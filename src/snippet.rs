//! Source snippet rendering for [`crate::Error::WithSnippet`].

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet, renderer::DecorStyle};

use crate::location::Location;

/// Render `msg` against a window of `text` around `location`.
///
/// The window holds two lines before and after the error line. Lines are cropped
/// horizontally to `crop_radius` character columns on each side of the error column.
/// Falls back to the plain message when the location lies outside `text`.
pub(crate) fn render(text: &str, location: &Location, msg: &str, crop_radius: usize) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let row = location.line as usize;
    let col = location.column as usize;

    let starts = line_starts(text);
    if row == 0 || col == 0 || row > starts.len() {
        return msg.to_owned();
    }

    let first_row = row.saturating_sub(2).max(1);
    let last_row = row.saturating_add(2).min(starts.len());
    let left_col = col.saturating_sub(crop_radius).max(1);
    let right_col = col.saturating_add(crop_radius);

    let mut window = String::new();
    let mut span = 0..0;
    for r in first_row..=last_row {
        let line = line_at(text, &starts, r);
        let cropped = crop_line(line, left_col, right_col);
        if r == row {
            // Annotate one character, or an empty span at end of line.
            let offset = cropped
                .char_indices()
                .nth(col - left_col)
                .map(|(i, c)| (i, i + c.len_utf8()));
            span = match offset {
                Some((a, b)) => window.len() + a..window.len() + b,
                None => window.len() + cropped.len()..window.len() + cropped.len(),
            };
        }
        window.push_str(&cropped);
        window.push('\n');
    }

    let report = &[Level::ERROR
        .primary_title(format!("line {row} column {col}: {msg}"))
        .element(
            Snippet::source(&window)
                .line_start(first_row)
                .fold(false)
                .annotation(AnnotationKind::Primary.span(span).label(msg)),
        )];

    // Plain ASCII carets, no ANSI colors, so the text is stable outside a terminal.
    let renderer = Renderer::plain().decor_style(DecorStyle::Ascii);
    renderer.render(report).to_string()
}

fn line_starts(source: &str) -> Vec<usize> {
    if source.is_empty() {
        return Vec::new();
    }
    let mut starts = vec![0usize];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' && i + 1 < source.len() {
            starts.push(i + 1);
        }
    }
    starts
}

/// Content of 1-based line `row`, without its line break.
fn line_at<'a>(source: &'a str, starts: &[usize], row: usize) -> &'a str {
    let start = starts[row - 1];
    let end = starts.get(row).map_or(source.len(), |next| next - 1);
    let line = &source[start..end.max(start)];
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Keep character columns `left..=right` (1-based) of `line`.
fn crop_line(line: &str, left: usize, right: usize) -> String {
    line.chars()
        .skip(left - 1)
        .take(right.saturating_sub(left) + 1)
        .collect()
}
