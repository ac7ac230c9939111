/*
 * Provides the one-click cleanup applied by the "Formatting" menu action.
 *
 * `format_content` normalizes whitespace and paragraph spacing of a Markdown
 * document while leaving code untouched: inline code spans are swapped for
 * placeholder tokens before any line is edited and restored verbatim at the
 * end, fenced blocks pass through byte-for-byte, and indented code lines are
 * skipped. Applying the formatter to its own output changes nothing.
 */
use crate::core::char_counter::{normalize_line_endings, strip_frontmatter};
use crate::core::code_spans::{self, SpanContent};
use regex::Regex;
use std::sync::LazyLock;

static INTERIOR_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" {2,}").unwrap_or_else(|e| panic!("invalid built-in pattern: {e}"))
});

const HARD_BREAK: &str = "  ";
const PARAGRAPH_SEPARATOR: &str = "\n\n";

// Private-use code points, one of which becomes the placeholder delimiter.
const SENTINEL_RANGE: std::ops::RangeInclusive<u32> = 0xE000..=0xF8FF;

/*
 * Inline code spans replaced by `<sentinel><index><sentinel>` tokens. The
 * sentinel is a private-use character that does not occur in the document,
 * so a token can never be confused with document text.
 */
struct ProtectedSpans {
    sentinel: char,
    originals: Vec<String>,
}

impl ProtectedSpans {
    fn protect(text: &str) -> (String, Option<ProtectedSpans>) {
        let spans = code_spans::find_code_spans(text, SpanContent::Anything);
        if spans.is_empty() {
            return (text.to_string(), None);
        }
        let Some(sentinel) = SENTINEL_RANGE
            .filter_map(char::from_u32)
            .find(|c| !text.contains(*c))
        else {
            log::warn!("ContentFormatter: No free placeholder character; code spans left unprotected.");
            return (text.to_string(), None);
        };

        let mut masked = String::with_capacity(text.len());
        let mut originals = Vec::with_capacity(spans.len());
        let mut last = 0;
        for span in spans {
            masked.push_str(&text[last..span.start]);
            masked.push(sentinel);
            masked.push_str(&originals.len().to_string());
            masked.push(sentinel);
            originals.push(text[span.start..span.end].to_string());
            last = span.end;
        }
        masked.push_str(&text[last..]);
        (masked, Some(ProtectedSpans { sentinel, originals }))
    }

    fn restore(&self, masked: &str) -> String {
        let mut out = String::with_capacity(masked.len());
        for (i, part) in masked.split(self.sentinel).enumerate() {
            if i % 2 == 0 {
                out.push_str(part);
                continue;
            }
            match part.parse::<usize>().ok().and_then(|idx| self.originals.get(idx)) {
                Some(original) => out.push_str(original),
                None => {
                    // Unreachable for tokens produced by `protect`; keep the text as-is.
                    out.push(self.sentinel);
                    out.push_str(part);
                    out.push(self.sentinel);
                }
            }
        }
        out
    }
}

fn is_fence_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn is_indented_code(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/*
 * Keeps the leading indentation, collapses interior space runs and trims the
 * trailing whitespace. A line ending in two or more spaces keeps exactly two
 * (a Markdown hard break).
 */
fn tidy_line(line: &str) -> String {
    let rest = line.trim_start();
    let leading = &line[..line.len() - rest.len()];
    let body = rest.trim_end();
    let hard_break = rest.ends_with(HARD_BREAK);

    let mut tidied = String::with_capacity(line.len());
    tidied.push_str(leading);
    tidied.push_str(&INTERIOR_SPACES.replace_all(body, " "));
    if hard_break {
        tidied.push_str(HARD_BREAK);
    }
    tidied
}

/*
 * Strips leading empty lines and every frontmatter block found at the start.
 * Stripping repeats so that the formatted output never begins with a block
 * that a second run would remove.
 */
fn strip_leading_frontmatter(text: &str) -> &str {
    let mut body = text.trim_start_matches('\n');
    loop {
        let stripped = strip_frontmatter(body);
        if stripped.len() == body.len() {
            return body;
        }
        body = stripped;
    }
}

pub fn format_content(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = normalize_line_endings(text);
    let body = strip_leading_frontmatter(&normalized);
    let (masked, protected) = ProtectedSpans::protect(body);

    let mut formatted = String::with_capacity(masked.len());
    // Fence block of the previously emitted line, if it was fenced.
    let mut previous: Option<Option<usize>> = None;
    let mut current_fence: Option<usize> = None;
    let mut fences_seen = 0;

    for line in masked.split('\n') {
        let (rendered, fence) = if is_fence_marker(line) {
            let fence = match current_fence.take() {
                Some(open) => Some(open),
                None => {
                    fences_seen += 1;
                    current_fence = Some(fences_seen);
                    current_fence
                }
            };
            (line.to_string(), fence)
        } else if current_fence.is_some() {
            (line.to_string(), current_fence)
        } else if is_indented_code(line) {
            (line.to_string(), None)
        } else {
            (tidy_line(line), None)
        };

        if fence.is_none() && rendered.is_empty() {
            continue;
        }
        if let Some(previous_fence) = previous {
            let same_fence = fence.is_some() && previous_fence == fence;
            formatted.push_str(if same_fence { "\n" } else { PARAGRAPH_SEPARATOR });
        }
        formatted.push_str(&rendered);
        previous = Some(fence);
    }

    let trimmed_len = formatted.trim_end_matches('\n').len();
    formatted.truncate(trimmed_len);

    match protected {
        Some(protected) => protected.restore(&formatted),
        None => formatted,
    }
}
