/*
 * Locates inline code spans: a run of N backticks, some content, and the next
 * run of exactly N backticks. The search mirrors a backtracking regex of the
 * form (`+)(content*?)\1: at each backtick the longest opening run is tried
 * first, then progressively shorter ones, and a failed attempt resumes at the
 * very next byte. Both the character counter and the formatter rely on this
 * exact matching so that their treatment of malformed backtick sequences stays
 * deterministic.
 *
 * Backticks are ASCII, so the scan works on bytes and every returned offset is
 * a valid UTF-8 boundary.
 */

const BACKTICK: u8 = b'`';

// What the text between the delimiters may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanContent {
    // No backticks at all; used by the character counter.
    NoBackticks,
    // Anything, including backticks and newlines; used by the formatter.
    Anything,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpan {
    pub start: usize,
    pub end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
}

fn run_length(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|&&b| b == BACKTICK).count()
}

// First index at or after `from` that begins `len` consecutive backticks.
fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i + len <= bytes.len() {
        if bytes[i] == BACKTICK {
            let run = run_length(bytes, i);
            if run >= len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn match_at(bytes: &[u8], start: usize, content: SpanContent) -> Option<CodeSpan> {
    let opening = run_length(bytes, start);
    for delim in (1..=opening).rev() {
        let inner_start = start + delim;
        let closing = match content {
            SpanContent::NoBackticks => bytes[inner_start..]
                .iter()
                .position(|&b| b == BACKTICK)
                .map(|offset| inner_start + offset)
                .filter(|&q| q + delim <= bytes.len() && run_length(bytes, q) >= delim),
            SpanContent::Anything => find_closing_run(bytes, inner_start, delim),
        };
        if let Some(q) = closing {
            return Some(CodeSpan {
                start,
                end: q + delim,
                inner_start,
                inner_end: q,
            });
        }
    }
    None
}

/*
 * Returns all non-overlapping code spans in `text`, left to right.
 */
pub fn find_code_spans(text: &str, content: SpanContent) -> Vec<CodeSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == BACKTICK) {
        let candidate = i + offset;
        match match_at(bytes, candidate, content) {
            Some(span) => {
                i = span.end;
                spans.push(span);
            }
            None => i = candidate + 1,
        }
    }
    spans
}

/*
 * Replaces every code span with its inner text, dropping the delimiters.
 */
pub fn unwrap_code_spans(text: &str) -> String {
    let spans = find_code_spans(text, SpanContent::NoBackticks);
    if spans.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&text[last..span.start]);
        out.push_str(&text[span.inner_start..span.inner_end]);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}
