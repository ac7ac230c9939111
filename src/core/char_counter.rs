/*
 * This module provides utilities for character counting.
 * It defines an abstraction `CharacterCounterOperations` for counting the visible
 * characters of a document, and two concrete implementations:
 * `MarkdownCharacterCounter`, which strips Markdown markup through a fixed,
 * ordered list of regex rules before counting, and `PlainCharacterCounter`,
 * which counts every non-whitespace character.
 *
 * The Markdown rules are applied as independent textual passes, not as a parse.
 * Reordering them changes the result for overlapping markup such as `**_x_**`,
 * so the order below is part of the contract.
 */
use crate::core::code_spans;
use regex::Regex;
use std::sync::LazyLock;

/*
 * Defines the contract for a service that counts the characters of a document.
 * What counts as a "character" depends on the implementation.
 */
pub trait CharacterCounterOperations: Send + Sync {
    fn count_characters(&self, text: &str) -> usize;
}

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| compile(r"\A---(?s:.*?)---\s*"));
static FENCE_MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^(?:```|~~~).*$"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| compile(r"!\[([^\]]*)\]\([^)]*\)"));
static LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[([^\]]+)\]\([^)]*\)"));
static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| compile(r"<([^>]+)>"));
static STRONG_STAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static STRONG_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| compile(r"__(.*?)__"));
static EMPHASIS_STAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.*?)\*"));
static EMPHASIS_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| compile(r"_(.*?)_"));
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| compile(r"~~(.*?)~~"));
static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^#+\s*"));
static BLOCKQUOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^>\s?"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^(?:[-+*]|[0-9]+\.)\s+"));
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?m)^(?:-{3,}|_{3,}|\*{3,})$"));
static BRACKETS: LazyLock<Regex> = LazyLock::new(|| compile(r"[\[\]()]"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]+>"));
static ESCAPED_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\\([\\`*_{}\[\]()#+\-.!>])"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s"));

// The patterns are literals; a failure here is a programming error caught by the tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

fn keep_first_group(re: &Regex, text: String) -> String {
    re.replace_all(&text, "${1}").into_owned()
}

fn drop_matches(re: &Regex, text: String) -> String {
    re.replace_all(&text, "").into_owned()
}

/*
 * Removes a single YAML frontmatter block at the very start of the text,
 * together with any whitespace following its closing marker.
 */
pub fn strip_frontmatter(text: &str) -> &str {
    match FRONTMATTER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

// CRLF first, then any stray CR, so no "\r" survives.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/*
 * Counts the characters a reader would see in rendered Markdown.
 *
 * The rules run in this order: frontmatter, line endings, fence marker lines
 * (fenced content is kept and counted), images, links, autolinks, inline code,
 * emphasis delimiters (`**`, `__`, `*`, `_`, `~~` as separate passes),
 * line-leading markers (headings, quotes, lists, horizontal rules), stray
 * brackets and parentheses, HTML tags, backslash escapes and finally all
 * whitespace. The result is the number of Unicode scalar values left over.
 */
pub fn count_characters(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let text = normalize_line_endings(strip_frontmatter(text));
    let text = drop_matches(&FENCE_MARKER_LINE, text);
    let text = keep_first_group(&IMAGE, text);
    let text = keep_first_group(&LINK, text);
    let text = keep_first_group(&AUTOLINK, text);
    let text = code_spans::unwrap_code_spans(&text);

    let text = keep_first_group(&STRONG_STAR, text);
    let text = keep_first_group(&STRONG_UNDERSCORE, text);
    let text = keep_first_group(&EMPHASIS_STAR, text);
    let text = keep_first_group(&EMPHASIS_UNDERSCORE, text);
    let text = keep_first_group(&STRIKETHROUGH, text);

    let text = drop_matches(&HEADING_MARKER, text);
    let text = drop_matches(&BLOCKQUOTE_MARKER, text);
    let text = drop_matches(&LIST_MARKER, text);
    let text = drop_matches(&HORIZONTAL_RULE, text);

    let text = drop_matches(&BRACKETS, text);
    let text = drop_matches(&HTML_TAG, text);
    let text = keep_first_group(&ESCAPED_PUNCTUATION, text);
    let text = drop_matches(&WHITESPACE, text);

    text.chars().count()
}

/*
 * A concrete implementation of `CharacterCounterOperations` that strips
 * Markdown markup before counting. See `count_characters`.
 */
pub struct MarkdownCharacterCounter;

impl MarkdownCharacterCounter {
    pub fn new() -> Self {
        MarkdownCharacterCounter
    }
}

impl Default for MarkdownCharacterCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterCounterOperations for MarkdownCharacterCounter {
    fn count_characters(&self, text: &str) -> usize {
        count_characters(text)
    }
}

/*
 * A concrete implementation of `CharacterCounterOperations` that counts every
 * non-whitespace character, markup included. Used to exercise aggregation
 * without the Markdown rules.
 */
#[cfg(test)]
pub struct PlainCharacterCounter;

#[cfg(test)]
impl PlainCharacterCounter {
    pub fn new() -> Self {
        PlainCharacterCounter
    }
}

#[cfg(test)]
impl CharacterCounterOperations for PlainCharacterCounter {
    fn count_characters(&self, text: &str) -> usize {
        text.chars().filter(|c| !c.is_whitespace()).count()
    }
}
