/*
 * Defines the user-visible texts the application logic sends to the host:
 * the status indicator prefix, notice messages and menu titles.
 */

// The status indicator reads "Characters: <count>".
pub const STATUS_TEXT_PREFIX: &str = "Characters: ";

pub const FORMATTING_MENU_TITLE: &str = "Formatting";

pub const NOTICE_FORMATTED: &str = "Formatted file";

pub const NOTICE_NO_FORMATTING_CHANGES: &str = "No formatting changes required";

pub fn status_text(count: usize) -> String {
    format!("{STATUS_TEXT_PREFIX}{count}")
}

// Suffix shown after an explorer entry's title.
pub fn explorer_count_label(count: i64) -> String {
    format!(" ({count})")
}
