/*
 * This module consolidates the core, host-agnostic logic of the application.
 * It re-exports the character counters (`CharacterCounterOperations`), the
 * content formatter, the count store with its delta-based folder aggregation,
 * the recount debouncer, document storage (`DocumentStoreOperations`) and
 * configuration (`ConfigManagerOperations`), together with path utilities.
 */
pub mod char_counter;
pub mod code_spans;
pub mod config;
pub mod content_formatter;
pub mod count_store;
pub mod debouncer;
pub mod document_store;
pub mod path_utils;

pub use char_counter::MarkdownCharacterCounter;

pub use config::{AppSettings, ConfigManagerOperations, CoreConfigManager};

pub use content_formatter::format_content;

pub use count_store::CountStore;

pub use debouncer::Debouncer;

pub use document_store::{CoreDocumentStore, DocumentStoreOperations};

#[cfg(test)]
pub use document_store::DocumentStoreError;
