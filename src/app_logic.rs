/*
 * This module provides the application logic layer, centered around
 * `SyncOrchestrator`, which turns host events into count updates and UI
 * commands. `ExplorerUiState` mirrors the host's explorer and focus, and
 * `ui_constants` holds the user-visible texts.
 * Unit tests for `SyncOrchestrator` are in `handler_tests.rs`.
 */
pub mod explorer_ui_state;
pub mod handler;
pub mod ui_constants;


pub use explorer_ui_state::explorer_items_from_documents;
pub use handler::SyncOrchestrator;
