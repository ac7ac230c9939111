/*
 * This module defines the data types exchanged between the application logic
 * and the host editor. It includes platform-agnostic event types (`AppEvent`)
 * describing document lifecycle and workspace changes, commands for the host
 * (`PlatformCommand`) that repaint the file explorer, the status indicator and
 * notices, semantic identifiers for menu actions (`MenuAction`), and the
 * `PlatformEventHandler` trait that the application logic implements.
 *
 * Documents and folders are identified by vault paths: `/`-separated strings
 * relative to the vault root.
 */

use std::time::Instant;

// --- Semantic Menu Action Identifiers ---

/*
 * Represents logical menu actions in a platform-agnostic way. The host maps
 * each action to a native menu entry registered through
 * `PlatformCommand::RegisterFileMenuItem`.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Formatting,
}

// Describes one entry currently shown in the host's file explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerItem {
    pub path: String,
    pub is_folder: bool,
}

#[cfg(test)]
impl ExplorerItem {
    pub fn file(path: impl Into<String>) -> Self {
        ExplorerItem {
            path: path.into(),
            is_folder: false,
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        ExplorerItem {
            path: path.into(),
            is_folder: true,
        }
    }
}

// --- Events from Host to App Logic ---

/*
 * Represents the host events the application reacts to.
 *
 * `DocumentModified` (a save, possibly external) and `ContentChanged` (live
 * typing in an editor) carry the instant they were observed; recounts for
 * them are debounced and fired by a later `Tick`.
 *
 * The headless binary only lists, scans and formats; the document lifecycle
 * variants come from an editor host.
 */
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum AppEvent {
    DocumentCreated {
        path: String,
    },
    DocumentModified {
        path: String,
        at: Instant,
    },
    ContentChanged {
        path: String,
        at: Instant,
    },
    DocumentDeleted {
        path: String,
    },
    // `path` is the new location of the document.
    DocumentRenamed {
        path: String,
        old_path: String,
    },
    // The focused document changed. `None` when no document view is focused.
    ActiveDocumentChanged {
        path: Option<String>,
    },
    // The complete set of entries currently visible in the file explorer.
    ExplorerItemsListed {
        items: Vec<ExplorerItem>,
    },
    // A document's context menu entry was clicked.
    MenuActionClicked {
        action: MenuAction,
        path: String,
    },
    // Advances the debounce clock; recounts due at or before `now` fire.
    Tick {
        now: Instant,
    },
}

// Represents commands sent from the application logic to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    // Sets the count suffix shown after an explorer entry's title, e.g. " (42)".
    SetExplorerItemCount {
        path: String,
        label: String,
    },
    UpdateStatusText {
        text: String,
    },
    // A transient, non-blocking message.
    ShowNotice {
        text: String,
    },
    RegisterFileMenuItem {
        action: MenuAction,
        title: String,
    },
}

// --- Trait for App Logic to Handle Events ---

// A trait to be implemented by the application logic layer to handle host events.
//
// The host delivers one event at a time and drains the resulting commands
// before delivering the next event.
pub trait PlatformEventHandler: Send + Sync + 'static {
    // Called by the host for every event. The implementor should handle the
    // event and enqueue `PlatformCommand`s for the host to execute.
    fn handle_event(&mut self, event: AppEvent);

    // Called by the host when it is about to shut down.
    fn on_quit(&mut self) {}

    // Attempts to dequeue a single `PlatformCommand` from the internal queue.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}
