use crate::app_logic::explorer_ui_state::ExplorerUiState;
use crate::app_logic::ui_constants;
use crate::core::{CountStore, Debouncer, DocumentStoreOperations, format_content};
use crate::platform_layer::{
    AppEvent, ExplorerItem, MenuAction, PlatformCommand, PlatformEventHandler,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Made pub(crate) for access from main.rs and handler_tests.rs
pub(crate) const APP_NAME: &str = "VaultTally";

/*
 * Keeps character counts in sync with the vault and the host's UI in a
 * host-agnostic manner. It reacts to document lifecycle events, reads
 * documents through a `DocumentStoreOperations` implementation, updates the
 * `CountStore` and enqueues `PlatformCommand`s that repaint explorer labels,
 * the status indicator and notices.
 *
 * Saves and live edits are debounced per document: each such event replaces
 * the document's pending deadline, and `Tick` events fire the recounts that
 * have come due. Creates, deletes and renames apply immediately.
 */
pub struct SyncOrchestrator {
    count_store: CountStore,
    document_store: Arc<dyn DocumentStoreOperations>,
    recount_debouncer: Debouncer<String>,
    ui_state: ExplorerUiState,
    synthetic_command_queue: VecDeque<PlatformCommand>,
}

impl SyncOrchestrator {
    pub fn new(
        count_store: CountStore,
        document_store: Arc<dyn DocumentStoreOperations>,
        debounce_delay: Duration,
    ) -> Self {
        log::debug!("SyncOrchestrator::new called, debounce delay {debounce_delay:?}.");
        SyncOrchestrator {
            count_store,
            document_store,
            recount_debouncer: Debouncer::new(debounce_delay),
            ui_state: ExplorerUiState::new(),
            synthetic_command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.synthetic_command_queue.push_back(command);
    }

    fn read_document(&self, path: &str) -> Option<String> {
        match self.document_store.read(path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::error!("SyncOrchestrator: Failed to read {path:?}: {e}");
                None
            }
        }
    }

    /*
     * Performs the startup scan: reads every document, rebuilds all counts in
     * one pass, registers the "Formatting" menu item, then repaints every
     * explorer entry and the status indicator. Documents that cannot be read
     * are logged and left out; a failed listing leaves the store empty.
     */
    pub fn initialize_counts(&mut self) {
        log::debug!("SyncOrchestrator: Initializing counts.");
        let documents = match self.document_store.list_all_documents() {
            Ok(documents) => documents,
            Err(e) => {
                log::error!("SyncOrchestrator: Failed to list documents: {e}");
                Vec::new()
            }
        };

        let mut loaded = Vec::with_capacity(documents.len());
        for path in documents {
            if let Some(text) = self.read_document(&path) {
                loaded.push((path, text));
            }
        }
        self.count_store.initialize(loaded);
        log::info!(
            "SyncOrchestrator: Counted {} documents.",
            self.count_store.tracked_file_count()
        );

        self.enqueue_command(PlatformCommand::RegisterFileMenuItem {
            action: MenuAction::Formatting,
            title: ui_constants::FORMATTING_MENU_TITLE.to_string(),
        });
        self.repaint_explorer(None);
        self.refresh_status();
    }

    /*
     * Updates the count label of visible explorer entries. With no changed
     * path every entry is repainted; otherwise only the entry for that path
     * and its ancestor folders. Files show their own count and folders their
     * aggregated total; anything untracked shows 0.
     */
    pub fn repaint_explorer(&mut self, changed_path: Option<&str>) {
        let items = self.ui_state.items_to_repaint(changed_path);
        log::trace!(
            "SyncOrchestrator: Repainting {} explorer entries for {changed_path:?}.",
            items.len()
        );
        for ExplorerItem { path, .. } in items {
            let count = self.count_store.display_count(&path);
            self.enqueue_command(PlatformCommand::SetExplorerItemCount {
                path,
                label: ui_constants::explorer_count_label(count),
            });
        }
    }

    // Shows the focused document's count, or 0 when nothing is focused.
    pub fn refresh_status(&mut self) {
        let count = self
            .ui_state
            .active_document
            .as_deref()
            .and_then(|path| self.count_store.file_count(path))
            .unwrap_or(0);
        self.enqueue_command(PlatformCommand::UpdateStatusText {
            text: ui_constants::status_text(count),
        });
    }

    /*
     * Reads and recounts one document and returns the count delta. Returns
     * `None`, leaving the previous count in place, when the document cannot
     * be read.
     */
    fn recount(&mut self, path: &str) -> Option<i64> {
        let text = self.read_document(path)?;
        let delta = self.count_store.recalculate(path, &text);
        log::debug!("SyncOrchestrator: Recounted {path:?} (delta {delta}).");
        Some(delta)
    }

    // A new explorer entry needs its first label even when the count is zero.
    fn on_document_created(&mut self, path: String) {
        self.ui_state.insert_document(&path);
        if self.recount(&path).is_some() {
            self.repaint_explorer(Some(&path));
        }
    }

    fn schedule_recount(&mut self, path: String, at: Instant) {
        if self.recount_debouncer.schedule(path.clone(), at) {
            log::trace!("SyncOrchestrator: Rescheduled pending recount for {path:?}.");
        } else {
            log::trace!("SyncOrchestrator: Scheduled recount for {path:?}.");
        }
    }

    fn fire_due_recounts(&mut self, now: Instant) {
        for path in self.recount_debouncer.take_due(now) {
            match self.recount(&path) {
                Some(0) => log::trace!("SyncOrchestrator: {path:?} unchanged, no repaint."),
                Some(_) => {
                    self.repaint_explorer(Some(&path));
                    self.refresh_status();
                }
                None => {}
            }
        }
    }

    fn on_document_deleted(&mut self, path: String) {
        if self.recount_debouncer.cancel(&path) {
            log::debug!("SyncOrchestrator: Dropped pending recount for deleted {path:?}.");
        }
        self.count_store.remove(&path);
        self.ui_state.remove_item(&path);
        self.repaint_explorer(Some(&path));
    }

    /*
     * Moves the count from `old_path` to `path`. Only the new location and its
     * ancestors are repainted; an explorer entry still listed under the old
     * path keeps its previous label until the explorer is listed again.
     */
    fn on_document_renamed(&mut self, path: String, old_path: String) {
        let Some(text) = self.read_document(&path) else {
            return;
        };
        // The rename reads the current text, which supersedes a pending recount.
        if self.recount_debouncer.cancel(&old_path) {
            log::debug!("SyncOrchestrator: Dropped pending recount for renamed {old_path:?}.");
        }
        let delta = self.count_store.rename(&old_path, path.clone(), &text);
        log::debug!("SyncOrchestrator: Renamed {old_path:?} -> {path:?} (delta {delta}).");
        self.ui_state.insert_document(&path);
        self.repaint_explorer(Some(&path));
    }

    fn on_active_document_changed(&mut self, path: Option<String>) {
        self.ui_state.active_document = path;
        self.refresh_status();
    }

    fn on_explorer_items_listed(&mut self, items: Vec<ExplorerItem>) {
        self.ui_state.replace_items(items);
        self.repaint_explorer(None);
    }

    /*
     * Applies `format_content` to a document. The document is written back
     * and recounted only when formatting changed it, and repainted only when
     * that changed its count; a notice reports the outcome either way. Read
     * or write failures are logged and produce no notice.
     */
    fn format_document(&mut self, path: String) {
        let Some(original) = self.read_document(&path) else {
            return;
        };
        let formatted = format_content(&original);
        if formatted == original {
            log::debug!("SyncOrchestrator: {path:?} is already formatted.");
            self.enqueue_command(PlatformCommand::ShowNotice {
                text: ui_constants::NOTICE_NO_FORMATTING_CHANGES.to_string(),
            });
            return;
        }

        if let Err(e) = self.document_store.write(&path, &formatted) {
            log::error!("SyncOrchestrator: Failed to write formatted {path:?}: {e}");
            return;
        }
        let delta = self.count_store.recalculate(path.as_str(), &formatted);
        log::info!("SyncOrchestrator: Formatted {path:?} (delta {delta}).");
        if delta != 0 {
            self.repaint_explorer(Some(&path));
        }
        self.enqueue_command(PlatformCommand::ShowNotice {
            text: ui_constants::NOTICE_FORMATTED.to_string(),
        });
    }

    // The host sends a `Tick` at or after this instant to fire pending recounts.
    pub fn next_recount_deadline(&self) -> Option<Instant> {
        self.recount_debouncer.next_deadline()
    }

    pub fn count_store(&self) -> &CountStore {
        &self.count_store
    }

    #[cfg(test)]
    pub(crate) fn test_active_document(&self) -> Option<&str> {
        self.ui_state.active_document.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn test_pending_recounts(&self) -> usize {
        self.recount_debouncer.pending_count()
    }

    #[cfg(test)]
    pub(crate) fn test_drain_commands(&mut self) -> Vec<PlatformCommand> {
        self.synthetic_command_queue.drain(..).collect()
    }
}

impl PlatformEventHandler for SyncOrchestrator {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("SyncOrchestrator: Handling {event:?}");
        match event {
            AppEvent::DocumentCreated { path } => self.on_document_created(path),
            AppEvent::DocumentModified { path, at } | AppEvent::ContentChanged { path, at } => {
                self.schedule_recount(path, at)
            }
            AppEvent::DocumentDeleted { path } => self.on_document_deleted(path),
            AppEvent::DocumentRenamed { path, old_path } => self.on_document_renamed(path, old_path),
            AppEvent::ActiveDocumentChanged { path } => self.on_active_document_changed(path),
            AppEvent::ExplorerItemsListed { items } => self.on_explorer_items_listed(items),
            AppEvent::MenuActionClicked { action, path } => match action {
                MenuAction::Formatting => self.format_document(path),
            },
            AppEvent::Tick { now } => self.fire_due_recounts(now),
        }
    }

    fn on_quit(&mut self) {
        let pending = self.recount_debouncer.pending_count();
        if pending > 0 {
            log::debug!("SyncOrchestrator: Quitting with {pending} pending recounts dropped.");
        }
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.synthetic_command_queue.pop_front()
    }
}
