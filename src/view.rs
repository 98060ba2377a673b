//! Terminal rendering of the synchronizer state.

use crate::cli_style::{self, glyph, BookTable, Tone, TABLE_COLUMNS};
use booklist::book::ALL_FIELDS;
use booklist::{Book, BookField, SyncEvent, SyncState};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

const BUSY_MESSAGE: &str = "Loading...";

/// Returns the book shown at 1-based `row`.
pub fn book_at_row(state: &SyncState, row: usize) -> Option<&Book> {
    row.checked_sub(1).and_then(|i| state.collection.get(i))
}

fn is_being_edited(state: &SyncState, book: &Book) -> bool {
    state
        .draft_edit
        .as_ref()
        .is_some_and(|draft| draft.id == book.id)
}

/// Builds the table rows, substituting the edit draft for the row in edit mode.
fn collection_rows(state: &SyncState) -> Vec<([String; TABLE_COLUMNS], bool)> {
    state
        .collection
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let editing = is_being_edited(state, book);
            let shown = match (&state.draft_edit, editing) {
                (Some(draft), true) => draft,
                _ => book,
            };
            let row_label = if editing {
                format!("{} {}", i + 1, glyph::PENCIL)
            } else {
                (i + 1).to_string()
            };
            (
                [
                    row_label,
                    shown.title.clone(),
                    shown.author.clone(),
                    shown.image_url.clone(),
                ],
                editing,
            )
        })
        .collect()
}

pub fn render_collection(state: &SyncState) {
    cli_style::panel_open("Book List");
    if state.collection.is_empty() {
        cli_style::note(Tone::Muted, "No books yet");
    } else {
        let mut table = BookTable::new(["#", "Title", "Author", "Image"]);
        for (cells, highlighted) in collection_rows(state) {
            table.push(cells, highlighted);
        }
        table.print();
    }
    render_status(state);
    cli_style::panel_close();
}

pub fn render_status(state: &SyncState) {
    if state.busy {
        cli_style::note(Tone::Muted, BUSY_MESSAGE);
    }
    if let Some(error) = &state.last_error {
        cli_style::note(Tone::Error, error);
    }
}

fn field_label(field: BookField) -> &'static str {
    match field {
        BookField::Title => "Title",
        BookField::Author => "Author",
        BookField::ImageUrl => "Image URL",
    }
}

pub fn render_drafts(state: &SyncState) {
    cli_style::panel_open("Add New Book");
    for &field in ALL_FIELDS {
        cli_style::field_line(field_label(field), state.draft_new.get(field));
    }
    if state.draft_new.is_empty() {
        cli_style::note(Tone::Muted, "Fill it in with: set <field> <value>");
    }
    cli_style::panel_close();

    if let Some(draft) = &state.draft_edit {
        cli_style::panel_open("Editing");
        cli_style::field_line("Id", &draft.id);
        for &field in ALL_FIELDS {
            cli_style::field_line(field_label(field), draft.get(field));
        }
        cli_style::panel_close();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Busy Indicator
// ═══════════════════════════════════════════════════════════════════════════════

/// Shows a spinner while the synchronizer reports `busy`.
pub struct BusyIndicator {
    events: broadcast::Receiver<SyncEvent>,
    spinner: Option<ProgressBar>,
}

impl BusyIndicator {
    pub fn new(events: broadcast::Receiver<SyncEvent>) -> Self {
        Self {
            events,
            spinner: None,
        }
    }

    /// Drives `op` to completion, rendering busy events as they arrive.
    ///
    /// The spinner is always cleared before returning, so callers can print
    /// the outcome right away.
    pub async fn run<F: Future>(&mut self, op: F) -> F::Output {
        tokio::pin!(op);
        let output = loop {
            tokio::select! {
                output = &mut op => break output,
                event = self.events.recv() => match event {
                    Ok(event) => self.handle(event),
                    Err(RecvError::Lagged(n)) => debug!("Busy indicator lagged by {} events", n),
                    Err(RecvError::Closed) => break (&mut op).await,
                },
            }
        };
        while let Ok(event) = self.events.try_recv() {
            self.handle(event);
        }
        self.hide();
        output
    }

    fn handle(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::BusyChanged(true) => self.show(),
            SyncEvent::BusyChanged(false) => self.hide(),
            other => debug!("Sync event: {:?}", other),
        }
    }

    fn show(&mut self) {
        if self.spinner.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template(" {spinner:.yellow} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(BUSY_MESSAGE);
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn hide(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
