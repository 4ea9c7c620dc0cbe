//! Global patient search: query editing, dropdown visibility and selection.
//!
//! [`SearchController`] owns the query and the visibility flag. The dropdown
//! content is never stored; [`SearchController::dropdown`] derives it from
//! the current query, the recent selections and whatever patient list the
//! caller passes in, so a replaced index shows up on the next call.

use crate::matcher::match_patients;
use crate::navigation::Route;
use crate::patient::{find_by_id, PatientRecord};
use crate::recents::RecentSelections;

/// Where the search box is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Dropdown hidden (a dismissed query may still be in the box)
    Idle,
    /// Dropdown open, empty query
    FocusedEmpty,
    /// Dropdown open, non-empty query
    Typing,
}

/// What the dropdown should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Hidden,
    Recents(Vec<PatientRecord>),
    Matches(Vec<PatientRecord>),
    /// Typed query with no matches
    Empty,
}

impl Dropdown {
    /// Selectable rows, in display order
    pub fn entries(&self) -> &[PatientRecord] {
        match self {
            Dropdown::Recents(list) | Dropdown::Matches(list) => list,
            Dropdown::Hidden | Dropdown::Empty => &[],
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, Dropdown::Hidden)
    }
}

/// Search input state and the recent-selection list it feeds.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    query: String,
    cursor_pos: usize,
    visible: bool,
    highlighted: usize,
    recents: RecentSelections,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Byte offset of the cursor, always on a char boundary
    pub fn cursor(&self) -> usize {
        self.cursor_pos
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn recents(&self) -> &RecentSelections {
        &self.recents
    }

    pub fn phase(&self) -> SearchPhase {
        match (self.visible, self.query.is_empty()) {
            (false, _) => SearchPhase::Idle,
            (true, true) => SearchPhase::FocusedEmpty,
            (true, false) => SearchPhase::Typing,
        }
    }

    /// Index of the highlighted dropdown row
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn focus(&mut self) {
        self.visible = true;
    }

    /// Outside interaction: hide the dropdown, keep the query.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Replace the whole query, e.g. from a paste.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor_pos = self.query.len();
        self.edited();
    }

    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.edited();
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        self.edited();
    }

    pub fn delete(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.query.remove(self.cursor_pos);
            self.edited();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor_pos = self.query[self.cursor_pos..]
            .chars()
            .next()
            .map(|c| self.cursor_pos + c.len_utf8())
            .unwrap_or(self.query.len());
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn edited(&mut self) {
        self.visible = true;
        self.highlighted = 0;
    }

    /// Derive the dropdown from the current state and `index`.
    pub fn dropdown(&self, index: &[PatientRecord]) -> Dropdown {
        if !self.visible {
            return Dropdown::Hidden;
        }
        if self.query.is_empty() {
            return Dropdown::Recents(self.recents.to_vec());
        }
        let matches = match_patients(&self.query, index);
        if matches.is_empty() {
            Dropdown::Empty
        } else {
            Dropdown::Matches(matches)
        }
    }

    pub fn highlight_next(&mut self, index: &[PatientRecord]) {
        let rows = self.dropdown(index).entries().len();
        if rows > 0 {
            self.highlighted = (self.highlighted + 1).min(rows - 1);
        }
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Select a patient by id.
    ///
    /// The record is re-read from `index` so recents only ever hold patients
    /// present at insertion time; an id that has since left the index is
    /// refused and nothing changes.
    pub fn select(&mut self, id: &str, index: &[PatientRecord]) -> Option<Route> {
        let Some(patient) = find_by_id(index, id) else {
            tracing::warn!(patient_id = id, "selected patient is no longer in the index");
            return None;
        };

        tracing::info!(patient_id = %patient.id, "patient selected from search");
        let route = Route::PatientDetail(patient.id.clone());
        self.recents.record(patient.clone());
        self.query.clear();
        self.cursor_pos = 0;
        self.highlighted = 0;
        self.visible = false;
        Some(route)
    }

    /// Select the dropdown row at `row` (mouse click).
    pub fn select_row(&mut self, row: usize, index: &[PatientRecord]) -> Option<Route> {
        let id = self.dropdown(index).entries().get(row)?.id.clone();
        self.select(&id, index)
    }

    /// Select the highlighted row (Enter). Clamped if the list shrank.
    pub fn select_highlighted(&mut self, index: &[PatientRecord]) -> Option<Route> {
        let dropdown = self.dropdown(index);
        let rows = dropdown.entries();
        if rows.is_empty() {
            return None;
        }
        let id = rows[self.highlighted.min(rows.len() - 1)].id.clone();
        self.select(&id, index)
    }
}
