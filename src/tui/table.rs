use std::ops::Range;

/// Selection and scroll position for a vertical list whose length can change
/// under it (the patient index may be reloaded at any tick).
#[derive(Debug, Clone, Default)]
pub struct ScrollList {
    pub selected: usize,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl ScrollList {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
        self.ensure_visible();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_visible();
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1).max(1);
        self.selected = (self.selected + jump).min(total - 1);
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.saturating_sub(1).max(1);
        self.selected = self.selected.saturating_sub(jump);
        self.ensure_visible();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        self.selected = total.saturating_sub(1);
        self.ensure_visible();
    }

    /// Pull the selection back inside a list that shrank.
    pub fn clamp(&mut self, total: usize) {
        self.selected = self.selected.min(total.saturating_sub(1));
        self.scroll_offset = self
            .scroll_offset
            .min(total.saturating_sub(self.visible_rows));
        self.ensure_visible();
    }

    /// Rows to draw for a list of `total` items
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = self.scroll_offset.min(total);
        let end = (start + self.visible_rows).min(total);
        start..end
    }

    fn ensure_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.visible_rows > 0 && self.selected >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.selected + 1 - self.visible_rows;
        }
    }
}
