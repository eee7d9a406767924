use engine::{LedgerEntry, Summary};

/// Entries currently pushed by the live subscription.
#[derive(Debug, Default)]
pub struct LedgerView {
    pub entries: Vec<LedgerEntry>,
    pub summary: Summary,
    pub selected: usize,
    /// `false` until the first snapshot of the current subscription arrives.
    pub loaded: bool,
}

impl LedgerView {
    pub fn replace(&mut self, entries: Vec<LedgerEntry>) {
        self.summary = Summary::from_entries(&entries);
        self.entries = entries;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.loaded = true;
    }

    /// Forgets the entries of a released subscription.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.summary = Summary::default();
        self.selected = 0;
        self.loaded = false;
    }

    pub fn selected_entry(&self) -> Option<&LedgerEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.entries.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
