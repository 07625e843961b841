use super::types::Measurement;

/// One measurement before and after a mutation. `before == None` means the
/// measurement was created, `after == None` that it was removed.
#[derive(Clone, Debug)]
pub(super) struct Change {
    pub id: String,
    /// Position in the store when the change happened.
    pub index: usize,
    pub before: Option<Measurement>,
    pub after: Option<Measurement>,
}

/// A user-level action: every change recorded between two history
/// boundaries, undone and redone as a unit.
#[derive(Clone, Debug, Default)]
pub(super) struct HistoryEntry {
    pub changes: Vec<Change>,
}

impl HistoryEntry {
    /// Fold `change` into this entry. A second change to the same id keeps
    /// the original `before` and takes the newest `after`.
    fn merge(&mut self, change: Change) {
        if let Some(existing) = self.changes.iter_mut().find(|c| c.id == change.id) {
            existing.after = change.after;
        } else {
            self.changes.push(change);
        }
    }
}

/// Bounded undo/redo stacks with optional transactions.
#[derive(Debug)]
pub(super) struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    open: Option<HistoryEntry>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            open: None,
            max_depth,
        }
    }

    /// Record a change. Inside a transaction it is merged into the open
    /// entry and the redo stack survives until the transaction commits;
    /// otherwise it becomes its own entry.
    pub fn record(&mut self, change: Change) {
        match self.open.as_mut() {
            Some(entry) => entry.merge(change),
            None => {
                self.redo.clear();
                self.push(HistoryEntry {
                    changes: vec![change],
                });
            }
        }
    }

    /// Record several changes as one entry.
    pub fn record_all(&mut self, changes: Vec<Change>) {
        if changes.is_empty() {
            return;
        }
        match self.open.as_mut() {
            Some(entry) => changes.into_iter().for_each(|c| entry.merge(c)),
            None => {
                self.redo.clear();
                self.push(HistoryEntry { changes });
            }
        }
    }

    /// Returns `false` if a transaction was already open.
    pub fn begin(&mut self) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = Some(HistoryEntry::default());
        true
    }

    /// Close the open transaction. Returns `true` if it recorded anything.
    pub fn end(&mut self) -> bool {
        match self.open.take() {
            Some(entry) if !entry.changes.is_empty() => {
                self.redo.clear();
                self.push(entry);
                true
            }
            _ => false,
        }
    }

    /// Drop the open transaction without recording it. The caller restores
    /// the returned `before` snapshots; neither stack is touched.
    pub fn abort(&mut self) -> Option<HistoryEntry> {
        self.open.take()
    }

    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop()
    }

    pub fn push_undo(&mut self, entry: HistoryEntry) {
        self.push(entry);
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = None;
    }
}

/// Replace, insert or remove the measurement `id` so that it matches
/// `target`. A missing measurement is inserted at `index` (or appended if the
/// store has shrunk below it).
pub(super) fn apply_snapshot(
    measurements: &mut Vec<Measurement>,
    id: &str,
    index: usize,
    target: Option<&Measurement>,
) {
    let position = measurements.iter().position(|m| m.id == id);
    match (position, target) {
        (Some(pos), Some(m)) => measurements[pos] = m.clone(),
        (None, Some(m)) => {
            let at = index.min(measurements.len());
            measurements.insert(at, m.clone());
        }
        (Some(pos), None) => {
            measurements.remove(pos);
        }
        (None, None) => {}
    }
}
