//! Session-local operation history.
//!
//! Append-only for the life of the page session: entries are never edited
//! or removed, insertion order is display order, and nothing persists
//! across a reload. The projection is pure and recomputed per render.

use std::sync::Mutex;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Operation kind recorded per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Deposit,
    Withdraw,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deposit => "Deposit",
            Action::Withdraw => "Withdraw",
        }
    }
}

/// Three-way display filter over the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Deposit,
    Withdraw,
}

impl HistoryFilter {
    /// Parse the page's filter buttons; anything unrecognized means `All`.
    pub fn parse(label: &str) -> Self {
        match label {
            "Deposit" => HistoryFilter::Deposit,
            "Withdraw" => HistoryFilter::Withdraw,
            _ => HistoryFilter::All,
        }
    }

    fn admits(&self, action: Action) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Deposit => action == Action::Deposit,
            HistoryFilter::Withdraw => action == Action::Withdraw,
        }
    }
}

/// One confirmed (or attempted-and-confirmed) operation. Immutable once
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: Action,
    pub amount: u64,
    pub note: String,
    /// Display-formatted local moment of append.
    pub timestamp: String,
}

impl HistoryEntry {
    /// Stamp an entry with the local wall clock.
    pub fn record(action: Action, amount: u64, note: impl Into<String>) -> Self {
        Self {
            action,
            amount,
            note: note.into(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Pure projection: exact action match unless the filter is `All`.
/// Preserves relative order; safe to recompute on every render.
pub fn project(entries: &[HistoryEntry], filter: HistoryFilter) -> impl Iterator<Item = &HistoryEntry> + '_ {
    entries.iter().filter(move |e| filter.admits(e.action))
}

/// Append-only ordered log of this session's operations.
#[derive(Default)]
pub struct HistoryLedger {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(1) amortized append.
    pub fn append(&self, entry: HistoryEntry) {
        self.lock().push(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Full ordered snapshot.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    /// Projected snapshot for display.
    pub fn view(&self, filter: HistoryFilter) -> Vec<HistoryEntry> {
        project(&self.lock(), filter).cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
