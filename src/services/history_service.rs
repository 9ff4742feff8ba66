use std::sync::Arc;

use tracing::info;

use crate::domain::HistoricalEntry;
use crate::errors::AppError;
use crate::store::kv::FileStore;
use crate::store::HISTORY_KEY;

/// Append-only ATR time series in the persistent store. Entries are labeled
/// `"<identifier> - P<n>"` where n counts prior entries for the same
/// identifier; the sequence order is submission order.
pub struct HistoryService {
    store: Arc<FileStore>,
}

impl HistoryService {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> Vec<HistoricalEntry> {
        self.store.get(HISTORY_KEY, Vec::new())
    }

    /// Append a new period for the identifier. The period counter compares
    /// the label prefix before the first " - " separator, so identifiers that
    /// themselves contain " - " collide on their first segment; known quirk,
    /// kept for label stability with existing stored histories.
    pub fn record(&self, identifier: &str, atr: f64) -> Result<HistoricalEntry, AppError> {
        let mut entries = self.entries();
        let period = entries
            .iter()
            .filter(|e| e.name.split(" - ").next() == Some(identifier))
            .count()
            + 1;
        let entry = HistoricalEntry {
            name: format!("{identifier} - P{period}"),
            atr,
        };
        entries.push(entry.clone());
        self.store.set(HISTORY_KEY, &entries)?;
        info!("Recorded history entry '{}' (atr: {})", entry.name, atr);
        Ok(entry)
    }

    /// Reset the series to empty, restarting every period counter.
    pub fn clear(&self) -> Result<(), AppError> {
        self.store.set(HISTORY_KEY, &Vec::<HistoricalEntry>::new())?;
        info!("Cleared ATR history");
        Ok(())
    }
}
