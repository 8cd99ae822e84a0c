//! Balance change history of the signed-in user.

use crate::domain::denomination::{DenominationService, WalletView};
use crate::error::AuthError;
use crate::storage::records::history_collection;
use crate::storage::records::history_from_document;
use crate::storage::{DocumentStore, Filter, IdentityProvider};
use anyhow::Result;
use chrono::NaiveDate;
use mnu_shared::{HistoryEntry, User};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct HistoryService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    date_format: String,
}

impl HistoryService {
    /// `date_format` is the chrono pattern entries were dated with
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        date_format: &str,
    ) -> Self {
        Self {
            identity,
            store,
            date_format: date_format.to_string(),
        }
    }

    fn require_user(&self) -> Result<User> {
        self.identity
            .current_user()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    /// Entries newest day first, ordered on the parsed date. Entries whose
    /// date does not parse come last; documents without an amount or date
    /// are skipped.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let user = self.require_user()?;
        let documents = self.store.query(&history_collection(&user.id), &[], None).await?;

        let total = documents.len();
        let mut dated: Vec<(Option<NaiveDate>, HistoryEntry)> = documents
            .iter()
            .filter_map(history_from_document)
            .map(|entry| (NaiveDate::parse_from_str(&entry.date, &self.date_format).ok(), entry))
            .collect();
        if dated.len() < total {
            warn!("Skipped {} malformed history documents for {}", total - dated.len(), user.id);
        }
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let entries: Vec<HistoryEntry> = dated.into_iter().map(|(_, entry)| entry).collect();
        info!("Loaded {} history entries for {}", entries.len(), user.id);
        Ok(entries)
    }

    /// Delete the first stored entry matching both amount and date.
    ///
    /// Returns `false` when nothing matched. The balance is not adjusted.
    pub async fn delete(&self, entry: &HistoryEntry) -> Result<bool> {
        let user = self.require_user()?;
        let collection = history_collection(&user.id);
        let filters = [
            Filter::eq("amount", entry.amount),
            Filter::eq("date", entry.date.as_str()),
        ];

        let matches = self.store.query(&collection, &filters, None).await?;
        let Some(first) = matches.first() else {
            warn!("No history entry {} to delete for {}", entry.id(), user.id);
            return Ok(false);
        };

        let deleted = self.store.delete(&format!("{}/{}", collection, first.id)).await?;
        if deleted {
            info!("Deleted history entry {} for {}", entry.id(), user.id);
        }
        Ok(deleted)
    }

    /// Wallet shown in the history detail popup
    pub fn wallet_for(&self, entry: &HistoryEntry, denominations: &DenominationService) -> WalletView {
        denominations.wallet_for_balance(entry.amount)
    }
}
