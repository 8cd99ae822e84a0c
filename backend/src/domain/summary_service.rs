//! Monthly income and expense totals for the profile page.

use crate::error::AuthError;
use crate::storage::records::{from_record, LedgerRecord, TRANSACTIONS};
use crate::storage::{DocumentStore, Filter, IdentityProvider};
use anyhow::Result;
use mnu_shared::{LedgerKind, MonthlySummary, YearMonth};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct MonthlySummaryService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl MonthlySummaryService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    /// Totals of the signed-in user's ledger records for `month`.
    ///
    /// Records with an unrecognised type are ignored.
    pub async fn summarize(&self, month: YearMonth) -> Result<MonthlySummary> {
        let user = self
            .identity
            .current_user()
            .ok_or(AuthError::NotSignedIn)?;

        let filters = [
            Filter::eq("userId", user.id.as_str()),
            Filter::eq("year", month.year()),
            Filter::eq("month", month.month()),
        ];
        let documents = self.store.query(TRANSACTIONS, &filters, None).await?;

        let mut summary = MonthlySummary::default();
        for document in &documents {
            let Some(record) = from_record::<LedgerRecord>(&document.fields) else {
                debug!("Ignoring ledger record {}", document.id);
                continue;
            };
            match record.kind {
                LedgerKind::Income => summary.income += record.amount,
                LedgerKind::Expense => summary.expense += record.amount,
            }
        }

        info!(
            "Summary for {} in {}: income {}, expense {}",
            user.id, month, summary.income, summary.expense
        );
        Ok(summary)
    }
}
