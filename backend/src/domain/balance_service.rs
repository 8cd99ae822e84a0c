//! Balance service for the signed-in user.
//!
//! The balance lives in the `balance` field of `Users/{uid}`. Reading it
//! distinguishes three states (see [`BalanceState`]); updating it increments
//! the stored value atomically and records the change in the user's history
//! and in the monthly ledger used by the profile page summary.

use crate::domain::calendar::format_date;
use crate::domain::money_management::parse_whole_amount;
use crate::error::{AuthError, BalanceError, StoreError};
use crate::storage::records::{
    balance_record, history_collection, read_balance, to_record, user_path, LedgerRecord,
    BALANCE_FIELD, TRANSACTIONS,
};
use crate::storage::{DocumentStore, IdentityProvider};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use mnu_shared::{BalanceState, HistoryEntry, LedgerKind, User};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct BalanceService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    history_date_format: String,
}

impl BalanceService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        history_date_format: &str,
    ) -> Self {
        Self {
            identity,
            store,
            history_date_format: history_date_format.to_string(),
        }
    }

    fn require_user(&self) -> Result<User> {
        self.identity
            .current_user()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    /// Current balance of the signed-in user
    pub async fn fetch_balance(&self) -> Result<BalanceState> {
        let user = self.require_user()?;
        let path = user_path(&user.id);

        let document = self.store.get(&path).await.map_err(|e| {
            error!("Failed to fetch balance for {}: {}", user.id, e);
            e
        })?;

        let state = match document {
            None => BalanceState::NoRecord,
            Some(fields) => BalanceState::from_stored(read_balance(&path, &fields)?),
        };

        info!("Balance for {}: {:?}", user.id, state);
        Ok(state)
    }

    /// Store the first balance typed on the initial-balance screen.
    ///
    /// Replaces the user document, so it is only offered while the balance is
    /// [`BalanceState::NoRecord`].
    pub async fn register_initial_balance(&self, input: &str) -> Result<i64> {
        let user = self.require_user()?;
        let amount = parse_whole_amount(input)?;
        if amount < 0 {
            return Err(BalanceError::InvalidAmount("the initial balance cannot be negative".to_string()).into());
        }

        self.store
            .set(&user_path(&user.id), balance_record(amount))
            .await
            .map_err(|e| {
                error!("Failed to register initial balance for {}: {}", user.id, e);
                e
            })?;

        info!("Registered initial balance {} for {}", amount, user.id);
        Ok(amount)
    }

    /// Apply a signed change dated `on` and return the new balance.
    ///
    /// Rejects zero and any change that would take the balance below zero.
    /// The floor is checked by the store in the same atomic step as the
    /// increment, so concurrent deductions cannot overdraw. A missing balance
    /// counts as zero. The balance write is authoritative: if recording the
    /// history entry or ledger record fails afterwards, the failure is logged
    /// and the update still succeeds.
    pub async fn apply_update(&self, amount: i64, on: NaiveDate) -> Result<i64> {
        if amount == 0 {
            return Err(BalanceError::ZeroAmount.into());
        }

        let user = self.require_user()?;
        let path = user_path(&user.id);

        let new_balance = match self.store.increment(&path, BALANCE_FIELD, amount, Some(0)).await {
            Ok(balance) => balance,
            Err(StoreError::BelowFloor { current, .. }) => {
                warn!("Rejected update of {} for {}: balance is {}", amount, user.id, current);
                return Err(BalanceError::WouldGoNegative {
                    current,
                    change: amount,
                }
                .into());
            }
            Err(e) => {
                error!("Failed to update balance for {}: {}", user.id, e);
                return Err(e.into());
            }
        };
        info!("Balance for {} changed by {} to {}", user.id, amount, new_balance);

        self.record_history(&user, amount, on).await;
        self.record_ledger(&user, amount, on).await;

        Ok(new_balance)
    }

    /// [`apply_update`](Self::apply_update) dated with the local calendar day
    pub async fn apply_update_today(&self, amount: i64) -> Result<i64> {
        self.apply_update(amount, Local::now().date_naive()).await
    }

    fn history_date(&self, on: NaiveDate) -> String {
        format_date(on, &self.history_date_format).unwrap_or_else(|| on.format("%Y/%m/%d").to_string())
    }

    async fn record_history(&self, user: &User, amount: i64, on: NaiveDate) {
        let entry = HistoryEntry {
            amount,
            date: self.history_date(on),
        };
        let result = match to_record(&entry) {
            Ok(fields) => self.store.add(&history_collection(&user.id), fields).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!("Failed to add history entry for {}: {}", user.id, e);
        }
    }

    async fn record_ledger(&self, user: &User, amount: i64, on: NaiveDate) {
        let record = LedgerRecord {
            user_id: user.id.clone(),
            year: on.year(),
            month: on.month(),
            amount: amount.abs(),
            kind: LedgerKind::from_amount(amount),
        };
        let result = match to_record(&record) {
            Ok(fields) => self.store.add(TRANSACTIONS, fields).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!("Failed to add ledger record for {}: {}", user.id, e);
        }
    }
}
