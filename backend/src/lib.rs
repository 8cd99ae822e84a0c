//! # Backend
//!
//! All non-UI logic of the MoneyNotUse pocket-money wallet.
//!
//! ## Architecture
//!
//! ```text
//! State layer   (per-screen containers, dispatch + derived views)
//!     ↓
//! Domain layer  (wallet breakdown, calendar grid, services)
//!     ↓
//! Storage layer (identity provider + document store traits)
//! ```
//!
//! The storage traits are the only seam to the managed backend. The crate
//! ships in-memory implementations used by the preview binary and tests.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;

use crate::config::AppConfig;
use crate::domain::{
    BalanceService, CalendarService, ContactService, DenominationService, HistoryService,
    MonthlySummaryService, NotificationService, SessionService,
};
use crate::storage::{DocumentStore, IdentityProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub session: SessionService,
    pub balance: BalanceService,
    pub history: HistoryService,
    pub notifications: NotificationService,
    pub contacts: ContactService,
    pub summaries: MonthlySummaryService,
    pub denominations: DenominationService,
    pub calendar: CalendarService,
}

/// Wire every service to the given collaborators
pub fn initialize_backend(
    config: AppConfig,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
) -> Result<AppServices> {
    info!("Validating configuration");
    config.validate()?;

    info!("Setting up domain services");
    let session = SessionService::new(identity.clone());
    let balance = BalanceService::new(identity.clone(), store.clone(), &config.history_date_format);
    let history = HistoryService::new(identity.clone(), store.clone(), &config.history_date_format);
    let notifications = NotificationService::new(store.clone());
    let contacts = ContactService::new(store.clone());
    let summaries = MonthlySummaryService::new(identity, store);
    let denominations = DenominationService::new(&config.wallet);
    let calendar = CalendarService::new(&config.calendar);

    Ok(AppServices {
        config,
        session,
        balance,
        history,
        notifications,
        contacts,
        summaries,
        denominations,
        calendar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::state::{HomeAction, HomeState, Route};
    use crate::storage::{InMemoryDocumentStore, InMemoryIdentityProvider};
    use chrono::NaiveDate;
    use mnu_shared::{BalanceState, YearMonth};

    fn services(config: AppConfig) -> Result<AppServices> {
        initialize_backend(
            config,
            Arc::new(InMemoryIdentityProvider::new()),
            Arc::new(InMemoryDocumentStore::new()),
        )
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.wallet.denominations = vec![100, 10];
        let err = services(config).err().unwrap();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[tokio::test]
    async fn test_full_flow() {
        let app = services(AppConfig::default()).unwrap();
        app.session.sign_up("kid@example.com", "secret1").await.unwrap();

        let mut home = HomeState::new(app.denominations.clone());
        home.refresh(&app.balance, &app.history).await.unwrap();
        assert_eq!(home.route(), Route::InitialBalance);

        let registered = app.balance.register_initial_balance("5,000").await.unwrap();
        home.dispatch(HomeAction::BalanceSaved(registered));
        assert_eq!(home.route(), Route::Home);

        let on = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let balance = app.balance.apply_update(-1250, on).await.unwrap();
        home.dispatch(HomeAction::BalanceSaved(balance));
        home.dispatch(HomeAction::DismissUpdateAlert);
        assert_eq!(home.balance(), Some(BalanceState::Amount(3750)));

        let summary = app.summaries.summarize(YearMonth::new(2025, 3).unwrap()).await.unwrap();
        assert_eq!(summary.expense, 1250);
        assert_eq!(summary.income, 0);

        app.session.sign_out().await.unwrap();
        home.dispatch(HomeAction::LoggedOut);
        assert_eq!(home.route(), Route::Login);
    }
}
