//! # Home State Module
//!
//! State of the main tabbed screen: the loaded balance and history, the
//! selected tab, the "balance updated" alert, the My Page settings and
//! logged-out routing.
//!
//! Views never mutate this directly. They send a [`HomeAction`] through
//! [`HomeState::dispatch`] and re-derive [`HomeState::route`] and
//! [`HomeState::wallet`] afterwards.

use crate::domain::balance_service::BalanceService;
use crate::domain::denomination::{DenominationService, WalletView};
use crate::domain::history_service::HistoryService;
use anyhow::Result;
use mnu_shared::{BalanceState, HistoryEntry};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    History,
    Notifications,
    Calendar,
    MyPage,
}

/// Display language offered on My Page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Japanese,
    English,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Japanese, Language::English, Language::Spanish];

    /// Name shown in the picker, in the language itself
    pub fn label(self) -> &'static str {
        match self {
            Language::Japanese => "日本語",
            Language::English => "English",
            Language::Spanish => "Español",
        }
    }
}

/// Which screen the app shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    InitialBalance,
    Loading,
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    /// A user signed in; the balance has to be loaded again
    SignedIn,
    BalanceLoaded(BalanceState),
    HistoryLoaded(Vec<HistoryEntry>),
    /// An update or initial registration was stored; carries the new balance
    BalanceSaved(i64),
    /// Closes the alert and returns to the home tab
    DismissUpdateAlert,
    SelectTab(Tab),
    SetNotificationsEnabled(bool),
    SelectLanguage(Language),
    LoggedOut,
}

#[derive(Debug, Clone)]
pub struct HomeState {
    tab: Tab,
    /// `None` until the first load completes
    balance: Option<BalanceState>,
    history: Vec<HistoryEntry>,
    show_update_alert: bool,
    logged_out: bool,
    notifications_enabled: bool,
    language: Language,
    denominations: DenominationService,
}

impl HomeState {
    pub fn new(denominations: DenominationService) -> Self {
        Self {
            tab: Tab::Home,
            balance: None,
            history: Vec::new(),
            show_update_alert: false,
            logged_out: false,
            notifications_enabled: false,
            language: Language::default(),
            denominations,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn balance(&self) -> Option<BalanceState> {
        self.balance
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn show_update_alert(&self) -> bool {
        self.show_update_alert
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn dispatch(&mut self, action: HomeAction) {
        match action {
            HomeAction::SignedIn => {
                self.logged_out = false;
                self.balance = None;
                self.history.clear();
                self.tab = Tab::Home;
            }
            HomeAction::BalanceLoaded(state) => {
                self.balance = Some(state);
            }
            HomeAction::HistoryLoaded(entries) => {
                self.history = entries;
            }
            HomeAction::BalanceSaved(balance) => {
                self.balance = Some(BalanceState::from_stored(Some(balance)));
                self.show_update_alert = true;
            }
            HomeAction::DismissUpdateAlert => {
                self.show_update_alert = false;
                self.tab = Tab::Home;
            }
            HomeAction::SelectTab(tab) => {
                self.tab = tab;
            }
            HomeAction::SetNotificationsEnabled(enabled) => {
                self.notifications_enabled = enabled;
            }
            HomeAction::SelectLanguage(language) => {
                info!("Language set to {}", language.label());
                self.language = language;
            }
            HomeAction::LoggedOut => {
                info!("Logged out, returning to login");
                self.logged_out = true;
                self.balance = None;
                self.history.clear();
                self.show_update_alert = false;
                self.tab = Tab::Home;
            }
        }
    }

    pub fn route(&self) -> Route {
        if self.logged_out {
            return Route::Login;
        }
        match self.balance {
            None => Route::Loading,
            Some(BalanceState::NoRecord) => Route::InitialBalance,
            Some(_) => Route::Home,
        }
    }

    /// Wallet for the loaded balance, `None` while loading or unregistered
    pub fn wallet(&self) -> Option<WalletView> {
        self.balance
            .and_then(|state| state.amount())
            .map(|amount| self.denominations.wallet_for_balance(amount))
    }

    /// Load balance and history and dispatch the results
    pub async fn refresh(&mut self, balances: &BalanceService, history: &HistoryService) -> Result<()> {
        let balance = balances.fetch_balance().await?;
        self.dispatch(HomeAction::BalanceLoaded(balance));
        let entries = history.list().await?;
        self.dispatch(HomeAction::HistoryLoaded(entries));
        Ok(())
    }
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new(DenominationService::default())
    }
}
