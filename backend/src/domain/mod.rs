//! # Domain Module
//!
//! Business logic for the pocket-money wallet.
//!
//! The two pure cores are the wallet breakdown and the calendar grid; the
//! remaining services sit on the [`crate::storage`] collaborator traits and
//! do not care which identity provider or document store backs them.
//!
//! ## Module Organization
//!
//! - **denomination**: Greedy bill and coin breakdown and the wallet view built from it
//! - **calendar**: Sunday-first month grid and month titles
//! - **money_management**: Amount keypad, amount parsing and formatting
//! - **session_service**: Sign in, sign up, sign out and account deletion
//! - **balance_service**: Reading, registering and updating the balance
//! - **history_service**: Listing and deleting balance changes
//! - **notification_service**: System notifications
//! - **contact_service**: Contact form submissions
//! - **summary_service**: Monthly income and expense totals
//!
//! ## Business Rules
//!
//! - Amounts are whole yen
//! - A balance never goes below zero through an update
//! - A missing balance and a zero balance are different states
//! - Grids always cover whole weeks, Sunday first

pub mod balance_service;
pub mod calendar;
pub mod contact_service;
pub mod denomination;
pub mod history_service;
pub mod money_management;
pub mod notification_service;
pub mod session_service;
pub mod summary_service;

pub use balance_service::*;
pub use calendar::*;
pub use contact_service::*;
pub use denomination::*;
pub use history_service::*;
pub use money_management::*;
pub use notification_service::*;
pub use session_service::*;
pub use summary_service::*;
