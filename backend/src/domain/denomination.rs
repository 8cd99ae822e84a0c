//! Wallet domain logic: breaking a balance into bills and coins.
//!
//! The breakdown itself is a pure greedy pass over a descending denomination
//! list. [`WalletView`] adds the rendering decisions the wallet screen needs
//! (bill or coin, individual icons or a collapsed multiplier) without
//! touching the breakdown.

use crate::config::{WalletConfig, DEFAULT_DENOMINATIONS};
use crate::domain::money_management::group_digits;
use mnu_shared::{Denomination, DenominationKind};
use serde::Serialize;

/// Greedy breakdown over the standard yen denominations.
///
/// `compute_breakdown(1234)` is `[1000×1, 100×2, 10×3, 1×4]`; zero yields an
/// empty breakdown.
pub fn compute_breakdown(amount: u64) -> Vec<Denomination> {
    breakdown_with(&DEFAULT_DENOMINATIONS, amount)
}

/// Greedy breakdown over an arbitrary descending list ending in 1
pub fn breakdown_with(denominations: &[u32], amount: u64) -> Vec<Denomination> {
    let mut remaining = amount;
    let mut result = Vec::new();

    for &value in denominations {
        let unit = u64::from(value);
        let count = remaining / unit;
        remaining %= unit;

        if count > 0 {
            result.push(Denomination {
                unit_value: value,
                count,
            });
        }
    }

    result
}

/// How one row of the wallet is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowDisplay {
    /// Draw this many separate icons
    Individual { icons: u64 },
    /// Draw a single icon followed by a multiplier label such as `×7`
    Collapsed { multiplier_label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletRow {
    pub denomination: Denomination,
    pub kind: DenominationKind,
    /// Icon caption, e.g. `10,000 yen bill`
    pub label: String,
    pub display: RowDisplay,
}

/// Everything the wallet screen needs to render a balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletView {
    /// Negative balances get a distinct background; the rows show the magnitude
    pub is_negative: bool,
    /// Absolute value that was broken down
    pub amount: u64,
    pub rows: Vec<WalletRow>,
}

impl WalletView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Denomination service configured from [`WalletConfig`]
#[derive(Debug, Clone)]
pub struct DenominationService {
    denominations: Vec<u32>,
    collapse_threshold: u64,
    bill_threshold: u32,
}

impl DenominationService {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            denominations: config.denominations.clone(),
            collapse_threshold: config.collapse_threshold,
            bill_threshold: config.bill_threshold,
        }
    }

    pub fn denominations(&self) -> &[u32] {
        &self.denominations
    }

    pub fn compute_breakdown(&self, amount: u64) -> Vec<Denomination> {
        breakdown_with(&self.denominations, amount)
    }

    pub fn kind_of(&self, unit_value: u32) -> DenominationKind {
        if unit_value >= self.bill_threshold {
            DenominationKind::Bill
        } else {
            DenominationKind::Coin
        }
    }

    pub fn label_for(&self, unit_value: u32) -> String {
        let kind = match self.kind_of(unit_value) {
            DenominationKind::Bill => "bill",
            DenominationKind::Coin => "coin",
        };
        format!("{} yen {}", group_digits(u64::from(unit_value)), kind)
    }

    pub fn display_for(&self, count: u64) -> RowDisplay {
        if count > self.collapse_threshold {
            RowDisplay::Collapsed {
                multiplier_label: format!("×{}", count),
            }
        } else {
            RowDisplay::Individual { icons: count }
        }
    }

    /// Wallet for a signed balance. The breakdown receives the absolute value.
    pub fn wallet_for_balance(&self, balance: i64) -> WalletView {
        let amount = balance.unsigned_abs();
        let rows = self
            .compute_breakdown(amount)
            .into_iter()
            .map(|denomination| WalletRow {
                kind: self.kind_of(denomination.unit_value),
                label: self.label_for(denomination.unit_value),
                display: self.display_for(denomination.count),
                denomination,
            })
            .collect();

        WalletView {
            is_negative: balance < 0,
            amount,
            rows,
        }
    }
}

impl Default for DenominationService {
    fn default() -> Self {
        Self::new(&WalletConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(unit_value: u32, count: u64) -> Denomination {
        Denomination { unit_value, count }
    }

    #[test]
    fn test_zero_is_empty() {
        assert!(compute_breakdown(0).is_empty());
    }

    #[test]
    fn test_known_breakdowns() {
        assert_eq!(compute_breakdown(1234), vec![d(1000, 1), d(100, 2), d(10, 3), d(1, 4)]);
        assert_eq!(
            compute_breakdown(15750),
            vec![d(10000, 1), d(5000, 1), d(500, 1), d(100, 2), d(50, 1)]
        );
        assert_eq!(compute_breakdown(9), vec![d(5, 1), d(1, 4)]);
        assert_eq!(compute_breakdown(40000), vec![d(10000, 4)]);
    }

    #[test]
    fn test_breakdown_sums_back_and_skips_zero_counts() {
        for amount in [1u64, 6, 99, 1001, 16666, 123_456_789] {
            let breakdown = compute_breakdown(amount);
            assert_eq!(breakdown.iter().map(Denomination::total).sum::<u64>(), amount);
            assert!(breakdown.iter().all(|d| d.count > 0));
            assert!(breakdown.windows(2).all(|w| w[0].unit_value > w[1].unit_value));
        }
    }

    #[test]
    fn test_custom_denominations() {
        let config = WalletConfig {
            denominations: vec![25, 10, 5, 1],
            ..WalletConfig::default()
        };
        let service = DenominationService::new(&config);
        assert_eq!(service.compute_breakdown(41), vec![d(25, 1), d(10, 1), d(5, 1), d(1, 1)]);
    }

    #[test]
    fn test_kinds_and_labels() {
        let service = DenominationService::default();
        assert_eq!(service.kind_of(10000), DenominationKind::Bill);
        assert_eq!(service.kind_of(1000), DenominationKind::Bill);
        assert_eq!(service.kind_of(500), DenominationKind::Coin);
        assert_eq!(service.label_for(10000), "10,000 yen bill");
        assert_eq!(service.label_for(5), "5 yen coin");
    }

    #[test]
    fn test_display_policy_threshold() {
        let service = DenominationService::default();
        assert_eq!(service.display_for(4), RowDisplay::Individual { icons: 4 });
        assert_eq!(
            service.display_for(5),
            RowDisplay::Collapsed { multiplier_label: "×5".to_string() }
        );
    }

    #[test]
    fn test_wallet_for_negative_balance_uses_magnitude() {
        let service = DenominationService::default();
        let wallet = service.wallet_for_balance(-1234);
        assert!(wallet.is_negative);
        assert_eq!(wallet.amount, 1234);
        assert_eq!(wallet.rows.len(), 4);
        assert_eq!(wallet.rows[0].denomination, d(1000, 1));
        assert_eq!(wallet.rows[3].display, RowDisplay::Individual { icons: 4 });
    }

    #[test]
    fn test_wallet_for_zero_and_collapsed_rows() {
        let service = DenominationService::default();
        let empty = service.wallet_for_balance(0);
        assert!(empty.is_empty());
        assert!(!empty.is_negative);

        let wallet = service.wallet_for_balance(65000);
        assert_eq!(wallet.rows.len(), 2);
        assert_eq!(
            wallet.rows[0].display,
            RowDisplay::Collapsed { multiplier_label: "×6".to_string() }
        );
        assert_eq!(wallet.rows[0].kind, DenominationKind::Bill);
        assert_eq!(wallet.rows[1].denomination, d(5000, 1));
        assert_eq!(wallet.rows[1].display, RowDisplay::Individual { icons: 1 });
    }
}
