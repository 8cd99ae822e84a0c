use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed currency unit together with how many of it appear in a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Denomination {
    /// Face value of the unit (e.g. 500 for a 500 yen coin)
    pub unit_value: u32,
    /// Number of units, always > 0 inside a breakdown
    pub count: u64,
}

impl Denomination {
    /// Combined value of all units of this denomination
    pub fn total(&self) -> u64 {
        u64::from(self.unit_value) * self.count
    }
}

/// Physical form of a denomination, used to pick the wallet icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenominationKind {
    Bill,
    Coin,
}

/// A single cell of a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing filler days of adjacent months
    pub in_target_month: bool,
}

/// A calendar year-month, restricted to years 1..=9999.
///
/// Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first: NaiveDate,
}

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(YearMonthError::YearOutOfRange(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(YearMonthError::YearOutOfRange(year))
    }

    /// The year-month a date falls in
    pub fn containing(date: NaiveDate) -> Result<Self, YearMonthError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first + Duration::days(i64::from(self.days_in_month()) - 1)
    }

    /// First day of the following month
    pub fn end_exclusive(&self) -> NaiveDate {
        self.first + Duration::days(i64::from(self.days_in_month()))
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            2 => {
                if is_leap_year(self.year()) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The previous month, or `None` before year 1
    pub fn previous(&self) -> Option<Self> {
        if self.month() == 1 {
            Self::new(self.year() - 1, 12).ok()
        } else {
            Self::new(self.year(), self.month() - 1).ok()
        }
    }

    /// The next month, or `None` after year 9999
    pub fn next(&self) -> Option<Self> {
        if self.month() == 12 {
            Self::new(self.year() + 1, 1).ok()
        } else {
            Self::new(self.year(), self.month() + 1).ok()
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| YearMonthError::InvalidFormat(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| YearMonthError::InvalidFormat(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| YearMonthError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum YearMonthError {
    InvalidMonth(u32),
    YearOutOfRange(i32),
    InvalidFormat(String),
}

impl fmt::Display for YearMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearMonthError::InvalidMonth(month) => {
                write!(f, "Invalid month: {}. Must be between 1 and 12", month)
            }
            YearMonthError::YearOutOfRange(year) => {
                write!(f, "Year {} is outside {}..={}", year, MIN_YEAR, MAX_YEAR)
            }
            YearMonthError::InvalidFormat(raw) => {
                write!(f, "Invalid year-month '{}', expected YYYY-MM", raw)
            }
        }
    }
}

impl std::error::Error for YearMonthError {}

/// The signed-in account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

/// What the user document says about the balance.
///
/// `NoRecord` and `Zero` are deliberately distinct: the former sends the
/// user to initial-balance registration, the latter shows an empty wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "amount", rename_all = "snake_case")]
pub enum BalanceState {
    NoRecord,
    Zero,
    Amount(i64),
}

impl BalanceState {
    pub fn from_stored(balance: Option<i64>) -> Self {
        match balance {
            None => BalanceState::NoRecord,
            Some(0) => BalanceState::Zero,
            Some(amount) => BalanceState::Amount(amount),
        }
    }

    /// Numeric balance, `None` when nothing has been registered yet
    pub fn amount(&self) -> Option<i64> {
        match self {
            BalanceState::NoRecord => None,
            BalanceState::Zero => Some(0),
            BalanceState::Amount(amount) => Some(*amount),
        }
    }

    pub fn needs_initial_balance(&self) -> bool {
        matches!(self, BalanceState::NoRecord)
    }
}

/// One balance change as stored under the user's history collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub amount: i64,
    /// Day of the change, formatted with the configured history date format
    pub date: String,
}

impl HistoryEntry {
    /// Display identity; two entries with the same amount and date are indistinguishable
    pub fn id(&self) -> String {
        format!("{}-{}", self.amount, self.date)
    }
}

/// A system notice broadcast to all users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Input of the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Handling state of a contact request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Open,
    Resolved,
}

/// A stored contact request, as listed for administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: ContactStatus,
}

/// Direction of a monthly ledger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Income,
    Expense,
}

impl LedgerKind {
    pub fn from_amount(amount: i64) -> Self {
        if amount < 0 {
            LedgerKind::Expense
        } else {
            LedgerKind::Income
        }
    }
}

/// Money in and out for one month; both totals are non-negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: i64,
    pub expense: i64,
}

impl MonthlySummary {
    pub fn net(&self) -> i64 {
        self.income - self.expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_validation() {
        assert!(YearMonth::new(2025, 6).is_ok());
        assert_eq!(YearMonth::new(2025, 0), Err(YearMonthError::InvalidMonth(0)));
        assert_eq!(YearMonth::new(2025, 13), Err(YearMonthError::InvalidMonth(13)));
        assert_eq!(YearMonth::new(0, 1), Err(YearMonthError::YearOutOfRange(0)));
        assert_eq!(YearMonth::new(10000, 1), Err(YearMonthError::YearOutOfRange(10000)));
    }

    #[test]
    fn test_days_in_month() {
        let days = |y, m| YearMonth::new(y, m).unwrap().days_in_month();
        assert_eq!(days(2025, 1), 31);
        assert_eq!(days(2025, 4), 30);
        assert_eq!(days(2025, 2), 28);
        assert_eq!(days(2024, 2), 29);
        assert_eq!(days(1900, 2), 28);
        assert_eq!(days(2000, 2), 29);
    }

    #[test]
    fn test_month_bounds() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(feb.end_exclusive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn test_navigation() {
        let june = YearMonth::new(2025, 6).unwrap();
        assert_eq!(june.previous(), Some(YearMonth::new(2025, 5).unwrap()));
        assert_eq!(june.next(), Some(YearMonth::new(2025, 7).unwrap()));

        let january = YearMonth::new(2025, 1).unwrap();
        assert_eq!(january.previous(), Some(YearMonth::new(2024, 12).unwrap()));

        let december = YearMonth::new(2025, 12).unwrap();
        assert_eq!(december.next(), Some(YearMonth::new(2026, 1).unwrap()));

        assert_eq!(YearMonth::new(MAX_YEAR, 12).unwrap().next(), None);
        assert_eq!(YearMonth::new(MIN_YEAR, 1).unwrap().previous(), None);
    }

    #[test]
    fn test_year_month_parse_and_serde() {
        let ym: YearMonth = "2025-06".parse().unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 6);
        assert_eq!(ym.to_string(), "2025-06");

        assert!(matches!("2025/06".parse::<YearMonth>(), Err(YearMonthError::InvalidFormat(_))));
        assert!(matches!("2025-13".parse::<YearMonth>(), Err(YearMonthError::InvalidMonth(13))));

        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"2025-06\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
        assert!(serde_json::from_str::<YearMonth>("\"2025-00\"").is_err());
    }

    #[test]
    fn test_balance_state_three_way() {
        assert_eq!(BalanceState::from_stored(None), BalanceState::NoRecord);
        assert_eq!(BalanceState::from_stored(Some(0)), BalanceState::Zero);
        assert_eq!(BalanceState::from_stored(Some(1200)), BalanceState::Amount(1200));

        assert!(BalanceState::NoRecord.needs_initial_balance());
        assert!(!BalanceState::Zero.needs_initial_balance());
        assert_eq!(BalanceState::NoRecord.amount(), None);
        assert_eq!(BalanceState::Zero.amount(), Some(0));
    }

    #[test]
    fn test_history_entry_id() {
        let entry = HistoryEntry {
            amount: -500,
            date: "2024/12/15".to_string(),
        };
        assert_eq!(entry.id(), "-500-2024/12/15");
    }

    #[test]
    fn test_denomination_total_and_summary_net() {
        let d = Denomination { unit_value: 500, count: 3 };
        assert_eq!(d.total(), 1500);

        let summary = MonthlySummary { income: 3000, expense: 1200 };
        assert_eq!(summary.net(), 1800);
        assert_eq!(LedgerKind::from_amount(-1), LedgerKind::Expense);
        assert_eq!(LedgerKind::from_amount(5), LedgerKind::Income);
    }
}
