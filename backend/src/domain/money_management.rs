//! Money input and formatting for the balance screens.
//!
//! [`AmountKeypad`] is the calculator-style pad on the balance update screen;
//! the free functions parse typed amounts and format amounts for display.

use crate::config::InputConfig;
use crate::error::BalanceError;

/// Calculator-style signed amount entry.
///
/// The display starts at `"0"`. A leading zero is replaced by the first
/// digit, the minus sign can be added once at any point and always lands in
/// front, and input stops growing at `max_digits` characters (sign included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountKeypad {
    display: String,
    max_digits: usize,
}

impl AmountKeypad {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            display: "0".to_string(),
            max_digits: config.max_digits,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn press_digit(&mut self, digit: u8) {
        if digit > 9 || self.display.chars().count() >= self.max_digits {
            return;
        }
        if self.display == "0" && digit == 0 {
            return;
        }
        // "-0" is a dead end until cleared
        if self.display == "-0" {
            return;
        }

        let digit = char::from(b'0' + digit);
        if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn press_minus(&mut self) {
        if self.display.contains('-') {
            return;
        }
        if self.display == "0" {
            self.display = "-".to_string();
        } else {
            self.display.insert(0, '-');
        }
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
    }

    /// Called whenever the update screen appears
    pub fn reset(&mut self) {
        self.clear();
    }

    /// The entered amount, `None` while only a minus sign has been typed
    pub fn value(&self) -> Option<i64> {
        self.display.parse().ok()
    }
}

impl Default for AmountKeypad {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

/// Parse a typed whole amount such as `"12,000"` or `" 500 "`
pub fn parse_whole_amount(input: &str) -> Result<i64, BalanceError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(BalanceError::InvalidAmount("no amount entered".to_string()));
    }

    cleaned
        .parse::<i64>()
        .map_err(|e| BalanceError::InvalidAmount(format!("'{}' is not a whole number ({})", input.trim(), e)))
}

/// `1234567` → `"1,234,567"`
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `-1500` with symbol `¥` → `"-¥1,500"`
pub fn format_amount(amount: i64, currency_symbol: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, currency_symbol, group_digits(amount.unsigned_abs()))
}

/// Like [`format_amount`] but always signed, for history rows
pub fn format_signed_amount(amount: i64, currency_symbol: &str) -> String {
    if amount > 0 {
        format!("+{}", format_amount(amount, currency_symbol))
    } else {
        format_amount(amount, currency_symbol)
    }
}
