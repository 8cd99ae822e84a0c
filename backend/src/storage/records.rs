//! Conversion between stored field maps and the shared value types.
//!
//! Decoding is lenient: a document that does not have the expected shape is
//! skipped by the caller rather than failing the whole listing.

use crate::error::StoreError;
use crate::storage::traits::{Document, Record};
use chrono::{DateTime, Utc};
use mnu_shared::{Contact, ContactStatus, HistoryEntry, LedgerKind, Notification};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const USERS: &str = "Users";
pub const HISTORY: &str = "History";
pub const NOTIFICATIONS: &str = "notifications";
pub const CONTACTS: &str = "contacts";
pub const TRANSACTIONS: &str = "transactions";
pub const BALANCE_FIELD: &str = "balance";

pub fn user_path(uid: &str) -> String {
    format!("{}/{}", USERS, uid)
}

pub fn history_collection(uid: &str) -> String {
    format!("{}/{}/{}", USERS, uid, HISTORY)
}

pub fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Unavailable(format!(
            "cannot store non-object value {}",
            other
        ))),
        Err(e) => Err(StoreError::Unavailable(format!("failed to encode record: {}", e))),
    }
}

pub fn from_record<T: DeserializeOwned>(fields: &Record) -> Option<T> {
    serde_json::from_value(Value::Object(fields.clone())).ok()
}

/// Whole number stored in `value`.
///
/// Older clients wrote amounts as floats; whole-valued floats in `i64` range
/// are accepted, fractional ones are not.
pub fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Reads the balance field of a user document
pub fn read_balance(path: &str, fields: &Record) -> Result<Option<i64>, StoreError> {
    match fields.get(BALANCE_FIELD) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => whole_number(value)
            .map(Some)
            .ok_or_else(|| StoreError::NotNumeric {
                path: path.to_string(),
                field: BALANCE_FIELD.to_string(),
            }),
    }
}

pub fn balance_record(balance: i64) -> Record {
    let mut fields = Record::new();
    fields.insert(BALANCE_FIELD.to_string(), Value::from(balance));
    fields
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    title: String,
    message: String,
    timestamp: DateTime<Utc>,
}

pub fn notification_from_document(document: &Document) -> Option<Notification> {
    let record: NotificationRecord = from_record(&document.fields)?;
    Some(Notification {
        id: document.id.clone(),
        title: record.title,
        message: record.message,
        timestamp: record.timestamp,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: ContactStatus,
}

pub fn contact_from_document(document: &Document) -> Option<Contact> {
    let record: ContactRecord = from_record(&document.fields)?;
    Some(Contact {
        id: document.id.clone(),
        name: record.name,
        email: record.email,
        message: record.message,
        timestamp: record.timestamp,
        status: record.status,
    })
}

pub fn history_from_document(document: &Document) -> Option<HistoryEntry> {
    let amount = document.fields.get("amount").and_then(whole_number)?;
    let date = document.fields.get("date")?.as_str()?.to_string();
    Some(HistoryEntry { amount, date })
}

/// Monthly ledger record kept in the top-level `transactions` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    /// Magnitude of the change, always non-negative
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: LedgerKind,
}
