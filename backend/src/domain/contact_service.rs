//! Contact form submissions and the administrator listing.

use crate::error::ContactError;
use crate::storage::records::{contact_from_document, to_record, ContactRecord, CONTACTS};
use crate::storage::{DocumentStore, OrderBy};
use anyhow::Result;
use chrono::{DateTime, Utc};
use mnu_shared::{Contact, ContactForm, ContactStatus};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn DocumentStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a submission as an open request and return its id.
    ///
    /// All fields are required; surrounding whitespace is trimmed.
    pub async fn submit(&self, form: &ContactForm, at: DateTime<Utc>) -> Result<String> {
        let name = form.name.trim();
        let email = form.email.trim();
        let message = form.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingFields.into());
        }

        let record = ContactRecord {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            timestamp: at,
            status: ContactStatus::Open,
        };

        let id = self
            .store
            .add(CONTACTS, to_record(&record)?)
            .await
            .map_err(|e| {
                error!("Failed to submit contact from {}: {}", email, e);
                e
            })?;

        info!("Stored contact request {}", id);
        Ok(id)
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Contact>> {
        let documents = self
            .store
            .query(CONTACTS, &[], Some(OrderBy::descending("timestamp")))
            .await?;

        let mut contacts: Vec<Contact> = documents.iter().filter_map(contact_from_document).collect();
        contacts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(contacts)
    }
}
