//! # Collaborator Traits
//!
//! The app delegates persistence and authentication to a managed backend.
//! These traits describe the slice of that backend the services use, so the
//! domain layer can run against the in-memory implementations in tests and
//! against a real client in production without modification.

use crate::error::{AuthError, StoreError};
use async_trait::async_trait;
use mnu_shared::User;
use serde_json::{Map, Value};

/// Field map of a stored document
pub type Record = Map<String, Value>;

/// A document returned from a collection query
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Last path segment, unique within its collection
    pub id: String,
    pub fields: Record,
}

/// Equality filter applied by [`DocumentStore::query`]
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Sort order applied by [`DocumentStore::query`]
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }

    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }
}

/// Hierarchical document database.
///
/// Paths alternate collection and document segments separated by `/`:
/// `Users/{uid}` is a document, `Users/{uid}/History` a collection.
/// Only read-after-write on the same client is assumed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document, `None` if it does not exist
    async fn get(&self, path: &str) -> Result<Option<Record>, StoreError>;

    /// Create or replace a document
    async fn set(&self, path: &str, fields: Record) -> Result<(), StoreError>;

    /// Merge fields into an existing document; fails with `NotFound` if absent
    async fn update(&self, path: &str, fields: Record) -> Result<(), StoreError>;

    /// Atomically add `by` to a numeric field and return the new value.
    ///
    /// A missing document is created and a missing field counts as 0. With a
    /// `floor`, a change whose result would fall below it is refused with
    /// `StoreError::BelowFloor` and nothing is written.
    async fn increment(
        &self,
        path: &str,
        field: &str,
        by: i64,
        floor: Option<i64>,
    ) -> Result<i64, StoreError>;

    /// Insert a document with a generated id into a collection, returning the id
    async fn add(&self, collection: &str, fields: Record) -> Result<String, StoreError>;

    /// Delete a document; returns whether it existed
    async fn delete(&self, path: &str) -> Result<bool, StoreError>;

    /// All documents of a collection matching every filter, in the given order
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError>;
}

/// Email/password identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<User>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Create an account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Remove the signed-in account and sign out
    async fn delete_current_user(&self) -> Result<(), AuthError>;
}
