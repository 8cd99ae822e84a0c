//! In-process implementations of the collaborator traits.
//!
//! Used by the test suites and the preview binary. Both are cheap to clone;
//! clones share state, like handles to the same remote project.

use crate::error::{AuthError, StoreError};
use crate::storage::records::whole_number;
use crate::storage::traits::{Document, DocumentStore, Filter, IdentityProvider, OrderBy, Record};
use async_trait::async_trait;
use mnu_shared::User;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

type Collections = BTreeMap<String, BTreeMap<String, Record>>;

/// Document store backed by nested ordered maps
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<Mutex<Collections>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every operation fails with `StoreError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

/// Split `a/b/c/d` into collection `a/b/c` and document id `d`
fn split_document_path(path: &str) -> Result<(&str, &str), StoreError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    path.rsplit_once('/')
        .ok_or_else(|| StoreError::InvalidPath(path.to_string()))
}

fn check_collection_path(path: &str) -> Result<(), StoreError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() % 2 != 1 || segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Record>, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, path: &str, fields: Record) -> Result<(), StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut collections = self.lock()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        debug!("set {}", path);
        Ok(())
    }

    async fn update(&self, path: &str, fields: Record) -> Result<(), StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut collections = self.lock()?;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        existing.extend(fields);
        debug!("updated {}", path);
        Ok(())
    }

    async fn increment(
        &self,
        path: &str,
        field: &str,
        by: i64,
        floor: Option<i64>,
    ) -> Result<i64, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut collections = self.lock()?;
        let stored = collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .and_then(|fields| fields.get(field));

        let current = match stored {
            None | Some(Value::Null) => 0,
            Some(value) => whole_number(value).ok_or_else(|| StoreError::NotNumeric {
                path: path.to_string(),
                field: field.to_string(),
            })?,
        };
        let next = current.checked_add(by).ok_or_else(|| StoreError::NotNumeric {
            path: path.to_string(),
            field: field.to_string(),
        })?;
        if let Some(floor) = floor {
            if next < floor {
                return Err(StoreError::BelowFloor {
                    path: path.to_string(),
                    field: field.to_string(),
                    floor,
                    current,
                });
            }
        }

        collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default()
            .insert(field.to_string(), Value::from(next));
        debug!("incremented {}.{} by {} to {}", path, field, by, next);
        Ok(next)
    }

    async fn add(&self, collection: &str, fields: Record) -> Result<String, StoreError> {
        check_collection_path(collection)?;
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.lock()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        debug!("added {}/{}", collection, id);
        Ok(id)
    }

    async fn delete(&self, path: &str) -> Result<bool, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut collections = self.lock()?;
        let removed = collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false);
        debug!("delete {} -> {}", path, removed);
        Ok(removed)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        check_collection_path(collection)?;
        let collections = self.lock()?;
        let mut documents: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| {
                        filters
                            .iter()
                            .all(|f| fields.get(&f.field) == Some(&f.value))
                    })
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.fields.get(&order.field), b.fields.get(&order.field));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(documents)
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct IdentityState {
    accounts: HashMap<String, Account>,
    current: Option<User>,
}

/// Email/password accounts kept in memory
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, IdentityState>, AuthError> {
        self.state
            .lock()
            .map_err(|_| AuthError::Unavailable("identity lock poisoned".to_string()))
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn current_user(&self) -> Option<User> {
        self.state.lock().ok().and_then(|state| state.current.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let key = email.trim().to_lowercase();
        let mut state = self.lock()?;
        let user = match state.accounts.get(&key) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AuthError::WrongCredentials),
        };
        state.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let key = email.to_lowercase();
        let mut state = self.lock()?;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            email: Some(email.to_string()),
        };
        state.accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        state.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.lock()?.current = None;
        Ok(())
    }

    async fn delete_current_user(&self) -> Result<(), AuthError> {
        let mut state = self.lock()?;
        let user = state.current.take().ok_or(AuthError::NotSignedIn)?;
        state.accounts.retain(|_, account| account.user.id != user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_set_get_update() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(store.get("Users/u1").await.unwrap(), None);

        store.set("Users/u1", record(json!({"balance": 100}))).await.unwrap();
        store.update("Users/u1", record(json!({"name": "a"}))).await.unwrap();

        let doc = store.get("Users/u1").await.unwrap().unwrap();
        assert_eq!(doc.get("balance"), Some(&json!(100)));
        assert_eq!(doc.get("name"), Some(&json!("a")));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = InMemoryDocumentStore::new();
        let err = store.update("Users/ghost", Record::new()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("Users/ghost".to_string()));
    }

    #[tokio::test]
    async fn test_increment() {
        let store = InMemoryDocumentStore::new();
        store.set("Users/u1", record(json!({"balance": 100, "name": "x"}))).await.unwrap();
        assert_eq!(store.increment("Users/u1", "balance", -30, None).await.unwrap(), 70);
        assert_eq!(store.increment("Users/u1", "visits", 1, None).await.unwrap(), 1);
        assert!(matches!(
            store.increment("Users/u1", "name", 1, None).await,
            Err(StoreError::NotNumeric { .. })
        ));
    }

    #[tokio::test]
    async fn test_increment_creates_missing_document() {
        let store = InMemoryDocumentStore::new();
        assert_eq!(store.increment("Users/u2", "balance", 5, Some(0)).await.unwrap(), 5);
        assert_eq!(store.get("Users/u2").await.unwrap(), Some(record(json!({"balance": 5}))));
    }

    #[tokio::test]
    async fn test_increment_floor_rejects_without_writing() {
        let store = InMemoryDocumentStore::new();
        store.set("Users/u1", record(json!({"balance": 100}))).await.unwrap();

        let err = store.increment("Users/u1", "balance", -101, Some(0)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::BelowFloor {
                path: "Users/u1".to_string(),
                field: "balance".to_string(),
                floor: 0,
                current: 100,
            }
        );
        assert_eq!(store.increment("Users/u1", "balance", -100, Some(0)).await.unwrap(), 0);
        assert!(store.increment("Users/u1", "balance", -1, Some(0)).await.is_err());
        assert!(store.increment("Users/u1", "balance", i64::MAX, None).await.is_ok());
        assert!(store.increment("Users/u1", "balance", 1, None).await.is_err());
    }

    #[tokio::test]
    async fn test_increment_accepts_legacy_float_and_writes_integer() {
        let store = InMemoryDocumentStore::new();
        store.set("Users/u1", record(json!({"balance": 1500.0}))).await.unwrap();
        assert_eq!(store.increment("Users/u1", "balance", 500, Some(0)).await.unwrap(), 2000);

        let fields = store.get("Users/u1").await.unwrap().unwrap();
        assert_eq!(fields.get("balance").and_then(Value::as_i64), Some(2000));

        store.set("Users/u1", record(json!({"balance": 10.5}))).await.unwrap();
        assert!(matches!(
            store.increment("Users/u1", "balance", 1, None).await,
            Err(StoreError::NotNumeric { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_query_and_delete() {
        let store = InMemoryDocumentStore::new();
        let a = store.add("Users/u1/History", record(json!({"amount": 5, "date": "2025/01/02"}))).await.unwrap();
        store.add("Users/u1/History", record(json!({"amount": 9, "date": "2025/01/01"}))).await.unwrap();
        store.add("Users/u2/History", record(json!({"amount": 5, "date": "2025/01/02"}))).await.unwrap();

        let all = store
            .query("Users/u1/History", &[], Some(OrderBy::ascending("date")))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].fields.get("amount"), Some(&json!(9)));

        let fives = store
            .query("Users/u1/History", &[Filter::eq("amount", 5)], None)
            .await
            .unwrap();
        assert_eq!(fives.len(), 1);
        assert_eq!(fives[0].id, a);

        assert!(store.delete(&format!("Users/u1/History/{}", a)).await.unwrap());
        assert!(!store.delete(&format!("Users/u1/History/{}", a)).await.unwrap());
    }

    #[tokio::test]
    async fn test_numeric_descending_order() {
        let store = InMemoryDocumentStore::new();
        for n in [3, 10, 1] {
            store.add("scores", record(json!({"n": n}))).await.unwrap();
        }
        let docs = store.query("scores", &[], Some(OrderBy::descending("n"))).await.unwrap();
        let values: Vec<i64> = docs.iter().map(|d| d.fields["n"].as_i64().unwrap()).collect();
        assert_eq!(values, vec![10, 3, 1]);
    }

    #[tokio::test]
    async fn test_invalid_paths() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(store.get("Users").await, Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.get("Users//x/y").await, Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.add("Users/u1", Record::new()).await, Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.query("", &[], None).await, Err(StoreError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = InMemoryDocumentStore::new();
        store.set_offline(true);
        assert!(matches!(store.get("Users/u1").await, Err(StoreError::Unavailable(_))));
        store.set_offline(false);
        assert!(store.get("Users/u1").await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_sign_out() {
        let identity = InMemoryIdentityProvider::new();
        assert_eq!(identity.current_user(), None);

        let user = identity.sign_up("yuri@example.com", "secret1").await.unwrap();
        assert_eq!(identity.current_user(), Some(user.clone()));

        identity.sign_out().await.unwrap();
        assert_eq!(identity.current_user(), None);

        let again = identity.sign_in("YURI@example.com", "secret1").await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let identity = InMemoryIdentityProvider::new();
        assert_eq!(identity.sign_up("not-an-email", "secret1").await, Err(AuthError::InvalidEmail));
        assert_eq!(
            identity.sign_up("a@example.com", "123").await,
            Err(AuthError::WeakPassword { min: MIN_PASSWORD_LENGTH })
        );
        identity.sign_up("a@example.com", "secret1").await.unwrap();
        assert_eq!(
            identity.sign_up("a@example.com", "secret2").await,
            Err(AuthError::EmailAlreadyInUse)
        );
    }

    #[tokio::test]
    async fn test_wrong_credentials_and_delete() {
        let identity = InMemoryIdentityProvider::new();
        identity.sign_up("a@example.com", "secret1").await.unwrap();
        assert_eq!(identity.sign_in("a@example.com", "nope").await, Err(AuthError::WrongCredentials));
        assert_eq!(identity.sign_in("b@example.com", "secret1").await, Err(AuthError::WrongCredentials));

        identity.delete_current_user().await.unwrap();
        assert_eq!(identity.current_user(), None);
        assert_eq!(identity.sign_in("a@example.com", "secret1").await, Err(AuthError::WrongCredentials));
        assert_eq!(identity.delete_current_user().await, Err(AuthError::NotSignedIn));
    }
}
