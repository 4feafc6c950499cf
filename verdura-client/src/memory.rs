//! In-memory record store
//!
//! Backs tests and offline demos with the same [`RecordStore`] surface
//! as the network client. Supports the filter subset the services
//! actually emit: `field = "string"`, `field = true|false`,
//! `field = number`, joined with `&&`.

use crate::error::{ClientError, ClientResult};
use crate::store::RecordStore;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    auth_user: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_user(self, user_id: impl Into<String>) -> Self {
        *self.auth_user.write().unwrap() = Some(user_id.into());
        self
    }

    pub fn set_auth_user(&self, user_id: Option<String>) {
        *self.auth_user.write().unwrap() = user_id;
    }

    /// Insert a record directly, bypassing auth. Returns the record id.
    /// Intended for seeding test fixtures.
    pub fn insert(&self, collection: &str, mut record: Value) -> String {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(new_record_id);
        stamp(&mut record, &id, true);
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        id
    }

    /// Remove a record directly. Used by tests to simulate deletion of a
    /// referenced entity.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        self.collections
            .write()
            .unwrap()
            .get_mut(collection)
            .map(|records| records.remove(id).is_some())
            .unwrap_or(false)
    }
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn stamp(record: &mut Value, id: &str, fresh: bool) {
    if let Value::Object(obj) = record {
        obj.insert("id".into(), Value::String(id.to_string()));
        let now = chrono::Utc::now().to_rfc3339();
        if fresh && !obj.contains_key("created") {
            obj.insert("created".into(), Value::String(now.clone()));
        }
        obj.insert("updated".into(), Value::String(now));
    }
}

/// Evaluate one `field = value` clause against a record.
fn clause_matches(record: &Value, clause: &str) -> bool {
    let Some((field, expected)) = clause.split_once('=') else {
        tracing::warn!(clause, "unsupported filter clause");
        return false;
    };
    let field = field.trim();
    let expected = expected.trim();
    let actual = record.get(field).unwrap_or(&Value::Null);

    if let Some(literal) = expected.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return actual.as_str() == Some(literal);
    }
    match expected {
        "true" => actual.as_bool() == Some(true),
        "false" => actual.as_bool() == Some(false),
        _ => match expected.parse::<f64>() {
            Ok(number) => actual.as_f64() == Some(number),
            Err(_) => {
                tracing::warn!(clause, "unsupported filter literal");
                false
            }
        },
    }
}

fn matches_filter(record: &Value, filter: &str) -> bool {
    filter
        .split("&&")
        .all(|clause| clause_matches(record, clause.trim()))
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let (a, b) = (a.get(field), b.get(field));
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_record(&self, collection: &str, id: &str) -> ClientResult<Value> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned()
            .ok_or_else(|| ClientError::not_found(collection, id))
    }

    async fn list_records(
        &self,
        collection: &str,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> ClientResult<Vec<Value>> {
        let mut records: Vec<Value> = self
            .collections
            .read()
            .unwrap()
            .get(collection)
            .map(|records| {
                records
                    .values()
                    .filter(|r| filter.map(|f| matches_filter(r, f)).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort, false),
            };
            records.sort_by(|a, b| {
                let ord = compare_field(a, b, field);
                if descending { ord.reverse() } else { ord }
            });
        }
        Ok(records)
    }

    async fn create_record(&self, collection: &str, payload: Value) -> ClientResult<Value> {
        if !payload.is_object() {
            return Err(ClientError::Validation("payload must be an object".into()));
        }
        let mut record = payload;
        let id = new_record_id();
        stamp(&mut record, &id, true);
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id, record.clone());
        Ok(record)
    }

    async fn update_record(&self, collection: &str, id: &str, patch: Value) -> ClientResult<Value> {
        let mut collections = self.collections.write().unwrap();
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| ClientError::not_found(collection, id))?;
        if let (Value::Object(target), Value::Object(fields)) = (&mut *record, patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        stamp(record, id, false);
        Ok(record.clone())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> ClientResult<()> {
        let removed = self.remove(collection, id);
        if removed {
            Ok(())
        } else {
            Err(ClientError::not_found(collection, id))
        }
    }

    fn auth_user_id(&self) -> Option<String> {
        self.auth_user.read().unwrap().clone()
    }
}
