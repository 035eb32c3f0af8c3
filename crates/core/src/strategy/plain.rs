use indexmap::IndexMap;
use linkage_api::{Attributes, ConstructionError, OneOrMany, RecordStrategy, Relationships};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One named entry of a [`PlainRecord`].
#[derive(Clone, Debug)]
pub enum Field {
    Attribute(Value),
    One(PlainRecord),
    Many(Vec<PlainRecord>),
}

impl From<OneOrMany<PlainRecord>> for Field {
    fn from(related: OneOrMany<PlainRecord>) -> Self {
        match related {
            OneOrMany::One(record) => Field::One(record),
            OneOrMany::Many(records) => Field::Many(records),
        }
    }
}

/// Dynamic record: a shared, mutable bag of attributes and relationships.
///
/// Clones are handles to the same record; use [`PlainRecord::ptr_eq`] to
/// test identity. Records that reference each other form `Arc` cycles and
/// stay alive until [`PlainRecord::clear_relationships`] is called on one
/// of them, or [`PlainRecord::detach_graph`] on the build result.
#[derive(Clone)]
pub struct PlainRecord {
    fields: Arc<RwLock<IndexMap<String, Field>>>,
}

impl PlainRecord {
    pub fn from_attributes(attributes: Attributes) -> Self {
        let fields = attributes
            .into_iter()
            .map(|(key, value)| (key, Field::Attribute(value)))
            .collect();
        Self {
            fields: Arc::new(RwLock::new(fields)),
        }
    }

    pub fn ptr_eq(&self, other: &PlainRecord) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    pub fn id(&self) -> Option<String> {
        match self.attribute("id")? {
            Value::String(id) => Some(id),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<Field> {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn attribute(&self, key: &str) -> Option<Value> {
        match self.read().get(key)? {
            Field::Attribute(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Target of a to-one relationship.
    pub fn one(&self, key: &str) -> Option<PlainRecord> {
        match self.read().get(key)? {
            Field::One(record) => Some(record.clone()),
            _ => None,
        }
    }

    /// Targets of a to-many relationship, in document order.
    pub fn many(&self, key: &str) -> Option<Vec<PlainRecord>> {
        match self.read().get(key)? {
            Field::Many(records) => Some(records.clone()),
            _ => None,
        }
    }

    /// Store `field` under `key`, returning what was there.
    pub fn set(&self, key: impl Into<String>, field: Field) -> Option<Field> {
        self.write().insert(key.into(), field)
    }

    pub fn set_attribute(&self, key: impl Into<String>, value: Value) -> Option<Field> {
        self.set(key, Field::Attribute(value))
    }

    /// Drop every relationship field, breaking reference cycles.
    pub fn clear_relationships(&self) {
        self.write()
            .retain(|_, field| matches!(field, Field::Attribute(_)));
    }

    /// Clear the relationships of every record reachable from `roots`,
    /// freeing a whole built graph once the caller is done with it.
    pub fn detach_graph(roots: &[PlainRecord]) {
        let mut seen: HashSet<*const RwLock<IndexMap<String, Field>>> = HashSet::new();
        let mut reachable = Vec::new();
        let mut stack = roots.to_vec();

        while let Some(record) = stack.pop() {
            if !seen.insert(Arc::as_ptr(&record.fields)) {
                continue;
            }
            for (_, field) in record.snapshot() {
                match field {
                    Field::Attribute(_) => {}
                    Field::One(target) => stack.push(target),
                    Field::Many(targets) => stack.extend(targets),
                }
            }
            reachable.push(record);
        }

        for record in &reachable {
            record.clear_relationships();
        }
    }

    /// Snapshot of the record as JSON.
    ///
    /// A record met again while it is still being rendered (a cycle) is
    /// written as `{"id": ...}` only.
    pub fn to_json(&self) -> Value {
        let mut path = Vec::new();
        self.render(&mut path)
    }

    fn render(&self, path: &mut Vec<PlainRecord>) -> Value {
        if path.iter().any(|seen| seen.ptr_eq(self)) {
            let mut stub = Map::new();
            if let Some(id) = self.attribute("id") {
                stub.insert("id".to_string(), id);
            }
            return Value::Object(stub);
        }

        let fields = self.snapshot();

        path.push(self.clone());
        let mut out = Map::new();
        for (key, field) in fields {
            let value = match field {
                Field::Attribute(value) => value,
                Field::One(record) => record.render(path),
                Field::Many(records) => {
                    Value::Array(records.iter().map(|record| record.render(path)).collect())
                }
            };
            out.insert(key, value);
        }
        path.pop();

        Value::Object(out)
    }

    // Copied out so no lock is held while visiting other records, which may
    // include this one.
    fn snapshot(&self) -> Vec<(String, Field)> {
        self.read()
            .iter()
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Field>> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Field>> {
        self.fields.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PlainRecord {
    // Relationship targets are shown by id only; full output could cycle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.snapshot();
        let mut map = f.debug_map();
        for (key, field) in fields.iter() {
            match field {
                Field::Attribute(value) => map.entry(key, value),
                Field::One(record) => map.entry(key, &RecordRef(record)),
                Field::Many(records) => map.entry(
                    key,
                    &records.iter().map(RecordRef).collect::<Vec<_>>(),
                ),
            };
        }
        map.finish()
    }
}

struct RecordRef<'a>(&'a PlainRecord);

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.id() {
            Some(id) => write!(f, "PlainRecord(#{id})"),
            None => f.write_str("PlainRecord(?)"),
        }
    }
}

/// Default strategy: records are [`PlainRecord`]s holding the resource's
/// attributes, with relationships stored under their names (replacing any
/// attribute of the same name).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStrategy;

impl RecordStrategy for PlainStrategy {
    type Record = PlainRecord;

    fn construct(
        &self,
        _resource_type: &str,
        attributes: Attributes,
    ) -> Result<PlainRecord, ConstructionError> {
        Ok(PlainRecord::from_attributes(attributes))
    }

    fn attach(&self, record: &PlainRecord, relationships: Relationships<PlainRecord>) {
        let mut fields = record.write();
        for (key, related) in relationships {
            fields.insert(key, Field::from(related));
        }
    }
}
