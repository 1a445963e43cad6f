// web-server/src/store/mod.rs
//! Storage seam for the gateway's own records. Only an in-memory backend
//! exists; routers depend on the trait so a database can replace it.
pub mod audit;
pub mod seed;

use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};

pub use audit::AuditTrail;

pub trait Repository<V>: Send + Sync {
    fn get(&self, id: &str) -> Option<V>;

    /// All records in insertion order
    fn list(&self) -> Vec<V>;

    /// Insert or replace, returning the previous value
    fn put(&self, id: &str, value: V) -> Option<V>;

    /// Insert only when `id` is free; hands the value back when taken
    fn insert_if_absent(&self, id: &str, value: V) -> Result<(), V>;

    fn delete(&self, id: &str) -> Option<V>;

    /// Allocate a fresh numeric id that no stored record uses
    fn next_id(&self) -> String;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Slot<V> {
    order: u64,
    value: V,
}

/// `DashMap`-backed repository; records are lost on restart
pub struct MemoryRepository<V> {
    records: DashMap<String, Slot<V>>,
    last_id: AtomicU64,
    inserted: AtomicU64,
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
            last_id: AtomicU64::new(0),
            inserted: AtomicU64::new(0),
        }
    }
}

impl<V: Clone + Send + Sync> MemoryRepository<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let repo = Self::new();
        for (id, value) in records {
            repo.put(&id, value);
        }
        repo
    }
}

impl<V: Clone + Send + Sync> Repository<V> for MemoryRepository<V> {
    fn get(&self, id: &str) -> Option<V> {
        self.records.get(id).map(|slot| slot.value.clone())
    }

    fn list(&self) -> Vec<V> {
        let mut slots: Vec<(u64, V)> = self
            .records
            .iter()
            .map(|entry| (entry.order, entry.value.clone()))
            .collect();
        slots.sort_by_key(|(order, _)| *order);
        slots.into_iter().map(|(_, value)| value).collect()
    }

    fn put(&self, id: &str, value: V) -> Option<V> {
        // keep numeric ids handed out later clear of explicitly inserted ones
        if let Ok(numeric) = id.parse::<u64>() {
            self.last_id.fetch_max(numeric, Ordering::SeqCst);
        }

        if let Some(mut slot) = self.records.get_mut(id) {
            return Some(std::mem::replace(&mut slot.value, value));
        }

        let order = self.inserted.fetch_add(1, Ordering::SeqCst);
        self.records
            .insert(id.to_string(), Slot { order, value })
            .map(|slot| slot.value)
    }

    fn insert_if_absent(&self, id: &str, value: V) -> Result<(), V> {
        match self.records.entry(id.to_string()) {
            Entry::Occupied(_) => Err(value),
            Entry::Vacant(slot) => {
                if let Ok(numeric) = id.parse::<u64>() {
                    self.last_id.fetch_max(numeric, Ordering::SeqCst);
                }
                let order = self.inserted.fetch_add(1, Ordering::SeqCst);
                slot.insert(Slot { order, value });
                Ok(())
            },
        }
    }

    fn delete(&self, id: &str) -> Option<V> {
        self.records.remove(id).map(|(_, slot)| slot.value)
    }

    fn next_id(&self) -> String {
        (self.last_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
