//! Keyspace Module
//!
//! Ordered key storage with lazy TTL expiry and a cursor-based scan.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use crate::client::ScanPage;
use crate::error::{AdminError, Result};
use crate::memory::entry::{current_timestamp_ms, expiry_after, Entry, StoredValue};
use crate::memory::glob::glob_match;
use crate::memory::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// Scan cursors kept alive at once; the oldest is forgotten first.
const MAX_OPEN_CURSORS: usize = 1024;

// == Keyspace ==
/// Key-value storage backing [`MemoryStore`](crate::memory::MemoryStore).
///
/// Keys are kept in lexical order. A scan cursor names the last key a page
/// examined, so the next page resumes right after it no matter what was
/// inserted or deleted in between.
#[derive(Debug, Default)]
pub struct Keyspace {
    entries: BTreeMap<String, Entry>,
    /// TTL in seconds applied when a write does not give one
    default_ttl: Option<u64>,
    /// Open scan cursors, oldest first, mapped to the key to resume after
    cursors: BTreeMap<u64, String>,
    last_cursor: u64,
}

impl Keyspace {
    pub fn new(default_ttl: Option<u64>) -> Self {
        Self {
            default_ttl,
            ..Self::default()
        }
    }

    // == Set ==
    /// Stores a string value, replacing whatever the key held before.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Result<()> {
        validate_key(&key)?;
        validate_size(value.len())?;

        let entry = Entry::new(StoredValue::Text(value), ttl.or(self.default_ttl));
        self.entries.insert(key, entry);
        Ok(())
    }

    // == Hash Set ==
    /// Sets one field of a hash, creating the hash if needed.
    ///
    /// A `ttl` resets the expiry of the whole key; without one an existing
    /// hash keeps its expiry and a new hash gets the default.
    pub fn set_hash_field(
        &mut self,
        key: String,
        field: String,
        value: String,
        ttl: Option<u64>,
    ) -> Result<()> {
        validate_key(&key)?;
        self.remove_if_expired(&key);

        let default_ttl = self.default_ttl;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(StoredValue::Hash(HashMap::new()), default_ttl));

        let fields = match &mut entry.value {
            StoredValue::Hash(fields) => fields,
            other => return Err(wrong_type(&key, other)),
        };

        let current = fields.get(&field).map_or(0, |old| field.len() + old.len());
        let projected = entry_size(fields) - current + field.len() + value.len();
        if let Err(e) = validate_size(projected) {
            if fields.is_empty() {
                self.entries.remove(&key);
            }
            return Err(e);
        }

        fields.insert(field, value);
        if ttl.is_some() {
            entry.expires_at = expiry_after(ttl);
        }
        Ok(())
    }

    // == Get ==
    /// Reads a string value. Expired keys are removed and read as missing.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        self.remove_if_expired(key);

        match self.entries.get(key).map(|entry| &entry.value) {
            Some(StoredValue::Text(text)) => Ok(Some(text.clone())),
            Some(other) => Err(wrong_type(key, other)),
            None => Ok(None),
        }
    }

    // == Hash Get ==
    pub fn get_hash_field(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        self.remove_if_expired(key);

        match self.entries.get(key).map(|entry| &entry.value) {
            Some(StoredValue::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(other) => Err(wrong_type(key, other)),
            None => Ok(None),
        }
    }

    // == Delete ==
    /// Removes a key. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    // == Scan ==
    /// Runs one step of a cursor scan over keys matching `pattern`.
    ///
    /// Examines up to `count` keys after the position `cursor` stands for
    /// and returns the live matches among them. The returned cursor is 0
    /// once the end of the keyspace has been reached. Every key present for
    /// the whole scan is returned exactly once.
    pub fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage> {
        let lower = match cursor {
            0 => Bound::Unbounded,
            id => match self.cursors.get(&id) {
                Some(after) => Bound::Excluded(after.clone()),
                None => return Err(AdminError::Scan(format!("unknown cursor {}", id))),
            },
        };

        let now = current_timestamp_ms();
        let budget = count.max(1);

        let mut keys = Vec::new();
        let mut examined = 0;
        let mut last = None;
        for (key, entry) in self.entries.range::<String, _>((lower, Bound::Unbounded)).take(budget) {
            examined += 1;
            if !entry.is_expired_at(now) && glob_match(pattern, key) {
                keys.push(key.clone());
            }
            last = Some(key);
        }

        let resume_after = match last {
            Some(key) if examined == budget => self
                .entries
                .range::<String, _>((Bound::Excluded(key), Bound::Unbounded))
                .next()
                .map(|_| key.clone()),
            _ => None,
        };

        let next = match resume_after {
            Some(key) => self.open_cursor(key),
            None => 0,
        };
        Ok(ScanPage::new(next, keys))
    }

    fn open_cursor(&mut self, resume_after: String) -> u64 {
        self.last_cursor = self.last_cursor.wrapping_add(1).max(1);
        self.cursors.insert(self.last_cursor, resume_after);
        while self.cursors.len() > MAX_OPEN_CURSORS {
            self.cursors.pop_first();
        }
        self.last_cursor
    }

    // == Clear ==
    /// Removes every key. Returns how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_if_expired(&mut self, key: &str) {
        if self.entries.get(key).is_some_and(Entry::is_expired) {
            self.entries.remove(key);
        }
    }
}

fn entry_size(fields: &HashMap<String, String>) -> usize {
    fields.iter().map(|(f, v)| f.len() + v.len()).sum()
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(AdminError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(AdminError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

fn validate_size(size: usize) -> Result<()> {
    if size > MAX_VALUE_SIZE {
        return Err(AdminError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }
    Ok(())
}

fn wrong_type(key: &str, value: &StoredValue) -> AdminError {
    AdminError::command(
        key,
        format!("WRONGTYPE key holds a {} value", value.type_name()),
    )
}
