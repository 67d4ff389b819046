//! FILENAME: core/persistence/src/cache.rs
//! Parsed-upload cache keyed by a SHA-256 of the file bytes.
//!
//! Re-submitting the same upload (same bytes, same skip count) returns the
//! table parsed the first time instead of decoding the workbook again.
//! The cache holds at most `capacity` tables and evicts the oldest insert
//! first.

use crate::xlsx_reader::load_table_from_bytes;
use crate::PersistenceError;
use records::RawTable;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    content_hash: String,
    skip_rows: usize,
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Tables kept by `TableCache::new`.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

#[derive(Debug)]
pub struct TableCache {
    tables: HashMap<CacheKey, Arc<RawTable>>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` tables (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        TableCache {
            tables: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the parsed table for `bytes`, parsing only on first sight.
    /// Failed parses are not cached.
    pub fn load(&mut self, bytes: &[u8], skip_rows: usize) -> Result<Arc<RawTable>, PersistenceError> {
        let key = CacheKey {
            content_hash: content_hash(bytes),
            skip_rows,
        };

        if let Some(table) = self.tables.get(&key) {
            self.hits += 1;
            log::debug!("table cache hit for {}", &key.content_hash[..12]);
            return Ok(Arc::clone(table));
        }

        self.misses += 1;
        let table = Arc::new(load_table_from_bytes(bytes, skip_rows)?);
        log::debug!(
            "table cache miss for {}, parsed {} rows",
            &key.content_hash[..12],
            table.row_count()
        );

        while self.tables.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.tables.remove(&oldest);
            log::debug!("table cache evicted {}", &oldest.content_hash[..12]);
        }

        self.order.push_back(key.clone());
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn contains(&self, bytes: &[u8], skip_rows: usize) -> bool {
        self.tables.contains_key(&CacheKey {
            content_hash: content_hash(bytes),
            skip_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.tables.clear();
        self.order.clear();
    }
}
