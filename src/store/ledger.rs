// src/store/ledger.rs

//! Implements a [`TransactionLedger`], the merge engine mapping a postfix
//! queue id to its evolving [`MailRecord`].
//!
//! [`TransactionLedger`]: self::TransactionLedger
//! [`MailRecord`]: crate::data::mail::MailRecord

use crate::common::Count;
use crate::data::fields::FieldSet;
use crate::data::mail::MailRecord;
use crate::store::recordstore::{RecordStore, StoreError};

extern crate lru;
use lru::LruCache;

use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TransactionLedger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Internal LRU cache mapping a queue id to the most recently committed
/// [`MailRecord`] for that queue id.
///
/// [`MailRecord`]: crate::data::mail::MailRecord
pub type MergeLRUCache = LruCache<String, MailRecord>;

/// Statistics of a `TransactionLedger`, for a [`Summary`].
///
/// [`Summary`]: crate::readers::summary::Summary
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryLedger {
    /// `Count` of `MailRecord`s created (first line of a transaction).
    pub records_created: Count,
    /// `Count` of merges into a prior `MailRecord`.
    pub records_merged: Count,
    /// `Count` of internal LRU cache lookup hit.
    pub cache_hit: Count,
    /// `Count` of internal LRU cache lookup miss.
    pub cache_miss: Count,
    /// `Count` of internal LRU cache `.put`.
    pub cache_put: Count,
}

/// The merge engine: resolves a queue id to its current [`MailRecord`]
/// (internal LRU cache first, then the [`RecordStore`]) and applies the
/// merge rules for one more contributing line.
///
/// The cache only short-circuits store reads of records this ledger has
/// already committed; it never changes observable merge results. Mail
/// logs interleave transactions but cluster lines of one transaction
/// closely, so a small cache absorbs most lookups.
///
/// A `TransactionLedger` does not write. The caller commits the merge
/// result via [`RecordStore::commit_line`] and then reports the commit
/// back with [`committed`], keeping the cache consistent with durable
/// state on every exit path.
///
/// [`MailRecord`]: crate::data::mail::MailRecord
/// [`RecordStore`]: crate::store::recordstore::RecordStore
/// [`RecordStore::commit_line`]: crate::store::recordstore::RecordStore#method.commit_line
/// [`committed`]: TransactionLedger#method.committed
pub struct TransactionLedger {
    /// Internal cache of recently committed `MailRecord`s.
    merge_lru_cache: MergeLRUCache,
    /// Internal stats - created records.
    pub(crate) records_created: Count,
    /// Internal stats - merged records.
    pub(crate) records_merged: Count,
    /// Internal LRU cache `Count` of lookup hit.
    pub(crate) cache_hit: Count,
    /// Internal LRU cache `Count` of lookup miss.
    pub(crate) cache_miss: Count,
    /// Internal LRU cache `Count` of `.put`.
    pub(crate) cache_put: Count,
}

impl std::fmt::Debug for TransactionLedger {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("TransactionLedger")
            .field("cached records", &self.merge_lru_cache.len())
            .field("records_created", &self.records_created)
            .field("records_merged", &self.records_merged)
            .finish()
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLedger {
    /// Internal LRU cache size (entries).
    const MERGE_LRU_CACHE_SZ: usize = 64;

    /// Create a new `TransactionLedger`.
    pub fn new() -> TransactionLedger {
        defñ!();
        TransactionLedger {
            merge_lru_cache: MergeLRUCache::new(
                std::num::NonZeroUsize::new(TransactionLedger::MERGE_LRU_CACHE_SZ).unwrap(),
            ),
            records_created: 0,
            records_merged: 0,
            cache_hit: 0,
            cache_miss: 0,
            cache_put: 0,
        }
    }

    /// Merge `fields` and `raw_line` into the current [`MailRecord`] for
    /// `queue_id`, creating the record if the queue id has not been seen.
    ///
    /// Returns the new record value. Nothing is written; the caller must
    /// commit it (with the advanced cursor, atomically) and then call
    /// [`committed`].
    ///
    /// [`MailRecord`]: crate::data::mail::MailRecord
    /// [`committed`]: TransactionLedger#method.committed
    pub fn merge(
        &mut self,
        store: &RecordStore,
        queue_id: &str,
        fields: &FieldSet,
        raw_line: &str,
    ) -> Result<MailRecord, StoreError> {
        defn!("({:?})", queue_id);
        let prior: Option<MailRecord> = match self.merge_lru_cache.get(queue_id) {
            Some(record) => {
                self.cache_hit += 1;
                defo!("cache hit {:?}", queue_id);
                Some(record.clone())
            }
            None => {
                self.cache_miss += 1;
                defo!("cache miss {:?}", queue_id);
                store.get_transaction(queue_id)?
            }
        };
        let merged: MailRecord = match prior {
            Some(record) => {
                self.records_merged += 1;
                record.merged_with(fields, raw_line)
            }
            None => {
                self.records_created += 1;
                MailRecord::new(queue_id, fields, raw_line)
            }
        };
        defx!("({:?})", queue_id);
        Ok(merged)
    }

    /// Report that `record` was durably committed; refreshes the internal
    /// cache. Only committed records enter the cache, so an aborted run
    /// can never leave the cache ahead of the store.
    pub fn committed(
        &mut self,
        record: &MailRecord,
    ) {
        defñ!("({:?})", record.queue_id);
        self.merge_lru_cache
            .put(record.queue_id.clone(), record.clone());
        self.cache_put += 1;
    }

    /// Statistics for a [`Summary`].
    ///
    /// [`Summary`]: crate::readers::summary::Summary
    pub fn summary(&self) -> SummaryLedger {
        SummaryLedger {
            records_created: self.records_created,
            records_merged: self.records_merged,
            cache_hit: self.cache_hit,
            cache_miss: self.cache_miss,
            cache_put: self.cache_put,
        }
    }
}
