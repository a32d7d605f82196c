//! Ranking Engine
//!
//! Popularity rankings in two stages:
//!
//! 1. group usage records by key and rank the groups by occurrence count
//!    (stable on ties, truncated to the top N);
//! 2. fetch the reference rows for the ranked keys in one batch and join
//!    them back, substituting defaults for keys whose row is gone.
//!
//! The same [`Ranker`] serves cities and activities; the output row type
//! decides which tables are read and how the JSON fields are named.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::domain::{TopActivity, TopCity};
use crate::store::{ReferenceRow, ReferenceTable, StatsStore, StoreResult, UsageTable};

/// Display name used when a ranked key has no reference row
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default number of ranked entries per list
pub const DEFAULT_TOP_N: usize = 10;

/// A grouping key with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedKey<K> {
    pub key: K,
    pub count: u64,
}

impl<K> RankedKey<K> {
    pub fn new(key: K, count: u64) -> Self {
        Self { key, count }
    }
}

/// Count occurrences per distinct key.
///
/// Groups come out in order of each key's first appearance.
pub fn count_occurrences<K, I>(keys: I) -> Vec<RankedKey<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<RankedKey<K>> = Vec::new();

    for key in keys {
        match positions.get(&key) {
            Some(&pos) => groups[pos].count += 1,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(RankedKey::new(key, 1));
            }
        }
    }

    groups
}

/// Order groups by count descending and keep the first `limit`.
///
/// The sort is stable: groups with equal counts keep their input order.
pub fn rank<K>(mut groups: Vec<RankedKey<K>>, limit: usize) -> Vec<RankedKey<K>> {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(limit);
    groups
}

/// Join ranked keys to their reference rows, preserving rank order.
///
/// Every ranked key produces exactly one output row; `build` receives
/// `None` for keys with no reference row. If the reference rows contain a
/// key more than once, the first row wins.
pub fn enrich<K, V, R>(
    ranked: &[RankedKey<K>],
    references: &[V],
    key_of: impl Fn(&V) -> &K,
    build: impl Fn(&RankedKey<K>, Option<&V>) -> R,
) -> Vec<R>
where
    K: Eq + Hash,
{
    let mut by_key: HashMap<&K, &V> = HashMap::with_capacity(references.len());
    for reference in references {
        by_key.entry(key_of(reference)).or_insert(reference);
    }

    ranked
        .iter()
        .map(|entry| build(entry, by_key.get(&entry.key).copied()))
        .collect()
}

/// Output row of a ranking.
///
/// Names the usage table to group, the reference table to enrich from, and
/// how to build the row from an optional reference and a count.
pub trait RankedRow: Sized {
    const USAGE: UsageTable;
    const REFERENCE: ReferenceTable;

    fn from_reference(reference: Option<&ReferenceRow>, count: u64) -> Self;
}

impl RankedRow for TopCity {
    const USAGE: UsageTable = UsageTable::TripStops;
    const REFERENCE: ReferenceTable = ReferenceTable::Cities;

    fn from_reference(reference: Option<&ReferenceRow>, count: u64) -> Self {
        let (city, country) = display_parts(reference);
        TopCity {
            city,
            country,
            trip_count: count,
        }
    }
}

impl RankedRow for TopActivity {
    const USAGE: UsageTable = UsageTable::TripActivities;
    const REFERENCE: ReferenceTable = ReferenceTable::Activities;

    fn from_reference(reference: Option<&ReferenceRow>, count: u64) -> Self {
        let (activity, category) = display_parts(reference);
        TopActivity {
            activity,
            category,
            usage_count: count,
        }
    }
}

fn display_parts(reference: Option<&ReferenceRow>) -> (String, String) {
    match reference {
        Some(row) => (row.name.clone(), row.detail.clone()),
        None => (UNKNOWN_NAME.to_string(), String::new()),
    }
}

/// Top-N ranking pipeline for one row type
#[derive(Debug, Clone)]
pub struct Ranker<R> {
    limit: usize,
    _row: PhantomData<fn() -> R>,
}

impl<R: RankedRow> Ranker<R> {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            _row: PhantomData,
        }
    }

    /// Group, rank, then enrich with a single batch lookup
    pub async fn run(&self, store: &dyn StatsStore) -> StoreResult<Vec<R>> {
        let groups = store.grouped_counts(R::USAGE, self.limit).await?;
        let ranked = rank(groups, self.limit);

        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ranked.iter().map(|entry| entry.key.clone()).collect();
        let references = store.lookup_references(R::REFERENCE, &ids).await?;

        let rows = enrich(
            &ranked,
            &references,
            |row: &ReferenceRow| &row.id,
            |entry, reference| {
                if reference.is_none() {
                    // Expected under concurrent deletes; not an error.
                    tracing::debug!(
                        table = R::REFERENCE.table(),
                        key = %entry.key,
                        "Ranked key has no reference row"
                    );
                }
                R::from_reference(reference, entry.count)
            },
        );

        tracing::debug!(
            usage = R::USAGE.table(),
            ranked = rows.len(),
            limit = self.limit,
            "Ranking complete"
        );

        Ok(rows)
    }
}
