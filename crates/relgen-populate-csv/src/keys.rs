//! Primary key index construction.
//!
//! The full key index of a table is built up front, before any data row is
//! generated. Candidate batches are drawn until the table has `limit` distinct
//! key rows or the retry budget runs out.

use crate::error::PopulateError;
use rand::Rng;
use relgen_generator::FieldRegistry;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Number of candidate batches drawn before giving up on uniqueness.
pub const MAX_INDEX_RETRIES: usize = 10;

/// One rendered primary key tuple.
///
/// Clones share storage, so the self-referential pool can hold the same rows
/// as the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRow(Arc<[String]>);

impl KeyRow {
    pub fn new(values: Vec<String>) -> Self {
        Self(values.into())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for KeyRow {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

/// Unconsumed key rows of a table, in generation order.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    rows: VecDeque<KeyRow>,
}

impl KeyIndex {
    /// Number of unconsumed key rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyRow> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyRow> {
        self.rows.iter()
    }

    /// The next `count` unconsumed rows, without removing them.
    pub fn front(&self, count: usize) -> Vec<KeyRow> {
        self.rows.iter().take(count).cloned().collect()
    }

    /// Remove the next `count` rows once they have been written.
    pub fn consume(&mut self, count: usize) {
        let count = count.min(self.rows.len());
        self.rows.drain(..count);
    }
}

impl FromIterator<KeyRow> for KeyIndex {
    fn from_iter<I: IntoIterator<Item = KeyRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Result of building a key index.
#[derive(Debug, Clone, Default)]
pub struct KeyBuild {
    /// Distinct key rows, first occurrence order
    pub index: KeyIndex,
    /// Candidate batches drawn
    pub attempts: usize,
    /// Fewer than `limit` distinct rows could be produced
    pub exhausted: bool,
}

/// Build a deduplicated index of up to `limit` key rows.
///
/// Each attempt draws one candidate per missing row, so the batch shrinks as
/// the index fills. Duplicates are dropped on exact tuple equality of the
/// rendered values; the first occurrence wins. An empty `fields` list yields
/// an empty index without drawing anything.
pub fn build_key_index<R: Rng>(
    fields: &[String],
    registry: &mut FieldRegistry,
    rng: &mut R,
    limit: usize,
) -> Result<KeyBuild, PopulateError> {
    if fields.is_empty() {
        return Ok(KeyBuild::default());
    }

    let mut seen: HashSet<KeyRow> = HashSet::with_capacity(limit);
    let mut rows: VecDeque<KeyRow> = VecDeque::with_capacity(limit);
    let mut attempts = 0;

    while rows.len() < limit && attempts < MAX_INDEX_RETRIES {
        let needed = limit - rows.len();
        attempts += 1;

        let mut columns = fields
            .iter()
            .map(|field| registry.render_column(field, rng, needed).map(Vec::into_iter))
            .collect::<Result<Vec<_>, _>>()?;

        for _ in 0..needed {
            let values: Vec<String> = columns
                .iter_mut()
                .map(|column| column.next().unwrap_or_default())
                .collect();
            let row = KeyRow::new(values);
            if seen.insert(row.clone()) {
                rows.push_back(row);
            }
        }

        debug!(
            "Key attempt {}: {} of {} unique keys",
            attempts,
            rows.len(),
            limit
        );
    }

    Ok(KeyBuild {
        exhausted: rows.len() < limit,
        index: KeyIndex { rows },
        attempts,
    })
}
