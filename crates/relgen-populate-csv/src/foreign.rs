//! Foreign key pools.
//!
//! A pool holds every value a foreign column group may reference. Cross-table
//! pools are read from the referenced table's finished CSV output;
//! self-referential pools are drawn from the table's own key index, with a
//! share of empty slots standing for tree roots.

use crate::error::PopulateError;
use crate::keys::{KeyIndex, KeyRow};
use rand::seq::{index, IndexedRandom};
use rand::Rng;
use std::path::Path;
use tracing::{debug, info};

/// Fraction of self-referential rows that have no parent.
pub const TREE_ROOT_PROPORTION: f64 = 0.3;

/// Delimiter shared by every generated file.
pub const CSV_DELIMITER: u8 = b';';

/// Ordered foreign key candidates; `None` slots are roots.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyPool {
    entries: Vec<Option<KeyRow>>,
    width: usize,
}

impl ForeignKeyPool {
    /// Load the foreign columns of a referenced table's output file.
    ///
    /// Columns are located by header name, in `fields` order. When a name
    /// occurs more than once in the header the first occurrence is used.
    pub fn load_from_file(
        path: &Path,
        foreign_table: &str,
        fields: &[String],
    ) -> Result<Self, PopulateError> {
        if !path.exists() {
            return Err(PopulateError::ForeignFileMissing {
                table: foreign_table.to_string(),
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(CSV_DELIMITER)
            .has_headers(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let positions = fields
            .iter()
            .map(|field| {
                headers
                    .iter()
                    .position(|header| header == field)
                    .ok_or_else(|| PopulateError::ForeignColumnMissing {
                        path: path.to_path_buf(),
                        column: field.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let values = positions
                .iter()
                .map(|&position| record.get(position).unwrap_or_default().to_string())
                .collect::<Vec<_>>();
            entries.push(Some(KeyRow::new(values)));
        }

        info!(
            "Loaded {} foreign keys from '{}'",
            entries.len(),
            path.display()
        );

        Ok(Self {
            entries,
            width: fields.len(),
        })
    }

    /// Build a tree pool from a table's complete key index.
    ///
    /// A uniformly random `round((1 - TREE_ROOT_PROPORTION) * n)` keys become
    /// parent candidates and the rest of the `n` slots are left empty. A row
    /// may draw its own key as parent and cycles are not prevented.
    pub fn from_key_index<R: Rng>(keys: &KeyIndex, width: usize, rng: &mut R) -> Self {
        let total = keys.len();
        let parents = ((1.0 - TREE_ROOT_PROPORTION) * total as f64).round() as usize;
        let parents = parents.min(total);

        let mut entries: Vec<Option<KeyRow>> = index::sample(rng, total, parents)
            .into_iter()
            .filter_map(|i| keys.get(i).cloned())
            .map(Some)
            .collect();
        entries.resize(total, None);

        debug!(
            "Tree pool: {} parent candidates, {} roots",
            parents,
            total - parents
        );

        Self { entries, width }
    }

    /// Number of entries, roots included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of columns each entry fills.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of empty (root) slots.
    pub fn root_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_none()).count()
    }

    /// Draw `count` entries uniformly, with replacement.
    ///
    /// Returns `None` when the pool is empty and `count > 0`.
    pub fn sample<R: Rng>(&self, rng: &mut R, count: usize) -> Option<Vec<Option<KeyRow>>> {
        if count == 0 {
            return Some(Vec::new());
        }
        (0..count)
            .map(|_| self.entries.choose(rng).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn key_index(count: usize) -> KeyIndex {
        (0..count)
            .map(|i| KeyRow::new(vec![format!("k{i}")]))
            .collect()
    }

    #[test]
    fn test_tree_pool_root_share() {
        let mut rng = StdRng::seed_from_u64(42);
        let keys = key_index(1000);

        let pool = ForeignKeyPool::from_key_index(&keys, 1, &mut rng);

        assert_eq!(pool.len(), 1000);
        assert_eq!(pool.root_count(), 300);

        let parents: HashSet<_> = pool.entries.iter().flatten().cloned().collect();
        assert_eq!(parents.len(), 700);
        assert!(parents.iter().all(|p| keys.iter().any(|k| k == p)));
    }

    #[test]
    fn test_tree_pool_rounding() {
        let mut rng = StdRng::seed_from_u64(42);

        let pool = ForeignKeyPool::from_key_index(&key_index(10), 1, &mut rng);
        assert_eq!(pool.root_count(), 3);

        // round(0.7 * 2) = 1 parent
        let pool = ForeignKeyPool::from_key_index(&key_index(2), 1, &mut rng);
        assert_eq!(pool.root_count(), 1);

        let pool = ForeignKeyPool::from_key_index(&key_index(1), 1, &mut rng);
        assert_eq!(pool.root_count(), 0);

        let pool = ForeignKeyPool::from_key_index(&KeyIndex::default(), 1, &mut rng);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_load_from_file_by_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empresas.csv");
        std::fs::write(&path, "razao;cnpj;filial\nAcme;111;1\nGlobex;222;2\n").unwrap();

        let fields = vec!["filial".to_string(), "cnpj".to_string()];
        let pool = ForeignKeyPool::load_from_file(&path, "empresas", &fields).unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.width(), 2);
        assert_eq!(pool.root_count(), 0);
        assert_eq!(pool.entries[0].as_ref().unwrap().values(), ["1", "111"]);
        assert_eq!(pool.entries[1].as_ref().unwrap().values(), ["2", "222"]);
    }

    #[test]
    fn test_load_from_file_duplicate_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hierarquias.csv");
        std::fs::write(&path, "codigo;codigo;descricao\nA;;raiz\nB;A;filho\n").unwrap();

        let fields = vec!["codigo".to_string()];
        let pool = ForeignKeyPool::load_from_file(&path, "hierarquias", &fields).unwrap();

        assert_eq!(pool.entries[0].as_ref().unwrap().values(), ["A"]);
        assert_eq!(pool.entries[1].as_ref().unwrap().values(), ["B"]);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        let result = ForeignKeyPool::load_from_file(&path, "missing", &["id".to_string()]);
        assert!(matches!(
            result,
            Err(PopulateError::ForeignFileMissing { ref table, .. }) if table == "missing"
        ));
    }

    #[test]
    fn test_load_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empresas.csv");
        std::fs::write(&path, "cnpj;razao\n111;Acme\n").unwrap();

        let result = ForeignKeyPool::load_from_file(&path, "empresas", &["id".to_string()]);
        assert!(matches!(
            result,
            Err(PopulateError::ForeignColumnMissing { ref column, .. }) if column == "id"
        ));
    }

    #[test]
    fn test_sample_with_replacement() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = ForeignKeyPool::from_key_index(&key_index(3), 1, &mut rng);

        let drawn = pool.sample(&mut rng, 50).unwrap();
        assert_eq!(drawn.len(), 50);

        let empty = ForeignKeyPool::default();
        assert!(empty.sample(&mut rng, 1).is_none());
        assert_eq!(empty.sample(&mut rng, 0), Some(Vec::new()));
    }
}
