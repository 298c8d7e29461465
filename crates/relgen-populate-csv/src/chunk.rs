//! Chunked data generation and row assembly.

use crate::error::PopulateError;
use crate::keys::KeyRow;
use rand::seq::SliceRandom;
use rand::Rng;
use relgen_generator::FieldRegistry;

/// Generate `rows` values for each data field, column-major.
pub fn generate_data_columns<R: Rng>(
    fields: &[String],
    registry: &mut FieldRegistry,
    rng: &mut R,
    rows: usize,
) -> Result<Vec<Vec<String>>, PopulateError> {
    let columns = fields
        .iter()
        .map(|field| registry.render_column(field, rng, rows))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Permute every column of a chunk independently.
///
/// Values stay in their column; rows are not kept together.
pub fn shuffle_columns<R: Rng>(columns: &mut [Vec<String>], rng: &mut R) {
    for column in columns.iter_mut() {
        column.shuffle(rng);
    }
}

/// One batch of output rows: key rows, sampled foreign keys and data columns.
#[derive(Debug, Clone, Default)]
pub struct RowChunk {
    keys: Vec<KeyRow>,
    parents: Vec<Option<KeyRow>>,
    foreign_width: usize,
    data: Vec<Vec<String>>,
    len: usize,
}

impl RowChunk {
    /// Assemble a chunk of `len` rows.
    ///
    /// `keys` and `parents` are empty when the table has no index or no
    /// foreign fields; an empty parent slot fills `foreign_width` empty values.
    pub fn assemble(
        keys: Vec<KeyRow>,
        parents: Vec<Option<KeyRow>>,
        foreign_width: usize,
        data: Vec<Vec<String>>,
        len: usize,
    ) -> Self {
        debug_assert!(keys.is_empty() || keys.len() == len);
        debug_assert!(parents.is_empty() || parents.len() == len);
        debug_assert!(data.iter().all(|column| column.len() == len));

        Self {
            keys,
            parents,
            foreign_width,
            data,
            len,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fields of row `row`: index values, foreign values, data values.
    pub fn record(&self, row: usize) -> Vec<&str> {
        let mut record = Vec::new();

        if let Some(key) = self.keys.get(row) {
            record.extend(key.values().iter().map(String::as_str));
        }

        match self.parents.get(row) {
            Some(Some(parent)) => record.extend(parent.values().iter().map(String::as_str)),
            Some(None) => record.extend(std::iter::repeat_n("", self.foreign_width)),
            None => {}
        }

        record.extend(self.data.iter().map(|column| column[row].as_str()));
        record
    }

    /// All rows, in order.
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> {
        (0..self.len).map(|row| self.record(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use relgen_core::GeneratorSchema;

    #[test]
    fn test_generate_data_columns() {
        let schema = GeneratorSchema::from_yaml(
            r#"
fields:
  - name: nome
    generator:
      type: pattern
      pattern: "nome_{index}"
  - name: ativo
    generator:
      type: static
      value: true
tables: []
"#,
        )
        .unwrap();
        let mut registry = FieldRegistry::from_schema(&schema, ["nome", "ativo"]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let fields = vec!["nome".to_string(), "ativo".to_string()];

        let columns = generate_data_columns(&fields, &mut registry, &mut rng, 3).unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], vec!["nome_0", "nome_1", "nome_2"]);
        assert_eq!(columns[1], vec!["true", "true", "true"]);
    }

    #[test]
    fn test_shuffle_columns_keeps_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let mut columns = vec![values.clone(), values.clone()];

        shuffle_columns(&mut columns, &mut rng);

        for column in &columns {
            let mut sorted = column.clone();
            sorted.sort();
            let mut expected = values.clone();
            expected.sort();
            assert_eq!(sorted, expected);
        }
        // Columns are permuted independently
        assert_ne!(columns[0], columns[1]);
    }

    #[test]
    fn test_record_layout() {
        let keys = vec![KeyRow::new(vec!["1".into()]), KeyRow::new(vec!["2".into()])];
        let parents = vec![Some(KeyRow::new(vec!["2".into()])), None];
        let data = vec![vec!["a".to_string(), "b".to_string()]];

        let chunk = RowChunk::assemble(keys, parents, 1, data, 2);

        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.record(0), vec!["1", "2", "a"]);
        assert_eq!(chunk.record(1), vec!["2", "", "b"]);
    }

    #[test]
    fn test_record_without_keys() {
        let data = vec![vec!["x".to_string()], vec!["y".to_string()]];
        let chunk = RowChunk::assemble(Vec::new(), Vec::new(), 0, data, 1);

        let records: Vec<_> = chunk.records().collect();
        assert_eq!(records, vec![vec!["x", "y"]]);
    }
}
