//! Population plan: which tables to generate, how many rows, in what order.

use relgen_core::{GeneratorSchema, SchemaError, TableSpec};
use relgen_populate_csv::{table_output_path, PopulateArgs, DEFAULT_CHUNK_SIZE};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Rows per table when neither the schema plan nor the CLI gives a count.
pub const DEFAULT_ROW_COUNT: u64 = 1000;

/// Errors found while building a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Schema-related error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A table is planned twice.
    #[error("Table '{0}' appears more than once in the plan")]
    DuplicateTable(String),

    /// Chunk size of zero.
    #[error("Chunk size for table '{0}' must be greater than zero")]
    InvalidChunkSize(String),

    /// A dependency is neither planned nor already generated.
    #[error(
        "Table '{table}' references '{dependency}', which is not planned and has no output at {}",
        path.display()
    )]
    MissingDependencyOutput {
        table: String,
        dependency: String,
        path: PathBuf,
    },

    /// Planned tables reference each other in a loop.
    #[error("Dependency cycle: {0}")]
    DependencyCycle(String),

    /// Nothing to generate.
    #[error("No tables to populate")]
    Empty,
}

/// One table of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTable {
    /// Table name
    pub table: String,
    /// Rows to generate
    pub rows: u64,
    /// Rows per chunk
    pub chunk_size: usize,
    /// Planned table whose completion this one waits for
    pub dependency: Option<String>,
}

/// Validated list of tables to generate, in plan order.
#[derive(Debug, Clone, Default)]
pub struct PopulatePlan {
    tables: Vec<PlannedTable>,
}

impl PopulatePlan {
    /// Build a plan from the schema and command-line arguments.
    ///
    /// Row counts come from `--rows TABLE=N`, then the schema plan entry,
    /// then `--row-count`, then [`DEFAULT_ROW_COUNT`]. Without a schema plan
    /// every schema table is planned. `--tables` restricts the result.
    pub fn build(schema: &GeneratorSchema, args: &PopulateArgs) -> Result<Self, PlanError> {
        // (table, rows from schema plan, chunk size from schema plan)
        let mut entries: Vec<(String, Option<u64>, Option<usize>)> = Vec::new();
        let mut seen = HashSet::new();

        if schema.plan.is_empty() {
            for table in schema.table_names() {
                entries.push((table.to_string(), None, None));
            }
        } else {
            for entry in &schema.plan {
                if !seen.insert(entry.table.clone()) {
                    return Err(PlanError::DuplicateTable(entry.table.clone()));
                }
                entries.push((entry.table.clone(), Some(entry.rows), entry.chunk_size));
            }
        }
        seen.extend(entries.iter().map(|(table, _, _)| table.clone()));

        let overrides: HashMap<&str, u64> = args
            .rows
            .iter()
            .map(|o| (o.table.as_str(), o.rows))
            .collect();

        for requested in args.rows.iter().map(|o| &o.table).chain(&args.tables) {
            if seen.insert(requested.clone()) {
                entries.push((requested.clone(), None, None));
            }
        }

        if !args.tables.is_empty() {
            let selected: HashSet<&str> = args.tables.iter().map(String::as_str).collect();
            entries.retain(|(table, _, _)| selected.contains(table.as_str()));
        }

        if entries.is_empty() {
            return Err(PlanError::Empty);
        }

        let planned: HashSet<&str> = entries.iter().map(|(t, _, _)| t.as_str()).collect();
        let mut tables = Vec::with_capacity(entries.len());

        for (table, plan_rows, plan_chunk_size) in &entries {
            let spec = TableSpec::resolve(schema, table)?;

            let rows = overrides
                .get(table.as_str())
                .copied()
                .or(*plan_rows)
                .or(args.row_count)
                .unwrap_or(DEFAULT_ROW_COUNT);

            let chunk_size = args
                .chunk_size
                .or(*plan_chunk_size)
                .unwrap_or(DEFAULT_CHUNK_SIZE);
            if chunk_size == 0 {
                return Err(PlanError::InvalidChunkSize(table.clone()));
            }

            let dependency = match spec.dependency() {
                Some(dependency) if planned.contains(dependency) => Some(dependency.to_string()),
                Some(dependency) => {
                    let path = table_output_path(&args.output_dir, dependency);
                    if !path.exists() {
                        return Err(PlanError::MissingDependencyOutput {
                            table: table.clone(),
                            dependency: dependency.to_string(),
                            path,
                        });
                    }
                    None
                }
                None => None,
            };

            tables.push(PlannedTable {
                table: table.clone(),
                rows,
                chunk_size,
                dependency,
            });
        }

        let plan = Self { tables };
        plan.check_cycles()?;
        Ok(plan)
    }

    pub fn tables(&self) -> &[PlannedTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, table: &str) -> Option<&PlannedTable> {
        self.tables.iter().find(|t| t.table == table)
    }

    /// Tables grouped by dependency depth.
    ///
    /// Stage 0 holds tables that wait on nothing; stage `n` tables wait on a
    /// table of stage `n - 1`.
    pub fn stages(&self) -> Vec<Vec<&str>> {
        let mut stages: Vec<Vec<&str>> = Vec::new();
        for table in &self.tables {
            let depth = self.depth(&table.table);
            if stages.len() <= depth {
                stages.resize_with(depth + 1, Vec::new);
            }
            stages[depth].push(&table.table);
        }
        stages
    }

    fn depth(&self, table: &str) -> usize {
        let mut depth = 0;
        let mut current = self.get(table).and_then(|t| t.dependency.as_deref());
        while let Some(dependency) = current {
            depth += 1;
            if depth > self.tables.len() {
                break;
            }
            current = self.get(dependency).and_then(|t| t.dependency.as_deref());
        }
        depth
    }

    fn check_cycles(&self) -> Result<(), PlanError> {
        for table in &self.tables {
            let mut chain = vec![table.table.as_str()];
            let mut current = table.dependency.as_deref();

            while let Some(dependency) = current {
                if chain.contains(&dependency) {
                    chain.push(dependency);
                    return Err(PlanError::DependencyCycle(chain.join(" -> ")));
                }
                chain.push(dependency);
                current = self.get(dependency).and_then(|t| t.dependency.as_deref());
            }
        }
        Ok(())
    }
}
