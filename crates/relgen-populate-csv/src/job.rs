//! Per-table generation job.
//!
//! A job moves through its phases by consuming itself:
//!
//! ```text
//! GenerationJob --build_keys--> KeyedJob --load_foreign_keys--> StreamingJob --stream--> JobReport
//! ```
//!
//! The split lets a caller park a job after its keys are built while it waits
//! for the table it references to finish writing.

use crate::chunk::{generate_data_columns, shuffle_columns, RowChunk};
use crate::error::PopulateError;
use crate::foreign::ForeignKeyPool;
use crate::keys::{build_key_index, KeyIndex};
use crate::sink::{prepare_output, table_output_path, CsvSink, OutputMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use relgen_core::{ForeignKeySource, GeneratorSchema, TableSpec};
use relgen_generator::FieldRegistry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Rows generated and flushed per chunk unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Lifecycle phase of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Initializing,
    BuildingKeys,
    LoadingForeignKeys,
    Streaming,
    Completed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Initializing => "initializing",
            JobPhase::BuildingKeys => "building keys",
            JobPhase::LoadingForeignKeys => "loading foreign keys",
            JobPhase::Streaming => "streaming",
            JobPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Job settings shared by every table of a run.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Rows per generated chunk
    pub chunk_size: usize,
    /// Directory holding `<table>.csv` files
    pub output_dir: PathBuf,
    /// Handling of an existing output file
    pub output_mode: OutputMode,
    /// Run seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: PathBuf::from("."),
            output_mode: OutputMode::default(),
            seed: None,
        }
    }
}

/// Report of a finished job.
#[derive(Debug, Clone, Default)]
pub struct JobReport {
    /// Table name.
    pub table: String,
    /// Rows asked for.
    pub requested_rows: u64,
    /// Rows written.
    pub rows_written: u64,
    /// Chunks flushed.
    pub chunks_written: u64,
    /// Fewer unique keys than requested could be generated.
    pub key_exhausted: bool,
    /// Candidate key batches drawn.
    pub key_attempts: usize,
    /// Time spent building the key index.
    pub key_duration: Duration,
    /// Time spent loading or deriving foreign keys.
    pub foreign_key_duration: Duration,
    /// Time spent generating and writing chunks.
    pub stream_duration: Duration,
    /// Total time taken, excluding time parked between phases.
    pub total_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl JobReport {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Derive a table's RNG seed from the run seed.
///
/// Seeds depend only on the run seed and the table name, so output does not
/// change with scheduling order.
pub fn table_seed(seed: u64, table: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in table.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    (seed ^ hash).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

fn table_rng(seed: Option<u64>, table: &str) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(table_seed(seed, table)),
        None => StdRng::from_os_rng(),
    }
}

/// State carried through every phase.
struct JobContext {
    spec: TableSpec,
    registry: FieldRegistry,
    rng: StdRng,
    options: JobOptions,
    output_path: PathBuf,
    limit: u64,
    remaining: u64,
    phase: JobPhase,
    report: JobReport,
}

impl JobContext {
    fn enter(&mut self, phase: JobPhase) {
        debug!("Table '{}': {} -> {}", self.spec.name, self.phase, phase);
        self.phase = phase;
    }
}

/// A job that has been validated but has not produced anything yet.
pub struct GenerationJob {
    ctx: JobContext,
}

impl GenerationJob {
    /// Validate a table against the schema and prepare its job.
    ///
    /// All configuration errors surface here, before any file is touched.
    pub fn new(
        schema: &GeneratorSchema,
        table: &str,
        limit: u64,
        options: JobOptions,
    ) -> Result<Self, PopulateError> {
        if options.chunk_size == 0 {
            return Err(PopulateError::InvalidChunkSize);
        }

        let spec = TableSpec::resolve(schema, table)?;
        if spec.column_names().is_empty() {
            return Err(PopulateError::NoColumns(spec.name));
        }

        let registry = FieldRegistry::for_table(schema, &spec)?;
        let rng = table_rng(options.seed, &spec.name);
        let output_path = table_output_path(&options.output_dir, &spec.name);

        let report = JobReport {
            table: spec.name.clone(),
            requested_rows: limit,
            ..Default::default()
        };

        Ok(Self {
            ctx: JobContext {
                spec,
                registry,
                rng,
                options,
                output_path,
                limit,
                remaining: limit,
                phase: JobPhase::Initializing,
                report,
            },
        })
    }

    pub fn spec(&self) -> &TableSpec {
        &self.ctx.spec
    }

    pub fn output_path(&self) -> &Path {
        &self.ctx.output_path
    }

    pub fn phase(&self) -> JobPhase {
        self.ctx.phase
    }

    /// Run every phase back to back.
    ///
    /// A cross-table job run this way needs its referenced table's output
    /// to be complete already.
    pub fn run(self) -> Result<JobReport, PopulateError> {
        self.build_keys()?.load_foreign_keys()?.stream()
    }

    /// Build the full key index.
    ///
    /// In replace mode a stale output file is removed first. If the key
    /// domain is too small, the job's row count is reduced to the number of
    /// unique keys produced.
    pub fn build_keys(self) -> Result<KeyedJob, PopulateError> {
        let mut ctx = self.ctx;

        info!(
            "Generating {} rows for table '{}' into '{}'",
            ctx.limit,
            ctx.spec.name,
            ctx.output_path.display()
        );

        prepare_output(&ctx.output_path, ctx.options.output_mode)?;

        if ctx.spec.index_fields.is_empty() {
            return Ok(KeyedJob {
                ctx,
                keys: KeyIndex::default(),
            });
        }

        ctx.enter(JobPhase::BuildingKeys);
        let started = Instant::now();
        let build = build_key_index(
            &ctx.spec.index_fields,
            &mut ctx.registry,
            &mut ctx.rng,
            ctx.limit as usize,
        )?;

        ctx.report.key_duration = started.elapsed();
        ctx.report.key_attempts = build.attempts;

        if build.exhausted {
            let achieved = build.index.len() as u64;
            warn!(
                "Table '{}': only {} of {} unique keys after {} attempts, reducing row count",
                ctx.spec.name, achieved, ctx.limit, build.attempts
            );
            ctx.limit = achieved;
            ctx.remaining = achieved;
            ctx.report.key_exhausted = true;
        } else {
            debug!(
                "Table '{}': {} keys in {:?}",
                ctx.spec.name,
                build.index.len(),
                ctx.report.key_duration
            );
        }

        Ok(KeyedJob {
            ctx,
            keys: build.index,
        })
    }
}

/// A job whose key index is complete.
pub struct KeyedJob {
    ctx: JobContext,
    keys: KeyIndex,
}

impl KeyedJob {
    pub fn spec(&self) -> &TableSpec {
        &self.ctx.spec
    }

    /// Table this job must wait for before loading foreign keys.
    pub fn dependency(&self) -> Option<&str> {
        self.ctx.spec.dependency()
    }

    /// Rows this job will write, after any key exhaustion.
    pub fn limit(&self) -> u64 {
        self.ctx.limit
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn key_exhausted(&self) -> bool {
        self.ctx.report.key_exhausted
    }

    pub fn phase(&self) -> JobPhase {
        self.ctx.phase
    }

    /// Acquire the foreign key pool.
    ///
    /// Cross-table pools are read from the referenced table's file in the
    /// output directory, which must be complete and closed by now.
    pub fn load_foreign_keys(self) -> Result<StreamingJob, PopulateError> {
        let KeyedJob { mut ctx, keys } = self;

        let foreign = ctx.spec.foreign.clone();
        let pool = match &foreign {
            ForeignKeySource::None => None,
            ForeignKeySource::Table { table, fields } => {
                ctx.enter(JobPhase::LoadingForeignKeys);
                let started = Instant::now();
                let path = table_output_path(&ctx.options.output_dir, table);
                let pool = ForeignKeyPool::load_from_file(&path, table, fields)?;
                ctx.report.foreign_key_duration = started.elapsed();

                if pool.is_empty() && ctx.remaining > 0 {
                    return Err(PopulateError::EmptyForeignPool {
                        table: ctx.spec.name.clone(),
                        foreign_table: table.clone(),
                    });
                }
                Some(pool)
            }
            ForeignKeySource::SelfReference { fields } => {
                ctx.enter(JobPhase::LoadingForeignKeys);
                let started = Instant::now();
                let pool = ForeignKeyPool::from_key_index(&keys, fields.len(), &mut ctx.rng);
                ctx.report.foreign_key_duration = started.elapsed();
                Some(pool)
            }
        };

        Ok(StreamingJob { ctx, keys, pool })
    }
}

/// A job ready to generate and write its rows.
pub struct StreamingJob {
    ctx: JobContext,
    keys: KeyIndex,
    pool: Option<ForeignKeyPool>,
}

impl StreamingJob {
    pub fn spec(&self) -> &TableSpec {
        &self.ctx.spec
    }

    pub fn phase(&self) -> JobPhase {
        self.ctx.phase
    }

    /// Generate, assemble and flush chunks until the row count is met.
    pub fn stream(self) -> Result<JobReport, PopulateError> {
        let StreamingJob {
            mut ctx,
            mut keys,
            pool,
        } = self;

        ctx.enter(JobPhase::Streaming);
        let started = Instant::now();

        let header = ctx
            .spec
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut sink = CsvSink::new(&ctx.output_path, header);
        let foreign_width = ctx.spec.foreign_fields().len();

        while ctx.remaining > 0 {
            let rows = ctx.remaining.min(ctx.options.chunk_size as u64) as usize;

            let mut data = generate_data_columns(
                &ctx.spec.data_fields,
                &mut ctx.registry,
                &mut ctx.rng,
                rows,
            )?;
            shuffle_columns(&mut data, &mut ctx.rng);

            let parents = match &pool {
                Some(pool) => pool.sample(&mut ctx.rng, rows).ok_or_else(|| {
                    PopulateError::EmptyForeignPool {
                        table: ctx.spec.name.clone(),
                        foreign_table: ctx
                            .spec
                            .dependency()
                            .unwrap_or(ctx.spec.name.as_str())
                            .to_string(),
                    }
                })?,
                None => Vec::new(),
            };

            let chunk = RowChunk::assemble(keys.front(rows), parents, foreign_width, data, rows);
            sink.write_chunk(&chunk)?;

            keys.consume(rows);
            ctx.remaining -= rows as u64;

            debug!(
                "Table '{}': written {} rows, {} remaining",
                ctx.spec.name,
                sink.rows_written(),
                ctx.remaining
            );
        }

        ctx.report.rows_written = sink.rows_written();
        ctx.report.chunks_written = sink.chunks_written();
        ctx.report.file_size_bytes = sink.finish()?;
        ctx.report.stream_duration = started.elapsed();
        ctx.report.total_duration = ctx.report.key_duration
            + ctx.report.foreign_key_duration
            + ctx.report.stream_duration;

        ctx.enter(JobPhase::Completed);
        info!(
            "Table '{}' complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
            ctx.report.table,
            ctx.report.rows_written,
            ctx.report.file_size_bytes,
            ctx.report.total_duration,
            ctx.report.rows_per_second()
        );

        Ok(ctx.report)
    }
}
