//! Populate command runner.

use anyhow::Context;
use relgen_core::GeneratorSchema;
use relgen_populate_csv::{GenerationJob, JobOptions, JobReport, OutputMode, PopulateArgs};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

use super::completion::{completion_channel, CompletionSignal, CompletionToken};
use super::plan::{PlannedTable, PopulatePlan};

/// Settings shared by every job of a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Directory holding `<table>.csv` files
    pub output_dir: PathBuf,
    /// Handling of existing output files
    pub output_mode: OutputMode,
    /// Run seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Jobs doing blocking work at once; 0 = unbounded
    pub max_parallel: usize,
}

/// Run the populate command: load the schema, build the plan, run every job.
pub async fn run_populate(args: PopulateArgs) -> anyhow::Result<Vec<JobReport>> {
    let schema = GeneratorSchema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    let plan = PopulatePlan::build(&schema, &args).context("Invalid populate plan")?;
    let settings = RunSettings {
        output_dir: args.output_dir.clone(),
        output_mode: args.output_mode(),
        seed: args.seed.or(schema.seed),
        max_parallel: args.max_parallel,
    };

    for (depth, stage) in plan.stages().iter().enumerate() {
        tracing::info!("Stage {}: {}", depth, stage.join(", "));
    }

    if args.dry_run {
        // Constructing the jobs validates every table without touching files
        let jobs = create_jobs(&schema, &plan, &settings)?;
        for (planned, _) in &jobs {
            tracing::info!(
                "[DRY-RUN] Would generate {} rows for '{}' (chunk size {})",
                planned.rows,
                planned.table,
                planned.chunk_size
            );
        }
        tracing::info!("[DRY-RUN] Output directory: {}", settings.output_dir.display());
        tracing::info!("[DRY-RUN] Schema and plan validated successfully");
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    tracing::info!(
        "Populating {} table(s) into '{}' (seed={:?})",
        plan.len(),
        settings.output_dir.display(),
        settings.seed
    );

    execute_plan(&schema, &plan, &settings).await
}

/// Run every job of a plan and collect their reports, in plan order.
///
/// All jobs are constructed before any of them starts, so a configuration
/// error in one table leaves no partial output anywhere. Once running, a
/// failing job does not stop its siblings; its dependents fail without
/// loading anything.
pub async fn execute_plan(
    schema: &GeneratorSchema,
    plan: &PopulatePlan,
    settings: &RunSettings,
) -> anyhow::Result<Vec<JobReport>> {
    let start_time = Instant::now();
    let jobs = create_jobs(schema, plan, settings)?;

    let mut signals: HashMap<String, CompletionSignal> = HashMap::new();
    let mut tokens: HashMap<String, CompletionToken> = HashMap::new();
    for planned in plan.tables() {
        let (signal, token) = completion_channel(&planned.table);
        signals.insert(planned.table.clone(), signal);
        tokens.insert(planned.table.clone(), token);
    }

    let limiter = (settings.max_parallel > 0)
        .then(|| Arc::new(Semaphore::new(settings.max_parallel)));

    let mut tasks = JoinSet::new();
    for (planned, job) in jobs {
        let signal = signals
            .remove(&planned.table)
            .with_context(|| format!("No completion signal for table '{}'", planned.table))?;
        let dependency = planned
            .dependency
            .as_ref()
            .and_then(|dependency| tokens.get(dependency).cloned());

        tasks.spawn(run_table(job, signal, dependency, limiter.clone()));
    }
    drop(tokens);

    let mut reports = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(report)) => {
                tracing::info!(
                    "Populated {}: {} rows in {:?}",
                    report.table,
                    report.rows_written,
                    report.total_duration
                );
                reports.push(report);
            }
            Ok(Err(e)) => {
                let error_msg = format!("{e:#}");
                tracing::error!("{}", error_msg);
                errors.push(error_msg);
            }
            Err(e) => {
                let error_msg = format!("Populate task panicked: {e}");
                tracing::error!("{}", error_msg);
                errors.push(error_msg);
            }
        }
    }

    let total_rows: u64 = reports.iter().map(|r| r.rows_written).sum();
    tracing::info!(
        "Populate finished: {} table(s), {} rows in {:?}",
        reports.len(),
        total_rows,
        start_time.elapsed()
    );

    for report in reports.iter().filter(|r| r.key_exhausted) {
        tracing::warn!(
            "Table '{}' has {} of {} requested rows (key space exhausted)",
            report.table,
            report.rows_written,
            report.requested_rows
        );
    }

    if !errors.is_empty() {
        anyhow::bail!(
            "Populate failed with {} error(s):\n  {}",
            errors.len(),
            errors.join("\n  ")
        );
    }

    let order: HashMap<&str, usize> = plan
        .tables()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.table.as_str(), i))
        .collect();
    reports.sort_by_key(|r| order.get(r.table.as_str()).copied().unwrap_or(usize::MAX));

    Ok(reports)
}

fn create_jobs<'a>(
    schema: &GeneratorSchema,
    plan: &'a PopulatePlan,
    settings: &RunSettings,
) -> anyhow::Result<Vec<(&'a PlannedTable, GenerationJob)>> {
    let mut jobs = Vec::with_capacity(plan.len());
    let mut errors = Vec::new();

    for planned in plan.tables() {
        let options = JobOptions {
            chunk_size: planned.chunk_size,
            output_dir: settings.output_dir.clone(),
            output_mode: settings.output_mode,
            seed: settings.seed,
        };

        match GenerationJob::new(schema, &planned.table, planned.rows, options) {
            Ok(job) => jobs.push((planned, job)),
            Err(e) => {
                let error_msg = format!("Invalid table '{}': {e}", planned.table);
                tracing::error!("{}", error_msg);
                errors.push(error_msg);
            }
        }
    }

    if !errors.is_empty() {
        anyhow::bail!(
            "Populate aborted with {} configuration error(s):\n  {}",
            errors.len(),
            errors.join("\n  ")
        );
    }

    Ok(jobs)
}

async fn run_table(
    job: GenerationJob,
    signal: CompletionSignal,
    dependency: Option<CompletionToken>,
    limiter: Option<Arc<Semaphore>>,
) -> anyhow::Result<JobReport> {
    let table = job.spec().name.clone();

    let result = run_phases(job, dependency, limiter).await;
    match &result {
        Ok(report) => signal.complete(report.rows_written),
        Err(e) => signal.fail(format!("{e:#}")),
    }

    result.with_context(|| format!("Failed to populate table '{table}'"))
}

async fn run_phases(
    job: GenerationJob,
    dependency: Option<CompletionToken>,
    limiter: Option<Arc<Semaphore>>,
) -> anyhow::Result<JobReport> {
    let permit = acquire(&limiter).await?;
    let keyed = tokio::task::spawn_blocking(move || job.build_keys()).await??;
    drop(permit);

    if let Some(mut token) = dependency {
        tracing::info!(
            "Table '{}' waiting for '{}'",
            keyed.spec().name,
            token.table()
        );
        token.wait().await?;
    }

    let permit = acquire(&limiter).await?;
    let report =
        tokio::task::spawn_blocking(move || keyed.load_foreign_keys()?.stream()).await??;
    drop(permit);

    Ok(report)
}

async fn acquire(
    limiter: &Option<Arc<Semaphore>>,
) -> anyhow::Result<Option<OwnedSemaphorePermit>> {
    match limiter {
        Some(semaphore) => {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("Job limiter closed")?;
            Ok(Some(permit))
        }
        None => Ok(None),
    }
}
