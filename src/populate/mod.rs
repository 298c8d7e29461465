//! Population orchestrator.
//!
//! Turns a schema and command-line arguments into a [`PopulatePlan`], then
//! runs one generation job per planned table. Jobs run concurrently on the
//! blocking pool; a job referencing another planned table waits on that
//! table's [`CompletionToken`] before reading its output.

pub mod completion;
pub mod plan;
pub mod run;

pub use completion::{
    completion_channel, CompletionSignal, CompletionToken, DependencyError, JobOutcome,
};
pub use plan::{PlanError, PlannedTable, PopulatePlan, DEFAULT_ROW_COUNT};
pub use run::{execute_plan, run_populate, RunSettings};
