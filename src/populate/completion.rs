//! Per-table completion tokens.
//!
//! Each planned table gets one [`CompletionSignal`], held by its job, and
//! any number of [`CompletionToken`]s, held by the jobs that reference it.
//! The signal is consumed when the outcome is set, so an outcome is assigned
//! at most once. A signal dropped without an outcome reads as a failure.

use thiserror::Error;
use tokio::sync::watch;

/// Outcome of a table's job as seen by its dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Pending,
    Completed { rows: u64 },
    Failed(String),
}

/// Why a dependency cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("Dependency '{table}' failed: {reason}")]
    Failed { table: String, reason: String },

    #[error("Dependency '{0}' stopped without reporting an outcome")]
    Abandoned(String),
}

/// Create the signal and first token for a table.
pub fn completion_channel(table: &str) -> (CompletionSignal, CompletionToken) {
    let (tx, rx) = watch::channel(JobOutcome::Pending);
    (
        CompletionSignal { tx },
        CompletionToken {
            table: table.to_string(),
            rx,
        },
    )
}

/// Write side, owned by the job producing the table.
#[derive(Debug)]
pub struct CompletionSignal {
    tx: watch::Sender<JobOutcome>,
}

impl CompletionSignal {
    /// The table's file is complete and closed.
    pub fn complete(self, rows: u64) {
        self.tx.send_replace(JobOutcome::Completed { rows });
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.tx.send_replace(JobOutcome::Failed(reason.into()));
    }
}

/// Read side, cloned for every dependent job.
#[derive(Debug, Clone)]
pub struct CompletionToken {
    table: String,
    rx: watch::Receiver<JobOutcome>,
}

impl CompletionToken {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Current outcome, without waiting.
    pub fn outcome(&self) -> JobOutcome {
        self.rx.borrow().clone()
    }

    /// Wait until the table's job finishes; returns the rows it wrote.
    pub async fn wait(&mut self) -> Result<u64, DependencyError> {
        let outcome = match self
            .rx
            .wait_for(|outcome| *outcome != JobOutcome::Pending)
            .await
        {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => return Err(DependencyError::Abandoned(self.table.clone())),
        };

        match outcome {
            JobOutcome::Completed { rows } => Ok(rows),
            JobOutcome::Failed(reason) => Err(DependencyError::Failed {
                table: self.table.clone(),
                reason,
            }),
            JobOutcome::Pending => Err(DependencyError::Abandoned(self.table.clone())),
        }
    }
}
