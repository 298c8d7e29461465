//! Populate integration tests.
//!
//! Each test generates tables from a schema into a scratch directory and
//! checks the CSV files left on disk:
//! 1. Row counts and headers
//! 2. Primary key uniqueness and foreign key validity
//! 3. Ordering between dependent tables and failure isolation

mod failures;
mod full_plan;
mod helpers;
