//! # Engine Module
//!
//! Run-scoped state and primitives shared by the workflows.
//!
//! - [`context`] - The immutable [`context::JobGroupContext`] owning every path convention.
//! - [`config`] - Batch policy (strict or lenient), worker pool size and classifier options.
//! - [`error`] - The [`error::EngineError`] taxonomy reported to callers.
//! - [`fs`] - Idempotent directory creation and exclusive, non-overwriting moves.
//! - [`report`] - The structured [`report::BatchReport`] every workflow returns.
//! - [`ledger`] - Optional append-only CSV record of classification decisions.
//! - [`progress`] and [`cancel`] - Progress callbacks and cooperative cancellation.
//!
//! Directory membership is the job state: a document belongs to exactly one directory
//! at a time, and moving it is the only state transition.

pub mod cancel;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod progress;
pub mod report;
