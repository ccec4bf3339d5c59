//! # qcflow Core Library
//!
//! Lifecycle automation for batch quantum-chemistry jobs: input documents are synthesized
//! from raw molecular geometries, dispatched to an external computation engine, and the
//! resulting output documents are classified by termination status so that failed or
//! unstable jobs can be resubmitted.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MoleculeGeometry`,
//!   `HeaderTemplate`, `InputDocument`, `Classification`) and the text-format readers for
//!   geometry files and engine output.
//!
//! - **[`engine`]: The Run State.** The immutable `JobGroupContext` that owns every path
//!   convention, batch and classifier configuration, the error taxonomy, filesystem
//!   primitives (idempotent directory creation, exclusive moves), progress reporting,
//!   cancellation and the structured `BatchReport`.
//!
//! - **[`workflows`]: The Public API.** The three operations of the pipeline: input
//!   synthesis, output classification and retry-input generation.
//!
//! The filesystem layout is the only persisted state: the directory a document lives in
//! *is* its job status.

pub mod core;
pub mod engine;
pub mod workflows;
