//! # Core Module
//!
//! Stateless building blocks shared by every workflow.
//!
//! - **Models** ([`models`]) - Coordinate records, molecule geometries, header templates,
//!   input documents and classification outcomes.
//! - **File I/O** ([`io`]) - Readers for the two supported geometry formats and the
//!   termination scanner for engine output documents.

pub mod io;
pub mod models;
