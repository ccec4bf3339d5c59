//! Data models for the job lifecycle.
//!
//! Every model here is a plain value: documents are built in memory and only the
//! workflows decide where they are persisted.

pub mod classification;
pub mod document;
pub mod geometry;
pub mod template;
