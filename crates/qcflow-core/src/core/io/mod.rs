//! Input/output for the text formats of the job lifecycle.
//!
//! Geometry files are read through the line-oriented [`traits::GeometryFile`] interface,
//! with one implementation per supported format and [`format::GeometryFormat`] choosing
//! between them by file extension. Engine output documents are only ever scanned for
//! their termination signal ([`gaussian`]).

pub mod error;
pub mod format;
pub mod gaussian;
pub mod mol;
pub mod traits;
pub mod xyz;
