//! Shared pure helpers - no I/O, portable to the browser build.

pub mod units;
