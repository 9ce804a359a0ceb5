//! Matching downloaded releases to series folders, resolving upgrades and
//! duplicates, and the library checks built on top.
//!
//! The entry point is [`check::run`], driven by a [`Context`] built once from
//! the configuration and a [`RunContext`] holding the state of one run.

pub mod check;
mod context;
pub mod error;
pub mod matcher;
pub mod notify;
pub mod organize;
pub mod report;
mod scan;
mod template;
#[cfg(test)]
mod test_support;
pub mod upgrade;

pub use crate::context::{Context, RunContext};
pub use crate::template::PathGenerator;
