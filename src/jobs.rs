//! The five batch jobs.
//!
//! Every job runs the same straight line: load the input table, apply its
//! rule, optionally build a report, write the result. A job takes its config
//! by reference and returns an outcome describing what happened; printing is
//! left to the caller.

pub mod categories;
pub mod membership;
pub mod names;
pub mod products;
pub mod split;
