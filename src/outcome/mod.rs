//! Outcome algebra
//!
//! Every evaluation yields exactly one tri-state `Outcome`:
//!
//! - Succeed, possibly carrying tags naming which success variant occurred
//! - Fail
//! - Undecided (could not decide, e.g. an unresolved reference)
//!
//! Two operators combine them:
//!
//! - aggregation (`Outcome::aggregate`, also `+` and `Sum`) folds results
//!   of independently evaluated assertions against real data
//! - product (`OutcomeSet::product`) cross-combines alternative outcomes
//!   during static analysis

mod collection;
mod result;
mod tags;

pub use collection::{DuplicatePolicy, OutcomeSet};
pub use result::{Outcome, Status};
pub use tags::{Tag, Tags};
