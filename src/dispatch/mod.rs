//! Dispatch module: concurrent probing of a batch
//!
//! This module contains:
//! - The bounded worker pool that fans a batch out to a classifier
//! - The run-scoped progress counter shared by the workers

mod pool;
mod progress;

pub use pool::{DispatchHandle, DispatchPlan, DispatchSettings, Dispatcher};
pub use progress::ProgressCounter;
