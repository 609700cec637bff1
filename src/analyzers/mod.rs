//! Derived views over the loaded dataset.
//!
//! Two independent pipelines run over the same [`Dataset`](crate::dataset::Dataset):
//! governorate-level road quality means, and transport availability per road
//! condition bucket with a display threshold applied on top.

pub mod governorate;
pub mod threshold;
pub mod transport;
pub mod types;
pub mod utility;
