//! Game implementations.

pub mod morris;
