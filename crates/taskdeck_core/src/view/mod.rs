//! Derived views over the canonical task list.

pub mod project;
