//! Derived, display-ready views over a loaded [`Dataset`](crate::dataset::Dataset).
//!
//! Every function here is pure: it borrows the dataset, never mutates it,
//! and answers a missing airport or month with an empty result rather than
//! an error. [`dashboard::DashboardView`] bundles all views for one selection.

pub mod dashboard;
pub mod geo;
pub mod insights;
pub mod monthly;
pub mod ranking;
pub mod region;
pub mod trends;
pub mod types;
pub mod utility;
