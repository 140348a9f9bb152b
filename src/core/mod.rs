//! Core domain types and the derived-state computations over them

pub mod analytics;
pub mod budget;
pub mod config;
pub mod log;
pub mod lookup;
pub mod models;
pub mod sequence;
pub mod store;
pub mod summary;

// Re-export main types for cleaner imports
pub use store::FinanceStore;
pub use summary::{DashboardSummary, Slice, SummaryUpdate};
