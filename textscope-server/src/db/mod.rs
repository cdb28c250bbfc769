//! Persistence of users and analysis records

pub mod analyses;
pub mod users;

pub use analyses::{AnalysisRecord, ListQuery, SortField, SortOrder};
