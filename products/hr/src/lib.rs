//! HR vertical slice: employee records, activity tracking, workforce
//! analytics, chart series, CSV export and sample data.
//!
//! Every database-facing function takes the shared pool and returns
//! [`HrResult`]; HTTP adapters convert [`HrError`] into
//! [`platform_api::ApiError`] through `From`.

pub mod activity;
pub mod analytics;
pub mod charts;
pub mod dashboard;
pub mod employees;
pub mod error;
pub mod export;
pub mod seed;
pub mod validation;

pub use dashboard::{DashboardData, DashboardFilter, DashboardQuery, ReportWindows};
pub use error::{HrError, HrResult};
pub use validation::ValidationErrors;
