pub mod allocation;
pub mod analysis;
pub mod config;
pub mod error;
pub mod types;

pub use allocation::{PersonBreakdown, Reconciliation, SplitSummary};
pub use analysis::{AnalysisError, AnalysisResult};
pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use types::*;
