pub mod config;
pub mod history;
pub mod row;
pub mod scorecard;

pub use config::{BackfillConfig, WarehouseTarget};
pub use history::{CommitRecord, HistoryError};
pub use row::{PersistedRow, RepoRef, ScorecardVersion};
pub use scorecard::{
    CheckDocumentation, CheckResult, ScorecardDocument, ScorecardTool, SubjectRepo,
};
