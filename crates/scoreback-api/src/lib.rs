//! Scorecard fetching: one GET per commit against the public scorecard API.

pub mod http;

pub use http::{FetchError, ScorecardClient, ScorecardSource};
