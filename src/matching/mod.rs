//! Job matching control plane.
//!
//! [`JobMatchOrchestrator`] drives recall, feature building, ranking and
//! postprocessing through the capability traits in [`traits`], and owns the
//! degradation policy.

pub mod diversify;
pub mod enrich;
pub mod fallback;
pub mod filters;
pub mod orchestrator;
pub mod reasons;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use filters::HardFilters;
pub use orchestrator::{Collaborators, JobMatchOrchestrator, PipelineSettings, Stage};
pub use telemetry::Telemetry;
pub use traits::{FeatureSource, QueryEmbedder, RankingSource, RecallSource};
pub use types::{Algorithm, MatchFilters, MatchRequest, MatchResponse, MatchedJob};
