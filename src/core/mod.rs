//! Core job-matching types and text parsing helpers

pub mod job;
pub mod parse;
pub mod profile;

pub use job::JobRecord;
pub use profile::{BehaviorHistory, UserProfile};
