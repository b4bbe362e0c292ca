//! Integration test suite entry point.

mod embedding_api;
mod fixture;
mod persistence;
mod pipeline;
