//! Retrieval layer for the job corpus
//!
//! Implements dual-channel recall: an inverted keyword index plus cosine
//! vector search, fused by a weighted sum.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                  Query text + query vector                     │
//! └────────────────────────────────────────────────────────────────┘
//!                     │                          │
//!                     ▼                          ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │      keyword_search          │  │       vector_search          │
//! │  (token hits / token count)  │  │   (cosine, insertion ties)   │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                     │                          │
//!                     └──────────┬───────────────┘
//!                                ▼
//!                ┌───────────────────────────────┐
//!                │  Weighted merge (hybrid.rs)   │
//!                │   0.3 keyword + 0.7 vector    │
//!                └───────────────────────────────┘
//!                                │
//!                                ▼
//!                     Blended recall candidates
//! ```
//!
//! The store persists full snapshots through a [`SnapshotStore`] backend.

pub mod hybrid;
pub mod persistence;
pub mod sample;
pub mod similarity;
pub mod tokenizer;
pub mod vector_store;

pub use hybrid::{FusionWeights, HybridHit, merge_weighted};
pub use persistence::{
    FileSnapshotStore, MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore,
    open_snapshot_store,
};
pub use similarity::{cosine_similarity, l2_normalize};
pub use tokenizer::{normalize, tokenize};
pub use vector_store::{InitOutcome, StoreItem, StoreStats, VectorStore};
