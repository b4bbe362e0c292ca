//! End-to-end matching pipeline.
//!
//! Each call walks `PREPROCESS -> RECALL -> FEATURE_BUILD -> RANK ->
//! POSTPROCESS -> LOG`. An error or panic in any stage before LOG switches
//! the request to FALLBACK, which answers from the query text alone, so
//! `match_jobs` always returns a well-formed response.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use tracing::{Span, debug, info_span, warn};
use uuid::Uuid;

use crate::config::{MAX_RESULT_LIMIT, PostprocessConfig, RecallConfig};
use crate::core::{JobRecord, UserProfile};
use crate::error::{MatchError, Result};
use crate::ranking::{FeatureRow, RecallSignal};
use crate::search::hybrid::{FusionWeights, HybridHit, merge_weighted};
use crate::search::tokenizer::normalize;

use super::diversify::diversify_by_company;
use super::enrich::enrich_profile;
use super::fallback;
use super::filters::HardFilters;
use super::reasons::{ReasonScores, explain_match};
use super::telemetry::{Telemetry, TelemetryRecorder};
use super::traits::{FeatureSource, QueryEmbedder, RankingSource, RecallSource};
use super::types::{Algorithm, MatchRequest, MatchResponse, MatchedJob, to_match_score};

/// Pipeline states, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocess,
    Recall,
    FeatureBuild,
    Rank,
    Postprocess,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preprocess => "PREPROCESS",
            Self::Recall => "RECALL",
            Self::FeatureBuild => "FEATURE_BUILD",
            Self::Rank => "RANK",
            Self::Postprocess => "POSTPROCESS",
        };
        f.write_str(name)
    }
}

/// Collaborators of the orchestrator.
#[derive(Clone)]
pub struct Collaborators {
    pub recall: Arc<dyn RecallSource>,
    pub embedder: Arc<dyn QueryEmbedder>,
    pub features: Arc<dyn FeatureSource>,
    pub ranker: Arc<dyn RankingSource>,
}

/// Tunables of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub recall: RecallConfig,
    pub postprocess: PostprocessConfig,
    pub ranking_enabled: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            recall: RecallConfig::default(),
            postprocess: PostprocessConfig::default(),
            ranking_enabled: true,
        }
    }
}

/// A recalled job with its scores, carried through the stages.
#[derive(Debug, Clone)]
struct Candidate {
    job: JobRecord,
    signal: RecallSignal,
    ltr_score: Option<f32>,
}

impl Candidate {
    fn final_score(&self) -> f32 {
        self.ltr_score.unwrap_or(self.signal.recall_score)
    }
}

struct Preprocessed {
    query: String,
    query_vector: Option<Vec<f32>>,
    profile: UserProfile,
    limit: usize,
}

/// Composes recall, feature building and ranking into `match_jobs`.
pub struct JobMatchOrchestrator {
    collaborators: Collaborators,
    settings: PipelineSettings,
    telemetry: TelemetryRecorder,
}

impl JobMatchOrchestrator {
    pub fn new(collaborators: Collaborators, settings: PipelineSettings) -> Self {
        Self {
            collaborators,
            settings,
            telemetry: TelemetryRecorder::new(),
        }
    }

    /// Run the pipeline. Never fails; failures yield `algorithm: fallback`.
    pub fn match_jobs(&self, request: &MatchRequest) -> MatchResponse {
        let started = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("match_jobs", request_id = %request_id);
        let _guard = span.enter();

        let outcome = catch_unwind(AssertUnwindSafe(|| self.run_pipeline(request)))
            .unwrap_or_else(|panic| {
                Err(MatchError::Pipeline {
                    stage: "UNKNOWN".to_string(),
                    reason: panic_message(panic.as_ref()),
                })
            });

        let (jobs, total_count, algorithm) = match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "pipeline failed; serving fallback results");
                let limit = self.effective_limit(request.limit);
                let jobs = fallback::synthesize(&request.query, limit);
                let total = jobs.len();
                (jobs, total, Algorithm::Fallback)
            }
        };

        let elapsed = started.elapsed();
        self.telemetry
            .record(elapsed.as_secs_f64() * 1000.0, algorithm == Algorithm::Fallback);
        debug!(
            stage = "LOG",
            jobs = jobs.len(),
            total_count,
            algorithm = %algorithm,
            latency_ms = elapsed.as_millis() as u64,
            "match complete"
        );

        MatchResponse {
            jobs,
            total_count,
            latency_ms: elapsed.as_millis() as u64,
            algorithm,
            request_id,
        }
    }

    /// Counters since construction.
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry.snapshot()
    }

    fn effective_limit(&self, requested: usize) -> usize {
        let config = &self.settings.postprocess;
        let limit = if requested == 0 { config.default_limit } else { requested };
        limit.min(config.max_limit.min(MAX_RESULT_LIMIT)).max(1)
    }

    fn run_pipeline(&self, request: &MatchRequest) -> Result<(Vec<MatchedJob>, usize, Algorithm)> {
        let pre = stage(Stage::Preprocess, || self.preprocess(request))?;
        let candidates = stage(Stage::Recall, || self.recall(&pre, request))?;
        let total_count = candidates.len();

        let rows = stage(Stage::FeatureBuild, || {
            let jobs: Vec<JobRecord> = candidates.iter().map(|c| c.job.clone()).collect();
            let signals: Vec<RecallSignal> = candidates.iter().map(|c| c.signal).collect();
            let matrix = self.collaborators.features.build(&pre.profile, &jobs, &signals);
            if matrix.features.len() != candidates.len() {
                return Err(MatchError::Pipeline {
                    stage: Stage::FeatureBuild.to_string(),
                    reason: format!(
                        "{} feature rows for {} candidates",
                        matrix.features.len(),
                        candidates.len()
                    ),
                });
            }
            Ok(matrix.features)
        })?;

        let (ranked, algorithm) = stage(Stage::Rank, || Ok(self.rank(candidates, &rows)))?;
        let jobs = stage(Stage::Postprocess, || Ok(self.postprocess(ranked, &pre)))?;
        Ok((jobs, total_count, algorithm))
    }

    fn preprocess(&self, request: &MatchRequest) -> Result<Preprocessed> {
        let profile = enrich_profile(request.user_profile.as_ref(), request.location.as_deref());

        let mut query = normalize(&request.query);
        if query.is_empty() {
            query = normalize(&profile.skills.join(" "));
        }

        let query_vector = if query.is_empty() {
            None
        } else {
            match self.collaborators.embedder.embed_query(&query) {
                Ok(vector) => Some(vector),
                Err(err) => {
                    warn!(error = %err, "query embedding failed; vector recall disabled");
                    None
                }
            }
        };

        let limit = self.effective_limit(request.limit);
        debug!(
            stage = %Stage::Preprocess,
            query = %query,
            limit,
            skills = profile.skills.len(),
            vector = query_vector.is_some(),
            "preprocessed request"
        );
        Ok(Preprocessed {
            query,
            query_vector,
            profile,
            limit,
        })
    }

    fn recall(&self, pre: &Preprocessed, request: &MatchRequest) -> Result<Vec<Candidate>> {
        let config = &self.settings.recall;
        let source = &self.collaborators.recall;

        let (keyword, vector) = rayon::join(
            || source.keyword_recall(&pre.query, config.keyword_size),
            || {
                pre.query_vector
                    .as_deref()
                    .map(|vector| source.vector_recall(vector, config.vector_size))
                    .unwrap_or_default()
            },
        );

        let weights = FusionWeights::new(config.keyword_weight, config.vector_weight);
        let merged: Vec<HybridHit> = merge_weighted(&keyword, &vector, weights);
        let filters = HardFilters::from_request(
            request.location.as_deref(),
            &request.filters,
            config.experience_tolerance,
        );

        let recalled = merged.len();
        let candidates: Vec<Candidate> = merged
            .into_iter()
            .filter_map(|hit| {
                let job = source.job(&hit.id)?;
                filters.matches(&job).then(|| Candidate {
                    job,
                    signal: RecallSignal {
                        keyword_score: hit.keyword_score,
                        vector_score: hit.vector_score,
                        recall_score: hit.score,
                    },
                    ltr_score: None,
                })
            })
            .collect();

        debug!(
            stage = %Stage::Recall,
            keyword = keyword.len(),
            vector = vector.len(),
            recalled,
            kept = candidates.len(),
            "recall complete"
        );
        Ok(candidates)
    }

    fn rank(
        &self,
        mut candidates: Vec<Candidate>,
        rows: &[FeatureRow],
    ) -> (Vec<Candidate>, Algorithm) {
        let ranker = &self.collaborators.ranker;
        if !self.settings.ranking_enabled || !ranker.is_ready() {
            candidates.sort_by(|a, b| b.signal.recall_score.total_cmp(&a.signal.recall_score));
            return (candidates, Algorithm::HybridRecall);
        }

        match ranker.score(rows) {
            Ok(scores) if scores.len() == candidates.len() => {
                for (candidate, score) in candidates.iter_mut().zip(scores) {
                    candidate.ltr_score = Some(if score.is_finite() { score } else { 0.0 });
                }
                candidates.sort_by(|a, b| b.final_score().total_cmp(&a.final_score()));
                debug!(stage = %Stage::Rank, candidates = candidates.len(), "ranked by model");
                (candidates, Algorithm::HybridLtr)
            }
            Ok(scores) => {
                warn!(
                    scores = scores.len(),
                    candidates = candidates.len(),
                    "ranker returned wrong number of scores; using recall order"
                );
                candidates.sort_by(|a, b| b.signal.recall_score.total_cmp(&a.signal.recall_score));
                (candidates, Algorithm::HybridRecall)
            }
            Err(err) => {
                warn!(error = %err, "ranking failed; using recall order");
                candidates.sort_by(|a, b| b.signal.recall_score.total_cmp(&a.signal.recall_score));
                (candidates, Algorithm::HybridRecall)
            }
        }
    }

    fn postprocess(&self, mut ranked: Vec<Candidate>, pre: &Preprocessed) -> Vec<MatchedJob> {
        ranked.truncate(pre.limit);
        let kept = diversify_by_company(ranked, self.settings.postprocess.max_per_company, |c| {
            c.job.company.as_str()
        });

        kept.into_iter()
            .map(|candidate| {
                let reasons = explain_match(
                    ReasonScores {
                        keyword: candidate.signal.keyword_score,
                        vector: candidate.signal.vector_score,
                        ltr: candidate.ltr_score,
                    },
                    &candidate.job,
                    &pre.profile,
                );
                let match_score = to_match_score(candidate.final_score());
                MatchedJob {
                    job: candidate.job,
                    match_score,
                    reasons,
                    keyword_score: candidate.signal.keyword_score,
                    vector_score: candidate.signal.vector_score,
                    recall_score: candidate.signal.recall_score,
                    ltr_score: candidate.ltr_score,
                }
            })
            .collect()
    }
}

/// Run one stage, tagging its errors with the stage name.
fn stage<T>(stage: Stage, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let span: Span = tracing::debug_span!("stage", name = %stage);
    let _guard = span.enter();
    run().map_err(|err| match err {
        MatchError::Pipeline { .. } => err,
        other => MatchError::Pipeline {
            stage: stage.to_string(),
            reason: other.to_string(),
        },
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
