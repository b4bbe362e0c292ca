//! Property tests for the retrieval and ranking primitives.

use proptest::prelude::*;

use jobmatch::config::StoreConfig;
use jobmatch::core::JobRecord;
use jobmatch::embeddings::local_embedding;
use jobmatch::matching::diversify::diversify_by_company;
use jobmatch::matching::types::to_match_score;
use jobmatch::ranking::metrics::{auc, ndcg_at_k};
use jobmatch::search::{
    FusionWeights, MemorySnapshotStore, StoreItem, VectorStore, cosine_similarity, merge_weighted,
};

const DIM: usize = 8;

fn arb_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-10.0f32..10.0, dim)
}

fn arb_nonzero_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    arb_vector(dim).prop_filter("non-zero", |v| v.iter().any(|x| x.abs() > 1e-3))
}

fn arb_hits() -> impl Strategy<Value = Vec<(String, f32)>> {
    prop::collection::vec(("[a-f]{1,2}", 0.0f32..1.0), 0..12)
}

fn empty_store() -> VectorStore {
    let config = StoreConfig {
        dimension: DIM,
        bootstrap_sample: false,
        ..StoreConfig::default()
    };
    VectorStore::new(&config, Box::new(MemorySnapshotStore::new()))
}

proptest! {
    #[test]
    fn cosine_of_vector_with_itself_is_one(v in arb_nonzero_vector(DIM)) {
        let similarity = cosine_similarity(&v, &v);
        prop_assert!((similarity - 1.0).abs() < 1e-4, "similarity {}", similarity);
    }

    #[test]
    fn cosine_is_bounded_and_symmetric(a in arb_vector(DIM), b in arb_vector(DIM)) {
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        prop_assert!(ab.is_finite());
        prop_assert!((-1.0001..=1.0001).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-5);
    }

    #[test]
    fn local_embedding_is_deterministic_and_normalized(text in ".{0,64}", dim in 1usize..64) {
        let first = local_embedding(&text, dim);
        let second = local_embedding(&text, dim);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), dim);
        let norm: f32 = first.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm < 1e-6 || (norm - 1.0).abs() < 1e-3, "norm {}", norm);
    }

    #[test]
    fn stored_vector_is_its_own_best_match(
        vectors in prop::collection::vec(arb_nonzero_vector(DIM), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = empty_store();
        let items: Vec<StoreItem> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let id = format!("job-{i}");
                StoreItem::new(id.clone(), v.clone(), JobRecord::new(id, "Engineer"))
            })
            .collect();
        prop_assert_eq!(store.add_vectors_batch(items).unwrap(), vectors.len());

        let target = pick.index(vectors.len());
        let results = store.vector_search(&vectors[target], vectors.len());
        prop_assert_eq!(results.len(), vectors.len());
        prop_assert!((results[0].1 - 1.0).abs() < 1e-4);
        let target_score = results
            .iter()
            .find(|(id, _)| *id == format!("job-{target}"))
            .map(|(_, score)| *score)
            .unwrap();
        prop_assert!((target_score - results[0].1).abs() < 1e-4);
        prop_assert!(results.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    }

    #[test]
    fn merge_keeps_every_id_once(keyword in arb_hits(), vector in arb_hits()) {
        let merged = merge_weighted(&keyword, &vector, FusionWeights::default());
        let mut expected: Vec<&str> = keyword.iter().chain(&vector).map(|(id, _)| id.as_str()).collect();
        expected.sort_unstable();
        expected.dedup();
        let mut actual: Vec<&str> = merged.iter().map(|hit| hit.id.as_str()).collect();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
        prop_assert!(merged.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn diversification_caps_companies_and_keeps_order(
        companies in prop::collection::vec("[a-c]", 0..30),
        cap in 1usize..4,
    ) {
        let ranked: Vec<(usize, String)> = companies.into_iter().enumerate().collect();
        let kept = diversify_by_company(ranked.clone(), cap, |(_, company)| company.as_str());
        for company in ["a", "b", "c"] {
            prop_assert!(kept.iter().filter(|(_, c)| c == company).count() <= cap);
        }
        prop_assert!(kept.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn ndcg_of_ideal_order_is_one(labels in prop::collection::vec(0u8..4, 1..30)) {
        let labels: Vec<f32> = labels.into_iter().map(f32::from).collect();
        prop_assume!(labels.iter().any(|&label| label > 0.0));
        let ndcg = ndcg_at_k(&labels, &labels, 10);
        prop_assert!((ndcg - 1.0).abs() < 1e-5, "ndcg {}", ndcg);
    }

    #[test]
    fn auc_is_a_probability(
        rows in prop::collection::vec((0.0f32..1.0, any::<bool>()), 0..40),
    ) {
        let scores: Vec<f32> = rows.iter().map(|(score, _)| *score).collect();
        let labels: Vec<f32> = rows.iter().map(|(_, positive)| if *positive { 1.0 } else { 0.0 }).collect();
        let value = auc(&scores, &labels);
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn match_score_is_always_a_percentage(score in any::<f32>()) {
        prop_assert!(to_match_score(score) <= 100);
    }
}
