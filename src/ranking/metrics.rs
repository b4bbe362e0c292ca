//! Offline ranking metrics: NDCG@k, average precision and AUC.
//!
//! All functions take predicted scores and true labels positionally paired.
//! A label above 0 counts as relevant for average precision and AUC; NDCG
//! uses the label itself as the gain.

/// Indices ordered by score descending, ties in input order.
fn rank_by_score(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

fn dcg(labels_in_order: impl Iterator<Item = f32>, k: usize) -> f32 {
    labels_in_order
        .take(k)
        .enumerate()
        .map(|(rank, label)| label / (rank as f32 + 2.0).log2())
        .sum()
}

/// NDCG at cutoff `k`; 0 when no label is positive.
#[must_use]
pub fn ndcg_at_k(scores: &[f32], labels: &[f32], k: usize) -> f32 {
    let n = scores.len().min(labels.len());
    let (scores, labels) = (&scores[..n], &labels[..n]);

    let actual = dcg(rank_by_score(scores).into_iter().map(|i| labels[i]), k);

    let mut ideal_labels = labels.to_vec();
    ideal_labels.sort_by(|a, b| b.total_cmp(a));
    let ideal = dcg(ideal_labels.into_iter(), k);

    if ideal <= 0.0 { 0.0 } else { actual / ideal }
}

/// Average precision of one ranked list; 0 without relevant items.
#[must_use]
pub fn average_precision(scores: &[f32], labels: &[f32]) -> f32 {
    let n = scores.len().min(labels.len());
    let total_relevant = labels[..n].iter().filter(|label| **label > 0.0).count();
    if total_relevant == 0 {
        return 0.0;
    }

    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (rank, index) in rank_by_score(&scores[..n]).into_iter().enumerate() {
        if labels[index] > 0.0 {
            hits += 1;
            precision_sum += hits as f32 / (rank + 1) as f32;
        }
    }
    precision_sum / total_relevant as f32
}

/// Mean of [`average_precision`] over several lists.
#[must_use]
pub fn mean_average_precision(lists: &[(Vec<f32>, Vec<f32>)]) -> f32 {
    if lists.is_empty() {
        return 0.0;
    }
    lists
        .iter()
        .map(|(scores, labels)| average_precision(scores, labels))
        .sum::<f32>()
        / lists.len() as f32
}

/// Area under the ROC curve by the pairwise rank method.
///
/// Sorts ascending by score and counts, for each positive, the negatives
/// ranked below it. Returns 0.5 when either class is empty.
#[must_use]
pub fn auc(scores: &[f32], labels: &[f32]) -> f32 {
    let n = scores.len().min(labels.len());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut negatives_seen = 0u64;
    let mut correct_pairs = 0u64;
    let mut positives = 0u64;
    for index in order {
        if labels[index] > 0.0 {
            positives += 1;
            correct_pairs += negatives_seen;
        } else {
            negatives_seen += 1;
        }
    }

    let negatives = negatives_seen;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }
    correct_pairs as f32 / (positives * negatives) as f32
}
