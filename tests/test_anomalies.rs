mod common;

use common::*;
use semsearch::application::anomalies::AnomalyScorer;
use semsearch::domain::error::DomainError;
use semsearch::domain::values::collection::Collection;
use std::collections::HashSet;

#[test]
fn test_detects_three_outliers_among_hundred() {
    for parallel in [true, false] {
        let scorer = AnomalyScorer::new(store(vec![(Collection::Feedback, clustered_feedback())]), parallel);
        let anomalies = scorer.detect_anomalies(Collection::Feedback, 3).unwrap();
        let ids: HashSet<&str> = anomalies.iter().map(|a| a.document.id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["fb-13", "fb-57", "fb-88"]));

        let everyone = scorer.detect_anomalies(Collection::Feedback, 100).unwrap();
        let cluster: Vec<f32> = everyone
            .iter()
            .filter(|a| !ids.contains(a.document.id.as_str()))
            .map(|a| a.mean_similarity)
            .collect();
        let cluster_avg = cluster.iter().sum::<f32>() / cluster.len() as f32;
        for a in &anomalies {
            assert!(a.mean_similarity < cluster_avg - 0.5);
        }
    }
}

#[test]
fn test_scores_are_non_decreasing() {
    let scorer = AnomalyScorer::new(store(vec![(Collection::Feedback, clustered_feedback())]), true);
    let all = scorer.detect_anomalies(Collection::Feedback, 100).unwrap();
    assert_eq!(all.len(), 100);
    for pair in all.windows(2) {
        assert!(pair[0].mean_similarity <= pair[1].mean_similarity);
    }
}

#[test]
fn test_single_document_is_insufficient() {
    let scorer = AnomalyScorer::new(
        store(vec![(Collection::Feedback, vec![feedback("only", &[(0, 1.0)])])]),
        false,
    );
    let err = scorer.detect_anomalies(Collection::Feedback, 3).unwrap_err();
    assert!(matches!(err, DomainError::InsufficientData { found: 1, required: 2, .. }));
}

#[test]
fn test_empty_and_missing_collections() {
    let scorer = AnomalyScorer::new(store(vec![(Collection::Feedback, vec![])]), false);
    assert!(matches!(
        scorer.detect_anomalies(Collection::Feedback, 3),
        Err(DomainError::InsufficientData { found: 0, .. })
    ));
    assert!(matches!(
        scorer.detect_anomalies(Collection::Movie, 3),
        Err(DomainError::CollectionNotFound(Collection::Movie))
    ));
}

#[test]
fn test_small_collection_returned_whole() {
    let scorer = AnomalyScorer::new(
        store(vec![(
            Collection::Feedback,
            vec![
                feedback("a", &[(0, 1.0)]),
                feedback("b", &[(0, 1.0), (1, 1.0)]),
                feedback("c", &[(1, 1.0)]),
            ],
        )]),
        false,
    );
    let all = scorer.detect_anomalies(Collection::Feedback, 3).unwrap();
    assert_eq!(all.len(), 3);
    // b sits between a and c, so it is the least anomalous
    assert_eq!(all[2].document.id, "b");
}

#[test]
fn test_mean_excludes_self_similarity() {
    let scorer = AnomalyScorer::new(
        store(vec![(
            Collection::Feedback,
            vec![feedback("x", &[(0, 1.0)]), feedback("y", &[(1, 1.0)])],
        )]),
        false,
    );
    let all = scorer.detect_anomalies(Collection::Feedback, 2).unwrap();
    for a in all {
        assert!(a.mean_similarity.abs() < 1e-6);
    }
}
