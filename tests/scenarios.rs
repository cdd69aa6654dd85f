// End-to-end batch scenarios through the public API

use transaction_risk::{
    assess_transactions, DuplicatePolicy, RiskAssessor, RiskLevel, RiskThresholds, Transaction,
};

fn ratings(transactions: &[Transaction]) -> Vec<String> {
    assess_transactions(transactions).risk_ratings
}

#[test]
fn test_three_users_shuffled_input_order() {
    // Users interleaved so that user-id order and input order disagree
    let transactions = vec![
        Transaction::new(1, 3, 200_000, 1),
        Transaction::new(2, 1, 600_000, 1),
        Transaction::new(3, 2, 100_000, 2),
        Transaction::new(4, 3, 1_100_000, 1),
        Transaction::new(5, 2, 100_000, 3),
        Transaction::new(6, 2, 100_000, 4),
    ];

    assert_eq!(
        ratings(&transactions),
        vec!["low", "medium", "low", "high", "medium", "high"]
    );
}

#[test]
fn test_ids_do_not_drive_order() {
    // Descending ids: output still follows input rows, not ids
    let transactions = vec![
        Transaction::new(30, 1, 1_100_000, 1),
        Transaction::new(20, 1, 100, 1),
        Transaction::new(10, 1, 100, 1),
    ];

    assert_eq!(ratings(&transactions), vec!["high", "medium", "medium"]);
}

#[test]
fn test_custom_thresholds() {
    let thresholds = RiskThresholds {
        single_medium: 100,
        single_high: 200,
        ..RiskThresholds::default()
    };
    let assessor = RiskAssessor::new(&thresholds, DuplicatePolicy::KeepAll);

    let results = assessor.assess(&[
        Transaction::new(1, 1, 100, 1),
        Transaction::new(2, 2, 150, 1),
        Transaction::new(3, 3, 250, 1),
    ]);
    assert_eq!(results.risk_ratings, vec!["low", "medium", "high"]);
}

#[test]
fn test_negative_amounts_are_rated() {
    let transactions = vec![
        Transaction::new(1, 1, -5_000_000, 1),
        Transaction::new(2, 1, 2_500_000, 1),
        Transaction::new(3, 1, 2_600_000, 1),
    ];

    // running totals: -5M, -2.5M, 0.1M; single rule still sees 2.5M and 2.6M as high
    assert_eq!(ratings(&transactions), vec!["low", "high", "high"]);
}

#[test]
fn test_labels_parse_back() {
    let transactions: Vec<Transaction> = (0..10)
        .map(|i| Transaction::new(i, i % 3, (i as i64) * 300_000, i % 4))
        .collect();

    for label in ratings(&transactions) {
        assert!(RiskLevel::from_label(&label).is_some(), "unexpected label {}", label);
    }
}
