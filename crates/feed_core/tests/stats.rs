mod support;

use feed_core::{
    FeedType, FetchFailure, Reclassification, StatsReconciler, StatsRequest, StatsSnapshot,
};
use pretty_assertions::assert_eq;
use support::init_logging;

fn change(changed: usize, kept_delta: i32) -> Reclassification {
    Reclassification {
        changed,
        kept_delta,
    }
}

#[test]
fn signal_to_noise_follows_server_rounding() {
    assert_eq!(StatsSnapshot::from_counts(10, 5).snr, "67%");
    assert_eq!(StatsSnapshot::from_counts(1, 2).snr, "33%");
    assert_eq!(StatsSnapshot::from_counts(7, 0).snr, "100%");
    assert_eq!(StatsSnapshot::from_counts(0, 0).snr, "100%");
    assert_eq!(StatsSnapshot::from_counts(0, 4).snr, "0%");
}

#[test]
fn kept_delta_is_posted_and_folded_locally() {
    init_logging();
    let mut stats = StatsReconciler::new();
    stats.accept(Ok(StatsSnapshot::from_counts(10, 5)));

    let request = stats.reconcile(change(2, 2));

    assert_eq!(
        request,
        StatsRequest::Update {
            feed: FeedType::Kept,
            diff: 2,
        }
    );
    assert_eq!(stats.snapshot(), Some(&StatsSnapshot::from_counts(12, 3)));
}

#[test]
fn zero_delta_asks_for_a_refresh() {
    init_logging();
    let mut stats = StatsReconciler::new();
    stats.accept(Ok(StatsSnapshot::from_counts(3, 3)));

    assert_eq!(stats.reconcile(change(0, 0)), StatsRequest::Refresh);
    assert_eq!(stats.reconcile(change(1, 0)), StatsRequest::Refresh);
    assert_eq!(stats.snapshot(), Some(&StatsSnapshot::from_counts(3, 3)));
}

#[test]
fn delta_before_first_snapshot_is_still_posted() {
    init_logging();
    let mut stats = StatsReconciler::new();

    assert_eq!(
        stats.reconcile(change(1, -1)),
        StatsRequest::Update {
            feed: FeedType::Kept,
            diff: -1,
        }
    );
    assert_eq!(stats.snapshot(), None);
}

#[test]
fn failed_request_keeps_the_last_snapshot() {
    init_logging();
    let mut stats = StatsReconciler::new();
    stats.accept(Ok(StatsSnapshot::from_counts(4, 1)));

    assert_eq!(stats.accept(Err(FetchFailure::new("timeout"))), None);
    assert_eq!(stats.snapshot(), Some(&StatsSnapshot::from_counts(4, 1)));
}

#[test]
fn result_status_is_hidden_for_an_empty_result() {
    init_logging();
    let mut stats = StatsReconciler::new();
    assert_eq!(stats.summary(), None);
    assert!(!stats.result_status_visible());

    stats.accept(Ok(StatsSnapshot::from_counts(0, 0)));
    let summary = stats.summary().expect("summary");
    assert_eq!(summary.total, 0);
    assert!(!summary.result_status_visible);

    stats.accept(Ok(StatsSnapshot::from_counts(2, 1)));
    let summary = stats.summary().expect("summary");
    assert_eq!((summary.kept, summary.discarded, summary.total), (2, 1, 3));
    assert_eq!(summary.snr, "67%");
    assert!(summary.result_status_visible);

    stats.reset();
    assert_eq!(stats.snapshot(), None);
}

#[test]
fn shifting_never_underflows() {
    let snapshot = StatsSnapshot::from_counts(1, 0).shifted(-3);
    assert_eq!(snapshot, StatsSnapshot::from_counts(0, 3));
}
