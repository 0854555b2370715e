use engine_logging::{engine_debug, engine_warn};
use serde::{Deserialize, Serialize};

use crate::{FeedType, FetchFailure, Reclassification};

/// Aggregate counts as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub kept: u32,
    pub discarded: u32,
    pub snr: String,
}

impl StatsSnapshot {
    /// Builds a snapshot with the signal-to-noise ratio computed like the server.
    pub fn from_counts(kept: u32, discarded: u32) -> Self {
        Self {
            kept,
            discarded,
            snr: signal_to_noise(kept, discarded),
        }
    }

    pub fn total(&self) -> u32 {
        self.kept.saturating_add(self.discarded)
    }

    /// Moves `diff` documents from discarded to kept (negative moves the other way).
    pub fn shifted(&self, diff: i32) -> Self {
        let magnitude = diff.unsigned_abs();
        let (kept, discarded) = if diff >= 0 {
            (
                self.kept.saturating_add(magnitude),
                self.discarded.saturating_sub(magnitude),
            )
        } else {
            (
                self.kept.saturating_sub(magnitude),
                self.discarded.saturating_add(magnitude),
            )
        };
        Self::from_counts(kept, discarded)
    }
}

fn signal_to_noise(kept: u32, discarded: u32) -> String {
    if discarded == 0 {
        return "100%".to_string();
    }
    let total = f64::from(kept) + f64::from(discarded);
    format!("{}%", (f64::from(kept) * 100.0 / total).round() as u32)
}

/// What the server must be asked after a reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRequest {
    /// Plain refresh; the server may have moved documents we never saw.
    Refresh,
    /// Tell the server about documents that moved client-side.
    Update { feed: FeedType, diff: i32 },
}

/// Values for the "kept / discarded / total / SNR" summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub kept: u32,
    pub discarded: u32,
    pub total: u32,
    pub snr: String,
    /// The result-status area is only shown once something was classified.
    pub result_status_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StatsReconciler {
    snapshot: Option<StatsSnapshot>,
}

impl StatsReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    /// Folds a local reclassification and returns the request to send.
    pub fn reconcile(&mut self, change: Reclassification) -> StatsRequest {
        if change.kept_delta == 0 {
            return StatsRequest::Refresh;
        }
        if let Some(snapshot) = self.snapshot.as_mut() {
            *snapshot = snapshot.shifted(change.kept_delta);
        }
        StatsRequest::Update {
            feed: FeedType::Kept,
            diff: change.kept_delta,
        }
    }

    /// Applies a server response. Returns the new snapshot when it was accepted.
    pub fn accept(&mut self, result: Result<StatsSnapshot, FetchFailure>) -> Option<&StatsSnapshot> {
        match result {
            Ok(snapshot) => {
                engine_debug!(
                    "Stats kept={} discarded={} snr={}",
                    snapshot.kept,
                    snapshot.discarded,
                    snapshot.snr
                );
                self.snapshot = Some(snapshot);
                self.snapshot.as_ref()
            }
            Err(failure) => {
                engine_warn!("Keeping last known stats: {}", failure);
                None
            }
        }
    }

    pub fn summary(&self) -> Option<StatsSummary> {
        self.snapshot.as_ref().map(|snapshot| StatsSummary {
            kept: snapshot.kept,
            discarded: snapshot.discarded,
            total: snapshot.total(),
            snr: snapshot.snr.clone(),
            result_status_visible: snapshot.total() > 0,
        })
    }

    pub fn result_status_visible(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.total() > 0)
    }

    pub fn reset(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::StatsSnapshot;

    #[test]
    fn snr_matches_server_rounding() {
        assert_eq!(StatsSnapshot::from_counts(0, 0).snr, "100%");
        assert_eq!(StatsSnapshot::from_counts(5, 0).snr, "100%");
        assert_eq!(StatsSnapshot::from_counts(1, 2).snr, "33%");
        assert_eq!(StatsSnapshot::from_counts(2, 1).snr, "67%");
        assert_eq!(StatsSnapshot::from_counts(1, 1).snr, "50%");
    }

    #[test]
    fn shifting_saturates_at_zero() {
        let shifted = StatsSnapshot::from_counts(1, 3).shifted(-4);
        assert_eq!((shifted.kept, shifted.discarded), (0, 7));
        let shifted = StatsSnapshot::from_counts(1, 3).shifted(5);
        assert_eq!((shifted.kept, shifted.discarded), (6, 0));
        assert_eq!(shifted.snr, "100%");
    }
}
