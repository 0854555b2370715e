use std::sync::mpsc;

use crate::{FeedType, KeywordKind, Reclassification, StatsSnapshot};

/// Typed signals between the feed, keyword and stats parts of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Feeds were emptied for a new search expression.
    Cleared,
    FeedSelected(FeedType),
    KeywordApplied {
        kind: KeywordKind,
        keyword: String,
        change: Reclassification,
    },
    KeywordRemoved {
        kind: KeywordKind,
        keyword: String,
        change: Reclassification,
    },
    StatsUpdated(StatsSnapshot),
}

/// Fan-out of notifications to every registered subscriber.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<mpsc::Sender<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers to every live subscriber; dropped receivers are forgotten.
    pub fn publish(&mut self, notification: Notification) {
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, Notifier};
    use crate::FeedType;

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut notifier = Notifier::new();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());

        notifier.publish(Notification::FeedSelected(FeedType::Kept));

        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(
            kept.try_recv().unwrap(),
            Notification::FeedSelected(FeedType::Kept)
        );
    }
}
