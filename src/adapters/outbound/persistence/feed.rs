use futures::StreamExt;
use std::cmp::Reverse;
use tokio::sync::watch;
use tracing::debug;

use crate::{
    domain::models::{Posting, PostingKind},
    ports::repositories::FeedStream,
};

/// Fan-out of active-feed snapshots, one watch channel per posting kind.
///
/// Subscribers only ever see whole snapshots. Rapid successive writes may be
/// coalesced into a single emission carrying the latest state.
pub struct FeedPublisher {
    lost: watch::Sender<Vec<Posting>>,
    found: watch::Sender<Vec<Posting>>,
}

impl FeedPublisher {
    pub fn new() -> Self {
        let (lost, _) = watch::channel(Vec::new());
        let (found, _) = watch::channel(Vec::new());
        Self { lost, found }
    }

    fn sender(&self, kind: PostingKind) -> &watch::Sender<Vec<Posting>> {
        match kind {
            PostingKind::Lost => &self.lost,
            PostingKind::Found => &self.found,
        }
    }

    /// Replace the current snapshot and wake every subscriber
    pub fn publish(&self, kind: PostingKind, snapshot: Vec<Posting>) {
        debug!(kind = %kind, active = snapshot.len(), "publishing feed snapshot");
        self.sender(kind).send_replace(snapshot);
    }

    /// Stream yielding the current snapshot first, then one per change
    pub fn subscribe(&self, kind: PostingKind) -> FeedStream {
        let receiver = self.sender(kind).subscribe();

        futures::stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, (receiver, false)))
        })
        .boxed()
    }

    pub fn subscriber_count(&self, kind: PostingKind) -> usize {
        self.sender(kind).receiver_count()
    }
}

impl Default for FeedPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only active postings, newest first. `sequence` breaks `created_at` ties.
pub(crate) fn active_feed<'a, I>(postings: I) -> Vec<Posting>
where
    I: IntoIterator<Item = (&'a Posting, u64)>,
{
    let mut active: Vec<(&Posting, u64)> = postings
        .into_iter()
        .filter(|(posting, _)| posting.is_active())
        .collect();

    active.sort_by_key(|(posting, sequence)| Reverse((posting.created_at(), *sequence)));
    active.into_iter().map(|(posting, _)| posting.clone()).collect()
}
