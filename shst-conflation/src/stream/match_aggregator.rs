use std::time::Duration;

use futures::{stream::BoxStream, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use super::{AggregatedReferenceMatches, MatchRecord, MatchStreamError};
use crate::model::matches::SourceId;

/// a stream of one source's match records, sorted by reference id.
pub type MatchSource = BoxStream<'static, Result<MatchRecord, MatchStreamError>>;

type GroupResult = Result<AggregatedReferenceMatches, MatchStreamError>;

/// merge-joins the match streams of several sources into one group per reference
/// line, emitted in increasing reference id order.
///
/// each source is read by its own task into a bounded channel, so a source runs at
/// most `channel_capacity` records ahead of the merge. a single coordinating task
/// holds the next record of every source, gathers all records for the smallest
/// reference id and only then advances. dropping the aggregator aborts every task.
pub struct MatchAggregator {
    groups: mpsc::Receiver<GroupResult>,
    readers: Vec<JoinHandle<()>>,
    coordinator: Option<JoinHandle<()>>,
}

/// the next unconsumed record of one source.
struct SourceHead {
    source_id: SourceId,
    records: mpsc::Receiver<Result<MatchRecord, MatchStreamError>>,
    head: Option<MatchRecord>,
    previous: Option<String>,
}

impl MatchAggregator {
    /// starts reading every source. must be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `sources`          - each source's id and its sorted record stream
    /// * `channel_capacity` - records buffered per source and groups buffered for the consumer
    /// * `source_timeout`   - longest wait for any one source's next record, if bounded
    pub fn spawn(
        sources: Vec<(SourceId, MatchSource)>,
        channel_capacity: usize,
        source_timeout: Option<Duration>,
    ) -> MatchAggregator {
        let capacity = channel_capacity.max(1);
        let mut readers = Vec::with_capacity(sources.len());
        let mut heads = Vec::with_capacity(sources.len());
        for (source_id, stream) in sources.into_iter() {
            let (tx, rx) = mpsc::channel(capacity);
            readers.push(tokio::spawn(read_source(stream, tx)));
            heads.push(SourceHead {
                source_id,
                records: rx,
                head: None,
                previous: None,
            });
        }

        let (group_tx, group_rx) = mpsc::channel(capacity);
        let coordinator = tokio::spawn(async move {
            if let Err(e) = merge_sources(heads, &group_tx, source_timeout).await {
                log::error!("match aggregation failed: {e}");
                let _ = group_tx.send(Err(e)).await;
            }
        });

        MatchAggregator {
            groups: group_rx,
            readers,
            coordinator: Some(coordinator),
        }
    }

    /// the next reference line's matches, or None once every source is exhausted.
    /// after an error no further groups are produced.
    pub async fn next(&mut self) -> Option<GroupResult> {
        if let Some(group) = self.groups.recv().await {
            return Some(group);
        }
        // the coordinator has dropped its sender; report it if it did not finish cleanly
        match self.coordinator.take()?.await {
            Ok(()) => None,
            Err(e) => {
                log::error!("match aggregator task failed: {e}");
                Some(Err(MatchStreamError::Shutdown))
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = GroupResult> {
        futures::stream::unfold(self, |mut aggregator| async move {
            aggregator.next().await.map(|group| (group, aggregator))
        })
    }
}

impl Drop for MatchAggregator {
    fn drop(&mut self) {
        for task in self.readers.iter().chain(self.coordinator.iter()) {
            task.abort();
        }
    }
}

async fn read_source(
    mut stream: MatchSource,
    tx: mpsc::Sender<Result<MatchRecord, MatchStreamError>>,
) {
    while let Some(record) = stream.next().await {
        let failed = record.is_err();
        // the merge has stopped listening
        if tx.send(record).await.is_err() || failed {
            break;
        }
    }
}

async fn merge_sources(
    mut heads: Vec<SourceHead>,
    groups: &mpsc::Sender<GroupResult>,
    timeout: Option<Duration>,
) -> Result<(), MatchStreamError> {
    for head in heads.iter_mut() {
        head.advance(timeout).await?;
    }

    let mut emitted = 0;
    loop {
        let reference_id = match heads
            .iter()
            .filter_map(|h| h.head.as_ref().map(|r| r.reference_id()))
            .min()
        {
            Some(id) => id.to_string(),
            None => break,
        };

        let mut group = AggregatedReferenceMatches::new(reference_id.clone());
        for head in heads.iter_mut() {
            while let Some(record) = head.take_if_reference(&reference_id) {
                group.push(head.source_id.clone(), record.segment);
                head.advance(timeout).await?;
            }
        }

        if groups.send(Ok(group)).await.is_err() {
            log::debug!("match aggregator consumer dropped after {emitted} groups");
            return Ok(());
        }
        emitted += 1;
    }
    log::debug!("match aggregation complete with {emitted} groups");
    Ok(())
}

impl SourceHead {
    /// replaces the head with the source's next record, checking sort order.
    async fn advance(&mut self, timeout: Option<Duration>) -> Result<(), MatchStreamError> {
        let next = match timeout {
            Some(duration) => tokio::time::timeout(duration, self.records.recv())
                .await
                .map_err(|_| MatchStreamError::SourceTimeout {
                    source_id: self.source_id.clone(),
                    timeout: duration,
                })?,
            None => self.records.recv().await,
        };
        self.head = match next {
            None => None,
            Some(Err(e)) => return Err(e),
            Some(Ok(record)) => {
                if let Some(previous) = self.previous.as_deref() {
                    if record.reference_id() < previous {
                        return Err(MatchStreamError::OrderViolation {
                            source_id: self.source_id.clone(),
                            previous: previous.to_string(),
                            found: record.reference_id().to_string(),
                        });
                    }
                }
                self.previous = Some(record.reference_id().to_string());
                Some(record)
            }
        };
        Ok(())
    }

    fn take_if_reference(&mut self, reference_id: &str) -> Option<MatchRecord> {
        let matches = self
            .head
            .as_ref()
            .is_some_and(|r| r.reference_id() == reference_id);
        if matches {
            self.head.take()
        } else {
            None
        }
    }
}
