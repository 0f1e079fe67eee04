//! Combine-all-latest over a fixed set of container state streams.
//!
//! Produces nothing until every source has produced a value, then one
//! combined snapshot per source emission. A source that ends before
//! producing anything is left out of the snapshot instead of holding it back.

use futures::stream::{self, select_all, BoxStream, SelectAll};
use futures::StreamExt;
use serde_json::Value;

use crate::domain::{CombinedSnapshot, ContainerId};
use crate::ports::StateStream;

pub(crate) struct CombineLatest {
    ids: Vec<ContainerId>,
    latest: Vec<Option<Value>>,
    missing: usize,
    sources: SelectAll<BoxStream<'static, (usize, Option<Value>)>>,
}

impl CombineLatest {
    pub(crate) fn new(sources: Vec<(ContainerId, StateStream)>) -> Self {
        let mut ids = Vec::with_capacity(sources.len());
        let mut tagged = Vec::with_capacity(sources.len());
        for (index, (id, source)) in sources.into_iter().enumerate() {
            ids.push(id);
            // `None` marks the end of the source
            tagged.push(
                source
                    .map(Some)
                    .chain(stream::once(async { None }))
                    .map(move |value| (index, value))
                    .boxed(),
            );
        }

        Self {
            latest: vec![None; ids.len()],
            missing: ids.len(),
            ids,
            sources: select_all(tagged),
        }
    }

    /// Wait for the next combined snapshot.
    ///
    /// Returns `None` once every source has ended, or immediately when there
    /// are no sources.
    pub(crate) async fn next_snapshot(&mut self) -> Option<CombinedSnapshot> {
        loop {
            let (index, value) = self.sources.next().await?;
            match value {
                Some(value) => {
                    if self.latest[index].replace(value).is_none() {
                        self.missing -= 1;
                    }
                }
                None if self.latest[index].is_none() => {
                    self.missing -= 1;
                    if self.missing > 0 || self.latest.iter().all(Option::is_none) {
                        continue;
                    }
                }
                None => continue,
            }
            if self.missing == 0 {
                return Some(self.snapshot());
            }
        }
    }

    fn snapshot(&self) -> CombinedSnapshot {
        self.ids
            .iter()
            .zip(&self.latest)
            .filter_map(|(id, value)| value.clone().map(|value| (id.clone(), value)))
            .collect()
    }
}
