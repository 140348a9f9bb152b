//! Latest-request-wins bookkeeping for screens that reload a collection.
//!
//! Every reload is tagged with a sequence number. A response is only applied
//! when its tag is still the most recent one issued by the screen, so a slow
//! response to a superseded reload can never overwrite fresher data.
use crate::core::summary::Slice;
use std::future::Future;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTag(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> RequestTag {
        self.latest += 1;
        RequestTag(self.latest)
    }

    pub fn is_latest(&self, tag: RequestTag) -> bool {
        tag.0 == self.latest
    }
}

/// A collection owned by one screen, reloaded in full after each write.
#[derive(Debug)]
pub struct ListScreen<T> {
    name: &'static str,
    sequencer: RequestSequencer,
    items: Slice<Vec<T>>,
}

impl<T> ListScreen<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sequencer: RequestSequencer::new(),
            items: Slice::Pending,
        }
    }

    pub fn begin_reload(&mut self) -> RequestTag {
        self.sequencer.next()
    }

    /// Applies a response. Returns `false` when the response was discarded
    /// because a newer reload had been issued in the meantime.
    pub fn apply(&mut self, tag: RequestTag, result: anyhow::Result<Vec<T>>) -> bool {
        if !self.sequencer.is_latest(tag) {
            debug!(screen = self.name, ?tag, "Discarding superseded response");
            return false;
        }
        let previous = std::mem::replace(&mut self.items, Slice::Pending);
        self.items = match result {
            Ok(items) => Slice::Loaded(items),
            Err(e) => previous.fail(format!("{e:#}")),
        };
        true
    }

    /// Issues a tagged reload and applies its response.
    pub async fn reload<Fut>(&mut self, request: Fut) -> bool
    where
        Fut: Future<Output = anyhow::Result<Vec<T>>>,
    {
        let tag = self.begin_reload();
        let result = request.await;
        self.apply(tag, result)
    }

    pub fn items(&self) -> &Slice<Vec<T>> {
        &self.items
    }
}
