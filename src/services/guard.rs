//! Stale-response guard.
//!
//! Each request is tagged with the selection key active when it was issued
//! and a sequence number. Only the most recently issued tag is current;
//! responses carrying any other tag are discarded when they arrive.

/// Tag carried by an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag<K> {
    key: K,
    seq: u64,
}

impl<K> RequestTag<K> {
    /// Selection key the request was issued for.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Accepts only the response to the latest request.
#[derive(Debug)]
pub struct LatestOnly<K> {
    seq: u64,
    current: Option<RequestTag<K>>,
}

impl<K> Default for LatestOnly<K> {
    fn default() -> Self {
        Self {
            seq: 0,
            current: None,
        }
    }
}

impl<K: Clone + PartialEq> LatestOnly<K> {
    /// Issue a tag for a new request, superseding any in flight.
    pub fn issue(&mut self, key: K) -> RequestTag<K> {
        self.seq += 1;
        let tag = RequestTag { key, seq: self.seq };
        self.current = Some(tag.clone());
        tag
    }

    /// Whether `tag` belongs to the latest unsettled request.
    pub fn is_current(&self, tag: &RequestTag<K>) -> bool {
        self.current.as_ref() == Some(tag)
    }

    /// Settle `tag`. Returns `false` when the response is stale.
    pub fn settle(&mut self, tag: &RequestTag<K>) -> bool {
        if self.is_current(tag) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Key of the request still awaiting its response, if any.
    pub fn in_flight(&self) -> Option<&K> {
        self.current.as_ref().map(RequestTag::key)
    }

    /// Forget the in-flight request so its response is discarded.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}
