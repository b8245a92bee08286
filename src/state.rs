use crate::matching::{Endpoint, MatchOutcome, MatchTable, MatchTableBuilder, RequestContext};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Shared handle to the live match table.
///
/// The table is read lock-free by any number of concurrent requests;
/// `rebuild` publishes a complete replacement atomically, so in-flight
/// requests always observe either the old or the new table, never a
/// partial one. Cheaply cloneable.
#[derive(Clone)]
pub struct SharedMatcher {
    table: Arc<ArcSwap<MatchTable>>,
    builder: Arc<MatchTableBuilder>,
}

impl SharedMatcher {
    pub fn new(builder: MatchTableBuilder, endpoints: &[Arc<Endpoint>]) -> Self {
        let table = builder.build(endpoints);
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
            builder: Arc::new(builder),
        }
    }

    /// Build a table from a fresh endpoint registration and swap it in.
    pub fn rebuild(&self, endpoints: &[Arc<Endpoint>]) {
        let table = self.builder.build(endpoints);
        self.table.store(Arc::new(table));
        tracing::info!(
            "matching: published new match table, endpoints={}",
            endpoints.len()
        );
    }

    pub fn match_request(&self, request: &RequestContext<'_>) -> MatchOutcome {
        self.table.load().match_request(request)
    }

    pub fn endpoint_count(&self) -> usize {
        self.table.load().endpoint_count()
    }
}
