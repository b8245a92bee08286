use super::endpoint::Endpoint;
use super::request::RequestContext;
use std::sync::Arc;

/// A group of endpoints sharing one equivalence class of a policy's
/// discriminating attribute. `key` is the normalized, comparable state.
///
/// Edges are inclusive supersets by specificity, not a partition: an
/// endpoint appears in every edge whose key it satisfies, so selecting a
/// single edge at request time always yields the full candidate set.
#[derive(Debug, Clone)]
pub struct PolicyEdge {
    pub key: String,
    pub endpoints: Vec<Arc<Endpoint>>,
}

/// A pluggable discrimination unit for the match table.
///
/// Policies are registered in a fixed order and evaluated in that order at
/// request time; a request must satisfy every applicable policy's edge
/// selection to reach a candidate endpoint.
pub trait MatcherPolicy: Send + Sync {
    /// Diagnostic name used in build logs.
    fn name(&self) -> &'static str;

    /// Whether this policy can discriminate between the given endpoints.
    /// A policy whose edges would collapse into a single universal
    /// catch-all declines, so the table builder skips it at that node.
    fn applies_to_endpoints(&self, endpoints: &[Arc<Endpoint>]) -> bool;

    /// Group `endpoints` into edges, most specific first. Implementations
    /// uphold the superset rule: every endpoint appears under every edge
    /// key it satisfies, and unconstrained endpoints appear under all of
    /// them.
    fn edges(&self, endpoints: &[Arc<Endpoint>]) -> Vec<PolicyEdge>;

    /// Pick the edge the request falls into, or `None` when not even a
    /// catch-all edge applies — the request then cannot match at this node.
    fn select_edge<'a>(
        &self,
        edges: &'a [PolicyEdge],
        request: &RequestContext<'_>,
    ) -> Option<&'a PolicyEdge>;
}
