use super::endpoint::{Endpoint, PatternSegment};
use super::host::HostMatcherPolicy;
use super::policy::{MatcherPolicy, PolicyEdge};
use super::request::RequestContext;
use super::tokenizer::{self, PathSegment};
use std::collections::HashMap;
use std::sync::Arc;

/// Size of the per-request segment buffer. Requests that fill it are
/// treated as no-match rather than matched against a truncated path.
pub const MAX_PATH_DEPTH: usize = 32;

/// Terminal result of matching one request.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Selected(Arc<Endpoint>),
    /// Several endpoints with equal top priority survived the policy
    /// chain. A configuration defect — reported, never silently resolved.
    Ambiguous(Vec<Arc<Endpoint>>),
    /// No applicable endpoint. A normal terminal state, not a failure.
    NoMatch,
}

/// One applicable policy at a terminal node, with its edges precomputed
/// at build time.
struct NodePolicy {
    policy: Arc<dyn MatcherPolicy>,
    edges: Vec<PolicyEdge>,
}

/// Candidates and cached policy edges where one or more patterns end.
#[derive(Default)]
struct Leaf {
    endpoints: Vec<Arc<Endpoint>>,
    policies: Vec<NodePolicy>,
}

/// One path-shape node: literal children keyed by lowercase segment text,
/// plus a permissive parameter child.
#[derive(Default)]
struct Node {
    literals: HashMap<String, Node>,
    parameter: Option<Box<Node>>,
    leaf: Option<Leaf>,
}

/// Composes the path-shape tree and per-node policy edges into a static
/// lookup structure.
///
/// Policies run in registration order. The standard chain carries host
/// matching only; additional policies are fixed at build time via
/// explicit composition, never loaded dynamically.
pub struct MatchTableBuilder {
    policies: Vec<Arc<dyn MatcherPolicy>>,
}

impl Default for MatchTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTableBuilder {
    pub fn new() -> Self {
        Self {
            policies: vec![Arc::new(HostMatcherPolicy)],
        }
    }

    /// Append a policy; it evaluates after the ones already registered.
    pub fn with_policy(mut self, policy: Arc<dyn MatcherPolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    /// Build the decision structure for an endpoint registration.
    ///
    /// Endpoints are grouped by path shape first; at each terminal node
    /// every applicable policy's edges are computed and cached, so request
    /// matching never scans the full endpoint set. O(endpoints × policies),
    /// once per registration change.
    pub fn build(&self, endpoints: &[Arc<Endpoint>]) -> MatchTable {
        let mut root = Node::default();
        for endpoint in endpoints {
            let mut node = &mut root;
            for segment in endpoint.pattern().segments() {
                node = match segment {
                    PatternSegment::Literal(text) => {
                        node.literals.entry(text.clone()).or_default()
                    }
                    PatternSegment::Parameter(_) => {
                        node.parameter.get_or_insert_with(Box::default).as_mut()
                    }
                };
            }
            node.leaf
                .get_or_insert_with(Leaf::default)
                .endpoints
                .push(endpoint.clone());
        }

        attach_policies(&mut root, &self.policies);

        tracing::info!("matching: built match table, endpoints={}", endpoints.len());
        MatchTable {
            root,
            endpoint_count: endpoints.len(),
        }
    }
}

/// The static decision structure: a path-shape tree refined by per-node
/// policy edges. Built once, then read concurrently without locking;
/// registration changes rebuild it wholesale.
pub struct MatchTable {
    root: Node,
    endpoint_count: usize,
}

impl MatchTable {
    /// Resolve a request to the single best endpoint, an ambiguity
    /// report, or no-match.
    pub fn match_request(&self, request: &RequestContext<'_>) -> MatchOutcome {
        let path = request.path();
        let mut segments = [PathSegment::default(); MAX_PATH_DEPTH];
        let count = tokenizer::tokenize(path, &mut segments);
        if count == MAX_PATH_DEPTH {
            // A full buffer only means overflow when path text remains
            // past the last tokenized segment; a path of exactly
            // MAX_PATH_DEPTH segments is fully tokenized and matchable.
            let consumed = segments[count - 1].start + segments[count - 1].len;
            if path.as_bytes()[consumed..].iter().any(|&b| b != b'/') {
                tracing::warn!(
                    "matching: path depth exceeds the {} segment limit, treating as no match",
                    MAX_PATH_DEPTH
                );
                return MatchOutcome::NoMatch;
            }
        }

        let Some(leaf) = descend(&self.root, path, &segments[..count]) else {
            return MatchOutcome::NoMatch;
        };

        // Policy chain: each applicable policy narrows the candidates.
        let mut candidates: Vec<&Arc<Endpoint>> = leaf.endpoints.iter().collect();
        for node_policy in &leaf.policies {
            let Some(edge) = node_policy.policy.select_edge(&node_policy.edges, request) else {
                tracing::debug!(
                    "matching: policy '{}' selected no edge",
                    node_policy.policy.name()
                );
                return MatchOutcome::NoMatch;
            };
            candidates.retain(|candidate| {
                edge.endpoints.iter().any(|member| Arc::ptr_eq(member, *candidate))
            });
            if candidates.is_empty() {
                return MatchOutcome::NoMatch;
            }
        }

        // Lower order wins. Equal top order across several survivors is a
        // configuration defect, reported as ambiguous.
        let best = candidates.iter().map(|c| c.order()).min().unwrap();
        let mut winners: Vec<Arc<Endpoint>> = candidates
            .into_iter()
            .filter(|c| c.order() == best)
            .cloned()
            .collect();
        match winners.len() {
            1 => MatchOutcome::Selected(winners.remove(0)),
            _ => {
                tracing::warn!(
                    "matching: ambiguous match, {} endpoints with order {}",
                    winners.len(),
                    best
                );
                MatchOutcome::Ambiguous(winners)
            }
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoint_count
    }
}

/// Depth-first descent: literal children exactly (case-insensitive),
/// parameter children permissively. A matching literal child is tried
/// first, but when its subtree dead-ends the parameter child is still
/// tried, so a parameter pattern stays reachable even when an unrelated
/// literal pattern shares a prefix segment.
fn descend<'t>(node: &'t Node, path: &str, segments: &[PathSegment]) -> Option<&'t Leaf> {
    let Some((segment, rest)) = segments.split_first() else {
        return node.leaf.as_ref();
    };
    let text = segment.of(path);
    if let Some(child) = node.literals.get(&text.to_ascii_lowercase()) {
        if let Some(leaf) = descend(child, path, rest) {
            return Some(leaf);
        }
    }
    match node.parameter.as_deref() {
        Some(child) => descend(child, path, rest),
        None => None,
    }
}

/// Precompute each applicable policy's edges at every terminal node.
fn attach_policies(node: &mut Node, policies: &[Arc<dyn MatcherPolicy>]) {
    if let Some(leaf) = node.leaf.as_mut() {
        for policy in policies {
            if policy.applies_to_endpoints(&leaf.endpoints) {
                let edges = policy.edges(&leaf.endpoints);
                tracing::debug!(
                    "matching: policy '{}' produced {} edges at node",
                    policy.name(),
                    edges.len()
                );
                leaf.policies.push(NodePolicy {
                    policy: policy.clone(),
                    edges,
                });
            }
        }
    }
    for child in node.literals.values_mut() {
        attach_policies(child, policies);
    }
    if let Some(parameter) = node.parameter.as_mut() {
        attach_policies(parameter, policies);
    }
}
