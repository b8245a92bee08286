use super::endpoint::Endpoint;
use super::policy::{MatcherPolicy, PolicyEdge};
use super::request::RequestContext;
use std::cmp::Ordering;
use std::sync::Arc;

/// The universal catch-all edge key.
const WILDCARD_KEY: &str = "*:*";

/// A normalized `host:port` pattern.
///
/// The host part is lowercase. `*` matches any host; `*.suffix` matches
/// any host under `suffix` (so `foo.sub.example.com` falls under
/// `*.example.com`). `port == None` is the `*` port and matches any port.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HostPattern {
    host: String,
    port: Option<u16>,
}

impl HostPattern {
    /// Parse a raw pattern; infallible. A pattern without a port part
    /// normalizes to `host:*`; a suffix that is neither `*` nor a valid
    /// port number is treated as part of the host.
    fn parse(raw: &str) -> Self {
        let (host, port) = match raw.rsplit_once(':') {
            Some((host, "*")) => (host, None),
            Some((host, port)) => match port.parse::<u16>() {
                Ok(port) => (host, Some(port)),
                Err(_) => (raw, None),
            },
            None => (raw, None),
        };
        Self {
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    /// Canonical `host:port` form, used as the edge key.
    fn key(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => format!("{}:*", self.host),
        }
    }

    fn matches_any_host(&self) -> bool {
        self.host == "*"
    }

    fn has_host_wildcard(&self) -> bool {
        self.host.starts_with("*.")
    }

    fn is_universal(&self) -> bool {
        self.matches_any_host() && self.port.is_none()
    }

    /// Whether a concrete request host satisfies the host part.
    fn matches_host(&self, host: &str) -> bool {
        if self.matches_any_host() {
            return true;
        }
        if self.has_host_wildcard() {
            // Suffix including the leading dot, e.g. `.contoso.com`.
            let suffix = &self.host[1..];
            return host.len() >= suffix.len()
                && host[host.len() - suffix.len()..].eq_ignore_ascii_case(suffix);
        }
        host.eq_ignore_ascii_case(&self.host)
    }

    /// Specificity tier, lower = more specific:
    /// exact host:port, then exact host:* / *:port, then `*.suffix`
    /// wildcards, then the universal `*:*`.
    fn tier(&self) -> u8 {
        if self.is_universal() {
            3
        } else if self.has_host_wildcard() {
            2
        } else if self.matches_any_host() || self.port.is_none() {
            1
        } else {
            0
        }
    }

    /// Most-specific-first ordering. Within a tier, a concrete port beats
    /// the `*` port and a longer host suffix beats a shorter one; callers
    /// sort stably so equally specific keys keep first-seen order.
    fn specificity_cmp(&self, other: &Self) -> Ordering {
        self.tier()
            .cmp(&other.tier())
            .then_with(|| self.port.is_none().cmp(&other.port.is_none()))
            .then_with(|| other.host.len().cmp(&self.host.len()))
    }
}

/// Borrowed decomposition of a normalized edge key. Keys come out of
/// `HostPattern::key` already lowercase and in canonical `host:port`
/// form, so request-time matching needs no allocation.
struct EdgeKey<'a> {
    host: &'a str,
    port: Option<u16>,
}

impl<'a> EdgeKey<'a> {
    fn split(key: &'a str) -> Self {
        match key.rsplit_once(':') {
            Some((host, "*")) => Self { host, port: None },
            Some((host, port)) => match port.parse() {
                Ok(port) => Self { host, port: Some(port) },
                Err(_) => Self { host: key, port: None },
            },
            None => Self { host: key, port: None },
        }
    }

    /// Whether a concrete request host and port satisfy this key. A
    /// request without a host can only satisfy the universal key.
    fn matches(&self, host: Option<&str>, port: u16) -> bool {
        let Some(host) = host else {
            return self.host == "*" && self.port.is_none();
        };
        if let Some(required) = self.port {
            if required != port {
                return false;
            }
        }
        if self.host == "*" {
            return true;
        }
        if let Some(suffix) = self.host.strip_prefix('*') {
            // Suffix including the leading dot, e.g. `.contoso.com`.
            return host.len() >= suffix.len()
                && host[host.len() - suffix.len()..].eq_ignore_ascii_case(suffix);
        }
        host.eq_ignore_ascii_case(self.host)
    }
}

/// Discriminates endpoints by the `host:port` patterns their
/// `HostMetadata` advertises.
#[derive(Debug, Default)]
pub struct HostMatcherPolicy;

impl HostMatcherPolicy {
    fn endpoint_patterns(endpoint: &Endpoint) -> Vec<HostPattern> {
        endpoint
            .metadata()
            .host()
            .map(|m| m.hosts().iter().map(|h| HostPattern::parse(h)).collect())
            .unwrap_or_default()
    }
}

impl MatcherPolicy for HostMatcherPolicy {
    fn name(&self) -> &'static str {
        "host"
    }

    fn applies_to_endpoints(&self, endpoints: &[Arc<Endpoint>]) -> bool {
        // Declines unless some endpoint narrows the host: with only
        // empty, absent, or `*:*` metadata the edge set would collapse
        // into the single universal catch-all.
        endpoints.iter().any(|endpoint| {
            Self::endpoint_patterns(endpoint)
                .iter()
                .any(|pattern| !pattern.is_universal())
        })
    }

    fn edges(&self, endpoints: &[Arc<Endpoint>]) -> Vec<PolicyEdge> {
        // Every distinct normalized key plus the implicit catch-all.
        let mut keys = vec![HostPattern::parse(WILDCARD_KEY)];
        for endpoint in endpoints {
            for pattern in Self::endpoint_patterns(endpoint) {
                if !keys.contains(&pattern) {
                    keys.push(pattern);
                }
            }
        }

        keys.sort_by(|a, b| a.specificity_cmp(b));

        // Membership is an explicit inclusion test per endpoint per key:
        // exact normalized match, or an unconstrained endpoint (member of
        // every edge), or a wildcard pattern falling under a wildcard edge
        // key with the same port.
        let mut edges = Vec::with_capacity(keys.len());
        for key in &keys {
            let mut members = Vec::new();
            for endpoint in endpoints {
                let patterns = Self::endpoint_patterns(endpoint);
                let included = if patterns.is_empty() {
                    true
                } else {
                    patterns.iter().any(|pattern| {
                        pattern == key
                            || (key.has_host_wildcard()
                                && pattern.has_host_wildcard()
                                && key.port == pattern.port
                                && key.matches_host(&pattern.host))
                    })
                };
                if included {
                    members.push(endpoint.clone());
                }
            }
            edges.push(PolicyEdge {
                key: key.key(),
                endpoints: members,
            });
        }
        edges
    }

    fn select_edge<'a>(
        &self,
        edges: &'a [PolicyEdge],
        request: &RequestContext<'_>,
    ) -> Option<&'a PolicyEdge> {
        let host = request.host();
        let port = request.port();

        // Edges are pre-sorted most-specific-first, so the first hit wins
        // and `*:*` (always sorted last) is the catch-all.
        edges
            .iter()
            .find(|edge| EdgeKey::split(&edge.key).matches(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_endpoint(hosts: Option<&[&str]>) -> Arc<Endpoint> {
        let mut builder = Endpoint::builder("/");
        if let Some(hosts) = hosts {
            builder = builder
                .name(&format!("test: / - {}", hosts.join(", ")))
                .require_host(hosts.iter().copied());
        }
        builder.build().unwrap()
    }

    fn edge<'a>(edges: &'a [PolicyEdge], key: &str) -> &'a PolicyEdge {
        edges
            .iter()
            .find(|e| e.key == key)
            .unwrap_or_else(|| panic!("no edge with key '{}'", key))
    }

    fn member_names(edge: &PolicyEdge) -> Vec<&str> {
        edge.endpoints.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_pattern_normalization() {
        assert_eq!(HostPattern::parse("example.com").key(), "example.com:*");
        assert_eq!(HostPattern::parse("example.com:5000").key(), "example.com:5000");
        assert_eq!(HostPattern::parse("*:5000").key(), "*:5000");
        assert_eq!(HostPattern::parse("*:*").key(), "*:*");
        assert_eq!(HostPattern::parse("WWW.Contoso.COM").key(), "www.contoso.com:*");
    }

    #[test]
    fn test_edge_key_matching() {
        let key = EdgeKey::split("www.contoso.com:5000");
        assert!(key.matches(Some("WWW.Contoso.COM"), 5000));
        assert!(!key.matches(Some("www.contoso.com"), 8080));
        assert!(!key.matches(Some("other.contoso.com"), 5000));

        let key = EdgeKey::split("*.contoso.com:*");
        assert!(key.matches(Some("cdn.contoso.com"), 443));
        assert!(key.matches(Some("a.sub.contoso.com"), 80));
        assert!(!key.matches(Some("contoso.com"), 80));

        let key = EdgeKey::split("*:5000");
        assert!(key.matches(Some("anything.example.com"), 5000));
        assert!(!key.matches(Some("anything.example.com"), 5001));

        let key = EdgeKey::split("*:*");
        assert!(key.matches(Some("anything"), 80));
        assert!(key.matches(None, 80));
        assert!(!EdgeKey::split("www.contoso.com:*").matches(None, 80));
    }

    #[test]
    fn test_applies_endpoint_without_metadata() {
        let endpoints = vec![make_endpoint(None)];
        let policy = HostMatcherPolicy;
        assert!(!policy.applies_to_endpoints(&endpoints));
    }

    #[test]
    fn test_applies_endpoint_with_empty_hosts() {
        let endpoints = vec![make_endpoint(Some(&[]))];
        let policy = HostMatcherPolicy;
        assert!(!policy.applies_to_endpoints(&endpoints));
    }

    #[test]
    fn test_applies_only_universal_pattern() {
        let endpoints = vec![make_endpoint(Some(&["*:*"]))];
        let policy = HostMatcherPolicy;
        assert!(!policy.applies_to_endpoints(&endpoints));
    }

    #[test]
    fn test_applies_with_distinct_filters() {
        let endpoints = vec![make_endpoint(Some(&[])), make_endpoint(Some(&["localhost"]))];
        let policy = HostMatcherPolicy;
        assert!(policy.applies_to_endpoints(&endpoints));
    }

    #[test]
    fn test_edge_grouping() {
        let endpoints = vec![
            make_endpoint(Some(&["*:5000", "*:5001"])),
            make_endpoint(Some(&[])),
            make_endpoint(None),
            make_endpoint(Some(&["*.contoso.com:*"])),
            make_endpoint(Some(&["*.sub.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:5000"])),
            make_endpoint(Some(&["*:*"])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);
        assert_eq!(edges.len(), 7);

        let unconstrained = [endpoints[1].name(), endpoints[2].name()];

        let e = edge(&edges, "*:*");
        assert_eq!(
            member_names(e),
            vec![unconstrained[0], unconstrained[1], endpoints[7].name()]
        );

        let e = edge(&edges, "*:5000");
        assert_eq!(
            member_names(e),
            vec![endpoints[0].name(), unconstrained[0], unconstrained[1]]
        );

        let e = edge(&edges, "*:5001");
        assert_eq!(
            member_names(e),
            vec![endpoints[0].name(), unconstrained[0], unconstrained[1]]
        );

        // A narrower subdomain wildcard also satisfies the broader one.
        let e = edge(&edges, "*.contoso.com:*");
        assert_eq!(
            member_names(e),
            vec![
                unconstrained[0],
                unconstrained[1],
                endpoints[3].name(),
                endpoints[4].name(),
            ]
        );

        let e = edge(&edges, "*.sub.contoso.com:*");
        assert_eq!(
            member_names(e),
            vec![unconstrained[0], unconstrained[1], endpoints[4].name()]
        );

        let e = edge(&edges, "www.contoso.com:*");
        assert_eq!(
            member_names(e),
            vec![unconstrained[0], unconstrained[1], endpoints[5].name()]
        );

        let e = edge(&edges, "www.contoso.com:5000");
        assert_eq!(
            member_names(e),
            vec![unconstrained[0], unconstrained[1], endpoints[6].name()]
        );
    }

    #[test]
    fn test_edges_ordered_most_specific_first() {
        let endpoints = vec![
            make_endpoint(Some(&["*:*"])),
            make_endpoint(Some(&["*.contoso.com:*"])),
            make_endpoint(Some(&["*.sub.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:5000"])),
            make_endpoint(Some(&["*:5000"])),
        ];
        let policy = HostMatcherPolicy;
        let keys: Vec<String> = policy.edges(&endpoints).into_iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![
                "www.contoso.com:5000",
                "*:5000",
                "www.contoso.com:*",
                "*.sub.contoso.com:*",
                "*.contoso.com:*",
                "*:*",
            ]
        );
    }

    #[test]
    fn test_select_prefers_specific_port() {
        let endpoints = vec![
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:5000"])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "www.contoso.com:5000", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "www.contoso.com:5000");

        let request = RequestContext::new("/", "www.contoso.com:8080", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "www.contoso.com:*");
    }

    #[test]
    fn test_select_wildcard_suffix() {
        let endpoints = vec![
            make_endpoint(Some(&["*.contoso.com:*"])),
            make_endpoint(Some(&["www.contoso.com:*"])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "cdn.contoso.com", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "*.contoso.com:*");
    }

    #[test]
    fn test_select_falls_back_to_catchall() {
        let endpoints = vec![
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(None),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "other.example.com", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "*:*");
        assert_eq!(selected.endpoints.len(), 1);
    }

    #[test]
    fn test_select_default_port_by_scheme() {
        let endpoints = vec![
            make_endpoint(Some(&["example.com:443"])),
            make_endpoint(Some(&["example.com:80"])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "example.com", true);
        assert_eq!(policy.select_edge(&edges, &request).unwrap().key, "example.com:443");

        let request = RequestContext::new("/", "example.com", false);
        assert_eq!(policy.select_edge(&edges, &request).unwrap().key, "example.com:80");
    }

    #[test]
    fn test_select_host_case_insensitive() {
        let endpoints = vec![
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(Some(&["other.contoso.com:*"])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "WWW.Contoso.COM", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "www.contoso.com:*");
    }

    #[test]
    fn test_select_without_host_uses_catchall_only() {
        let endpoints = vec![
            make_endpoint(Some(&["www.contoso.com:*"])),
            make_endpoint(Some(&[])),
        ];
        let policy = HostMatcherPolicy;
        let edges = policy.edges(&endpoints);

        let request = RequestContext::new("/", "", false);
        let selected = policy.select_edge(&edges, &request).unwrap();
        assert_eq!(selected.key, "*:*");
    }
}
