use crate::error::MatcherError;
use std::sync::Arc;

/// Host-restriction capability attached to an endpoint.
///
/// An empty pattern list means any host is accepted. This is distinct from
/// an explicit `*:*` entry, which is a universal pattern with its own
/// precedence during edge grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMetadata {
    hosts: Vec<String>,
}

impl HostMetadata {
    /// Build from raw patterns. Empty-string entries are a configuration
    /// defect and fail fast.
    pub fn new(hosts: Vec<String>) -> Result<Self, MatcherError> {
        if hosts.iter().any(|h| h.is_empty()) {
            return Err(MatcherError::EmptyHostPattern);
        }
        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

/// The closed capability set an endpoint advertises.
///
/// Policies pull the criteria they need through typed accessors; there is
/// no type-erased object list and no runtime type inspection.
#[derive(Debug, Clone, Default)]
pub struct MetadataSet {
    host: Option<HostMetadata>,
}

impl MetadataSet {
    pub fn host(&self) -> Option<&HostMetadata> {
        self.host.as_ref()
    }
}

/// One segment of a parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Matches the request segment exactly (ASCII-case-insensitive).
    /// Stored lowercased.
    Literal(String),
    /// `{name}` — matches any single request segment.
    Parameter(String),
}

/// A parsed path pattern such as `/v1/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, MatcherError> {
        if !raw.is_empty() && !raw.starts_with('/') {
            return Err(MatcherError::InvalidPattern {
                pattern: raw.to_string(),
                reason: "must be empty or start with '/'".to_string(),
            });
        }

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|p| !p.is_empty()) {
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() || name.contains(['{', '}']) {
                    return Err(MatcherError::InvalidPattern {
                        pattern: raw.to_string(),
                        reason: format!("malformed parameter segment '{}'", part),
                    });
                }
                segments.push(PatternSegment::Parameter(name.to_string()));
            } else if part.contains(['{', '}']) {
                return Err(MatcherError::InvalidPattern {
                    pattern: raw.to_string(),
                    reason: format!("unbalanced braces in segment '{}'", part),
                });
            } else {
                segments.push(PatternSegment::Literal(part.to_ascii_lowercase()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }
}

/// A registered destination: path pattern, priority, metadata, name.
///
/// Immutable once built. The match table holds `Arc` references and is
/// rebuilt wholesale when the registration changes.
#[derive(Debug)]
pub struct Endpoint {
    name: String,
    pattern: PathPattern,
    order: i32,
    metadata: MetadataSet,
}

impl Endpoint {
    pub fn builder(path: &str) -> EndpointBuilder {
        EndpointBuilder {
            path: path.to_string(),
            name: None,
            order: 0,
            hosts: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Lower order wins when several endpoints survive the policy chain.
    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn metadata(&self) -> &MetadataSet {
        &self.metadata
    }
}

/// Fluent construction surface for endpoints.
pub struct EndpointBuilder {
    path: String,
    name: Option<String>,
    order: i32,
    hosts: Option<Vec<String>>,
}

impl EndpointBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Restrict matching to the given host patterns (`example.com`,
    /// `*.example.com`, `*:5000`, `host:port`, `*:*`). An empty list is
    /// legal and means any host. Entries are validated in `build`.
    pub fn require_host<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<Arc<Endpoint>, MatcherError> {
        let pattern = PathPattern::parse(&self.path)?;
        let host = match self.hosts {
            Some(hosts) => Some(HostMetadata::new(hosts)?),
            None => None,
        };
        let name = self.name.unwrap_or_else(|| self.path.clone());
        Ok(Arc::new(Endpoint {
            name,
            pattern,
            order: self.order,
            metadata: MetadataSet { host },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_pattern() {
        let pattern = PathPattern::parse("/v1/Users").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                PatternSegment::Literal("v1".to_string()),
                PatternSegment::Literal("users".to_string()),
            ]
        );
        assert_eq!(pattern.raw(), "/v1/Users");
    }

    #[test]
    fn test_parse_parameter_pattern() {
        let pattern = PathPattern::parse("/v1/users/{id}").unwrap();
        assert_eq!(
            pattern.segments()[2],
            PatternSegment::Parameter("id".to_string())
        );
    }

    #[test]
    fn test_parse_root_and_empty() {
        assert!(PathPattern::parse("/").unwrap().segments().is_empty());
        assert!(PathPattern::parse("").unwrap().segments().is_empty());
    }

    #[test]
    fn test_parse_rejects_relative_pattern() {
        assert!(PathPattern::parse("users/list").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_parameter() {
        assert!(PathPattern::parse("/v1/{}").is_err());
        assert!(PathPattern::parse("/v1/{id").is_err());
        assert!(PathPattern::parse("/v1/id}").is_err());
        assert!(PathPattern::parse("/v1/{{id}}").is_err());
    }

    #[test]
    fn test_host_metadata_rejects_empty_entry() {
        let err = HostMetadata::new(vec!["a.com".to_string(), String::new()]).unwrap_err();
        assert!(matches!(err, MatcherError::EmptyHostPattern));
    }

    #[test]
    fn test_host_metadata_empty_list_is_legal() {
        let metadata = HostMetadata::new(vec![]).unwrap();
        assert!(metadata.hosts().is_empty());
    }

    #[test]
    fn test_builder_defaults() {
        let endpoint = Endpoint::builder("/v1/users").build().unwrap();
        assert_eq!(endpoint.name(), "/v1/users");
        assert_eq!(endpoint.order(), 0);
        assert!(endpoint.metadata().host().is_none());
    }

    #[test]
    fn test_builder_require_host() {
        let endpoint = Endpoint::builder("/")
            .name("api")
            .order(-1)
            .require_host(["api.example.com:5000"])
            .build()
            .unwrap();
        assert_eq!(endpoint.name(), "api");
        assert_eq!(endpoint.order(), -1);
        assert_eq!(
            endpoint.metadata().host().unwrap().hosts(),
            &["api.example.com:5000".to_string()]
        );
    }

    #[test]
    fn test_builder_rejects_empty_host_entry() {
        let result = Endpoint::builder("/").require_host([""]).build();
        assert!(result.is_err());
    }
}
