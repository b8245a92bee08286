use serde::{Deserialize, Serialize};

/// Top-level matcher configuration: the endpoint registration list,
/// supplied wholesale and compiled into an immutable match table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

/// One registered endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,

    /// Path pattern, e.g. `/v1/users/{id}`.
    pub path: String,

    /// Lower order wins when several endpoints survive matching.
    #[serde(default)]
    pub order: i32,

    /// Host patterns (`example.com`, `*.example.com`, `*:5000`, `*:*`).
    /// Absent means the endpoint carries no host metadata at all; present
    /// but empty is an explicit "any host" restriction. The two behave
    /// the same at request time but are grouped differently into edges.
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
}
