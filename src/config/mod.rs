pub mod types;


pub use types::*;

use crate::error::MatcherError;
use crate::matching::Endpoint;
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

impl MatcherConfig {
    /// Load configuration from a `.toml` or `.json` file, selected by
    /// extension, and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MatcherConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some(ext) => anyhow::bail!("unsupported config format: .{ext}, use .toml or .json"),
            None => anyhow::bail!("config file has no extension, use .toml or .json"),
        };

        config.validate()?;
        tracing::info!(
            endpoints = config.endpoints.len(),
            "loaded matcher configuration from {}",
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.is_empty() {
                anyhow::bail!("endpoint with path '{}' has an empty name", endpoint.path);
            }
            if !seen.insert(endpoint.name.as_str()) {
                anyhow::bail!("duplicate endpoint name '{}'", endpoint.name);
            }
            if !endpoint.path.is_empty() && !endpoint.path.starts_with('/') {
                anyhow::bail!(
                    "endpoint '{}' has a path that does not start with '/'",
                    endpoint.name
                );
            }
            if let Some(hosts) = &endpoint.hosts {
                for host in hosts {
                    if host.is_empty() {
                        anyhow::bail!("endpoint '{}' has an empty host entry", endpoint.name);
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the immutable endpoint list this registration describes.
    pub fn build_endpoints(&self) -> Result<Vec<Arc<Endpoint>>, MatcherError> {
        self.endpoints
            .iter()
            .map(|endpoint| {
                let mut builder = Endpoint::builder(&endpoint.path)
                    .name(&endpoint.name)
                    .order(endpoint.order);
                if let Some(hosts) = &endpoint.hosts {
                    builder = builder.require_host(hosts.iter().cloned());
                }
                builder.build()
            })
            .collect()
    }
}
