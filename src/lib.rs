//! Request-routing matcher core: compiles an endpoint registration
//! (path patterns plus matching metadata such as allowed hosts) into a
//! static decision structure, then resolves each incoming request to the
//! single best endpoint, an ambiguity report, or no-match.

pub mod config;
pub mod error;
pub mod matching;
pub mod state;

pub use error::MatcherError;
pub use matching::{
    Endpoint, EndpointBuilder, HostMatcherPolicy, HostMetadata, MatchOutcome, MatchTable,
    MatchTableBuilder, MatcherPolicy, PolicyEdge, RequestContext,
};
pub use state::SharedMatcher;
