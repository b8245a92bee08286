mod endpoint;
mod host;
mod policy;
mod request;
mod table;
mod tokenizer;

pub use endpoint::{
    Endpoint, EndpointBuilder, HostMetadata, MetadataSet, PathPattern, PatternSegment,
};
pub use host::HostMatcherPolicy;
pub use policy::{MatcherPolicy, PolicyEdge};
pub use request::RequestContext;
pub use table::{MatchOutcome, MatchTable, MatchTableBuilder, MAX_PATH_DEPTH};
pub use tokenizer::{tokenize, PathSegment};
