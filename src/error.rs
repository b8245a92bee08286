use std::fmt;

#[derive(Debug)]
pub enum MatcherError {
    EmptyHostPattern,
    InvalidPattern { pattern: String, reason: String },
    Config(String),
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherError::EmptyHostPattern => {
                write!(f, "host pattern list contains an empty entry")
            }
            MatcherError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid path pattern '{}': {}", pattern, reason)
            }
            MatcherError::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for MatcherError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_host_pattern() {
        assert_eq!(
            MatcherError::EmptyHostPattern.to_string(),
            "host pattern list contains an empty entry"
        );
    }

    #[test]
    fn display_invalid_pattern() {
        assert_eq!(
            MatcherError::InvalidPattern {
                pattern: "users/{id}".to_string(),
                reason: "must be empty or start with '/'".to_string(),
            }
            .to_string(),
            "invalid path pattern 'users/{id}': must be empty or start with '/'"
        );
    }

    #[test]
    fn display_config() {
        assert_eq!(
            MatcherError::Config("bad toml".to_string()).to_string(),
            "config error: bad toml"
        );
    }
}
