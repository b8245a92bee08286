use http::uri::Authority;

/// The per-request view the matcher consumes: a path plus the resolved
/// host and port. Tokenization and traversal never mutate it, so one
/// context can be matched against any number of tables.
#[derive(Debug)]
pub struct RequestContext<'a> {
    path: &'a str,
    authority: Option<Authority>,
    secure: bool,
}

impl<'a> RequestContext<'a> {
    /// `host` is the raw `Host` header value and may carry a port. A value
    /// that does not parse as an authority is treated as no host at all —
    /// only universal host edges can match such a request.
    pub fn new(path: &'a str, host: &str, secure: bool) -> Self {
        let authority = host.parse::<Authority>().ok();
        if authority.is_none() && !host.is_empty() {
            tracing::debug!("matching: unparseable host '{}', treating as absent", host);
        }
        Self {
            path: strip_query(path),
            authority,
            secure,
        }
    }

    /// Request path with any query string removed.
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn host(&self) -> Option<&str> {
        self.authority.as_ref().map(|a| a.host())
    }

    /// Effective port: explicit in the host header, else the scheme default.
    pub fn port(&self) -> u16 {
        self.authority
            .as_ref()
            .and_then(|a| a.port_u16())
            .unwrap_or(if self.secure { 443 } else { 80 })
    }
}

fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}
