//! Standardized span constructors for bot observability.

pub mod spans {
    use tracing::{info_span, Span};

    /// Span for one connection attempt.
    pub fn connection(server: &str, attempt: u32) -> Span {
        info_span!("connection", server = %server, attempt = attempt)
    }

    /// Span for one lint request, covering fetch through reply.
    pub fn lint_request(user: &str, url: &str) -> Span {
        info_span!("lint_request", user = %user, url = %url)
    }
}
