/// A read-only snapshot of the browser address at one point in time.
///
/// Owned by the host environment; this crate only ever reads it.  Component
/// slicing follows the browser convention: `search` keeps its leading `?`,
/// `hash` its leading `#`, and both are empty strings when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    href: String,
    protocol: String,
    host: String,
    pathname: String,
    search: String,
    hash: String,
}

impl Location {
    /// Slice an href into its components.
    ///
    /// Accepts an absolute URL (`https://host/path?q#f`) or an origin-relative
    /// one (`/path?q#f`).  This is plain component slicing, not URL
    /// validation — route parsing stays with the caller-supplied parser.
    pub fn from_href(href: impl Into<String>) -> Self {
        let href = href.into();

        let (protocol, after_scheme) = match href.split_once("//") {
            Some((scheme, rest)) if scheme.ends_with(':') => (scheme.to_string(), rest),
            _ => (String::new(), href.as_str()),
        };

        let (host, rest) = if protocol.is_empty() {
            (String::new(), after_scheme)
        } else {
            match after_scheme.find(['/', '?', '#']) {
                Some(idx) => (after_scheme[..idx].to_string(), &after_scheme[idx..]),
                None => (after_scheme.to_string(), ""),
            }
        };

        let (before_hash, hash) = match rest.split_once('#') {
            Some((before, frag)) => (before, format!("#{frag}")),
            None => (rest, String::new()),
        };
        let (pathname, search) = match before_hash.split_once('?') {
            Some((path, query)) => (path.to_string(), format!("?{query}")),
            None => (before_hash.to_string(), String::new()),
        };

        Self {
            href,
            protocol,
            host,
            pathname,
            search,
            hash,
        }
    }

    /// The full address string.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Scheme including the trailing colon (e.g. `"https:"`), or empty for
    /// an origin-relative href.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Host and optional port, or empty for an origin-relative href.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Scheme plus host (e.g. `"https://example.com"`), or empty when no
    /// host is present.
    pub fn origin(&self) -> String {
        if self.host.is_empty() {
            String::new()
        } else {
            format!("{}//{}", self.protocol, self.host)
        }
    }

    /// Path component.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Query string including the leading `?`, or empty.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Query string without the leading `?`, or empty.
    pub fn query(&self) -> &str {
        self.search.strip_prefix('?').unwrap_or("")
    }

    /// Fragment including the leading `#`, or empty.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Fragment without the leading `#`, or empty.
    pub fn fragment(&self) -> &str {
        self.hash.strip_prefix('#').unwrap_or("")
    }
}
