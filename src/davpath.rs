//! Request URL construction.
//!
//! Every request URL is the base URL, rebased to end in exactly one `/`,
//! followed by a path relative to it.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::DavResult;

// Characters that cannot appear raw in a request path. '%' is left alone
// so that already-encoded hrefs pass through unchanged.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'^')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// The base URL of a WebDAV share, always ending in a single `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Parse a base URL, optionally overriding its port.
    pub fn new(url: &str, port: Option<u16>) -> DavResult<BaseUrl> {
        let mut u = Url::parse(url.trim())?;
        if port.is_some() && u.set_port(port).is_err() {
            return Err(crate::DavError::InvalidUrl(format!(
                "{}: cannot carry a port",
                url
            )));
        }
        let s = u.as_str().trim_end_matches('/');
        Ok(BaseUrl(format!("{}/", s)))
    }

    /// The base URL as a string, including the trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a path relative to the base. Backslashes become slashes,
    /// spaces and other unsafe characters are percent-encoded.
    pub fn join(&self, href: &str) -> String {
        let href = href.replace('\\', "/");
        let href = href.trim_start_matches('/');
        format!("{}{}", self.0, utf8_percent_encode(href, PATH_ENCODE_SET))
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
