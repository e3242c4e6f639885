use std::time::SystemTime;

use bitflags::bitflags;
use headers::Header;
use http::HeaderValue;

bitflags! {
    /// The WebDAV methods this client issues.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DavMethod: u32 {
        const PUT = 0x0004;
        const PROPFIND = 0x0020;
        const MKCOL = 0x0080;
        const MOVE = 0x0200;
        const DELETE = 0x0400;

        const WEBDAV_BODY = Self::PUT.bits() | Self::PROPFIND.bits();
    }
}

const METHOD_NAMES: &[(DavMethod, &str)] = &[
    (DavMethod::PUT, "PUT"),
    (DavMethod::PROPFIND, "PROPFIND"),
    (DavMethod::MKCOL, "MKCOL"),
    (DavMethod::MOVE, "MOVE"),
    (DavMethod::DELETE, "DELETE"),
];

impl DavMethod {
    /// Method name as it goes on the wire. Empty for anything but a
    /// single method.
    pub fn as_str(&self) -> &'static str {
        METHOD_NAMES
            .iter()
            .find(|(m, _)| m == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }
}

// translate our own enum into a http::Method. only a single method
// has a name, a combination of flags is handed back.
impl std::convert::TryFrom<DavMethod> for http::Method {
    type Error = DavMethod;

    fn try_from(m: DavMethod) -> Result<http::Method, DavMethod> {
        let name = match METHOD_NAMES.iter().find(|(n, _)| *n == m) {
            Some((_, name)) => name,
            None => return Err(m),
        };
        http::Method::from_bytes(name.as_bytes()).map_err(|_| m)
    }
}

impl std::fmt::Display for DavMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an HTTP date ("Sun, 06 Nov 1994 08:49:37 GMT"), as used in
/// `getlastmodified`.
pub fn httpdate_to_systemtime(s: &str) -> Option<SystemTime> {
    let v = HeaderValue::from_str(s.trim()).ok()?;
    let d = headers::Date::decode(&mut std::iter::once(&v)).ok()?;
    Some(SystemTime::from(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_httpdate() {
        let t = httpdate_to_systemtime("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(t, UNIX_EPOCH + Duration::from_secs(784111777));
        assert!(httpdate_to_systemtime("yesterday").is_none());
    }

    #[test]
    fn test_http_method() {
        let m = http::Method::try_from(DavMethod::PROPFIND).unwrap();
        assert_eq!(m.as_str(), "PROPFIND");
        assert_eq!(http::Method::try_from(DavMethod::PUT).unwrap(), http::Method::PUT);
        assert_eq!(
            http::Method::try_from(DavMethod::DELETE).unwrap(),
            http::Method::DELETE
        );
        assert_eq!(http::Method::try_from(DavMethod::MKCOL).unwrap().as_str(), "MKCOL");
        assert_eq!(http::Method::try_from(DavMethod::MOVE).unwrap().as_str(), "MOVE");
    }

    #[test]
    fn test_combined_flags_have_no_method() {
        let both = DavMethod::PUT | DavMethod::MKCOL;
        assert_eq!(http::Method::try_from(both), Err(both));
        assert!(http::Method::try_from(DavMethod::WEBDAV_BODY).is_err());
        assert!(http::Method::try_from(DavMethod::empty()).is_err());
        assert_eq!(both.as_str(), "");
    }

    #[test]
    fn test_body_methods() {
        assert!(DavMethod::WEBDAV_BODY.contains(DavMethod::PUT));
        assert!(!DavMethod::WEBDAV_BODY.contains(DavMethod::MKCOL));
    }
}
