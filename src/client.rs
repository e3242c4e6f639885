//
// The client facade: one method per WebDAV operation, each issuing
// exactly one request through the configured transport.
//
use std::convert::TryFrom;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use headers::{Authorization, HeaderMapExt};
use http::{request, Request, Response};

use crate::davpath::BaseUrl;
use crate::errors::{DavError, TransportError};
use crate::listing::{parse_listing, DirEntry, ListingConfig};
use crate::transport::HttpTransport;
use crate::util::DavMethod;
use crate::DavResult;

/// Configuration of the client.
#[derive(Clone)]
pub struct DavBuilder {
    /// Base URL of the WebDAV share.
    url: String,
    /// Port to connect to, overriding the one in `url`.
    port: Option<u16>,
    /// Username and password for basic authentication.
    login: Option<(String, String)>,
    /// Skip TLS certificate verification. Defaults to `false`.
    ignore_tls: bool,
    /// What to extract from PROPFIND answers.
    listing: ListingConfig,
    /// Depth header sent with PROPFIND. Defaults to "1".
    depth: String,
    /// HTTP transport. Defaults to reqwest if that feature is enabled.
    transport: Option<Arc<dyn HttpTransport>>,
}

impl DavBuilder {
    /// Create a new configuration builder.
    pub fn new(url: impl Into<String>) -> DavBuilder {
        Self {
            url: url.into(),
            port: None,
            login: None,
            ignore_tls: false,
            listing: ListingConfig::default(),
            depth: "1".to_string(),
            transport: None,
        }
    }

    /// Use the configuration that was built to create a client.
    pub fn build(self) -> DavResult<DavClient> {
        let base = BaseUrl::new(&self.url, self.port)?;
        let transport = match self.transport {
            Some(t) => t,
            None => default_transport()?,
        };
        debug!("new client for {}", base);
        Ok(DavClient {
            base,
            login: self.login,
            ignore_tls: self.ignore_tls,
            listing: self.listing,
            depth: self.depth,
            transport,
            contents: Vec::new(),
        })
    }

    /// Port to connect to.
    pub fn port(self, port: u16) -> Self {
        let mut this = self;
        this.port = Some(port);
        this
    }

    /// Credentials for basic authentication.
    pub fn login(self, user: impl Into<String>, password: impl Into<String>) -> Self {
        let mut this = self;
        this.login = Some((user.into(), password.into()));
        this
    }

    /// Do not verify the server's TLS certificate.
    pub fn ignore_tls(self, ignore: bool) -> Self {
        let mut this = self;
        this.ignore_tls = ignore;
        this
    }

    /// Properties to extract from directory listings, as qualified
    /// names (`d:getetag`).
    pub fn properties<I, S>(self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut this = self;
        this.listing = this.listing.properties(properties);
        this
    }

    /// Namespace prefix the server uses for `DAV:` elements (default `d`).
    pub fn dav_prefix(self, prefix: impl Into<String>) -> Self {
        let mut this = self;
        this.listing = this.listing.dav_prefix(prefix);
        this
    }

    /// Replace the whole listing configuration.
    pub fn listing(self, listing: ListingConfig) -> Self {
        let mut this = self;
        this.listing = listing;
        this
    }

    /// Depth header value for PROPFIND (default "1").
    pub fn depth(self, depth: impl Into<String>) -> Self {
        let mut this = self;
        this.depth = depth.into();
        this
    }

    /// Set the HTTP transport.
    pub fn transport(self, transport: impl HttpTransport + 'static) -> Self {
        let mut this = self;
        this.transport = Some(Arc::new(transport));
        this
    }
}

#[cfg(feature = "reqwest")]
fn default_transport() -> DavResult<Arc<dyn HttpTransport>> {
    Ok(Arc::new(crate::transport::ReqwestTransport::new()?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport() -> DavResult<Arc<dyn HttpTransport>> {
    Err(TransportError::Request("no transport configured".to_string()).into())
}

/// A WebDAV client session.
///
/// Holds the connection settings and the listing fetched by the most
/// recent [`read_contents`](DavClient::read_contents) call. Every
/// operation blocks until the server has answered.
pub struct DavClient {
    base: BaseUrl,
    login: Option<(String, String)>,
    ignore_tls: bool,
    listing: ListingConfig,
    depth: String,
    transport: Arc<dyn HttpTransport>,
    contents: Vec<DirEntry>,
}

impl DavClient {
    /// Return a configuration builder.
    pub fn builder(url: impl Into<String>) -> DavBuilder {
        DavBuilder::new(url)
    }

    /// Client with default settings.
    pub fn new(url: impl Into<String>) -> DavResult<DavClient> {
        DavBuilder::new(url).build()
    }

    /// Set credentials for basic authentication.
    pub fn set_login(&mut self, user: impl Into<String>, password: impl Into<String>) -> &mut Self {
        self.login = Some((user.into(), password.into()));
        self
    }

    /// Whether the client was given credentials.
    pub fn has_login(&self) -> bool {
        self.login.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.login.as_ref().map(|(u, _)| u.as_str())
    }

    pub fn password(&self) -> Option<&str> {
        self.login.as_ref().map(|(_, p)| p.as_str())
    }

    /// Skip (or stop skipping) TLS certificate verification.
    pub fn set_ignore_tls(&mut self, ignore: bool) -> &mut Self {
        self.ignore_tls = ignore;
        self
    }

    /// Base URL including the port, ending in `/`.
    pub fn url(&self) -> &str {
        self.base.as_str()
    }

    pub fn listing_config(&self) -> &ListingConfig {
        &self.listing
    }

    /// Upload a local file to `remote`. The Content-Type is guessed from
    /// the local file name.
    pub fn upload_file(&self, local: impl AsRef<Path>, remote: &str) -> DavResult<()> {
        let local = local.as_ref();
        let data = std::fs::read(local)?;
        let mime = mime_guess::from_path(local).first_or_octet_stream();
        let req = self
            .request(DavMethod::PUT, remote)?
            .header(http::header::CONTENT_TYPE, mime.essence_str());
        self.execute(DavMethod::PUT, req, Bytes::from(data))?;
        Ok(())
    }

    /// Upload in-memory content to `remote`.
    pub fn upload(&self, data: impl Into<Bytes>, remote: &str) -> DavResult<()> {
        let req = self.request(DavMethod::PUT, remote)?;
        self.execute(DavMethod::PUT, req, data.into())?;
        Ok(())
    }

    /// Delete a file or a folder.
    pub fn delete(&self, remote: &str) -> DavResult<()> {
        let req = self.request(DavMethod::DELETE, remote)?;
        self.execute(DavMethod::DELETE, req, Bytes::new())?;
        Ok(())
    }

    /// Move (or rename) a file on the server.
    pub fn move_file(&self, from: &str, to: &str) -> DavResult<()> {
        let req = self
            .request(DavMethod::MOVE, from)?
            .header("Destination", self.base.join(to));
        self.execute(DavMethod::MOVE, req, Bytes::new())?;
        Ok(())
    }

    /// Create a folder.
    pub fn create_folder(&self, folder: &str) -> DavResult<()> {
        let req = self.request(DavMethod::MKCOL, folder)?;
        self.execute(DavMethod::MKCOL, req, Bytes::new())?;
        Ok(())
    }

    /// List a folder ("" is the base URL itself). The result replaces the
    /// previously fetched listing. On failure the previous listing is kept.
    pub fn read_contents(&mut self, folder: &str) -> DavResult<&[DirEntry]> {
        let req = self
            .request(DavMethod::PROPFIND, folder)?
            .header("Depth", self.depth.as_str());
        let res = self.execute(DavMethod::PROPFIND, req, Bytes::new())?;
        let entries = parse_listing(res.body(), &self.listing)?;
        debug!("read_contents {:?}: {} entries", folder, entries.len());
        self.contents = entries;
        Ok(&self.contents)
    }

    /// The listing fetched by the last successful `read_contents`.
    pub fn contents(&self) -> &[DirEntry] {
        &self.contents
    }

    /// Is there an entry with exactly this relative href in the last
    /// listing? Folders are listed with a trailing slash.
    pub fn does_content_exist(&self, href: &str) -> bool {
        self.contents.iter().any(|e| e.href == href)
    }

    // helper.
    fn request(&self, method: DavMethod, href: &str) -> DavResult<request::Builder> {
        let method = http::Method::try_from(method).map_err(|m| {
            TransportError::Request(format!("{:?} is not a single method", m))
        })?;
        Ok(Request::builder().method(method).uri(self.base.join(href)))
    }

    // send a request, turn anything but 2xx into an error.
    fn execute(
        &self,
        method: DavMethod,
        req: request::Builder,
        body: Bytes,
    ) -> DavResult<Response<Bytes>> {
        let body = if DavMethod::WEBDAV_BODY.contains(method) {
            body
        } else {
            Bytes::new()
        };
        let mut req = req.body(body)?;
        if let Some((user, password)) = &self.login {
            req.headers_mut()
                .typed_insert(Authorization::basic(user, password));
        }

        let uri = req.uri().clone();
        debug!("{} {}", method, uri);
        let res = self.transport.send(req, !self.ignore_tls).map_err(|e| {
            debug!("{} {} failed: {}", method, uri, e);
            DavError::from(e)
        })?;

        let status = res.status();
        debug!("{} {} -> {}", method, uri, status);
        if !status.is_success() {
            return Err(status.into());
        }
        Ok(res)
    }
}

impl std::fmt::Debug for DavClient {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DavClient")
            .field("url", &self.base.as_str())
            .field("user", &self.user())
            .field("ignore_tls", &self.ignore_tls)
            .field("contents", &self.contents.len())
            .finish()
    }
}
