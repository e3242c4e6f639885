//! Turning a PROPFIND `multistatus` answer into a directory listing.
//!
//! The first `response` element describes the collection that was queried.
//! Its href is only used as the prefix that is stripped from the hrefs of
//! the following responses, which are the directory entries.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::tree::Node;
use crate::util::httpdate_to_systemtime;
use crate::xmlevents::parse_tree;
use crate::DavResult;

/// Properties copied into a [`DirEntry`] unless configured otherwise.
pub const DEFAULT_PROPERTIES: &[&str] = &[
    "d:resourcetype",
    "d:getcontenttype",
    "d:getlastmodified",
    "d:getcontentlength",
    "d:quota-used-bytes",
    "d:quota-available-bytes",
    "d:getetag",
];

/// Prefix under which `DAV:` names are written in a configuration.
pub const DEFAULT_PREFIX: &str = "d";

/// What to look for in a multistatus document.
///
/// Property names are written with the `d` prefix for `DAV:` properties
/// (`d:getetag`), whatever prefix the server uses; they follow
/// [`dav_prefix`](ListingConfig::dav_prefix) when the document is read.
/// Other prefixes (`oc:fileid`) are matched as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    /// Namespace prefix of the DAV elements in the server's answers.
    prefix: String,
    /// Properties to copy into each entry, in order, one per key.
    properties: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            prefix: DEFAULT_PREFIX.to_string(),
            properties: DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ListingConfig {
    pub fn new() -> ListingConfig {
        ListingConfig::default()
    }

    /// Replace the set of properties to extract.
    ///
    /// Entries store properties by [`property_key`], so two names with the
    /// same key (`d:etag` and `d:getetag`) cannot both be kept. The first
    /// one wins and the others are dropped with a warning.
    pub fn properties<I, S>(self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut this = self;
        this.properties.clear();
        for name in properties {
            let name = name.into();
            let key = property_key(&name);
            match this.properties.iter().find(|p| property_key(p) == key) {
                Some(kept) => warn!(
                    "property {:?} has the same key {:?} as {:?}, ignoring it",
                    name, key, kept
                ),
                None => this.properties.push(name),
            }
        }
        this
    }

    /// Namespace prefix the server uses for `DAV:` elements (default `d`).
    pub fn dav_prefix(self, prefix: impl Into<String>) -> Self {
        let mut this = self;
        this.prefix = prefix.into();
        this
    }

    /// The property names as they are looked up in a document.
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| self.resolve(p)).collect()
    }

    fn tag(&self, local: &str) -> String {
        qualify(&self.prefix, local)
    }

    // d:name -> <prefix>:name
    fn resolve(&self, name: &str) -> String {
        match name.split_once(':') {
            Some((DEFAULT_PREFIX, local)) => self.tag(local),
            _ => name.to_string(),
        }
    }
}

fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

/// Key under which a property is stored in a [`DirEntry`].
///
/// The namespace prefix is dropped, then a leading `get`:
/// `d:getetag` becomes `etag`, `d:quota-used-bytes` stays `quota-used-bytes`.
pub fn property_key(name: &str) -> &str {
    let local = match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    };
    match local.strip_prefix("get") {
        Some(rest) if !rest.is_empty() => rest,
        _ => local,
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirEntry {
    /// The href exactly as the server sent it.
    pub full_href: String,
    /// The href relative to the listed folder.
    pub href: String,
    /// Whether this is a collection.
    pub is_dir: bool,
    props: BTreeMap<String, String>,
}

impl DirEntry {
    /// Look up a property by its qualified name (`d:getetag`) or its
    /// key (`etag`). Properties the server did not send are `None`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.props.get(property_key(name)).map(|s| s.as_str())
    }

    /// All properties that were present, by key.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.props
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.property("resourcetype")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.property("contenttype")
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.property("lastmodified")
    }

    pub fn content_length(&self) -> Option<&str> {
        self.property("contentlength")
    }

    pub fn quota_used(&self) -> Option<&str> {
        self.property("quota-used-bytes")
    }

    pub fn quota_available(&self) -> Option<&str> {
        self.property("quota-available-bytes")
    }

    pub fn etag(&self) -> Option<&str> {
        self.property("etag")
    }

    /// Content length as a number.
    pub fn size(&self) -> Option<u64> {
        self.content_length()?.trim().parse().ok()
    }

    /// Last modification time, parsed from the HTTP date.
    pub fn modified(&self) -> Option<SystemTime> {
        httpdate_to_systemtime(self.last_modified()?)
    }
}

/// Walk a multistatus document and collect the directory entries.
///
/// A document without `multistatus` or `response` elements is an empty
/// listing, not an error.
pub fn interpret(root: &Node, config: &ListingConfig) -> Vec<DirEntry> {
    let responses = match root.child(&config.tag("multistatus")) {
        Some(ms) => ms.children(&config.tag("response")),
        None => {
            debug!("interpret: no multistatus element, empty listing");
            return Vec::new();
        }
    };
    let (first, rest) = match responses.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let href_tag = config.tag("href");
    let start_dir = first
        .child(&href_tag)
        .and_then(|n| n.value())
        .unwrap_or_default();
    trace!("interpret: {} entries below {:?}", rest.len(), start_dir);

    rest.iter()
        .map(|response| dir_entry(response, start_dir, config))
        .collect()
}

fn dir_entry(response: &Node, start_dir: &str, config: &ListingConfig) -> DirEntry {
    let full_href = response
        .child(&config.tag("href"))
        .and_then(|n| n.value())
        .unwrap_or_default()
        .to_string();
    let href = match full_href.strip_prefix(start_dir) {
        Some(rel) => rel.to_string(),
        None => {
            warn!(
                "href {:?} is not below {:?}, keeping it as is",
                full_href, start_dir
            );
            full_href.clone()
        }
    };

    let mut entry = DirEntry {
        full_href,
        href,
        ..DirEntry::default()
    };

    let (propstat_tag, prop_tag) = (config.tag("propstat"), config.tag("prop"));
    let prop = match response.path(&[propstat_tag.as_str(), prop_tag.as_str()]) {
        Some(prop) => prop,
        None => return entry,
    };
    for name in &config.properties {
        if let Some(value) = prop.child(&config.resolve(name)).and_then(|n| n.value()) {
            entry
                .props
                .insert(property_key(name).to_string(), value.to_string());
        }
    }
    entry.is_dir = prop
        .child(&config.tag("resourcetype"))
        .map(|rt| rt.child(&config.tag("collection")).is_some())
        .unwrap_or(false);
    entry
}

/// Parse a raw PROPFIND response body into a directory listing.
pub fn parse_listing(body: &[u8], config: &ListingConfig) -> DavResult<Vec<DirEntry>> {
    let root = parse_tree(body)?;
    Ok(interpret(&root, config))
}
