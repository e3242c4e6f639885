//! ## Blocking WebDAV client
//!
//! [`Webdav`] (RFC4918) is defined as
//! HTTP (GET/HEAD/PUT/DELETE) plus a bunch of extension methods (PROPFIND, etc).
//! This library is the client side of the few of those needed to manage
//! files on a remote share: upload (`PUT`), delete (`DELETE`), rename
//! (`MOVE`), create folders (`MKCOL`) and list folders (`PROPFIND`).
//!
//! ## Listing a folder.
//!
//! A `PROPFIND` answer is a `multistatus` XML document with one `response`
//! element per resource. The body is tokenized into flat parse events
//! ([`xmlevents::tokenize`]), the events are rebuilt into a generic element
//! tree ([`tree::build`]) and the tree is walked into a list of
//! [`DirEntry`] values ([`listing::interpret`]). Each stage can be used on
//! its own.
//!
//! The first `response` is the listed folder itself. Its href is stripped
//! from the hrefs of the other entries, so entries come out relative to
//! the folder that was listed (`file.txt`, `sub/`).
//!
//! ## Transport.
//!
//! Requests are plain `http::Request`s sent through an [`HttpTransport`].
//! With the `reqwest` feature (on by default) a blocking reqwest
//! transport is used unless another one is configured.
//!
//! ## Example.
//!
//! ```no_run
//! use dav_client::DavClient;
//!
//! fn main() -> Result<(), dav_client::DavError> {
//!     let mut dav = DavClient::builder("https://example.com/remote.php/webdav/")
//!         .login("user", "secret")
//!         .build()?;
//!
//!     dav.create_folder("NewDirectoryName")?;
//!     dav.upload_file("/tmp/image.jpg", "NewDirectoryName/Image.jpg")?;
//!     dav.move_file("NewDirectoryName/Image.jpg", "NewDirectoryName/Renamed.jpg")?;
//!
//!     for entry in dav.read_contents("NewDirectoryName/")? {
//!         println!("{} {:?}", entry.href, entry.size());
//!     }
//!     assert!(dav.does_content_exist("Renamed.jpg"));
//!
//!     dav.delete("NewDirectoryName")?;
//!     Ok(())
//! }
//! ```
//!
//! [`Webdav`]: https://tools.ietf.org/html/rfc4918

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate log;

mod client;
mod davpath;
mod errors;
mod util;

pub mod listing;
pub mod transport;
pub mod tree;
pub mod xmlevents;

pub use crate::client::{DavBuilder, DavClient};
pub use crate::davpath::BaseUrl;
pub use crate::errors::{DavError, DavResult, TransportError};
pub use crate::listing::{parse_listing, DirEntry, ListingConfig, DEFAULT_PROPERTIES};
pub use crate::transport::HttpTransport;
pub use crate::util::{httpdate_to_systemtime, DavMethod};

#[cfg(feature = "reqwest")]
pub use crate::transport::ReqwestTransport;
