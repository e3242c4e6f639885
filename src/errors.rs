use std::error::Error;
use std::fmt;
use std::io;

use http::StatusCode;

/// Result type used throughout the crate.
pub type DavResult<T> = Result<T, DavError>;

/// Errors returned by the client.
#[derive(Debug)]
pub enum DavError {
    /// The HTTP transport failed, or the server answered with a non-2xx status.
    Transport(TransportError),
    /// A parse event referenced a nesting level that has no open parent.
    Structure { level: usize, tag: String },
    /// The response body is not well-formed XML.
    XmlReaderError(xml::reader::Error),
    /// Reading local content failed.
    IoError(io::Error),
    /// The base URL or a request built from it is not valid.
    InvalidUrl(String),
}

/// Failure reported by an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug)]
pub enum TransportError {
    /// The request went through but the server did not answer 2xx.
    Status(StatusCode),
    /// Network, TLS or protocol failure, with the underlying message.
    Request(String),
}

impl DavError {
    /// Is this a failure of the HTTP transport (including a non-2xx status)?
    pub fn is_transport(&self) -> bool {
        matches!(self, DavError::Transport(_))
    }

    /// The HTTP status the server answered with, if that is what failed.
    pub fn statuscode(&self) -> Option<StatusCode> {
        match self {
            DavError::Transport(TransportError::Status(s)) => Some(*s),
            _ => None,
        }
    }
}

impl Error for DavError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DavError::Transport(e) => Some(e),
            DavError::XmlReaderError(e) => Some(e),
            DavError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DavError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DavError::Transport(e) => write!(f, "transport error: {}", e),
            DavError::Structure { level, tag } => write!(
                f,
                "malformed document: <{}> at level {} has no parent",
                tag, level
            ),
            DavError::XmlReaderError(e) => write!(f, "XML parse error: {}", e),
            DavError::IoError(e) => write!(f, "I/O error: {}", e),
            DavError::InvalidUrl(u) => write!(f, "invalid URL: {}", u),
        }
    }
}

impl Error for TransportError {}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::Status(s) => write!(f, "server returned {}", s),
            TransportError::Request(msg) => f.write_str(msg),
        }
    }
}

impl From<TransportError> for DavError {
    fn from(e: TransportError) -> Self {
        DavError::Transport(e)
    }
}

impl From<StatusCode> for DavError {
    fn from(s: StatusCode) -> Self {
        DavError::Transport(TransportError::Status(s))
    }
}

impl From<io::Error> for DavError {
    fn from(e: io::Error) -> Self {
        DavError::IoError(e)
    }
}

impl From<xml::reader::Error> for DavError {
    fn from(e: xml::reader::Error) -> Self {
        DavError::XmlReaderError(e)
    }
}

impl From<url::ParseError> for DavError {
    fn from(e: url::ParseError) -> Self {
        DavError::InvalidUrl(e.to_string())
    }
}

impl From<http::Error> for DavError {
    fn from(e: http::Error) -> Self {
        DavError::InvalidUrl(e.to_string())
    }
}
