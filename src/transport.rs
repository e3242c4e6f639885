//! The HTTP transport the client sends its requests through.
//!
//! The client builds complete `http::Request`s (method, URL, headers,
//! body) and hands them to an [`HttpTransport`]. Connection handling, TLS
//! and timeouts are entirely the transport's business. With the `reqwest`
//! feature a blocking [reqwest] based transport is included.
//!
//! [reqwest]: https://docs.rs/reqwest

use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};

use crate::errors::TransportError;

/// Sends one HTTP request and waits for the complete response.
///
/// A transport returns every response it receives, whatever the status;
/// the client decides what counts as success. Only failures to get a
/// response at all are errors.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: Request<Bytes>,
        verify_tls: bool,
    ) -> Result<Response<Bytes>, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn send(
        &self,
        request: Request<Bytes>,
        verify_tls: bool,
    ) -> Result<Response<Bytes>, TransportError> {
        (**self).send(request, verify_tls)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn send(
        &self,
        request: Request<Bytes>,
        verify_tls: bool,
    ) -> Result<Response<Bytes>, TransportError> {
        (**self).send(request, verify_tls)
    }
}

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::convert::TryFrom;

    use bytes::Bytes;
    use http::{Request, Response};
    use reqwest::blocking::Client;

    use super::HttpTransport;
    use crate::errors::TransportError;

    fn request_error(e: reqwest::Error) -> TransportError {
        TransportError::Request(e.to_string())
    }

    /// Blocking transport on top of `reqwest`.
    ///
    /// Holds two connection pools, one that verifies server certificates
    /// and one that does not.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        strict: Client,
        insecure: Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<ReqwestTransport, TransportError> {
            let strict = Client::builder().build().map_err(request_error)?;
            ReqwestTransport::from_client(strict)
        }

        /// Use an existing client for verified connections.
        pub fn from_client(client: Client) -> Result<ReqwestTransport, TransportError> {
            let insecure = Client::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(request_error)?;
            Ok(ReqwestTransport {
                strict: client,
                insecure,
            })
        }
    }

    impl HttpTransport for ReqwestTransport {
        fn send(
            &self,
            request: Request<Bytes>,
            verify_tls: bool,
        ) -> Result<Response<Bytes>, TransportError> {
            let client = if verify_tls {
                &self.strict
            } else {
                &self.insecure
            };
            let request = reqwest::blocking::Request::try_from(request).map_err(request_error)?;
            let response = client.execute(request).map_err(request_error)?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().map_err(request_error)?;

            let mut res = Response::new(body);
            *res.status_mut() = status;
            *res.headers_mut() = headers;
            Ok(res)
        }
    }

}
