use std::io::Write;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{Request, Response, StatusCode};

use dav_client::{DavClient, DavError, HttpTransport, TransportError};

#[derive(Debug, Clone)]
struct Sent {
    method: String,
    uri: String,
    headers: http::HeaderMap,
    body: Bytes,
    verify_tls: bool,
}

// Answers every request with the same status and body, and remembers
// what was sent.
#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<Sent>>,
    answer: Mutex<(u16, String)>,
}

impl Recorder {
    fn new() -> Arc<Recorder> {
        let r = Recorder::default();
        *r.answer.lock().unwrap() = (201, String::new());
        Arc::new(r)
    }

    fn answer(&self, status: u16, body: &str) {
        *self.answer.lock().unwrap() = (status, body.to_string());
    }

    fn last(&self) -> Sent {
        self.sent.lock().unwrap().last().cloned().expect("no request sent")
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl HttpTransport for Recorder {
    fn send(
        &self,
        request: Request<Bytes>,
        verify_tls: bool,
    ) -> Result<Response<Bytes>, TransportError> {
        let (parts, body) = request.into_parts();
        self.sent.lock().unwrap().push(Sent {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
            verify_tls,
        });
        let (status, body) = self.answer.lock().unwrap().clone();
        let mut res = Response::new(Bytes::from(body));
        *res.status_mut() = StatusCode::from_u16(status).unwrap();
        Ok(res)
    }
}

fn client(rec: &Arc<Recorder>) -> DavClient {
    DavClient::builder("https://example.com/dav")
        .transport(rec.clone())
        .build()
        .unwrap()
}

const FOLDER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/dav/folder/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
    <d:status>HTTP/1.1 200 OK</d:status></d:propstat>
  </d:response>
  <d:response>
    <d:href>/dav/folder/file.txt</d:href>
    <d:propstat><d:prop>
      <d:resourcetype/>
      <d:getcontentlength>42</d:getcontentlength>
    </d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>
  </d:response>
</d:multistatus>"#;

#[test]
fn read_contents_of_a_folder() {
    let rec = Recorder::new();
    rec.answer(207, FOLDER);
    let mut dav = client(&rec);

    let entries = dav.read_contents("folder/").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].href, "file.txt");
    assert_eq!(entries[0].content_length(), Some("42"));
    assert!(!entries[0].is_dir);

    let sent = rec.last();
    assert_eq!(sent.method, "PROPFIND");
    assert_eq!(sent.uri, "https://example.com/dav/folder/");
    assert_eq!(sent.headers["depth"], "1");
    assert!(sent.body.is_empty());
    assert!(sent.verify_tls);

    assert!(dav.does_content_exist("file.txt"));
    assert!(!dav.does_content_exist("missing.txt"));
    assert!(!dav.does_content_exist("/dav/folder/file.txt"));
}

#[test]
fn listing_is_replaced_not_merged() {
    let rec = Recorder::new();
    rec.answer(
        207,
        r#"<d:multistatus xmlns:d="DAV:">
            <d:response><d:href>/dav/</d:href></d:response>
            <d:response><d:href>/dav/a.txt</d:href></d:response>
            <d:response>
              <d:href>/dav/sub/</d:href>
              <d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop></d:propstat>
            </d:response>
        </d:multistatus>"#,
    );
    let mut dav = client(&rec);
    dav.read_contents("").unwrap();
    assert_eq!(rec.last().uri, "https://example.com/dav/");
    assert!(dav.does_content_exist("a.txt"));
    assert!(dav.does_content_exist("sub/"));
    assert!(!dav.does_content_exist("sub"));
    assert!(dav.contents()[1].is_dir);

    rec.answer(
        207,
        r#"<d:multistatus xmlns:d="DAV:"><d:response><d:href>/dav/sub/</d:href></d:response></d:multistatus>"#,
    );
    assert!(dav.read_contents("sub/").unwrap().is_empty());
    assert!(!dav.does_content_exist("a.txt"));
    assert!(dav.contents().is_empty());
}

#[test]
fn failed_listing_keeps_previous_one() {
    let rec = Recorder::new();
    rec.answer(207, FOLDER);
    let mut dav = client(&rec);
    dav.read_contents("folder/").unwrap();

    rec.answer(207, "<d:multistatus><d:response>");
    match dav.read_contents("folder/") {
        Err(DavError::XmlReaderError(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
    assert!(dav.does_content_exist("file.txt"));

    rec.answer(404, "");
    let err = dav.read_contents("nope/").unwrap_err();
    assert_eq!(err.statuscode(), Some(StatusCode::NOT_FOUND));
    assert!(dav.does_content_exist("file.txt"));
}

#[test]
fn create_move_delete() {
    let rec = Recorder::new();
    let dav = client(&rec);

    dav.create_folder("New Folder").unwrap();
    let sent = rec.last();
    assert_eq!(sent.method, "MKCOL");
    assert_eq!(sent.uri, "https://example.com/dav/New%20Folder");

    dav.move_file("dir\\a.pdf", "dir/b.pdf").unwrap();
    let sent = rec.last();
    assert_eq!(sent.method, "MOVE");
    assert_eq!(sent.uri, "https://example.com/dav/dir/a.pdf");
    assert_eq!(sent.headers["destination"], "https://example.com/dav/dir/b.pdf");

    dav.delete("dir").unwrap();
    let sent = rec.last();
    assert_eq!(sent.method, "DELETE");
    assert_eq!(sent.uri, "https://example.com/dav/dir");
    assert!(sent.body.is_empty());
    assert_eq!(rec.count(), 3);
}

#[test]
fn upload() {
    let rec = Recorder::new();
    let dav = client(&rec);

    dav.upload(&b"hello"[..], "dir/hello.txt").unwrap();
    let sent = rec.last();
    assert_eq!(sent.method, "PUT");
    assert_eq!(sent.uri, "https://example.com/dav/dir/hello.txt");
    assert_eq!(&sent.body[..], b"hello");

    let path = std::env::temp_dir().join(format!("dav-client-test-{}.pdf", std::process::id()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"%PDF-1.4")
        .unwrap();
    dav.upload_file(&path, "dir/test.pdf").unwrap();
    std::fs::remove_file(&path).unwrap();
    let sent = rec.last();
    assert_eq!(sent.method, "PUT");
    assert_eq!(&sent.body[..], b"%PDF-1.4");
    assert_eq!(sent.headers["content-type"], "application/pdf");

    let err = dav
        .upload_file("/nonexistent/dav-client/file.bin", "x")
        .unwrap_err();
    assert!(matches!(err, DavError::IoError(_)));
    assert_eq!(rec.count(), 2);
}

#[test]
fn credentials_and_tls() {
    let rec = Recorder::new();
    let mut dav = DavClient::builder("https://example.com/dav/")
        .login("Aladdin", "open sesame")
        .ignore_tls(true)
        .transport(rec.clone())
        .build()
        .unwrap();

    dav.delete("x").unwrap();
    let sent = rec.last();
    assert_eq!(
        sent.headers["authorization"],
        "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
    );
    assert!(!sent.verify_tls);

    dav.set_ignore_tls(false);
    dav.delete("x").unwrap();
    assert!(rec.last().verify_tls);
}

#[test]
fn non_success_status_is_an_error() {
    let rec = Recorder::new();
    rec.answer(403, "forbidden");
    let dav = client(&rec);
    let err = dav.create_folder("x").unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.statuscode(), Some(StatusCode::FORBIDDEN));
}
