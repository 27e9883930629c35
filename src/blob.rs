// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binary cache blob addressing and download.

use std::io::Read;
use thiserror::Error;
use url::Url;

use crate::errors::{OwnersDbError, Result};

/// Base URL of the binary cache container, with an optional SAS query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobBase {
    base: String,
    query: Option<String>,
}

impl BlobBase {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|source| OwnersDbError::InvalidBlobUrl {
            url: raw.to_string(),
            source,
        })?;
        let origin = url.origin().ascii_serialization();
        let path = url.path().trim_end_matches('/');
        Ok(Self {
            base: format!("{}{}", origin, path),
            query: url
                .query()
                .filter(|query| !query.is_empty())
                .map(str::to_string),
        })
    }

    /// `<base>/<abi>.zip?<sas>`
    pub fn blob_url(&self, abi: &str) -> String {
        match &self.query {
            Some(query) => format!("{}/{}.zip?{}", self.base, abi, query),
            None => format!("{}/{}.zip", self.base, abi),
        }
    }

    /// Like [`BlobBase::blob_url`] but with the access token masked, for logs.
    pub fn redacted_blob_url(&self, abi: &str) -> String {
        match &self.query {
            Some(_) => format!("{}/{}.zip?<sas>", self.base, abi),
            None => format!("{}/{}.zip", self.base, abi),
        }
    }
}

/// Why a single blob could not be fetched or read.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
    #[error("invalid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Source of blob bytes.
pub trait BlobFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Blocking HTTPS fetcher.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(user_agent).build(),
        }
    }
}

impl BlobFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport(describe_transport(&transport, url)))
            }
        };
        if response.status() >= 400 {
            return Err(FetchError::Status(response.status()));
        }

        let mut data = Vec::new();
        response.into_reader().read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Transport failure text without the request URL.
///
/// ureq's own `Display` leads with the full URL, SAS token included.
fn describe_transport(transport: &ureq::Transport, url: &str) -> String {
    let mut text = transport.kind().to_string();
    if let Some(message) = transport.message() {
        text.push_str(": ");
        text.push_str(message);
    }
    if let Some(source) = std::error::Error::source(transport) {
        text.push_str(": ");
        text.push_str(&source.to_string());
    }
    match url.split_once('?') {
        Some((_, query)) if !query.is_empty() => text.replace(query, "<sas>"),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve one canned HTTP response on a local port.
    fn serve_once(status_line: &str, body: &[u8]) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).expect("read request") > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream.write_all(&response).expect("write response");
            stream.flush().expect("flush");
        });
        (format!("http://{}", addr), handle)
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn sas_query_is_reappended_after_blob_name() {
        let base = BlobBase::parse("https://acct.blob.core.windows.net/container/?sv=2020")
            .expect("parse");
        assert_eq!(
            base.blob_url("abc123"),
            "https://acct.blob.core.windows.net/container/abc123.zip?sv=2020"
        );
    }

    #[test]
    fn query_is_preserved_verbatim() {
        let raw = "https://acct.blob.core.windows.net/cache?sv=2020-08-04&ss=b&sig=a%2Bb%3D";
        let base = BlobBase::parse(raw).expect("parse");
        assert_eq!(
            base.blob_url("f00"),
            "https://acct.blob.core.windows.net/cache/f00.zip?sv=2020-08-04&ss=b&sig=a%2Bb%3D"
        );
        assert_eq!(
            base.redacted_blob_url("f00"),
            "https://acct.blob.core.windows.net/cache/f00.zip?<sas>"
        );
    }

    #[test]
    fn trailing_slashes_are_collapsed_without_query() {
        let base = BlobBase::parse("https://host.example/a/b///").expect("parse");
        assert_eq!(base.blob_url("h"), "https://host.example/a/b/h.zip");

        let root = BlobBase::parse("https://host.example").expect("parse");
        assert_eq!(root.blob_url("h"), "https://host.example/h.zip");
    }

    #[test]
    fn bare_question_mark_adds_no_query() {
        let base = BlobBase::parse("https://host.example/cache/?").expect("parse");
        assert_eq!(base.blob_url("h"), "https://host.example/cache/h.zip");
        assert_eq!(base.redacted_blob_url("h"), "https://host.example/cache/h.zip");
    }

    #[test]
    fn http_fetcher_returns_body_bytes() {
        let (origin, server) = serve_once("200 OK", b"PK\x03\x04zip-bytes");
        let base = BlobBase::parse(&format!("{}/cache/?sv=1", origin)).expect("parse");

        let bytes = HttpFetcher::new("test")
            .fetch(&base.blob_url("abc"))
            .expect("fetch");
        assert_eq!(bytes, b"PK\x03\x04zip-bytes");
        server.join().expect("server thread");
    }

    #[test]
    fn http_fetcher_maps_error_status() {
        let (origin, server) = serve_once("404 The specified blob does not exist.", b"");
        let base = BlobBase::parse(&format!("{}/cache/?sv=1", origin)).expect("parse");

        let err = HttpFetcher::new("test")
            .fetch(&base.blob_url("abc"))
            .expect_err("missing blob");
        assert!(matches!(err, FetchError::Status(404)));
        server.join().expect("server thread");
    }

    #[test]
    fn transport_error_does_not_leak_sas_token() {
        let base = BlobBase::parse(&format!("{}/container/?sv=2020&sig=SECRETTOKEN", closed_port_url()))
            .expect("parse");

        let err = HttpFetcher::new("test")
            .fetch(&base.blob_url("abc"))
            .expect_err("connection refused");
        assert!(matches!(err, FetchError::Transport(_)));
        let text = err.to_string();
        assert!(!text.contains("SECRETTOKEN"), "token leaked: {text}");
        assert!(!text.contains("sig="), "query leaked: {text}");
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = BlobBase::parse("not a url").expect_err("malformed");
        assert!(matches!(err, OwnersDbError::InvalidBlobUrl { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
