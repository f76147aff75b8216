//! Executing `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the seam between the pure client and real I/O. The
//! default `UreqTransport` is blocking and disables ureq's
//! status-code-as-error behavior, so 4xx/5xx replies come back as data and
//! `MathjsClient` decides what counts as a failure. No retries and no
//! custom timeouts: whatever ureq does by default applies.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one request/response round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking HTTP transport backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending mathjs request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(status, "received mathjs response");
        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::client::MathjsClient;
    use crate::config::BaseUrl;

    /// Accept one connection on a raw socket, answer `200 ok` with an
    /// `x-stub` header, and hand back the request exactly as received.
    fn capture_one() -> (MathjsClient, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase();
                    let len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .map_or(0, |v| v.trim().parse::<usize>().unwrap());
                    if raw.len() >= end + 4 + len {
                        break;
                    }
                }
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nx-stub: 1\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
                .unwrap();
            tx.send(String::from_utf8_lossy(&raw).into_owned()).unwrap();
        });

        let client = MathjsClient::new(BaseUrl::new(&format!("http://{addr}/")).unwrap());
        (client, rx)
    }

    /// Split a captured request into its lowercased head lines and its body.
    fn split_request(raw: &str) -> (Vec<String>, String) {
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let lines = head.lines().map(str::to_ascii_lowercase).collect();
        (lines, body.to_string())
    }

    #[test]
    fn raw_post_without_headers_sends_no_content_type() {
        let (client, rx) = capture_one();
        let request = client.build_post_raw(r#"{"expr":["1+1"]}"#, &[]);

        let response = UreqTransport::new().execute(&request).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "ok");
        assert!(response.headers.iter().any(|(k, v)| k == "x-stub" && v == "1"));

        let (lines, body) = split_request(&rx.recv().unwrap());
        assert_eq!(lines[0], "post / http/1.1");
        assert!(
            !lines.iter().any(|line| line.starts_with("content-type:")),
            "unexpected content-type in {lines:?}"
        );
        assert_eq!(body, r#"{"expr":["1+1"]}"#);
    }

    #[test]
    fn raw_post_forwards_caller_content_type() {
        let (client, rx) = capture_one();
        let request = client.build_post_raw("{}", &[("Content-Type", "application/json")]);

        UreqTransport::new().execute(&request).unwrap();

        let (lines, body) = split_request(&rx.recv().unwrap());
        let content_types: Vec<_> = lines.iter().filter(|line| line.starts_with("content-type:")).collect();
        assert_eq!(content_types, vec!["content-type: application/json"]);
        assert_eq!(body, "{}");
    }

    #[test]
    fn get_sends_query_verbatim() {
        let (client, rx) = capture_one();
        let request = client.build_get_raw("expr=1+2");

        UreqTransport::new().execute(&request).unwrap();

        let (lines, body) = split_request(&rx.recv().unwrap());
        assert_eq!(lines[0], "get /?expr=1+2 http/1.1");
        assert!(body.is_empty());
    }

    #[test]
    fn connection_refused_is_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/?expr=1"),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
