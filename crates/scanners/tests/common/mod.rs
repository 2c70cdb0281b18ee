#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use harpoon_scanners::{
    Finding, Plugin, PluginMetadata, RiskLevel, Severity, Transport, TransportConfig,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Test double producing a fixed set of findings, or failing on demand.
pub struct CannedPlugin {
    metadata: PluginMetadata,
    titles: Vec<&'static str>,
    mode: Mode,
}

enum Mode {
    Succeed,
    Fail,
    Panic,
}

impl CannedPlugin {
    pub fn new(name: &str, titles: Vec<&'static str>) -> Self {
        Self {
            metadata: metadata(name, "test", RiskLevel::Low),
            titles,
            mode: Mode::Succeed,
        }
    }

    pub fn with_metadata(metadata: PluginMetadata, titles: Vec<&'static str>) -> Self {
        Self {
            metadata,
            titles,
            mode: Mode::Succeed,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            metadata: metadata(name, "test", RiskLevel::Low),
            titles: Vec::new(),
            mode: Mode::Fail,
        }
    }

    pub fn panicking(name: &str) -> Self {
        Self {
            metadata: metadata(name, "test", RiskLevel::Low),
            titles: Vec::new(),
            mode: Mode::Panic,
        }
    }
}

#[async_trait]
impl Plugin for CannedPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn run(&self, target: &str, _transport: &Transport) -> Result<Vec<Finding>> {
        match self.mode {
            Mode::Panic => panic!("canned panic"),
            Mode::Fail => anyhow::bail!("canned failure"),
            Mode::Succeed => Ok(self
                .titles
                .iter()
                .map(|title| Finding::new(&self.metadata, *title, target, Severity::Low))
                .collect()),
        }
    }
}

pub fn metadata(name: &str, category: &str, risk_level: RiskLevel) -> PluginMetadata {
    PluginMetadata {
        name: name.to_string(),
        description: format!("{name} test plugin"),
        category: category.to_string(),
        risk_level,
        version: "1.0.0".to_string(),
        author: "tests".to_string(),
        references: Vec::new(),
        tags: Vec::new(),
    }
}

/// Fast transport settings for tests: no pacing, short backoff.
pub fn test_transport_config() -> TransportConfig {
    TransportConfig {
        max_concurrent_requests: 4,
        request_timeout_secs: 5,
        retry_attempts: 0,
        delay_between_requests_ms: 0,
        retry_backoff_base_ms: 20,
        ..Default::default()
    }
}

pub fn test_transport() -> Arc<Transport> {
    Arc::new(Transport::new(test_transport_config()).unwrap())
}

pub type Responder = dyn Fn(usize, &str) -> String + Send + Sync;

/// Minimal HTTP stub server. The responder receives the connection index and
/// the raw request head and returns a full response; an empty string makes
/// the server slam the connection shut instead.
pub async fn serve(responder: impl Fn(usize, &str) -> String + Send + Sync + 'static) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let responder: Arc<Responder> = Arc::new(responder);
    tokio::spawn(async move {
        let mut connection = 0usize;
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let responder = Arc::clone(&responder);
            let index = connection;
            connection += 1;
            tokio::spawn(handle(stream, index, responder));
        }
    });
    format!("http://{addr}")
}

async fn handle(mut stream: TcpStream, index: usize, responder: Arc<Responder>) {
    let head = read_head(&mut stream).await;
    let response = responder(index, &head);
    if !response.is_empty() {
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.flush().await;
    }
}

async fn read_head(stream: &mut TcpStream) -> String {
    let mut collected = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        collected.extend_from_slice(&chunk[..read]);
        if collected.windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&collected).into_owned()
}

pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ));
    out
}

pub fn ok_response(body: &str) -> String {
    http_response("200 OK", &[], body)
}
