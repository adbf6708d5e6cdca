//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub const OPTIMIZER_DOC: &str = r#"{"regions": [
    {"settings": {"optimize_horizon_days": 2, "optimizer_config_id": 1}, "service_region_ids": [1, 2]},
    {"settings": {"optimize_horizon_days": 5, "optimizer_config_id": 2,
                  "clinical_urgency_lateness_cost_usd_mills_per_ms": 0}, "service_region_ids": [3]}
]}"#;

pub const AVAILABILITY_DOC: &str = r#"{"regions": [
    {"settings": {"poll_interval_sec": 60,
                  "attributes": [{"name": "service_name", "variants": ["Acute"]}]},
     "service_region_ids": [1]}
]}"#;

/// Responses served by [`start_document_server`], keyed by request path.
#[derive(Clone, Default)]
pub struct Documents {
    inner: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl Documents {
    pub fn set(&self, path: &str, status: u16, body: &str) {
        self.inner
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    fn get(&self, path: &str) -> (u16, String) {
        self.inner
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or((404, "not found".to_string()))
    }
}

/// Start a mock configuration backend on an ephemeral port.
pub async fn start_document_server(documents: Documents) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let documents = documents.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);
                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers so closing the socket does not reset the client.
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) => break,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => continue,
                                Err(_) => return,
                            }
                        }

                        let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                        let (status, body) = documents.get(path);
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
