//! Server transport layer using async-nng.
//!
//! Provides TCP and IPC transport over NNG's REP socket. A fixed pool of
//! worker threads shares the socket, each running a current-thread runtime
//! with its own async context.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use async_nng::AsyncContext;
use nng::options::Options;
use nng::{Message, Protocol, Socket};

use dealbase_proto::framing::{encode_frame, extract_payload};
use dealbase_proto::{error_codes, Request, Response};

use crate::config::ServerConfig;
use crate::error::Error;
use crate::handler::RequestHandler;

/// Transport metrics for monitoring.
#[derive(Debug)]
pub struct TransportMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_failed: AtomicU64,
    started_at: Instant,
}

impl TransportMetrics {
    fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_success: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    fn record(&self, is_success: bool) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if is_success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get the uptime duration.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Get total requests count.
    pub fn total_requests(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Get successful requests count.
    pub fn successful_requests(&self) -> u64 {
        self.requests_success.load(Ordering::Relaxed)
    }

    /// Get failed requests count.
    pub fn failed_requests(&self) -> u64 {
        self.requests_failed.load(Ordering::Relaxed)
    }
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Server transport that handles incoming connections.
pub struct Transport {
    socket: Socket,
    handler: Arc<RequestHandler>,
    max_message_size: usize,
    metrics: Arc<TransportMetrics>,
    request_timeout: Duration,
    worker_count: usize,
}

impl Transport {
    /// Create a new transport with the given configuration and request handler.
    pub fn new(config: &ServerConfig, handler: Arc<RequestHandler>) -> Result<Self, Error> {
        let socket = Socket::new(Protocol::Rep0)
            .map_err(|e| Error::Transport(format!("failed to create socket: {}", e)))?;

        socket
            .set_opt::<nng::options::RecvMaxSize>(config.max_message_size)
            .map_err(|e| Error::Transport(format!("failed to set max message size: {}", e)))?;

        if let Some(tcp_addr) = &config.tcp_address {
            socket
                .listen(tcp_addr)
                .map_err(|e| Error::Transport(format!("failed to listen on {}: {}", tcp_addr, e)))?;
            tracing::info!(address = %tcp_addr, "listening on TCP");
        }

        if let Some(ipc_addr) = &config.ipc_address {
            socket
                .listen(ipc_addr)
                .map_err(|e| Error::Transport(format!("failed to listen on {}: {}", ipc_addr, e)))?;
            tracing::info!(address = %ipc_addr, "listening on IPC");
        }

        Ok(Self {
            socket,
            handler,
            max_message_size: config.max_message_size,
            metrics: Arc::new(TransportMetrics::new()),
            request_timeout: config.request_timeout,
            worker_count: config.transport_workers.max(1),
        })
    }

    /// Get a reference to the transport metrics.
    pub fn metrics(&self) -> &TransportMetrics {
        &self.metrics
    }

    /// Run the transport with graceful shutdown support.
    pub async fn run_until_shutdown(
        &self,
        mut shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> Result<(), Error> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let handles = self.spawn_worker_threads(stop_flag.clone())?;

        tracing::info!("transport ready, accepting requests");

        let _ = shutdown.recv().await;
        tracing::info!(
            total_requests = self.metrics.total_requests(),
            successful = self.metrics.successful_requests(),
            failed = self.metrics.failed_requests(),
            uptime_secs = self.metrics.uptime().as_secs(),
            "shutdown signal received, stopping transport"
        );

        stop_flag.store(true, Ordering::SeqCst);
        let _ = tokio::task::spawn_blocking(move || {
            for handle in handles {
                let _ = handle.join();
            }
        })
        .await;

        Ok(())
    }

    fn worker(&self) -> TransportWorker {
        TransportWorker::new(self.handler.clone(), self.max_message_size)
    }

    fn spawn_worker_threads(
        &self,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Vec<thread::JoinHandle<()>>, Error> {
        let mut handles = Vec::with_capacity(self.worker_count);
        for worker_id in 0..self.worker_count {
            let socket = self.socket.clone();
            let worker = self.worker();
            let metrics = self.metrics.clone();
            let request_timeout = self.request_timeout;
            let stop_flag = stop_flag.clone();

            let handle = thread::Builder::new()
                .name(format!("dealbase-transport-{}", worker_id))
                .spawn(move || {
                    let runtime = tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                        .expect("failed to build transport worker runtime");

                    runtime.block_on(async move {
                        let mut ctx = match AsyncContext::try_from(&socket) {
                            Ok(ctx) => ctx,
                            Err(e) => {
                                tracing::error!(error = %e, worker_id, "failed to create async context");
                                return;
                            }
                        };

                        loop {
                            if stop_flag.load(Ordering::SeqCst) {
                                tracing::info!(worker_id, "transport worker stopping");
                                return;
                            }

                            match ctx.receive(Some(Duration::from_secs(1))).await {
                                Ok(msg) => {
                                    let start = Instant::now();
                                    let (response_bytes, is_success) =
                                        worker.process_message(msg.as_slice());
                                    let elapsed = start.elapsed();

                                    let response_msg = Message::from(response_bytes.as_slice());
                                    if let Err((_, e)) = ctx.send(response_msg, None).await {
                                        tracing::error!(error = %e, worker_id, "failed to send response");
                                        metrics.record(false);
                                    } else {
                                        metrics.record(is_success);
                                    }

                                    if elapsed > request_timeout {
                                        tracing::warn!(
                                            worker_id,
                                            duration_ms = elapsed.as_millis() as u64,
                                            timeout_ms = request_timeout.as_millis() as u64,
                                            "request exceeded timeout"
                                        );
                                    }
                                }
                                Err(nng::Error::TimedOut) => {
                                    continue;
                                }
                                Err(e) => {
                                    tracing::error!(error = %e, worker_id, "receive error");
                                }
                            }
                        }
                    });
                })
                .map_err(|e| Error::Transport(format!("failed to spawn transport worker: {}", e)))?;

            handles.push(handle);
        }

        Ok(handles)
    }
}

struct TransportWorker {
    handler: Arc<RequestHandler>,
    max_message_size: usize,
}

impl TransportWorker {
    fn new(handler: Arc<RequestHandler>, max_message_size: usize) -> Self {
        Self {
            handler,
            max_message_size,
        }
    }

    /// Process a raw message and return (response bytes, is_success).
    fn process_message(&self, data: &[u8]) -> (Vec<u8>, bool) {
        let (response, is_success) = match self.decode_and_handle(data) {
            Ok(response) => {
                let is_ok = response.status.is_ok();
                (response, is_ok)
            }
            Err(e) => {
                tracing::error!(error = %e, "request processing error");
                // Request ID is unknown when decoding failed.
                let response = Response::error(0, error_codes::INVALID_REQUEST, e.to_string());
                (response, false)
            }
        };

        let bytes = match encode_response(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                encode_minimal_error(&e.to_string())
            }
        };

        (bytes, is_success)
    }

    /// Decode a request and dispatch to the handler.
    fn decode_and_handle(&self, data: &[u8]) -> Result<Response, Error> {
        if data.len() > self.max_message_size {
            return Err(Error::Protocol(dealbase_proto::Error::InvalidMessage(
                format!(
                    "message too large: {} bytes (max: {})",
                    data.len(),
                    self.max_message_size
                ),
            )));
        }

        let payload = extract_payload(data)?;

        // Copy to an aligned buffer for rkyv access.
        let mut aligned: rkyv::util::AlignedVec<16> = rkyv::util::AlignedVec::new();
        aligned.extend_from_slice(payload);

        let request: Request =
            rkyv::from_bytes::<Request, rkyv::rancor::Error>(&aligned).map_err(|e| {
                Error::Protocol(dealbase_proto::Error::InvalidMessage(format!(
                    "failed to deserialize request: {}",
                    e
                )))
            })?;

        Ok(self.handler.handle(&request))
    }
}

/// Encode a response to framed bytes.
fn encode_response(response: &Response) -> Result<Vec<u8>, Error> {
    let payload = rkyv::to_bytes::<rkyv::rancor::Error>(response).map_err(|e| {
        Error::Protocol(dealbase_proto::Error::Serialization(format!(
            "failed to serialize response: {}",
            e
        )))
    })?;

    encode_frame(&payload).map_err(Error::Protocol)
}

/// Create a minimal error response when normal encoding fails.
fn encode_minimal_error(message: &str) -> Vec<u8> {
    let response = Response::error(0, error_codes::INTERNAL, message);

    match rkyv::to_bytes::<rkyv::rancor::Error>(&response) {
        Ok(payload) => encode_frame(&payload).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

/// Create a transport that listens on the configured addresses.
pub fn create_transport(
    config: &ServerConfig,
    handler: Arc<RequestHandler>,
) -> Result<Transport, Error> {
    if !config.has_transport() {
        return Err(Error::Config(
            "no transport configured (need TCP or IPC address)".to_string(),
        ));
    }

    Transport::new(config, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use dealbase_proto::{NewCompany, Operation, ResponsePayload, Status};

    fn setup_worker() -> TransportWorker {
        let database = Arc::new(Database::temporary().unwrap());
        TransportWorker::new(
            Arc::new(RequestHandler::new(database)),
            4 * 1024 * 1024,
        )
    }

    fn frame_request(request: &Request) -> Vec<u8> {
        let payload = rkyv::to_bytes::<rkyv::rancor::Error>(request).unwrap();
        encode_frame(&payload).unwrap()
    }

    fn decode_response(bytes: &[u8]) -> Response {
        let payload = extract_payload(bytes).unwrap();
        let mut aligned: rkyv::util::AlignedVec<16> = rkyv::util::AlignedVec::new();
        aligned.extend_from_slice(payload);
        rkyv::from_bytes::<Response, rkyv::rancor::Error>(&aligned).unwrap()
    }

    #[test]
    fn test_process_message_roundtrip() {
        let worker = setup_worker();
        let request = Request::new(7, Operation::CreateCompany(NewCompany::named("Acme")));

        let (bytes, is_success) = worker.process_message(&frame_request(&request));
        assert!(is_success);

        let response = decode_response(&bytes);
        assert_eq!(response.id, 7);
        assert!(matches!(response.payload, ResponsePayload::Company(_)));
    }

    #[test]
    fn test_process_message_rejects_garbage() {
        let worker = setup_worker();
        let (bytes, is_success) = worker.process_message(&[1, 2, 3]);
        assert!(!is_success);

        let response = decode_response(&bytes);
        assert_eq!(response.id, 0);
        if let Status::Error { code, .. } = response.status {
            assert_eq!(code, error_codes::INVALID_REQUEST);
        } else {
            panic!("expected error status");
        }
    }

    #[test]
    fn test_process_message_rejects_oversized() {
        let database = Arc::new(Database::temporary().unwrap());
        let worker = TransportWorker::new(Arc::new(RequestHandler::new(database)), 16);

        let request = Request::new(1, Operation::CreateCompany(NewCompany::named("Acme")));
        let (bytes, is_success) = worker.process_message(&frame_request(&request));
        assert!(!is_success);

        let response = decode_response(&bytes);
        if let Status::Error { message, .. } = response.status {
            assert!(message.contains("too large"));
        } else {
            panic!("expected error status");
        }
    }

    #[test]
    fn test_create_transport_requires_address() {
        let database = Arc::new(Database::temporary().unwrap());
        let handler = Arc::new(RequestHandler::new(database));
        let config = ServerConfig::new("/tmp/db").without_tcp();

        assert!(matches!(
            create_transport(&config, handler),
            Err(Error::Config(_))
        ));
    }
}
