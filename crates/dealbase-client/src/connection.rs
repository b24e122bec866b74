//! Connection management for the dealbase client.

use async_nng::AsyncContext;
use nng::options::Options;
use nng::{Message, Protocol, Socket};

use dealbase_proto::framing::{encode_frame, extract_payload};
use dealbase_proto::{Request, Response};

use crate::config::ClientConfig;
use crate::error::Error;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket connected and ready for requests.
    Ready,
    /// Connection closed.
    Closed,
}

/// A connection to a dealbase server.
pub struct Connection {
    socket: Socket,
    state: ConnectionState,
    config: ClientConfig,
}

impl Connection {
    /// Establish a new connection to the server.
    pub fn establish(config: ClientConfig) -> Result<Self, Error> {
        let socket = Socket::new(Protocol::Req0)
            .map_err(|e| Error::Connection(format!("failed to create socket: {}", e)))?;

        socket
            .set_opt::<nng::options::RecvMaxSize>(config.max_message_size)
            .map_err(|e| Error::Connection(format!("failed to set max message size: {}", e)))?;
        socket
            .set_opt::<nng::options::SendTimeout>(Some(config.timeout))
            .map_err(|e| Error::Connection(format!("failed to set send timeout: {}", e)))?;
        socket
            .set_opt::<nng::options::RecvTimeout>(Some(config.timeout))
            .map_err(|e| Error::Connection(format!("failed to set recv timeout: {}", e)))?;

        socket.dial(&config.address).map_err(|e| {
            Error::Connection(format!("failed to connect to {}: {}", config.address, e))
        })?;

        Ok(Self {
            socket,
            state: ConnectionState::Ready,
            config,
        })
    }

    fn create_context(&self) -> Result<AsyncContext<'_>, Error> {
        AsyncContext::try_from(&self.socket)
            .map_err(|e| Error::Connection(format!("failed to create async context: {}", e)))
    }

    /// Send a request and receive the correlated response.
    pub async fn send_request(&self, request: &Request) -> Result<Response, Error> {
        if self.state != ConnectionState::Ready {
            return Err(Error::Connection(format!(
                "cannot send request in state {:?}",
                self.state
            )));
        }

        let mut ctx = self.create_context()?;

        let payload = rkyv::to_bytes::<rkyv::rancor::Error>(request).map_err(|e| {
            Error::Protocol(dealbase_proto::Error::Serialization(format!(
                "failed to serialize request: {}",
                e
            )))
        })?;

        if payload.len() > self.config.max_message_size {
            return Err(Error::Protocol(dealbase_proto::Error::InvalidMessage(
                format!(
                    "request too large: {} bytes (max: {})",
                    payload.len(),
                    self.config.max_message_size
                ),
            )));
        }

        let framed = encode_frame(&payload)?;
        let msg = Message::from(framed.as_slice());
        ctx.send(msg, Some(self.config.timeout))
            .await
            .map_err(|(_, e)| match e {
                nng::Error::TimedOut => Error::Timeout,
                _ => Error::Connection(format!("failed to send request: {}", e)),
            })?;

        let response_msg = ctx
            .receive(Some(self.config.timeout))
            .await
            .map_err(|e| match e {
                nng::Error::TimedOut => Error::Timeout,
                _ => Error::Connection(format!("failed to receive response: {}", e)),
            })?;

        let response_payload = extract_payload(response_msg.as_slice())?;
        let mut aligned: rkyv::util::AlignedVec<16> = rkyv::util::AlignedVec::new();
        aligned.extend_from_slice(response_payload);

        let response: Response = rkyv::from_bytes::<Response, rkyv::rancor::Error>(&aligned)
            .map_err(|e| {
                Error::Protocol(dealbase_proto::Error::InvalidMessage(format!(
                    "failed to deserialize response: {}",
                    e
                )))
            })?;

        // A response decoded with id 0 means the server could not read our
        // request at all; let those through so the error surfaces.
        if response.id != request.id && response.id != 0 {
            return Err(Error::Protocol(dealbase_proto::Error::InvalidMessage(
                format!(
                    "response ID mismatch: expected {}, got {}",
                    request.id, response.id
                ),
            )));
        }

        Ok(response)
    }

    /// Close the connection.
    pub fn close(&mut self) {
        self.state = ConnectionState::Closed;
        // Socket is dropped automatically
    }

    /// Check if the connection is ready for requests.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Ready
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("address", &self.config.address)
            .field("state", &self.state)
            .finish()
    }
}
