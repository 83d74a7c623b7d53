use crate::domain::error::{ChatError, ChatResult};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, warn};

/// A line received by the echo server.
#[derive(Debug, Clone)]
pub struct ServerMessage {
    pub line: String,
}

#[derive(Debug, Clone)]
pub struct ClientConnection {
    pub addr: SocketAddr,
    pub lines_received: u64,
}

/// Line echo server: every line a client sends is written back to that client.
///
/// Used to exercise the client end to end without a real chat server.
pub struct EchoServer {
    listener: Option<TcpListener>,
    bind_addr: SocketAddr,
    clients: Arc<Mutex<Vec<ClientConnection>>>,
    message_sender: mpsc::UnboundedSender<ServerMessage>,
    message_receiver: mpsc::UnboundedReceiver<ServerMessage>,
    shutdown_sender: Option<mpsc::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl EchoServer {
    pub async fn new(bind_addr: &str) -> ChatResult<Self> {
        let listener = TcpListener::bind(bind_addr).await?;

        let actual_addr = listener.local_addr()?;
        let (message_sender, message_receiver) = mpsc::unbounded_channel();

        info!("Echo server created on {}", actual_addr);

        Ok(Self {
            listener: Some(listener),
            bind_addr: actual_addr,
            clients: Arc::new(Mutex::new(Vec::new())),
            message_sender,
            message_receiver,
            shutdown_sender: None,
            server_handle: None,
        })
    }

    pub fn get_bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub async fn start(&mut self) -> ChatResult<()> {
        let listener = self.listener.take().ok_or_else(|| {
            ChatError::InvalidInput("Server is already running".to_string())
        })?;

        info!("Starting echo server on {}", self.bind_addr);

        let clients = Arc::clone(&self.clients);
        let message_sender = self.message_sender.clone();
        let (shutdown_sender, mut shutdown_receiver) = mpsc::channel::<()>(1);

        let server_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((stream, addr)) => {
                                debug!("New client connected: {}", addr);

                                clients.lock().await.push(ClientConnection {
                                    addr,
                                    lines_received: 0,
                                });

                                let clients = Arc::clone(&clients);
                                let message_sender = message_sender.clone();
                                tokio::spawn(async move {
                                    if let Err(e) = Self::handle_client(
                                        stream,
                                        addr,
                                        Arc::clone(&clients),
                                        message_sender,
                                    ).await {
                                        error!("Error handling client {}: {}", addr, e);
                                    }

                                    clients.lock().await.retain(|c| c.addr != addr);
                                    debug!("Client disconnected: {}", addr);
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {}", e);
                            }
                        }
                    }

                    _ = shutdown_receiver.recv() => {
                        info!("Received shutdown signal, stopping server");
                        break;
                    }
                }
            }
        });

        self.shutdown_sender = Some(shutdown_sender);
        self.server_handle = Some(server_handle);
        Ok(())
    }

    async fn handle_client(
        stream: TcpStream,
        addr: SocketAddr,
        clients: Arc<Mutex<Vec<ClientConnection>>>,
        message_sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> ChatResult<()> {
        let mut lines = Framed::new(stream, LinesCodec::new());

        while let Some(result) = lines.next().await {
            let line = match result {
                Ok(line) => line,
                Err(e) => {
                    warn!("Read error from {}: {}", addr, e);
                    break;
                }
            };

            {
                let mut clients_guard = clients.lock().await;
                if let Some(client) = clients_guard.iter_mut().find(|c| c.addr == addr) {
                    client.lines_received += 1;
                }
            }

            if let Err(e) = message_sender.send(ServerMessage { line: line.clone() }) {
                warn!("Failed to send message to channel: {}", e);
            }

            if let Err(e) = lines.send(line.as_str()).await {
                warn!("Failed to echo line to {}: {}", addr, e);
                break;
            }
        }

        Ok(())
    }

    pub async fn stop(&mut self) -> ChatResult<()> {
        if let Some(handle) = self.server_handle.take() {
            info!("Stopping echo server");

            if let Some(shutdown_sender) = self.shutdown_sender.take() {
                if let Err(e) = shutdown_sender.send(()).await {
                    warn!("Failed to send shutdown signal: {}", e);
                }
            }

            if let Err(e) = handle.await {
                warn!("Server task completed with error: {}", e);
            }
        }

        Ok(())
    }

    /// Next line received from any client.
    pub async fn receive_message(&mut self) -> Option<ServerMessage> {
        self.message_receiver.recv().await
    }

    /// A received line if one is already queued.
    pub fn try_receive_message(&mut self) -> Option<ServerMessage> {
        self.message_receiver.try_recv().ok()
    }

    pub async fn get_client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Snapshot of the currently connected clients.
    pub async fn get_clients(&self) -> Vec<ClientConnection> {
        self.clients.lock().await.clone()
    }

    pub fn is_running(&self) -> bool {
        self.server_handle.is_some()
    }
}

impl Drop for EchoServer {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}
