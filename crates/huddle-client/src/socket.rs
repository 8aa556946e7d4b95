//! Socket.IO connection manager.
//!
//! [`ConnectionManager::spawn`] starts one background task that owns the
//! WebSocket for the lifetime of the application. The task executes the
//! actions of the pure [`Connection`] state machine:
//!
//! - `Dial`: open the socket, read the Engine.IO `open` packet, send the
//!   Socket.IO connect and wait for its acknowledgment.
//! - `Wait`: back off, then dial again.
//! - `Close`: send a Socket.IO disconnect and close the socket.
//!
//! While connected it answers pings, decodes server events into the inbox and
//! writes emits. Emits issued while disconnected are queued and flushed in
//! order on the next successful connect.

use std::{collections::VecDeque, time::Duration};

use futures_util::{SinkExt as _, StreamExt as _};
use huddle_core::{Connection, ConnectionAction, ConnectionError, ConnectionStatus, Environment, SocketEvent};
use huddle_proto::{ClientEvent, EnginePacket, Handshake, PacketKind, ServerEvent, SocketPacket, packet::DEFAULT_NAMESPACE};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{config::SocketConfig, error::TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Command {
    Emit(ClientEvent),
    Shutdown,
}

/// Handle to the single server connection.
///
/// Dropping the handle shuts the connection down.
#[derive(Debug)]
pub struct ConnectionManager {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<ConnectionStatus>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Emit(event) => write!(f, "Emit({})", event.name()),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl ConnectionManager {
    /// Start the connection task.
    ///
    /// Returns the handle and the inbox receiving status changes and server
    /// events. Must be called from within a tokio runtime.
    pub fn spawn<E: Environment>(config: SocketConfig, env: E) -> (Self, mpsc::Receiver<SocketEvent>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (inbox_tx, inbox_rx) = mpsc::channel(config.inbox_capacity.max(1));
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::disconnected());

        let fsm = Connection::new(config.reconnect);
        let task = SocketTask {
            config,
            env,
            fsm,
            commands: commands_rx,
            inbox: inbox_tx,
            status: status_tx,
            pending: VecDeque::new(),
        };
        let handle = tokio::spawn(task.run());

        (Self { commands: commands_tx, status: status_rx, task: Some(handle) }, inbox_rx)
    }

    /// Subscribe to connection status changes.
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Whether the socket is currently connected.
    pub fn is_connected(&self) -> bool {
        self.status.borrow().connected
    }

    /// Queue an event for the server.
    ///
    /// Never blocks. The event is sent immediately when connected, otherwise
    /// after the next successful connect.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` once the connection has shut down
    pub fn emit(&self, event: ClientEvent) -> Result<(), TransportError> {
        self.commands
            .send(Command::Emit(event))
            .map_err(|_| TransportError::Closed("connection task stopped".into()))
    }

    /// Disconnect and wait for the connection task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::warn!(%error, "connection task ended abnormally");
            }
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        // Task finishes on its own once it sees the command.
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// Connected socket plus the negotiated session parameters.
struct Session {
    ws: WsStream,
    handshake: Handshake,
    sid: String,
}

enum Flow {
    Continue,
    Lost(String),
    Stop,
}

struct SocketTask<E> {
    config: SocketConfig,
    env: E,
    fsm: Connection,
    commands: mpsc::UnboundedReceiver<Command>,
    inbox: mpsc::Sender<SocketEvent>,
    status: watch::Sender<ConnectionStatus>,
    pending: VecDeque<ClientEvent>,
}

impl<E: Environment> SocketTask<E> {
    async fn run(mut self) {
        let mut pending_actions: VecDeque<ConnectionAction> = match self.fsm.start() {
            Ok(actions) => actions.into(),
            Err(error) => {
                tracing::warn!(%error, "connection failed to start");
                return;
            },
        };

        while let Some(action) = pending_actions.pop_front() {
            let result = match action {
                ConnectionAction::Dial { attempt } => self.dial(attempt).await,
                ConnectionAction::Wait { delay } => self.wait(delay).await,
                ConnectionAction::Close => Ok(Vec::new()),
            };

            match result {
                Ok(actions) => pending_actions.extend(actions),
                Err(error) => {
                    tracing::warn!(%error, "connection state machine rejected transition");
                    break;
                },
            }
        }

        self.publish(ConnectionStatus::disconnected()).await;
        if !self.pending.is_empty() {
            tracing::warn!(dropped = self.pending.len(), "discarding unsent events on shutdown");
        }
        tracing::info!("connection closed");
    }

    async fn dial(&mut self, attempt: u32) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if attempt > 0 {
            tracing::debug!(attempt, "reconnecting");
        }

        let config = self.config.clone();
        let connect = open_session(&config);
        tokio::pin!(connect);

        loop {
            tokio::select! {
                result = &mut connect => {
                    return match result {
                        Ok(session) => self.connected(session).await,
                        Err(error) => self.dial_failed(error),
                    };
                },
                command = self.commands.recv() => match command {
                    Some(Command::Emit(event)) => self.pending.push_back(event),
                    Some(Command::Shutdown) | None => return Ok(self.fsm.shutdown()),
                },
            }
        }
    }

    fn dial_failed(&mut self, error: TransportError) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let error = ConnectionError::from(error);
        tracing::warn!(%error, "connection attempt failed");

        if error.is_transient() {
            self.fsm.failed(&error.to_string(), self.env.random_unit())
        } else {
            tracing::warn!("giving up on reconnection");
            Ok(self.fsm.shutdown())
        }
    }

    async fn wait(&mut self, delay: Duration) -> Result<Vec<ConnectionAction>, ConnectionError> {
        tracing::debug!(?delay, "waiting before reconnect");

        let env = self.env.clone();
        let sleep = env.sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                () = &mut sleep => return self.fsm.retry_elapsed(),
                command = self.commands.recv() => match command {
                    Some(Command::Emit(event)) => self.pending.push_back(event),
                    Some(Command::Shutdown) | None => return Ok(self.fsm.shutdown()),
                },
            }
        }
    }

    async fn connected(&mut self, session: Session) -> Result<Vec<ConnectionAction>, ConnectionError> {
        let Session { mut ws, handshake, sid } = session;
        self.fsm.opened(sid.as_str())?;

        tracing::info!(%sid, "connected");
        let status = self.fsm.status();
        self.publish(status).await;

        while let Some(event) = self.pending.pop_front() {
            if let Err(error) = send_event(&mut ws, &event).await {
                self.pending.push_front(event);
                return self.lost(&error.to_string()).await;
            }
        }

        let deadline = handshake.heartbeat_deadline();
        let env = self.env.clone();
        let mut heartbeat = Box::pin(env.sleep(deadline));

        loop {
            tokio::select! {
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        heartbeat = Box::pin(env.sleep(deadline));
                        match self.on_frame(&mut ws, &text).await {
                            Flow::Continue => {},
                            Flow::Lost(reason) => return self.lost(&reason).await,
                            Flow::Stop => return self.close(&mut ws).await,
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => return self.lost("transport close").await,
                    Some(Ok(_)) => {},
                    Some(Err(error)) => return self.lost(&format!("transport error: {error}")).await,
                },
                () = &mut heartbeat => {
                    let error = TransportError::HeartbeatTimeout(deadline);
                    return self.lost(&error.to_string()).await;
                },
                command = self.commands.recv() => match command {
                    Some(Command::Emit(event)) => {
                        if let Err(error) = send_event(&mut ws, &event).await {
                            self.pending.push_back(event);
                            return self.lost(&error.to_string()).await;
                        }
                    },
                    Some(Command::Shutdown) | None => return self.close(&mut ws).await,
                },
            }
        }
    }

    async fn on_frame(&mut self, ws: &mut WsStream, text: &str) -> Flow {
        let packet = match EnginePacket::decode(text) {
            Ok(packet) => packet,
            Err(error) => {
                tracing::warn!(%error, "dropping undecodable packet");
                return Flow::Continue;
            },
        };

        match packet {
            EnginePacket::Ping => match send_frame(ws, &EnginePacket::Pong).await {
                Ok(()) => Flow::Continue,
                Err(error) => Flow::Lost(error.to_string()),
            },
            EnginePacket::Close => Flow::Lost("server close".into()),
            EnginePacket::Message(SocketPacket { namespace, kind }) if namespace != DEFAULT_NAMESPACE => {
                tracing::debug!(%namespace, packet = ?kind, "ignoring packet for another namespace");
                Flow::Continue
            },
            EnginePacket::Message(SocketPacket { kind, .. }) => match kind {
                PacketKind::Event { name, data, .. } => self.deliver(name, data).await,
                PacketKind::Disconnect => Flow::Lost("io server disconnect".into()),
                PacketKind::ConnectError { message } => Flow::Lost(format!("connect error: {message}")),
                PacketKind::Connect { .. } | PacketKind::Ack { .. } => Flow::Continue,
            },
            EnginePacket::Open(_) | EnginePacket::Pong | EnginePacket::Upgrade | EnginePacket::Noop => {
                Flow::Continue
            },
        }
    }

    async fn deliver(&mut self, name: String, data: serde_json::Value) -> Flow {
        let event = match ServerEvent::decode(&name, data) {
            Ok(Some(event)) => SocketEvent::Server(event),
            Ok(None) => {
                tracing::debug!(event = %name, "ignoring unsubscribed event");
                return Flow::Continue;
            },
            Err(error) => {
                tracing::warn!(event = %name, %error, "malformed event payload");
                SocketEvent::Malformed { event: name, reason: error.to_string() }
            },
        };

        if self.inbox.send(event).await.is_err() {
            tracing::debug!("inbox closed, stopping connection");
            return Flow::Stop;
        }
        Flow::Continue
    }

    async fn lost(&mut self, reason: &str) -> Result<Vec<ConnectionAction>, ConnectionError> {
        tracing::warn!(reason, "disconnected");
        let actions = self.fsm.disconnected(reason, self.env.random_unit())?;
        self.publish(ConnectionStatus::disconnected()).await;
        Ok(actions)
    }

    async fn close(&mut self, ws: &mut WsStream) -> Result<Vec<ConnectionAction>, ConnectionError> {
        for action in self.fsm.shutdown() {
            if action == ConnectionAction::Close {
                let disconnect = EnginePacket::Message(SocketPacket {
                    namespace: huddle_proto::packet::DEFAULT_NAMESPACE.to_owned(),
                    kind: PacketKind::Disconnect,
                });
                if let Err(error) = send_frame(ws, &disconnect).await {
                    tracing::debug!(%error, "failed to send disconnect");
                }
                if let Err(error) = ws.close(None).await {
                    tracing::debug!(%error, "failed to close websocket");
                }
            }
        }
        Ok(Vec::new())
    }

    async fn publish(&mut self, status: ConnectionStatus) {
        if *self.status.borrow() == status {
            return;
        }
        self.status.send_replace(status.clone());
        if self.inbox.send(SocketEvent::Status(status)).await.is_err() {
            tracing::debug!("inbox closed, status change not delivered");
        }
    }
}

/// Dial and complete both handshakes within the configured timeout.
async fn open_session(config: &SocketConfig) -> Result<Session, TransportError> {
    let url = config.websocket_url()?;
    tracing::debug!(%url, "dialing");

    match tokio::time::timeout(config.handshake_timeout, handshake(&url)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Handshake(format!("timed out after {:?}", config.handshake_timeout))),
    }
}

async fn handshake(url: &str) -> Result<Session, TransportError> {
    let (mut ws, _response) = connect_async(url).await?;

    let open = next_text(&mut ws).await?;
    let EnginePacket::Open(handshake) = EnginePacket::decode(&open)? else {
        return Err(TransportError::Handshake(format!("expected open packet, got {open:?}")));
    };

    send_frame(&mut ws, &EnginePacket::Message(SocketPacket::connect())).await?;

    loop {
        let text = next_text(&mut ws).await?;
        match EnginePacket::decode(&text)? {
            EnginePacket::Ping => send_frame(&mut ws, &EnginePacket::Pong).await?,
            EnginePacket::Message(SocketPacket { kind: PacketKind::Connect { sid }, .. }) => {
                let sid = sid.unwrap_or_else(|| handshake.sid.clone());
                return Ok(Session { ws, handshake, sid });
            },
            EnginePacket::Message(SocketPacket { kind: PacketKind::ConnectError { message }, .. }) => {
                return Err(TransportError::Rejected(message));
            },
            EnginePacket::Close => return Err(TransportError::Closed("server closed during handshake".into())),
            other => tracing::debug!(packet = ?other, "ignoring packet during handshake"),
        }
    }
}

async fn next_text(ws: &mut WsStream) -> Result<String, TransportError> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text),
            Some(Ok(Message::Close(_))) | None => {
                return Err(TransportError::Closed("socket closed during handshake".into()));
            },
            Some(Ok(_)) => {},
            Some(Err(error)) => return Err(error.into()),
        }
    }
}

async fn send_frame(ws: &mut WsStream, packet: &EnginePacket) -> Result<(), TransportError> {
    ws.send(Message::Text(packet.encode()?)).await?;
    Ok(())
}

async fn send_event(ws: &mut WsStream, event: &ClientEvent) -> Result<(), TransportError> {
    tracing::debug!(event = event.name(), "emitting");
    send_frame(ws, &EnginePacket::Message(event.to_packet()?)).await
}
