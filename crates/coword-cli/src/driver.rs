//! WebSocket driver.
//!
//! Implements [`Driver`] on tokio. Each socket runs in its own task that owns
//! the tungstenite stream; timers are sleeping tasks cancelled through their
//! abort handles; stdin is read line by line in another task. All of them
//! report back through one channel, so the runtime still sees a single ordered
//! stream of events.

use std::{collections::HashMap, time::Duration};

use coword_app::{AppEvent, Driver};
use coword_client::{ClientEvent, ClientView, SocketId, Timer};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::AbortHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::render;

/// Driver errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket has already closed.
    #[error("{0} is not open")]
    SocketGone(SocketId),

    /// I/O error from stdin or signal handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Messages funnelled from background tasks to the driver.
#[derive(Debug)]
enum DriverMsg {
    Event(AppEvent),
    InputClosed,
}

/// Requests for a socket task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

#[derive(Debug)]
struct SocketHandle {
    outbound: mpsc::UnboundedSender<Outbound>,
    task: AbortHandle,
}

/// Tokio and tungstenite backed driver.
#[derive(Debug)]
pub struct WsDriver {
    tx: mpsc::UnboundedSender<DriverMsg>,
    rx: mpsc::UnboundedReceiver<DriverMsg>,
    sockets: HashMap<SocketId, SocketHandle>,
    timers: HashMap<Timer, AbortHandle>,
    input: Option<AbortHandle>,
    watch_ctrl_c: bool,
}

impl Default for WsDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WsDriver {
    /// Create a driver without user input. Events end only on [`Driver::stop`].
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            sockets: HashMap::new(),
            timers: HashMap::new(),
            input: None,
            watch_ctrl_c: false,
        }
    }

    /// Create a driver that reads commands from stdin and stops on Ctrl-C.
    ///
    /// Must be called inside a tokio runtime.
    pub fn with_stdin() -> Self {
        let mut driver = Self::new();
        let tx = driver.tx.clone();

        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !deliver(&tx, DriverMsg::Event(AppEvent::Line(line))) {
                            return;
                        }
                    },
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read stdin");
                        break;
                    },
                }
            }
            deliver(&tx, DriverMsg::InputClosed);
        });

        driver.input = Some(task.abort_handle());
        driver.watch_ctrl_c = true;
        driver
    }

    /// Inject an event as if a background task had reported it.
    pub fn push(&self, event: AppEvent) {
        deliver(&self.tx, DriverMsg::Event(event));
    }

    /// Number of sockets the driver still tracks.
    pub fn open_sockets(&self) -> usize {
        self.sockets.len()
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    async fn recv(&mut self) -> Result<Option<DriverMsg>, TransportError> {
        if !self.watch_ctrl_c {
            return Ok(self.rx.recv().await);
        }

        tokio::select! {
            msg = self.rx.recv() => Ok(msg),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("interrupted");
                Ok(Some(DriverMsg::InputClosed))
            },
        }
    }

    /// Drop bookkeeping for sockets and timers that have finished.
    fn forget_finished(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Client(ClientEvent::SocketClosed(socket)) => {
                self.sockets.remove(socket);
            },
            AppEvent::Client(ClientEvent::TimerFired(timer)) => {
                self.timers.remove(timer);
            },
            _ => {},
        }
    }
}

impl Driver for WsDriver {
    type Error = TransportError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        match self.recv().await? {
            Some(DriverMsg::Event(event)) => {
                self.forget_finished(&event);
                Ok(Some(event))
            },
            Some(DriverMsg::InputClosed) | None => Ok(None),
        }
    }

    fn open(&mut self, socket: SocketId, endpoint: &str) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(socket, endpoint.to_string(), outbound_rx, self.tx.clone()));
        self.sockets.insert(socket, SocketHandle { outbound, task: task.abort_handle() });
    }

    async fn send(&mut self, socket: SocketId, text: String) -> Result<(), Self::Error> {
        let handle = self.sockets.get(&socket).ok_or(TransportError::SocketGone(socket))?;
        handle.outbound.send(Outbound::Text(text)).map_err(|_| TransportError::SocketGone(socket))
    }

    fn close(&mut self, socket: SocketId) {
        if let Some(handle) = self.sockets.get(&socket)
            && handle.outbound.send(Outbound::Close).is_err()
        {
            // Task already gone; report the close ourselves.
            self.sockets.remove(&socket);
            self.push(AppEvent::Client(ClientEvent::SocketClosed(socket)));
        }
    }

    fn schedule(&mut self, timer: Timer, after: Duration) {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            deliver(&tx, DriverMsg::Event(AppEvent::Client(ClientEvent::TimerFired(timer))));
        });

        if let Some(previous) = self.timers.insert(timer, task.abort_handle()) {
            previous.abort();
        }
    }

    fn cancel(&mut self, timer: Timer) {
        if let Some(task) = self.timers.remove(&timer) {
            task.abort();
        }
    }

    fn render(&mut self, view: &ClientView) -> Result<(), Self::Error> {
        render::render(view);
        Ok(())
    }

    fn stop(&mut self) {
        for (_, handle) in self.sockets.drain() {
            handle.task.abort();
        }
        for (_, task) in self.timers.drain() {
            task.abort();
        }
        if let Some(input) = self.input.take() {
            input.abort();
        }
        tracing::debug!("driver stopped");
    }
}

/// Hand a message to the runtime. Returns `false` once the runtime is gone.
fn deliver(tx: &mpsc::UnboundedSender<DriverMsg>, msg: DriverMsg) -> bool {
    match tx.send(msg) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(msg = ?e.0, "runtime gone, message dropped");
            false
        },
    }
}

/// Own one WebSocket until it closes, then report `SocketClosed`.
async fn run_socket(
    socket: SocketId,
    endpoint: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<DriverMsg>,
) {
    let report = |event: ClientEvent| deliver(&events, DriverMsg::Event(AppEvent::Client(event)));

    let stream = match connect_async(endpoint.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            tracing::warn!(%socket, %endpoint, error = %e, "connect failed");
            report(ClientEvent::SocketClosed(socket));
            return;
        },
    };

    if !report(ClientEvent::SocketOpened(socket)) {
        return;
    }

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            request = outbound.recv() => match request {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(Message::Text(text.into())).await {
                        tracing::warn!(%socket, error = %e, "send failed");
                        break;
                    }
                },
                Some(Outbound::Close) | None => {
                    if let Err(e) = sink.close().await {
                        tracing::debug!(%socket, error = %e, "close handshake failed");
                    }
                    break;
                },
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let text = text.as_str().to_owned();
                    if !report(ClientEvent::FrameReceived { socket, text }) {
                        break;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(%socket, ?frame, "server closed connection");
                    break;
                },
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!(%socket, "received binary message, ignoring");
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(%socket, error = %e, "socket error");
                    break;
                },
                None => break,
            },
        }
    }

    report(ClientEvent::SocketClosed(socket));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_reports_closed_runtime() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let line = || DriverMsg::Event(AppEvent::Line("crane".into()));

        assert!(deliver(&tx, line()));
        assert!(matches!(rx.try_recv(), Ok(DriverMsg::Event(AppEvent::Line(l))) if l == "crane"));

        drop(rx);
        assert!(!deliver(&tx, line()));
        assert!(!deliver(&tx, DriverMsg::InputClosed));
    }
}
