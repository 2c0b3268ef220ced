//! Generic runtime for client orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Client`]: protocol and game state machine
//! - [`Driver`]: platform-specific I/O
//!
//! Each event runs to completion through [`Client::handle`] before the next
//! one is pulled, and the resulting actions are executed in order.

use coword_client::{Client, ClientAction, ClientEvent, KeyInput};

use crate::{AppEvent, Command, Driver, command};

/// Generic runtime that orchestrates the Client and a Driver.
pub struct Runtime<D: Driver> {
    driver: D,
    client: Client,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and client.
    pub fn new(driver: D, client: Client) -> Self {
        Self { driver, client }
    }

    /// Run the main event loop.
    ///
    /// Connects, then processes driver events until input ends or `/quit`,
    /// at which point the client disconnects and the driver stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to produce events.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.dispatch(ClientEvent::Connect).await;

        loop {
            match self.driver.next_event().await? {
                Some(AppEvent::Client(event)) => self.dispatch(event).await,
                Some(AppEvent::Line(line)) => {
                    if self.handle_line(&line).await {
                        break;
                    }
                },
                None => break,
            }
        }

        self.dispatch(ClientEvent::Disconnect).await;
        self.driver.stop();
        Ok(())
    }

    /// Handle one input line.
    ///
    /// Returns `true` if the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        let command = command::parse(line);
        tracing::debug!(?command, "command");

        let events = match command {
            Command::Quit => return true,
            Command::Connect => vec![ClientEvent::Connect],
            Command::Disconnect => vec![ClientEvent::Disconnect],
            Command::Create => vec![ClientEvent::CreateGame],
            Command::Join { game_id } => vec![ClientEvent::JoinGame { game_id }],
            Command::NewGame => vec![ClientEvent::NewGame],
            Command::Leave => vec![ClientEvent::LeaveGame],
            Command::Back => vec![ClientEvent::Key(KeyInput::Backspace)],
            Command::Dismiss { index } => {
                let id = index
                    .checked_sub(1)
                    .and_then(|i| self.client.notifications().iter().nth(i))
                    .map(|n| n.id);
                match id {
                    Some(id) => vec![ClientEvent::Dismiss(id)],
                    None => {
                        return self.notify(format!("No notification {index}")).await;
                    },
                }
            },
            Command::Guess { word } if word.is_empty() => vec![],
            Command::Guess { word } => word
                .chars()
                .map(|c| ClientEvent::Key(KeyInput::Char(c)))
                .chain(std::iter::once(ClientEvent::Key(KeyInput::Enter)))
                .collect(),
            Command::Unknown { input } => {
                return self.notify(format!("Unknown command: {input}")).await;
            },
            Command::InvalidArgs { command, error } => {
                return self.notify(format!("/{command}: {error}")).await;
            },
        };

        for event in events {
            self.dispatch(event).await;
        }
        false
    }

    async fn notify(&mut self, text: String) -> bool {
        let actions = self.client.notify(text);
        self.execute(actions).await;
        false
    }

    async fn dispatch(&mut self, event: ClientEvent) {
        let actions = self.client.handle(event);
        self.execute(actions).await;
    }

    /// Execute client actions in order.
    ///
    /// Driver failures are logged; the connection state machine learns about
    /// broken sockets from the close event the driver reports.
    async fn execute(&mut self, actions: Vec<ClientAction>) {
        for action in actions {
            match action {
                ClientAction::Open { socket, endpoint } => self.driver.open(socket, &endpoint),
                ClientAction::Send { socket, text } => {
                    if let Err(e) = self.driver.send(socket, text).await {
                        tracing::error!(%socket, error = %e, "failed to send frame");
                    }
                },
                ClientAction::Close { socket } => self.driver.close(socket),
                ClientAction::ScheduleTimer { timer, after } => self.driver.schedule(timer, after),
                ClientAction::CancelTimer(timer) => self.driver.cancel(timer),
                ClientAction::Render => {
                    if let Err(e) = self.driver.render(&self.client.view()) {
                        tracing::error!(error = %e, "failed to render");
                    }
                },
            }
        }
    }

    /// Get a reference to the Client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime and return the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}
