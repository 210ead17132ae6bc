use axum::response::sse::Event as SseEvent;
use budgetbook_core::navigation::Destination;
use budgetbook_core::settings_screen::SettingsState;
use serde_json::json;
use tokio::sync::{broadcast, watch};

/// Something the web client is told about over server-sent events.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    SettingsState(SettingsState),
    NavigateBack,
    Navigate(Destination),
}

impl ServerEvent {
    /// SSE event name the web client listens for.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::SettingsState(_) => "settings:state",
            ServerEvent::NavigateBack => "navigation:back",
            ServerEvent::Navigate(_) => "navigation:navigate",
        }
    }

    pub fn to_sse(&self) -> Result<SseEvent, axum::Error> {
        let event = SseEvent::default().event(self.name());
        match self {
            ServerEvent::SettingsState(snapshot) => event.json_data(snapshot),
            ServerEvent::NavigateBack => Ok(event.data("null")),
            ServerEvent::Navigate(destination) => {
                event.json_data(json!({ "route": destination.route() }))
            }
        }
    }
}

/// Fan-out of server events to every connected client.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No event stream clients connected");
        }
    }

    /// Republishes every settings snapshot, starting with the current one,
    /// until the screen shuts down.
    pub fn forward_settings_states(&self, mut states: watch::Receiver<SettingsState>) {
        let bus = self.clone();
        tokio::spawn(async move {
            loop {
                let snapshot = states.borrow_and_update().clone();
                bus.publish(ServerEvent::SettingsState(snapshot));
                if states.changed().await.is_err() {
                    tracing::debug!("Settings state source closed");
                    break;
                }
            }
        });
    }
}
