//! Navigation collaborator used by screens to leave or open other screens.

use serde::{Deserialize, Serialize};

/// Screens reachable from the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Destination {
    AddFrame,
}

impl Destination {
    pub const fn route(&self) -> &'static str {
        match self {
            Destination::AddFrame => "add_frame",
        }
    }
}

pub trait NavigatorTrait: Send + Sync {
    fn back(&self);

    fn navigate(&self, destination: Destination);
}
