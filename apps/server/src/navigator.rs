use budgetbook_core::navigation::{Destination, NavigatorTrait};

use crate::events::{EventBus, ServerEvent};

/// Forwards navigation requests to connected web clients.
pub struct EventBusNavigator {
    event_bus: EventBus,
}

impl EventBusNavigator {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl NavigatorTrait for EventBusNavigator {
    fn back(&self) {
        self.event_bus.publish(ServerEvent::NavigateBack);
    }

    fn navigate(&self, destination: Destination) {
        self.event_bus.publish(ServerEvent::Navigate(destination));
    }
}
