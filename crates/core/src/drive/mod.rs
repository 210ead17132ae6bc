//! Cloud drive mount state and collaborator traits.

mod drive_traits;
mod mount_signal;

pub use drive_traits::{DriveConnectorTrait, DriveStorageTrait};
pub use mount_signal::DriveMountSignal;
