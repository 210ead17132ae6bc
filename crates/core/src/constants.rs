use std::time::Duration;

/// Base currency used until the user picks one
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// First day of the budgeting month until the user picks one
pub const DEFAULT_START_DAY_OF_MONTH: u32 = 1;

/// Inclusive bounds for the start day of month (every month has day 28)
pub const MIN_START_DAY_OF_MONTH: u32 = 1;
pub const MAX_START_DAY_OF_MONTH: u32 = 28;

/// How long a finished import result stays on screen before reverting to idle
pub const IMPORT_RESULT_DISPLAY_INTERVAL: Duration = Duration::from_secs(10);

/// Capacity of the settings intent channel
pub const SETTINGS_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Drive file written by the mount diagnostics probe
pub const DRIVE_PROBE_PATH: &str = "Budgetbook-Debug-sync-folder/Backup/test.txt";
