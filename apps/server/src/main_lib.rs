use std::sync::Arc;

use budgetbook_core::backup::LegacyJsonBackupImporter;
use budgetbook_core::settings::SettingsService;
use budgetbook_core::settings_screen::{SettingsScreen, SettingsScreenConfig, SettingsScreenDeps};
use budgetbook_core::transactions::TransactionRepositoryTrait;
use budgetbook_storage_sqlite::{
    db, settings::SettingsRepository, transactions::TransactionRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    drive::LocalFolderDrive,
    events::EventBus,
    navigator::EventBusNavigator,
};

const EVENT_BUS_CAPACITY: usize = 256;

pub struct AppState {
    pub settings_screen: SettingsScreen,
    pub transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    pub event_bus: EventBus,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("BB_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let settings_repository = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));
    let settings_service = Arc::new(SettingsService::new(settings_repository)?);
    let transaction_repository: Arc<dyn TransactionRepositoryTrait> =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));

    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
    let drive = Arc::new(LocalFolderDrive::new(config.drive_dir.clone()));

    let settings_screen = SettingsScreen::start(
        SettingsScreenDeps {
            settings: settings_service,
            importer: Arc::new(LegacyJsonBackupImporter::new(
                transaction_repository.clone(),
            )),
            drive_connector: drive.clone(),
            drive_storage: drive,
            navigator: Arc::new(EventBusNavigator::new(event_bus.clone())),
        },
        SettingsScreenConfig {
            import_display_interval: config.import_display_interval,
            ..SettingsScreenConfig::default()
        },
    );

    event_bus.forward_settings_states(settings_screen.subscribe());

    Ok(Arc::new(AppState {
        settings_screen,
        transaction_repository,
        event_bus,
        db_path,
    }))
}
