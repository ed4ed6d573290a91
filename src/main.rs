use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use mesh_flasher::backend::{BackendGateway, EventBus, MeshBackend};
use mesh_flasher::settings::SettingsStore;
use mesh_flasher::style;
use mesh_flasher::ui::MeshFlasher;

pub fn main() -> iced::Result {
    let log_dir = resolve_log_dir();
    let _log_guard = init_tracing(&log_dir);

    info!("starting mesh-flasher v{}", env!("CARGO_PKG_VERSION"));

    let events = EventBus::new();

    let gateway: Arc<dyn BackendGateway> = match MeshBackend::new(events.clone()) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            error!("failed to initialize backend gateway: {e:#}");
            std::process::exit(1);
        }
    };

    let settings = SettingsStore::open();

    iced::application(MeshFlasher::title, MeshFlasher::update, MeshFlasher::view)
        .subscription(MeshFlasher::subscription)
        .theme(|_| style::custom_theme())
        .window_size(iced::Size::new(960f32, 680f32))
        .centered()
        .run_with(move || MeshFlasher::new(gateway, settings, events, log_dir))
}

fn resolve_log_dir() -> PathBuf {
    match ProjectDirs::from("org", "mesh-flasher", "Mesh Flasher") {
        Some(project_dirs) => project_dirs.data_dir().join("logs"),
        None => std::env::temp_dir().join("mesh-flasher-logs"),
    }
}

/// Log to stdout and to a file in the log directory. The returned guard
/// keeps the file writer flushing until shutdown.
fn init_tracing(log_dir: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,iced=warn"));

    match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let file = tracing_appender::rolling::never(log_dir, mesh_flasher::LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(file);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();

            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();

            error!("failed to create log directory {}: {e}", log_dir.display());

            None
        }
    }
}
