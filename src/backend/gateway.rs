use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{Board, BoardPlatform, FirmwareCatalog, SerialPortDescriptor};

use super::events::EventBus;
use super::{api, firmware, serial};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("firmware API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed firmware API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("board with hardware model {0} not found")]
    UnknownBoard(u32),
    #[error("firmware release {0} not found")]
    UnknownRelease(String),
    #[error("firmware version {0} could not be parsed")]
    InvalidVersion(String),
    #[error("firmware bundle error: {0}")]
    Bundle(String),
    #[error("firmware archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("no flashing method for board {0}")]
    Unsupported(String),
    #[error("serial port error: {0}")]
    Serial(String),
    #[error("flash failed: {0}")]
    Flash(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Request/response surface of the external backend.
///
/// The application controller only ever holds this as
/// `Arc<dyn BackendGateway>`, so the UI layer can be exercised against a
/// mock in tests.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn fetch_supported_boards(&self) -> Result<Vec<Board>, GatewayError>;

    async fn fetch_firmware_releases(&self) -> Result<FirmwareCatalog, GatewayError>;

    async fn get_available_serial_ports(&self) -> Result<Vec<SerialPortDescriptor>, GatewayError>;

    /// Flash one device. Emits [`super::BackendEvent::FlashProgress`] events
    /// for the port while the write is in flight.
    async fn flash_device(
        &self,
        hw_model: u32,
        port: String,
        firmware_version_id: String,
    ) -> Result<(), GatewayError>;

    fn quit_application(&self) -> !;
}

/// Production gateway: HTTP catalog fetches, serial enumeration, firmware
/// bundle caching, and flash dispatch.
///
/// Catalog responses are cached so `flash_device` can resolve a hardware
/// model and release id without refetching.
pub struct MeshBackend {
    boards: Mutex<Vec<Board>>,
    firmware: Mutex<Option<FirmwareCatalog>>,
    cache: firmware::FirmwareCache,
    events: EventBus,
}

impl MeshBackend {
    pub fn new(events: EventBus) -> anyhow::Result<Self> {
        Ok(Self {
            boards: Mutex::new(Vec::new()),
            firmware: Mutex::new(None),
            cache: firmware::FirmwareCache::new()?,
            events,
        })
    }
}

#[async_trait]
impl BackendGateway for MeshBackend {
    async fn fetch_supported_boards(&self) -> Result<Vec<Board>, GatewayError> {
        let boards = api::fetch_supported_boards().await?;

        *self.boards.lock().await = boards.clone();

        Ok(boards)
    }

    async fn fetch_firmware_releases(&self) -> Result<FirmwareCatalog, GatewayError> {
        let catalog = api::fetch_firmware_releases().await?;

        *self.firmware.lock().await = Some(catalog.clone());

        Ok(catalog)
    }

    async fn get_available_serial_ports(&self) -> Result<Vec<SerialPortDescriptor>, GatewayError> {
        serial::list_ports().await
    }

    async fn flash_device(
        &self,
        hw_model: u32,
        port: String,
        firmware_version_id: String,
    ) -> Result<(), GatewayError> {
        let board = self
            .boards
            .lock()
            .await
            .iter()
            .find(|board| board.hw_model == hw_model)
            .cloned()
            .ok_or(GatewayError::UnknownBoard(hw_model))?;

        let release = self
            .firmware
            .lock()
            .await
            .as_ref()
            .and_then(|catalog| catalog.find_release(&firmware_version_id))
            .ok_or_else(|| GatewayError::UnknownRelease(firmware_version_id.clone()))?;

        let version = firmware::FirmwareVersion::parse(&firmware_version_id)?;
        let asset = firmware::asset_name(&board, &version);

        info!(
            "flashing {} ({}) on {} with {}",
            board.display_name, board.hw_model_slug, port, asset
        );

        let binary = self.cache.fetch_asset(&release, &asset).await?;

        match board.platform {
            BoardPlatform::SerialFlashable => {
                serial::flash_serial(self.events.clone(), board.hw_model_slug, port, binary).await
            }
            BoardPlatform::MassStorage => {
                firmware::copy_to_mass_storage(&binary, &port, &asset).await
            }
            BoardPlatform::Other => Err(GatewayError::Unsupported(board.hw_model_slug)),
        }
    }

    fn quit_application(&self) -> ! {
        info!("quit requested, terminating");
        std::process::exit(0);
    }
}
