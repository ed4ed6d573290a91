use serde::{Deserialize, Serialize};

/// Flashing method of a hardware model, resolved once when the board catalog
/// loads instead of re-deriving it from the architecture string at every use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardPlatform {
    /// Flashed over a serial connection (ESP-family chips).
    SerialFlashable,
    /// Flashed by copying a UF2 image onto a mounted drive (NRF, RP2040).
    MassStorage,
    #[default]
    Other,
}

impl BoardPlatform {
    pub fn from_architecture(architecture: &str) -> Self {
        let architecture = architecture.to_ascii_lowercase();

        if architecture.contains("esp") {
            BoardPlatform::SerialFlashable
        } else if architecture.contains("nrf") || architecture.contains("rp2040") {
            BoardPlatform::MassStorage
        } else {
            BoardPlatform::Other
        }
    }
}

pub type ListBoardsResponse = Vec<Board>;

/// One supported hardware model from the device catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub hw_model: u32,
    pub hw_model_slug: String,
    pub platformio_target: String,
    pub architecture: String,
    pub actively_supported: bool,
    pub display_name: String,
    #[serde(skip, default)]
    pub platform: BoardPlatform,
}

// Implement Display trait so pick_list can properly show the board
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.actively_supported {
            write!(f, "{}", self.display_name)
        } else {
            write!(f, "{} (unsupported)", self.display_name)
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareCatalog {
    pub releases: FirmwareReleases,
    pub pull_requests: Vec<PullRequest>,
}

impl FirmwareCatalog {
    /// Look up a release id in the stable channel, then alpha, then
    /// pull-request builds.
    pub fn find_release(&self, id: &str) -> Option<FirmwareRelease> {
        self.releases
            .stable
            .iter()
            .chain(self.releases.alpha.iter())
            .find(|release| release.id == id)
            .cloned()
            .or_else(|| {
                self.pull_requests
                    .iter()
                    .find(|pull_request| pull_request.id == id)
                    .map(FirmwareRelease::from)
            })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FirmwareReleases {
    pub stable: Vec<FirmwareRelease>,
    pub alpha: Vec<FirmwareRelease>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmwareRelease {
    pub id: String,
    pub title: String,
    pub page_url: String,
    pub zip_url: String,
}

// Implement Display trait so pick_list can properly show the release
impl std::fmt::Display for FirmwareRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub title: String,
    pub page_url: String,
    pub zip_url: String,
}

impl From<&PullRequest> for FirmwareRelease {
    fn from(pull_request: &PullRequest) -> Self {
        FirmwareRelease {
            id: pull_request.id.clone(),
            title: pull_request.title.clone(),
            page_url: pull_request.page_url.clone(),
            zip_url: pull_request.zip_url.clone(),
        }
    }
}

/// A serial port as reported by the host, with USB metadata when available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPortDescriptor {
    pub port_name: String,
    pub port_type: PortKind,
}

// Implement Display trait so pick_list can properly show the port
impl std::fmt::Display for SerialPortDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.port_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    Usb {
        vid: u16,
        pid: u16,
        serial_number: Option<String>,
        manufacturer: Option<String>,
        product: Option<String>,
    },
    Pci,
    Bluetooth,
    Unknown,
}

/// One user-authored board row: hardware model, target port (or mass-storage
/// mount path), and firmware version. All three stay independently unset
/// until chosen; no cross-field consistency is enforced here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardFlashConfig {
    pub selected_hw_model: Option<u32>,
    pub selected_port: Option<String>,
    pub selected_firmware_version: Option<String>,
}

/// Coarse per-port flash outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashStatus {
    Pending,
    Success,
    Error,
}
