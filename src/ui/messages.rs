use crate::backend::BackendEvent;
use crate::models::{Board, FirmwareCatalog, SerialPortDescriptor};
use crate::ui::board_list::BoardListMessage;
use crate::ui::flash::FlashMessage;

#[derive(Debug, Clone)]
pub enum Message {
    // Reference data
    BoardsLoaded(Vec<Board>),
    BoardsLoadFailed(String),
    FirmwareLoaded(FirmwareCatalog),
    FirmwareLoadFailed(String),
    PortsLoaded(Vec<SerialPortDescriptor>),
    PortsLoadFailed(String),
    RefreshSerialPorts,
    RetryReferenceData,

    // Onboarding and window chrome
    ShowWelcomeScreen,
    CloseWelcomeScreen,
    ToggleFullscreen,
    CopyVersionNumber,
    CopyLogDirectory,
    OpenLogFile,
    ReportBug,
    OpenDiscountPage,
    OpenSupportPage,
    Quit,

    // Module-specific message variants
    BoardList(BoardListMessage),
    Flash(FlashMessage),

    // Asynchronous gateway events
    Backend(BackendEvent),
}
