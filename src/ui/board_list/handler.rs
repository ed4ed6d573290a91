use iced::Task;
use tracing::debug;

use crate::models::{Board, BoardFlashConfig, FirmwareCatalog};
use crate::ui::messages::Message;

use super::{BoardListMessage, BoardListState};

pub fn handle_message(
    state: &mut BoardListState,
    board_catalog: Option<&[Board]>,
    firmware: Option<&FirmwareCatalog>,
    message: BoardListMessage,
) -> Task<Message> {
    match message {
        BoardListMessage::SetHwModel(index, hw_model) => {
            *state = state.set_hw_model(index, hw_model);
            debug!("set hardware model {hw_model} on entry {index}");
            Task::none()
        }

        BoardListMessage::SetPort(index, port) => {
            debug!("set port {port} on entry {index}");
            *state = state.set_port(index, port);
            Task::none()
        }

        BoardListMessage::SetFirmwareVersion(index, version) => {
            debug!("set firmware version {version} on entry {index}");
            *state = state.set_firmware_version(index, version);
            Task::none()
        }

        BoardListMessage::AddBoard => {
            // The view layer owns defaulting: first catalog board, first
            // stable release, no port
            let selected_hw_model = board_catalog
                .and_then(|boards| boards.first())
                .map(|board| board.hw_model);
            let selected_firmware_version = firmware
                .and_then(|catalog| catalog.releases.stable.first())
                .map(|release| release.id.clone());

            *state = state.add_board(BoardFlashConfig {
                selected_hw_model,
                selected_port: None,
                selected_firmware_version,
            });
            debug!("added board entry, list now has {}", state.len());
            Task::none()
        }

        BoardListMessage::DuplicateBoard(index) => {
            *state = state.duplicate_board(index);
            debug!("duplicated board entry {index}");
            Task::none()
        }

        BoardListMessage::DeleteBoard(index) => {
            *state = state.delete_board(index);
            debug!("deleted board entry {index}");
            Task::none()
        }

        BoardListMessage::PickMassStoragePath(index) => Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .set_title("Select the device's mounted drive")
                    .pick_folder()
                    .await
                    .map(|folder| folder.path().to_string_lossy().to_string())
            },
            move |path| Message::BoardList(BoardListMessage::MassStoragePathPicked(index, path)),
        ),

        BoardListMessage::MassStoragePathPicked(index, Some(path)) => {
            debug!("picked mount path {path} for entry {index}");
            *state = state.set_port(index, path);
            Task::none()
        }

        BoardListMessage::MassStoragePathPicked(_, None) => Task::none(),
    }
}
