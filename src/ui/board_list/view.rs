use iced::widget::{button, column, container, horizontal_space, pick_list, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::models::{
    Board, BoardFlashConfig, BoardPlatform, FirmwareCatalog, FirmwareRelease, FlashStatus,
    SerialPortDescriptor,
};
use crate::style;
use crate::ui::flash::{FlashMessage, FlashState};
use crate::ui::messages::Message;

use super::{BoardListMessage, BoardListState};

pub fn view_board_list<'a>(
    state: &'a BoardListState,
    board_catalog: &'a [Board],
    firmware: &'a FirmwareCatalog,
    serial_ports: &'a [SerialPortDescriptor],
    flash: &'a FlashState,
) -> Element<'a, Message> {
    // Stable releases first, then alpha, in one flat picker
    let mut releases: Vec<FirmwareRelease> = firmware.releases.stable.clone();
    releases.extend(firmware.releases.alpha.iter().cloned());

    let flash_button = button(text("Flash Devices").size(16))
        .padding([10, 24])
        .style(button::primary)
        .on_press(Message::Flash(FlashMessage::FlashAll));

    let add_button = button(text("Add Board").size(14))
        .padding([8, 16])
        .style(button::secondary)
        .on_press(Message::BoardList(BoardListMessage::AddBoard));

    let rows: Vec<Element<'a, Message>> = state
        .boards()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            view_board_row(
                index,
                entry,
                board_catalog,
                releases.clone(),
                serial_ports,
                flash,
            )
        })
        .collect();

    let content = column![
        container(flash_button).center_x(Length::Fill),
        column(rows).spacing(12),
        container(add_button).center_x(Length::Fill),
    ]
    .spacing(16)
    .padding(16)
    .width(Length::Fill);

    scrollable(content).height(Length::Fill).into()
}

fn view_board_row<'a>(
    index: usize,
    entry: &'a BoardFlashConfig,
    board_catalog: &'a [Board],
    releases: Vec<FirmwareRelease>,
    serial_ports: &'a [SerialPortDescriptor],
    flash: &'a FlashState,
) -> Element<'a, Message> {
    let selected_board = entry
        .selected_hw_model
        .and_then(|hw_model| board_catalog.iter().find(|b| b.hw_model == hw_model));

    let board_picker = pick_list(board_catalog, selected_board.cloned(), move |board: Board| {
        Message::BoardList(BoardListMessage::SetHwModel(index, board.hw_model))
    })
    .placeholder(if board_catalog.is_empty() {
        "Could not fetch board variants"
    } else {
        "Select a board variant"
    })
    .text_size(14)
    .width(240);

    // Serial-flashable boards pick from the detected ports; everything else
    // targets a mounted drive picked from a folder dialog
    let platform = selected_board
        .map(|board| board.platform)
        .unwrap_or_default();

    let port_widget: Element<'a, Message> = match platform {
        BoardPlatform::SerialFlashable => {
            let selected_port = entry
                .selected_port
                .as_ref()
                .and_then(|port| serial_ports.iter().find(|p| &p.port_name == port));

            pick_list(
                serial_ports,
                selected_port.cloned(),
                move |port: SerialPortDescriptor| {
                    Message::BoardList(BoardListMessage::SetPort(index, port.port_name))
                },
            )
            .placeholder(if serial_ports.is_empty() {
                "No ports detected"
            } else {
                "Select a port"
            })
            .text_size(14)
            .width(190)
            .into()
        }
        BoardPlatform::MassStorage | BoardPlatform::Other => button(
            text(entry.selected_port.as_deref().unwrap_or("Select a folder")).size(14),
        )
        .padding([6, 12])
        .style(button::secondary)
        .on_press(Message::BoardList(BoardListMessage::PickMassStoragePath(
            index,
        )))
        .into(),
    };

    let selected_release = entry
        .selected_firmware_version
        .as_ref()
        .and_then(|id| releases.iter().find(|release| &release.id == id))
        .cloned();

    let release_picker = pick_list(
        releases,
        selected_release,
        move |release: FirmwareRelease| {
            Message::BoardList(BoardListMessage::SetFirmwareVersion(index, release.id))
        },
    )
    .placeholder("Select a firmware version")
    .text_size(14)
    .width(190);

    let status: Element<'a, Message> = match entry
        .selected_port
        .as_deref()
        .and_then(|port| flash.status_for(port))
    {
        Some(port_status) => match port_status.status {
            FlashStatus::Pending => match port_status.progress {
                Some(percent) => text(format!("flashing {percent:.0}%"))
                    .size(14)
                    .color(style::MUTED)
                    .into(),
                None => text("flashing...").size(14).color(style::MUTED).into(),
            },
            FlashStatus::Success => text("flashed").size(14).color(style::SUCCESS).into(),
            FlashStatus::Error => text("failed").size(14).color(style::ERROR).into(),
        },
        None => text("").size(14).into(),
    };

    let controls = row![board_picker, port_widget, release_picker]
        .spacing(10)
        .align_y(Alignment::Center);

    let actions = row![
        status,
        button(text("Duplicate").size(13))
            .style(button::text)
            .on_press(Message::BoardList(BoardListMessage::DuplicateBoard(index))),
        button(text("Delete").size(13))
            .style(button::text)
            .on_press(Message::BoardList(BoardListMessage::DeleteBoard(index))),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    container(
        row![controls, horizontal_space(), actions]
            .spacing(10)
            .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(style::board_row)
    .into()
}
