use iced::alignment::Horizontal;
use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

use crate::ui::messages::Message;

pub fn view_welcome_screen<'a>() -> Element<'a, Message> {
    let title = text("Welcome")
        .size(32)
        .width(Length::Fill)
        .align_x(Horizontal::Center);

    let intro = text(
        "This application flashes mesh-networking devices with recently \
         released firmware versions. It supports both NRF and ESP32 based \
         boards.",
    )
    .size(16);

    let flashing_title = text("Flashing Information").size(20);

    let flashing_info = text(
        "ESP32 based devices are ready to flash as soon as your computer \
         recognizes them on a serial port. NRF based devices need to be put \
         into bootloader mode first by double-clicking the reset button on \
         the board; the device is ready once your computer mounts a new \
         drive with the device's name, which you then select as the target.",
    )
    .size(16);

    let get_started = button(text("Get started").size(16))
        .padding([10, 24])
        .style(button::primary)
        .on_press(Message::CloseWelcomeScreen);

    let content = column![title, intro, flashing_title, flashing_info, get_started]
        .spacing(20)
        .max_width(560)
        .align_x(Alignment::Center)
        .padding(30);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
