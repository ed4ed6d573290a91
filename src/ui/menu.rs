use iced::widget::{button, container, row, text};
use iced::{Alignment, Element, Length};

use crate::style;
use crate::ui::messages::Message;

pub const DISCOUNT_URL: &str = "https://www.rakwireless.com/en-us";
pub const SUPPORT_URL: &str = "https://opencollective.com/meshtastic";
pub const REPORT_BUG_URL: &str = "https://github.com/mesh-flasher/mesh-flasher/issues";

/// Menu bar across the top of the window. Every entry triggers exactly one
/// local action.
pub fn view_menu_bar<'a>() -> Element<'a, Message> {
    let menu = row![
        entry("Refresh Ports", Message::RefreshSerialPorts),
        entry("Fullscreen", Message::ToggleFullscreen),
        entry("Welcome", Message::ShowWelcomeScreen),
        entry("Discounts", Message::OpenDiscountPage),
        entry("Support", Message::OpenSupportPage),
        entry("Copy Version", Message::CopyVersionNumber),
        entry("Copy Log Dir", Message::CopyLogDirectory),
        entry("Open Log", Message::OpenLogFile),
        entry("Report a Bug", Message::ReportBug),
        entry("Quit", Message::Quit),
    ]
    .spacing(2)
    .align_y(Alignment::Center);

    container(menu)
        .width(Length::Fill)
        .padding([2, 8])
        .style(style::menu_bar)
        .into()
}

fn entry(label: &str, message: Message) -> Element<'_, Message> {
    button(text(label).size(13))
        .padding([4, 8])
        .style(button::text)
        .on_press(message)
        .into()
}
