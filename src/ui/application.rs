use std::path::PathBuf;
use std::sync::Arc;

use futures_util::StreamExt;
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Subscription, Task, window};
use tracing::{debug, error, info};

use crate::backend::{BackendEvent, BackendGateway, EventBus};
use crate::models::{Board, FirmwareCatalog, SerialPortDescriptor};
use crate::settings::SettingsStore;
use crate::style;
use crate::ui::board_list::BoardListState;
use crate::ui::flash::FlashState;
use crate::ui::messages::Message;
use crate::ui::{board_list, flash, menu, welcome};
use crate::utils::shell;

pub struct MeshFlasher {
    gateway: Arc<dyn BackendGateway>,
    events: EventBus,
    settings: SettingsStore,
    log_dir: PathBuf,

    // Reference data snapshots, each loaded independently
    supported_boards: Option<Vec<Board>>,
    firmware: Option<FirmwareCatalog>,
    serial_ports: Option<Vec<SerialPortDescriptor>>,
    boards_error: Option<String>,
    firmware_error: Option<String>,
    ports_error: Option<String>,

    board_list: BoardListState,
    flash: FlashState,

    show_welcome: bool,
    is_fullscreen: bool,
}

impl MeshFlasher {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        mut settings: SettingsStore,
        events: EventBus,
        log_dir: PathBuf,
    ) -> (Self, Task<Message>) {
        let show_welcome = !settings.seen_welcome();

        if show_welcome {
            settings.mark_welcome_seen();
        }

        let app = Self {
            gateway: Arc::clone(&gateway),
            events,
            settings,
            log_dir,
            supported_boards: None,
            firmware: None,
            serial_ports: None,
            boards_error: None,
            firmware_error: None,
            ports_error: None,
            board_list: BoardListState::new(),
            flash: FlashState::new(),
            show_welcome,
            is_fullscreen: false,
        };

        // The three reference sets load independently; one failing must not
        // hold up the others
        let load = Task::batch([
            Self::load_boards(Arc::clone(&gateway)),
            Self::load_firmware(Arc::clone(&gateway)),
            Self::load_ports(gateway),
        ]);

        (app, load)
    }

    pub fn title(&self) -> String {
        format!("Mesh Flasher v{}", env!("CARGO_PKG_VERSION"))
    }

    fn load_boards(gateway: Arc<dyn BackendGateway>) -> Task<Message> {
        Task::perform(
            async move {
                gateway
                    .fetch_supported_boards()
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| match result {
                Ok(boards) => Message::BoardsLoaded(boards),
                Err(e) => Message::BoardsLoadFailed(e),
            },
        )
    }

    fn load_firmware(gateway: Arc<dyn BackendGateway>) -> Task<Message> {
        Task::perform(
            async move {
                gateway
                    .fetch_firmware_releases()
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| match result {
                Ok(catalog) => Message::FirmwareLoaded(catalog),
                Err(e) => Message::FirmwareLoadFailed(e),
            },
        )
    }

    fn load_ports(gateway: Arc<dyn BackendGateway>) -> Task<Message> {
        Task::perform(
            async move {
                gateway
                    .get_available_serial_ports()
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| match result {
                Ok(ports) => Message::PortsLoaded(ports),
                Err(e) => Message::PortsLoadFailed(e),
            },
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BoardsLoaded(boards) => {
                info!("loaded {} supported boards", boards.len());
                self.supported_boards = Some(boards);
                self.boards_error = None;
                Task::none()
            }

            Message::BoardsLoadFailed(e) => {
                error!("failed to fetch supported boards: {e}");
                self.boards_error = Some(e);
                Task::none()
            }

            Message::FirmwareLoaded(catalog) => {
                info!(
                    "loaded {} stable and {} alpha firmware releases",
                    catalog.releases.stable.len(),
                    catalog.releases.alpha.len()
                );
                self.firmware = Some(catalog);
                self.firmware_error = None;
                Task::none()
            }

            Message::FirmwareLoadFailed(e) => {
                error!("failed to fetch firmware releases: {e}");
                self.firmware_error = Some(e);
                Task::none()
            }

            Message::PortsLoaded(ports) => {
                info!("found {} serial ports", ports.len());
                self.serial_ports = Some(ports);
                self.ports_error = None;
                Task::none()
            }

            Message::PortsLoadFailed(e) => {
                error!("failed to enumerate serial ports: {e}");
                self.ports_error = Some(e);
                Task::none()
            }

            Message::RefreshSerialPorts => Self::load_ports(Arc::clone(&self.gateway)),

            Message::RetryReferenceData => {
                let mut loads = Vec::new();

                if self.supported_boards.is_none() {
                    self.boards_error = None;
                    loads.push(Self::load_boards(Arc::clone(&self.gateway)));
                }
                if self.firmware.is_none() {
                    self.firmware_error = None;
                    loads.push(Self::load_firmware(Arc::clone(&self.gateway)));
                }
                if self.serial_ports.is_none() {
                    self.ports_error = None;
                    loads.push(Self::load_ports(Arc::clone(&self.gateway)));
                }

                Task::batch(loads)
            }

            // Re-showing the welcome screen manually is a pure UI action and
            // does not touch the persisted flag
            Message::ShowWelcomeScreen => {
                self.show_welcome = true;
                Task::none()
            }

            Message::CloseWelcomeScreen => {
                self.show_welcome = false;
                Task::none()
            }

            Message::ToggleFullscreen => {
                self.is_fullscreen = !self.is_fullscreen;

                let mode = if self.is_fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };

                window::get_latest().and_then(move |id| window::change_mode(id, mode))
            }

            Message::CopyVersionNumber => {
                iced::clipboard::write(env!("CARGO_PKG_VERSION").to_string())
            }

            Message::CopyLogDirectory => {
                let log_dir = self.log_dir.display().to_string();
                info!("copying log directory to clipboard: {log_dir}");
                iced::clipboard::write(log_dir)
            }

            Message::OpenLogFile => {
                shell::open_path(&self.log_dir.join(crate::LOG_FILE_NAME));
                Task::none()
            }

            Message::ReportBug => {
                shell::open_url(menu::REPORT_BUG_URL);
                Task::none()
            }

            Message::OpenDiscountPage => {
                shell::open_url(menu::DISCOUNT_URL);
                Task::none()
            }

            Message::OpenSupportPage => {
                shell::open_url(menu::SUPPORT_URL);
                Task::none()
            }

            Message::Quit => self.gateway.quit_application(),

            Message::BoardList(message) => board_list::handle_message(
                &mut self.board_list,
                self.supported_boards.as_deref(),
                self.firmware.as_ref(),
                message,
            ),

            Message::Flash(message) => flash::handle_message(
                &mut self.flash,
                self.board_list.boards(),
                &self.gateway,
                message,
            ),

            Message::Backend(BackendEvent::FlashProgress {
                port,
                source_id,
                current,
                total,
            }) => {
                debug!("flash progress from {source_id} on {port}: {current}/{total}");
                self.flash.apply_progress(&port, current, total);
                Task::none()
            }
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::run_with_id(
            "backend-events",
            self.events.subscribe().map(Message::Backend),
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = if self.show_welcome {
            welcome::view_welcome_screen()
        } else if let (Some(boards), Some(firmware), Some(ports)) =
            (&self.supported_boards, &self.firmware, &self.serial_ports)
        {
            board_list::view_board_list(&self.board_list, boards, firmware, ports, &self.flash)
        } else {
            self.view_loading()
        };

        column![menu::view_menu_bar(), content].into()
    }

    fn view_loading(&self) -> Element<'_, Message> {
        let status = |label: &str, loaded: bool, error: &Option<String>| {
            let state = match (loaded, error) {
                (true, _) => text("ready").size(14).color(style::SUCCESS),
                (false, Some(e)) => text(format!("failed: {e}")).size(14).color(style::ERROR),
                (false, None) => text("loading...").size(14).color(style::MUTED),
            };

            row![text(format!("{label}:")).size(14), state]
                .spacing(8)
                .align_y(Alignment::Center)
        };

        let mut content = column![
            text("Loading device catalogs...").size(24),
            status(
                "Supported boards",
                self.supported_boards.is_some(),
                &self.boards_error
            ),
            status(
                "Firmware releases",
                self.firmware.is_some(),
                &self.firmware_error
            ),
            status("Serial ports", self.serial_ports.is_some(), &self.ports_error),
        ]
        .spacing(16)
        .align_x(Alignment::Center);

        let any_failed = self.boards_error.is_some()
            || self.firmware_error.is_some()
            || self.ports_error.is_some();

        if any_failed {
            content = content.push(
                button(text("Retry").size(14))
                    .padding([8, 20])
                    .style(button::primary)
                    .on_press(Message::RetryReferenceData),
            );
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}
