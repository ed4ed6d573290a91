use std::sync::Arc;

use iced::Task;
use tracing::{error, info, warn};

use crate::backend::BackendGateway;
use crate::models::BoardFlashConfig;
use crate::ui::messages::Message;

use super::{FlashMessage, FlashState, FlashTarget, flash_targets};

pub fn handle_message(
    state: &mut FlashState,
    boards: &[BoardFlashConfig],
    gateway: &Arc<dyn BackendGateway>,
    message: FlashMessage,
) -> Task<Message> {
    match message {
        FlashMessage::FlashAll => {
            let targets = flash_targets(boards);

            if targets.is_empty() {
                warn!("flash requested but no board entry has a port configured");
                return Task::none();
            }

            info!("flashing {} configured boards", targets.len());

            // Fire all requests at once; each entry's outcome is independent
            let tasks: Vec<_> = targets
                .into_iter()
                .map(|target| {
                    state.mark_pending(&target.port);
                    start_flash(Arc::clone(gateway), target)
                })
                .collect();

            Task::batch(tasks)
        }

        FlashMessage::Completed { port, result } => {
            match &result {
                Ok(()) => info!("flash succeeded on {port}"),
                Err(e) => error!("flash failed on {port}: {e}"),
            }

            state.apply_result(&port, result.is_ok());
            Task::none()
        }
    }
}

fn start_flash(gateway: Arc<dyn BackendGateway>, target: FlashTarget) -> Task<Message> {
    let port = target.port.clone();

    let (Some(hw_model), Some(version)) = (target.hw_model, target.firmware_version) else {
        // A port with no model or firmware selected can never resolve in the
        // backend; fail it locally instead of skipping it silently
        return Task::done(Message::Flash(FlashMessage::Completed {
            port,
            result: Err("board entry is missing a hardware model or firmware selection".into()),
        }));
    };

    Task::perform(
        run_flash(gateway, port, hw_model, version),
        |(port, result)| Message::Flash(FlashMessage::Completed { port, result }),
    )
}

async fn run_flash(
    gateway: Arc<dyn BackendGateway>,
    port: String,
    hw_model: u32,
    firmware_version_id: String,
) -> (String, Result<(), String>) {
    let result = gateway
        .flash_device(hw_model, port.clone(), firmware_version_id)
        .await
        .map_err(|e| e.to_string());

    (port, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GatewayError;
    use crate::models::{Board, FirmwareCatalog, SerialPortDescriptor};
    use async_trait::async_trait;
    use futures_util::future::join_all;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct MockGateway {
        calls: Mutex<Vec<(u32, String, String)>>,
        failing_ports: HashSet<String>,
    }

    impl MockGateway {
        fn new(failing_ports: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                failing_ports: failing_ports.iter().map(|p| p.to_string()).collect(),
            })
        }

        fn calls(&self) -> Vec<(u32, String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BackendGateway for MockGateway {
        async fn fetch_supported_boards(&self) -> Result<Vec<Board>, GatewayError> {
            Ok(Vec::new())
        }

        async fn fetch_firmware_releases(&self) -> Result<FirmwareCatalog, GatewayError> {
            Ok(FirmwareCatalog::default())
        }

        async fn get_available_serial_ports(
            &self,
        ) -> Result<Vec<SerialPortDescriptor>, GatewayError> {
            Ok(Vec::new())
        }

        async fn flash_device(
            &self,
            hw_model: u32,
            port: String,
            firmware_version_id: String,
        ) -> Result<(), GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((hw_model, port.clone(), firmware_version_id));

            if self.failing_ports.contains(&port) {
                Err(GatewayError::Flash("injected failure".to_string()))
            } else {
                Ok(())
            }
        }

        fn quit_application(&self) -> ! {
            panic!("quit_application is not used in tests");
        }
    }

    fn config(port: Option<&str>) -> BoardFlashConfig {
        BoardFlashConfig {
            selected_hw_model: Some(9),
            selected_port: port.map(str::to_string),
            selected_firmware_version: Some("v2.1.10.abcdef1".to_string()),
        }
    }

    async fn flash_all(
        gateway: Arc<MockGateway>,
        boards: &[BoardFlashConfig],
        state: &mut FlashState,
    ) {
        let targets = flash_targets(boards);

        let jobs = targets.into_iter().map(|target| {
            state.mark_pending(&target.port);
            run_flash(
                Arc::clone(&gateway) as Arc<dyn BackendGateway>,
                target.port,
                target.hw_model.unwrap(),
                target.firmware_version.unwrap(),
            )
        });

        for (port, result) in join_all(jobs).await {
            state.apply_result(&port, result.is_ok());
        }
    }

    #[tokio::test]
    async fn null_port_entries_are_skipped_and_untracked() {
        let gateway = MockGateway::new(&[]);
        let boards = [config(Some("A")), config(None), config(Some("B"))];
        let mut state = FlashState::new();

        flash_all(Arc::clone(&gateway), &boards, &mut state).await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, "A");
        assert_eq!(calls[1].1, "B");

        assert_eq!(state.tracked_ports(), 2);
        assert!(state.status_for("A").is_some());
        assert!(state.status_for("B").is_some());
    }

    #[tokio::test]
    async fn one_failure_never_flips_the_siblings_outcome() {
        use crate::models::FlashStatus;

        let gateway = MockGateway::new(&["A"]);
        let boards = [config(Some("A")), config(Some("B"))];
        let mut state = FlashState::new();

        flash_all(gateway, &boards, &mut state).await;

        assert_eq!(state.status_for("A").unwrap().status, FlashStatus::Error);
        assert_eq!(state.status_for("B").unwrap().status, FlashStatus::Success);
    }

    #[tokio::test]
    async fn retrigger_reissues_every_configured_entry() {
        let gateway = MockGateway::new(&["A"]);
        let boards = [config(Some("A")), config(Some("B"))];
        let mut state = FlashState::new();

        flash_all(Arc::clone(&gateway), &boards, &mut state).await;
        flash_all(Arc::clone(&gateway), &boards, &mut state).await;

        assert_eq!(gateway.calls().len(), 4);
    }
}
