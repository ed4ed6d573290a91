use std::path::PathBuf;

use espflash::flasher::{Flasher, ProgressCallbacks};
use espflash::interface::Interface;
use serialport::SerialPortType;
use tokio::task;
use tracing::{debug, error, info};

use crate::models::{PortKind, SerialPortDescriptor};

use super::events::{BackendEvent, EventBus};
use super::GatewayError;

const FLASH_BAUD: u32 = 921_600;
const APP_FLASH_OFFSET: u32 = 0x0001_0000;
const FLASH_CHUNK_SIZE: usize = 1024 * 1024;

fn describe(info: serialport::SerialPortInfo) -> SerialPortDescriptor {
    let port_type = match info.port_type {
        SerialPortType::UsbPort(usb) => PortKind::Usb {
            vid: usb.vid,
            pid: usb.pid,
            serial_number: usb.serial_number,
            manufacturer: usb.manufacturer,
            product: usb.product,
        },
        SerialPortType::PciPort => PortKind::Pci,
        SerialPortType::BluetoothPort => PortKind::Bluetooth,
        SerialPortType::Unknown => PortKind::Unknown,
    };

    SerialPortDescriptor {
        port_name: info.port_name,
        port_type,
    }
}

/// Enumerate serial ports on the host. The underlying call is blocking, so
/// it runs on the blocking pool.
pub async fn list_ports() -> Result<Vec<SerialPortDescriptor>, GatewayError> {
    task::spawn_blocking(|| {
        let ports =
            serialport::available_ports().map_err(|e| GatewayError::Serial(e.to_string()))?;

        debug!("found {} serial ports", ports.len());

        Ok(ports.into_iter().map(describe).collect())
    })
    .await
    .map_err(|e| GatewayError::Serial(format!("port enumeration task failed: {e}")))?
}

fn usb_port_by_name(
    port: &str,
) -> Result<(serialport::SerialPortInfo, serialport::UsbPortInfo), GatewayError> {
    let port_info = serialport::available_ports()
        .map_err(|e| GatewayError::Serial(e.to_string()))?
        .into_iter()
        .find(|p| p.port_name == port)
        .ok_or_else(|| GatewayError::Serial(format!("port {port} not found")))?;

    let SerialPortType::UsbPort(usb) = port_info.port_type.clone() else {
        return Err(GatewayError::Serial(format!(
            "port {port} is not a USB serial port"
        )));
    };

    Ok((port_info, usb))
}

/// Publishes flash progress onto the event bus as the flasher reports it.
struct ProgressReporter {
    events: EventBus,
    port: String,
    source_id: String,
    total: usize,
}

impl ProgressCallbacks for ProgressReporter {
    fn init(&mut self, addr: u32, total: usize) {
        debug!("flash segment at {addr:#x}, {total} bytes");
        self.total = total;
    }

    fn update(&mut self, current: usize) {
        self.events.publish(BackendEvent::FlashProgress {
            port: self.port.clone(),
            source_id: self.source_id.clone(),
            current: current as u64,
            total: self.total as u64,
        });
    }

    fn finish(&mut self) {
        if self.total > 0 {
            self.events.publish(BackendEvent::FlashProgress {
                port: self.port.clone(),
                source_id: self.source_id.clone(),
                current: self.total as u64,
                total: self.total as u64,
            });
        }
    }
}

/// Flash a serial-connected board with the binary at `binary`.
pub async fn flash_serial(
    events: EventBus,
    source_id: String,
    port: String,
    binary: PathBuf,
) -> Result<(), GatewayError> {
    let data = tokio::fs::read(&binary).await?;

    info!("flashing {} bytes to {} over serial", data.len(), port);

    task::spawn_blocking(move || write_to_flash(events, source_id, port, data))
        .await
        .map_err(|e| GatewayError::Flash(format!("flash task failed: {e}")))?
}

fn write_to_flash(
    events: EventBus,
    source_id: String,
    port: String,
    mut data: Vec<u8>,
) -> Result<(), GatewayError> {
    let (port_info, usb) = usb_port_by_name(&port)?;

    let serial = Interface::new(&port_info, Some(1), Some(0))
        .map_err(|e| GatewayError::Serial(format!("failed to open {port}: {e:?}")))?;

    debug!("connecting to {port}");

    let mut flasher = Flasher::connect(serial, usb, Some(FLASH_BAUD), true)
        .map_err(|e| GatewayError::Flash(e.to_string()))?;

    let mut progress = ProgressReporter {
        events,
        port: port.clone(),
        source_id,
        total: 0,
    };

    let mut offset = APP_FLASH_OFFSET;

    while !data.is_empty() {
        let split = data.len().min(FLASH_CHUNK_SIZE);
        let rest = data.split_off(split);

        flasher
            .write_bin_to_flash(offset, &data, Some(&mut progress))
            .map_err(|e| {
                error!("flash error on {port}: {e:?}");
                GatewayError::Flash(e.to_string())
            })?;

        offset += data.len() as u32;
        data = rest;
    }

    info!("finished flashing {port}");

    Ok(())
}
