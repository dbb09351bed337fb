//! Device discovery over the system's serial ports.
//!
//! The device is identified by a descriptor string compared against each
//! port's USB product string.  Ports without USB metadata (or when the user
//! configured a path such as `/dev/cu.usbmodem2101`) match on the port name.

use std::time::Duration;

use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, info};

use crate::application::supervise_connection::{Connector, DiscoveryError};
use crate::application::transport::LineTransport;
use crate::infrastructure::serial::transport::SerialTransport;

/// The parts of a [`SerialPortInfo`] that discovery looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub name: String,
    pub product: Option<String>,
}

impl From<&SerialPortInfo> for PortCandidate {
    fn from(info: &SerialPortInfo) -> Self {
        let product = match &info.port_type {
            SerialPortType::UsbPort(usb) => usb.product.clone(),
            _ => None,
        };
        Self {
            name: info.port_name.clone(),
            product,
        }
    }
}

/// Returns the port name of the first candidate matching `descriptor`.
///
/// A product-string match anywhere in the list wins over a port-name match.
pub fn select_port(candidates: &[PortCandidate], descriptor: &str) -> Option<String> {
    candidates
        .iter()
        .find(|c| c.product.as_deref() == Some(descriptor))
        .or_else(|| candidates.iter().find(|c| c.name == descriptor))
        .map(|c| c.name.clone())
}

/// Lists the system's serial ports and picks the one matching `descriptor`.
///
/// # Errors
///
/// [`DiscoveryError::Enumerate`] if the ports cannot be listed,
/// [`DiscoveryError::NotFound`] if none matches.
pub fn find_port(descriptor: &str) -> Result<String, DiscoveryError> {
    let ports = serialport::available_ports().map_err(|e| DiscoveryError::Enumerate(e.to_string()))?;
    let candidates: Vec<PortCandidate> = ports.iter().map(PortCandidate::from).collect();
    debug!("serial ports: {candidates:?}");

    select_port(&candidates, descriptor).ok_or_else(|| DiscoveryError::NotFound {
        descriptor: descriptor.to_string(),
    })
}

/// Opens the device at a fixed baud rate and read timeout.
#[derive(Debug, Clone)]
pub struct SerialConnector {
    descriptor: String,
    baud_rate: u32,
    read_timeout: Duration,
}

impl SerialConnector {
    pub fn new(descriptor: impl Into<String>, baud_rate: u32, read_timeout: Duration) -> Self {
        Self {
            descriptor: descriptor.into(),
            baud_rate,
            read_timeout,
        }
    }
}

impl Connector for SerialConnector {
    fn connect(&mut self) -> Result<Box<dyn LineTransport>, DiscoveryError> {
        let port = find_port(&self.descriptor)?;
        info!("opening {port} @ {} baud", self.baud_rate);
        let transport = SerialTransport::open(&port, self.baud_rate, self.read_timeout).map_err(
            |e| DiscoveryError::Open {
                port: port.clone(),
                reason: e.to_string(),
            },
        )?;
        Ok(Box::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb(name: &str, product: &str) -> PortCandidate {
        PortCandidate {
            name: name.to_string(),
            product: Some(product.to_string()),
        }
    }

    fn bare(name: &str) -> PortCandidate {
        PortCandidate {
            name: name.to_string(),
            product: None,
        }
    }

    #[test]
    fn test_select_port_matches_usb_product() {
        // Arrange
        let candidates = vec![
            bare("/dev/cu.Bluetooth-Incoming-Port"),
            usb("/dev/cu.usbserial-10", "CP2102 USB to UART"),
            usb("/dev/cu.usbmodem2101", "Nano ESP32"),
        ];

        // Act
        let selected = select_port(&candidates, "Nano ESP32");

        // Assert
        assert_eq!(selected.as_deref(), Some("/dev/cu.usbmodem2101"));
    }

    #[test]
    fn test_select_port_falls_back_to_port_name() {
        let candidates = vec![bare("/dev/ttyACM0"), bare("/dev/ttyUSB0")];

        assert_eq!(
            select_port(&candidates, "/dev/ttyUSB0").as_deref(),
            Some("/dev/ttyUSB0")
        );
    }

    #[test]
    fn test_select_port_requires_exact_match() {
        let candidates = vec![usb("/dev/ttyACM0", "Nano ESP32-S3")];

        assert_eq!(select_port(&candidates, "Nano ESP32"), None);
    }

    #[test]
    fn test_candidate_from_non_usb_port_has_no_product() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::PciPort,
        };

        assert_eq!(PortCandidate::from(&info), bare("/dev/ttyS0"));
    }
}
