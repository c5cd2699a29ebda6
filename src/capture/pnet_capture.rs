//! pnet-based live frame capture.

use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use super::{FrameSource, READ_TIMEOUT_MS};
use crate::error::CaptureError;

/// Live capture of every frame on one interface.
pub struct PnetCapture {
    interface: NetworkInterface,
    rx: Box<dyn DataLinkReceiver>,
}

impl PnetCapture {
    /// Open a capture channel on the named interface, or on the first
    /// suitable interface when no name is given.
    pub fn open(interface_name: Option<&str>) -> Result<Self, CaptureError> {
        let interface = match interface_name {
            Some(name) => find_interface(name)?,
            None => default_interface()?,
        };

        let config = Config {
            read_timeout: Some(Duration::from_millis(READ_TIMEOUT_MS)),
            ..Config::default()
        };

        let rx = match datalink::channel(&interface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => rx,
            Ok(_) => return Err(CaptureError::UnsupportedChannel(interface.name.clone())),
            Err(e) => {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    return Err(CaptureError::InsufficientPermissions);
                }
                let msg = e.to_string();
                if msg.contains("permission") || msg.contains("Operation not permitted") {
                    return Err(CaptureError::InsufficientPermissions);
                }
                return Err(CaptureError::ChannelCreation(msg));
            }
        };

        tracing::debug!("Opened datalink channel on {}", interface.name);

        Ok(Self { interface, rx })
    }

    /// One line per interface, marking the one a capture without `-i`
    /// would pick.
    pub fn list_interfaces() -> Vec<String> {
        let interfaces = datalink::interfaces();
        let default_name = interfaces
            .iter()
            .find(|iface| is_capture_candidate(iface))
            .map(|iface| iface.name.clone());

        interfaces
            .iter()
            .map(|iface| {
                let marker = if Some(&iface.name) == default_name.as_ref() {
                    " (default)"
                } else {
                    ""
                };
                format!("{}{}", describe_interface(iface), marker)
            })
            .collect()
    }
}

impl FrameSource for PnetCapture {
    fn next_frame(&mut self) -> io::Result<&[u8]> {
        self.rx.next()
    }

    fn interface_name(&self) -> &str {
        &self.interface.name
    }
}

fn find_interface(name: &str) -> Result<NetworkInterface, CaptureError> {
    datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| CaptureError::InterfaceNotFound(name.to_string()))
}

/// Up, not loopback, and has an address.
fn is_capture_candidate(iface: &NetworkInterface) -> bool {
    iface.is_up() && !iface.is_loopback() && !iface.ips.is_empty()
}

fn default_interface() -> Result<NetworkInterface, CaptureError> {
    datalink::interfaces()
        .into_iter()
        .find(is_capture_candidate)
        .ok_or_else(|| CaptureError::InterfaceNotFound("no suitable interface found".to_string()))
}

/// `name: STATE mac [addresses]`
fn describe_interface(iface: &NetworkInterface) -> String {
    let state = match (iface.is_up(), iface.is_loopback()) {
        (true, true) => "UP LOOPBACK",
        (true, false) => "UP",
        (false, _) => "DOWN",
    };
    let mac = iface
        .mac
        .map(|mac| mac.to_string())
        .unwrap_or_else(|| "-".to_string());
    let addresses = if iface.ips.is_empty() {
        "no IP".to_string()
    } else {
        iface
            .ips
            .iter()
            .map(|ip| ip.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!("{}: {} {} [{}]", iface.name, state, mac, addresses)
}
