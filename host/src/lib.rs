pub mod config;
pub mod ncp;
pub mod event;
pub mod bridge;
pub mod classify;
pub mod dispatch;
pub mod host;

pub use config::{ TransportConfig, ResetMethod };
pub use ncp::{ Ncp, StackCallback, PacketInfo };
pub use event::Event;
pub use bridge::EventBridge;
pub use classify::{ classify, ErrorAction };
pub use dispatch::{ MessageTagCounter, SendResult };
pub use host::EzspHost;

use zigbee::ezsp::EzspStatus;

#[derive(Debug)]
pub enum Error {
	NotRunning,
	AlreadyRunning,
	StartFailed(EzspStatus),
	InvalidConfig(&'static str),
}

impl core::fmt::Display for Error {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::NotRunning => write!(f, "The host is not running"),
			Self::AlreadyRunning => write!(f, "The host is already running"),
			Self::StartFailed(status) => write!(f, "The NCP failed to start: {:?}", status),
			Self::InvalidConfig(s) => write!(f, "Invalid transport config: {}", s),
		}
	}
}
