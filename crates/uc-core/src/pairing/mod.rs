//! Pairing protocol domain
//!
//! 配对协议: wire messages, session state and events. The handshake driver
//! itself lives in `uc-app`.

mod error;
mod event;
pub mod messages;
mod session;
mod state;

pub use error::PairingError;
pub use event::PairingEvent;
pub use messages::{validate_timestamp, PairingMessage, PairingRequest, PairingResponse};
pub use session::PairingSession;
pub use state::{PairingRole, PairingState};
