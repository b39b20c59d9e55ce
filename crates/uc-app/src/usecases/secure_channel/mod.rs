mod channel;
mod error;

pub use channel::SecureChannel;
pub use error::SecureChannelError;
