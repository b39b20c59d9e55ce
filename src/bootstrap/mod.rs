pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_data_dir, load_config, load_or_init_config};
pub use wiring::{wire_services, AppServices};
