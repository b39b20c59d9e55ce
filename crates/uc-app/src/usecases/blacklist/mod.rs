mod service;

pub use service::{BlacklistService, BLACKLIST_KEY};
