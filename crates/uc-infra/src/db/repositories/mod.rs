mod sync_runtime_info_repo;
mod trust_key_repo;

pub use sync_runtime_info_repo::*;
pub use trust_key_repo::*;
