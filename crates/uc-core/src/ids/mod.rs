//! ID type wrappers for type safety.

mod id_macro;
pub mod instance_id;

pub use instance_id::AppInstanceId;
