pub mod sync_runtime_info_mapper;

pub use sync_runtime_info_mapper::SyncRuntimeInfoRowMapper;
