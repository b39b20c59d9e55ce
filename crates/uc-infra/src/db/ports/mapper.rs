use anyhow::Result;

/// Domain record -> insertable `sync_runtime_info` row.
pub trait InsertMapper<D, R>: Sync + Send {
    fn to_row(&self, domain: &D) -> Result<R>;
}

/// Stored row -> domain record. Fails on values the domain cannot hold,
/// such as an unknown connect state or an out-of-range port.
pub trait RowMapper<R, D>: Sync + Send {
    fn to_domain(&self, row: &R) -> Result<D>;
}
