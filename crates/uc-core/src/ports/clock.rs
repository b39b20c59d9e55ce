/// Wall clock used for record timestamps and pairing freshness checks.
pub trait ClockPort: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}
