use diesel::SqliteConnection;

/// Runs one unit of work on a pooled SQLite connection.
///
/// Repositories call it synchronously from their async port methods; the
/// closure owns the connection only for its own duration.
pub trait DbExecutor: Send + Sync {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T>;
}
