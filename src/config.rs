/// Connection settings for the results store.
///
/// Built once by the caller (the CLI reads flags and the environment) and
/// handed to `ResultsDatabase::connect`. Nothing below this layer reads the
/// process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            create_if_missing: false,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        // A pool with zero connections can never serve a query
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    /// True for `sqlite::memory:` style URLs, where every pooled connection
    /// would otherwise open its own private database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}
