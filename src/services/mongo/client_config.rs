use std::{env, time::Duration};

pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "agent_conversations";
pub const DEFAULT_CONVERSATION_COLLECTION: &str = "user_conversations";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string (`mongodb://` or `mongodb+srv://`).
    pub connection_string: String,
    /// Database every collection is resolved against.
    pub database: String,
    /// How long the driver waits for a suitable server.
    pub server_selection_timeout: Duration,
    /// Socket connect timeout.
    pub connect_timeout: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub tls_allow_invalid_certificates: bool,
    /// Collection used to persist chat exchanges.
    pub conversation_collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.into(),
            database: DEFAULT_DATABASE.into(),
            server_selection_timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            tls_allow_invalid_certificates: false,
            conversation_collection: DEFAULT_CONVERSATION_COLLECTION.into(),
        }
    }
}

impl StoreConfig {
    /// Read settings from the environment, falling back to defaults.
    ///
    /// - `MONGODB_URI`
    /// - `MONGODB_DATABASE`
    /// - `MONGODB_TLS_ALLOW_INVALID_CERTIFICATES` (`1`/`true`)
    /// - `DOCAGENT_CONVERSATION_COLLECTION`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            connection_string: non_empty(lookup("MONGODB_URI"))
                .unwrap_or(defaults.connection_string),
            database: non_empty(lookup("MONGODB_DATABASE")).unwrap_or(defaults.database),
            tls_allow_invalid_certificates: lookup("MONGODB_TLS_ALLOW_INVALID_CERTIFICATES")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.tls_allow_invalid_certificates),
            conversation_collection: non_empty(lookup("DOCAGENT_CONVERSATION_COLLECTION"))
                .unwrap_or(defaults.conversation_collection),
            ..defaults
        }
    }

    /// True when the URI asks for TLS, either through the SRV scheme or `tls=true`.
    pub fn wants_tls(&self) -> bool {
        let uri = self.connection_string.to_ascii_lowercase();
        uri.starts_with("mongodb+srv://") || uri.contains("tls=true") || uri.contains("ssl=true")
    }
}

/// Builder-style setters for [`StoreConfig`].
pub trait StoreConfigBuilder {
    fn connection_string(self, uri: impl Into<String>) -> Self;
    fn database(self, database: impl Into<String>) -> Self;
    fn timeouts(self, server_selection: Duration, connect: Duration) -> Self;
    fn allow_invalid_certificates(self, allow: bool) -> Self;
    fn conversation_collection(self, collection: impl Into<String>) -> Self;
}

impl StoreConfigBuilder for StoreConfig {
    fn connection_string(mut self, uri: impl Into<String>) -> Self {
        self.connection_string = uri.into();
        self
    }

    fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    fn timeouts(mut self, server_selection: Duration, connect: Duration) -> Self {
        self.server_selection_timeout = server_selection;
        self.connect_timeout = connect;
        self
    }

    fn allow_invalid_certificates(mut self, allow: bool) -> Self {
        self.tls_allow_invalid_certificates = allow;
        self
    }

    fn conversation_collection(mut self, collection: impl Into<String>) -> Self {
        self.conversation_collection = collection.into();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_local_server() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.connection_string, "mongodb://localhost:27017");
        assert_eq!(cfg.database, "agent_conversations");
        assert_eq!(cfg.conversation_collection, "user_conversations");
        assert!(!cfg.wants_tls());
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MONGODB_URI", "mongodb+srv://user:pw@cluster0.example.net"),
            ("MONGODB_DATABASE", "research"),
            ("MONGODB_TLS_ALLOW_INVALID_CERTIFICATES", "true"),
            ("DOCAGENT_CONVERSATION_COLLECTION", ""),
        ]);
        let cfg = StoreConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.database, "research");
        assert!(cfg.tls_allow_invalid_certificates);
        assert!(cfg.wants_tls());
        // blank values fall back
        assert_eq!(cfg.conversation_collection, DEFAULT_CONVERSATION_COLLECTION);
    }

    #[test]
    fn builder_setters_chain() {
        let cfg = StoreConfig::default()
            .connection_string("mongodb://db:27017/?tls=true")
            .database("scratch")
            .timeouts(Duration::from_secs(2), Duration::from_secs(3))
            .allow_invalid_certificates(true);

        assert!(cfg.wants_tls());
        assert_eq!(cfg.database, "scratch");
        assert_eq!(cfg.server_selection_timeout, Duration::from_secs(2));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(3));
    }
}
