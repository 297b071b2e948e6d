use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DB_PATH_VAR: &str = "PLAYERLOG_DB_PATH";
pub const HOST_VAR: &str = "PLAYERLOG_HOST";
pub const PORT_VAR: &str = "PLAYERLOG_PORT";

pub const DEFAULT_DB_PATH: &str = ".playerlog/events.db";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub db_path: String,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl ServeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: lookup(DB_PATH_VAR)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.db_path),
            host: lookup(HOST_VAR)
                .and_then(|value| value.parse::<IpAddr>().ok())
                .unwrap_or(defaults.host),
            port: lookup(PORT_VAR)
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
