use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

/// Server settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: IpAddr,
    /// HTTP port
    pub port: u16,
    /// JSON document holding every city
    pub data_file: PathBuf,
    /// Directory served for everything outside `/api`
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            data_file: PathBuf::from("data/cities.json"),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: parsed(&lookup, "HOST", defaults.host),
            port: parsed(&lookup, "PORT", defaults.port),
            data_file: lookup("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_file, PathBuf::from("data/cities.json"));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DATA_FILE", "/tmp/cities.json"),
            ("PUBLIC_DIR", "/srv/www"),
        ]);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_file, PathBuf::from("/tmp/cities.json"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn invalid_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "http")]).port, 3000);
    }
}
