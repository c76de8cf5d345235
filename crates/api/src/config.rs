//! Process configuration, read from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;

pub const HOST_ENV: &str = "FINAPI_HOST";
pub const PORT_ENV: &str = "FINAPI_PORT";

pub const DEFAULT_PORT: u16 = 3333;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup(HOST_ENV) {
            config.host = host
                .trim()
                .parse()
                .with_context(|| format!("{HOST_ENV} is not a valid IP address: {host:?}"))?;
        }

        if let Some(port) = lookup(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {port:?}"))?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3333");
    }

    #[test]
    fn reads_host_and_port() {
        let config =
            ApiConfig::from_lookup(lookup(&[(HOST_ENV, "127.0.0.1"), (PORT_ENV, " 8080 ")])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = ApiConfig::from_lookup(lookup(&[(PORT_ENV, "http")])).unwrap_err();
        assert!(err.to_string().contains(PORT_ENV));
    }

    #[test]
    fn invalid_host_is_an_error() {
        assert!(ApiConfig::from_lookup(lookup(&[(HOST_ENV, "localhost:1")])).is_err());
    }
}
