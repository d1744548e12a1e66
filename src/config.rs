use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::errors::ConfigError;
use crate::external::yahoofinance::DEFAULT_YAHOO_BASE_URL;

pub const DEFAULT_PORT: u16 = 1234;

/// Bind address for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = match std::env::var("HOST") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar { name: "HOST", value })?,
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar { name: "PORT", value })?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Price-history provider settings
#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub yahoo_base_url: String,
}

impl PriceConfig {
    pub fn from_env() -> Self {
        Self {
            yahoo_base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.to_string()),
        }
    }
}
