//! Application configuration loaded via OrthoConfig.
//!
//! Values come from `PIZZERIA_*` environment variables, CLI flags, or an
//! optional configuration file. List-valued settings are comma separated in
//! the environment and arrays in configuration files.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::outbound::google_maps::DEFAULT_DISTANCE_MATRIX_ENDPOINT;

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_STORE_ORIGIN: &str = "Pizzeria, São Paulo";

/// Configuration errors detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The server cannot start without a database.
    #[error("PIZZERIA_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// `host` is not an IP address.
    #[error("invalid host {host:?}: {source}")]
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    /// `google_maps_endpoint` is not an absolute URL.
    #[error("invalid Google Maps endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PIZZERIA")]
pub struct AppSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 3333)]
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Distance Matrix API key. Geo lookups fail without it.
    pub google_maps_api_key: Option<String>,
    /// Distance Matrix endpoint override.
    pub google_maps_endpoint: Option<String>,
    /// Address deliveries are dispatched from.
    pub store_origin: Option<String>,
    /// Emails registered with the staff role.
    #[serde(default, deserialize_with = "list_setting")]
    pub staff_emails: Vec<String>,
    /// Origins allowed to open the order gateway.
    #[serde(default, deserialize_with = "list_setting")]
    pub ws_allowed_origins: Vec<String>,
    /// Mark the refresh cookie `Secure`; on unless explicitly disabled.
    pub cookie_secure: Option<bool>,
}

/// A list given either as one comma-separated string or as a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListSetting {
    Joined(String),
    Items(Vec<String>),
}

fn list_setting<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match ListSetting::deserialize(deserializer)? {
        ListSetting::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
        ListSetting::Items(items) => items,
    })
}

fn cleaned(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

impl AppSettings {
    /// Socket address built from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when `host` is not an IP.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref().map(str::trim) {
            None | Some("") => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(host) => host.parse().map_err(|source| SettingsError::InvalidHost {
                host: host.to_owned(),
                source,
            })?,
        };
        let port = if self.port == 0 { DEFAULT_PORT } else { self.port };
        Ok(SocketAddr::new(ip, port))
    }

    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Distance Matrix endpoint, falling back to the public API.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidEndpoint`] for malformed overrides.
    pub fn google_maps_endpoint(&self) -> Result<Url, SettingsError> {
        let endpoint = self
            .google_maps_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_DISTANCE_MATRIX_ENDPOINT);
        Url::parse(endpoint).map_err(|source| SettingsError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        })
    }

    /// Delivery origin address.
    pub fn store_origin(&self) -> &str {
        self.store_origin
            .as_deref()
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .unwrap_or(DEFAULT_STORE_ORIGIN)
    }

    /// Staff emails with blanks removed.
    pub fn staff_emails(&self) -> Vec<String> {
        cleaned(&self.staff_emails)
    }

    /// Allowed WebSocket origins; empty means any.
    pub fn ws_allowed_origins(&self) -> Vec<String> {
        cleaned(&self.ws_allowed_origins)
    }

    /// Whether the refresh cookie carries the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }
}
