//! Configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing values fall back to defaults;
//! present but unparsable values are rejected.
//!
//! | Variable               | Used by  | Default                |
//! |------------------------|----------|------------------------|
//! | `FEED_URL`             | listener | `ws://127.0.0.1:7878/` |
//! | `LOG_FORMAT`           | both     | `text`                 |
//! | `LISTEN_ADDR`          | server   | `0.0.0.0:7878`         |
//! | `FRAME_BUS_CAPACITY`   | server   | `64`                   |
//! | `REQUEST_TIMEOUT_SECS` | server   | `10`                   |
//! | `MAX_FRAME_BYTES`      | server   | `16777216`             |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::FeedError;

/// Default address of the feed: the root path of the local feed server.
pub const DEFAULT_FEED_URL: &str = "ws://127.0.0.1:7878/";

/// Default bind address of the feed server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:7878";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(FeedError::Config(format!(
                "LOG_FORMAT must be `text` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Listener configuration.
///
/// Loaded once at startup via [`ListenerConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// WebSocket URL of the feed (`ws://` or `wss://`).
    pub feed_url: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ListenerConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if a variable is set to an invalid
    /// value.
    pub fn from_env() -> Result<Self, FeedError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if `FEED_URL` is not a WebSocket URL
    /// or `LOG_FORMAT` is unknown.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = lookup("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        validate_ws_url(&feed_url)?;

        Ok(Self {
            feed_url,
            log_format: parse_log_format(&lookup)?,
        })
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Feed server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP/WebSocket server to.
    pub listen_addr: SocketAddr,

    /// Capacity of the FrameBus broadcast channel.
    pub frame_bus_capacity: usize,

    /// Per-request timeout in seconds for HTTP endpoints.
    pub request_timeout_secs: u64,

    /// Largest accepted frame body, in bytes.
    pub max_frame_bytes: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if a variable is set to an invalid
    /// value.
    pub fn from_env() -> Result<Self, FeedError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if `LISTEN_ADDR` is not a socket
    /// address, a numeric variable does not parse, `FRAME_BUS_CAPACITY` is
    /// zero, or `LOG_FORMAT` is unknown.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = parse_var(&lookup, "LISTEN_ADDR", || {
            DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().map_err(|e| {
                FeedError::Config(format!("default listen address is invalid: {e}"))
            })
        })?;

        let frame_bus_capacity: usize = parse_var(&lookup, "FRAME_BUS_CAPACITY", || Ok(64))?;
        if frame_bus_capacity == 0 {
            return Err(FeedError::Config(
                "FRAME_BUS_CAPACITY must be greater than zero".to_string(),
            ));
        }

        let request_timeout_secs: u64 = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", || Ok(10))?;
        let max_frame_bytes: usize = parse_var(&lookup, "MAX_FRAME_BYTES", || Ok(16 * 1024 * 1024))?;

        Ok(Self {
            listen_addr,
            frame_bus_capacity,
            request_timeout_secs,
            max_frame_bytes,
            log_format: parse_log_format(&lookup)?,
        })
    }

    /// HTTP request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parses `key` as `T`. A missing key yields `default()`, an unparsable one
/// an error naming the key.
fn parse_var<T, F, D>(lookup: &F, key: &str, default: D) -> Result<T, FeedError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> Result<T, FeedError>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| FeedError::Config(format!("{key}=`{raw}`: {e}"))),
        None => default(),
    }
}

fn parse_log_format<F>(lookup: &F) -> Result<LogFormat, FeedError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_FORMAT").map_or(Ok(LogFormat::Text), |raw| raw.trim().parse())
}

fn validate_ws_url(url: &str) -> Result<(), FeedError> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| {
            FeedError::Config(format!("FEED_URL must start with ws:// or wss://, got `{url}`"))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(FeedError::Config(format!("FEED_URL has no host: `{url}`")));
    }
    Ok(())
}
