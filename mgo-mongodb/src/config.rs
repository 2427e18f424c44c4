//! MongoDB connection configuration.
//!
//! Configuration is loaded once at startup, either from the environment or
//! through [`MgoConfigBuilder`]. Loading fails before any network activity
//! when a required value is missing or malformed.
//!
//! # Environment Variables
//!
//! With the default `MGO` prefix:
//!
//! - `MGO_ADDRS` - Comma-separated `host:port` list
//! - `MGO_NAME` - Database name
//! - `MGO_AUTH_SOURCE` - Authentication database
//! - `MGO_USER` - Username
//! - `MGO_PASSWORD` - Password
//! - `MGO_TIMEOUT_SECS` - Optional connect/disconnect timeout in seconds (default: 5)

use std::fmt;
use std::time::Duration;

use mongodb::options::{ClientOptions, Credential, ServerAddress};

use crate::error::{MongoError, MongoResult};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "MGO";

/// Default timeout for connecting, server selection and disconnecting.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// MongoDB connection configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct MgoConfig {
    /// Server addresses as `host:port`.
    pub addrs: Vec<String>,
    /// Database name.
    pub name: String,
    /// Authentication database.
    pub auth_source: String,
    /// Username.
    pub user: String,
    /// Password.
    pub password: String,
    /// Timeout applied to connect, server selection, ping and shutdown.
    pub timeout: Duration,
}

impl fmt::Debug for MgoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MgoConfig")
            .field("addrs", &self.addrs)
            .field("name", &self.name)
            .field("auth_source", &self.auth_source)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MgoConfig {
    /// Create a builder for configuration.
    pub fn builder() -> MgoConfigBuilder {
        MgoConfigBuilder::new()
    }

    /// Load configuration from `MGO_*` environment variables.
    pub fn from_env() -> MongoResult<Self> {
        Self::from_env_prefixed(DEFAULT_ENV_PREFIX)
    }

    /// Load configuration from `{prefix}_*` environment variables.
    pub fn from_env_prefixed(prefix: &str) -> MongoResult<Self> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// `lookup` receives the full variable name, e.g. `MGO_ADDRS`.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> MongoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| format!("{}_{}", prefix, key);
        let required = |key: &str| -> MongoResult<String> {
            let name = var(key);
            lookup(name.as_str())
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    MongoError::config(format!("missing required environment variable {}", name))
                })
        };

        let mut builder = MgoConfigBuilder::new()
            .addrs(&required("ADDRS")?)
            .name(required("NAME")?)
            .auth_source(required("AUTH_SOURCE")?)
            .user(required("USER")?)
            .password(required("PASSWORD")?);

        let timeout_var = var("TIMEOUT_SECS");
        if let Some(raw) = lookup(timeout_var.as_str()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                MongoError::config(format!("{} must be a whole number of seconds", timeout_var))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Parse the configured addresses.
    pub fn server_addresses(&self) -> MongoResult<Vec<ServerAddress>> {
        self.addrs
            .iter()
            .map(|addr| {
                ServerAddress::parse(addr).map_err(|e| {
                    MongoError::config(format!("invalid server address '{}': {}", addr, e))
                })
            })
            .collect()
    }

    /// Convert to MongoDB ClientOptions.
    pub fn to_client_options(&self) -> MongoResult<ClientOptions> {
        let credential = Credential::builder()
            .username(self.user.clone())
            .password(self.password.clone())
            .source(self.auth_source.clone())
            .build();

        let options = ClientOptions::builder()
            .hosts(self.server_addresses()?)
            .credential(credential)
            .connect_timeout(self.timeout)
            .server_selection_timeout(self.timeout)
            .build();

        Ok(options)
    }
}

/// Builder for MongoDB configuration.
#[derive(Debug, Default)]
pub struct MgoConfigBuilder {
    addrs: Vec<String>,
    name: Option<String>,
    auth_source: Option<String>,
    user: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
}

impl MgoConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server addresses from a comma-separated list.
    pub fn addrs(mut self, addrs: &str) -> Self {
        self.addrs = addrs.split(',').map(|a| a.trim().to_string()).collect();
        self
    }

    /// Add one server address.
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addrs.push(addr.into());
        self
    }

    /// Set the database name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the authentication database.
    pub fn auth_source(mut self, source: impl Into<String>) -> Self {
        self.auth_source = Some(source.into());
        self
    }

    /// Set the username.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the connect/disconnect timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MongoResult<MgoConfig> {
        if self.addrs.is_empty() {
            return Err(MongoError::config("at least one server address is required"));
        }
        if self.addrs.iter().any(|a| a.is_empty()) {
            return Err(MongoError::config("server address list contains an empty entry"));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(MongoError::config("timeout must be greater than zero"));
        }

        let config = MgoConfig {
            addrs: self.addrs,
            name: self
                .name
                .ok_or_else(|| MongoError::config("database name is required"))?,
            auth_source: self
                .auth_source
                .ok_or_else(|| MongoError::config("auth source is required"))?,
            user: self
                .user
                .ok_or_else(|| MongoError::config("user is required"))?,
            password: self
                .password
                .ok_or_else(|| MongoError::config("password is required"))?,
            timeout,
        };

        // Reject bad host:port pairs before anything tries to connect.
        config.server_addresses()?;

        Ok(config)
    }
}
