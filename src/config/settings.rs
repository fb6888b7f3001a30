//! Process settings from environment variables (`.env` is loaded by the binary).

use crate::config::ProcedureNames;
use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// `DATABASE_URL`; takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: Option<String>,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(|_| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "<redacted>".into(),
            });
        }
        let name = self.name.as_deref().ok_or(ConfigError::Missing("DB_NAME"))?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(name))
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub bind_address: String,
    pub port: u16,
    pub procedures: ProcedureNames,
    /// Reject procedure arguments that are not declared parameters.
    pub strict_procedure_args: bool,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database: DatabaseSettings {
                url: None,
                host: "localhost".into(),
                port: 5432,
                user: "postgres".into(),
                password: String::new(),
                name: None,
                max_connections: 5,
            },
            bind_address: "0.0.0.0".into(),
            port: 3000,
            procedures: ProcedureNames::default(),
            strict_procedure_args: false,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let database = DatabaseSettings {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or(d.database.host),
            port: parse_or(get("DB_PORT"), "DB_PORT", d.database.port)?,
            user: get("DB_USER").unwrap_or(d.database.user),
            password: lookup("DB_PASSWORD").unwrap_or(d.database.password),
            name: get("DB_NAME"),
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", d.database.max_connections)?,
        };
        if database.url.is_none() && database.name.is_none() {
            return Err(ConfigError::Missing("DB_NAME"));
        }
        Ok(Settings {
            database,
            bind_address: get("BIND_ADDRESS").unwrap_or(d.bind_address),
            port: parse_or(get("PORT"), "PORT", d.port)?,
            procedures: ProcedureNames::from_lookup(&lookup),
            strict_procedure_args: parse_bool(get("STRICT_PROCEDURE_ARGS"), "STRICT_PROCEDURE_ARGS")?,
            body_limit_bytes: parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", d.body_limit_bytes)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool(raw: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::Invalid { key, value: v }),
    }
}
