//! Runtime settings from environment variables (`.env` is loaded by the binary via dotenvy).
//!
//! The database is addressed by `DATABASE_URL`, or by the `DB_HOST` / `DB_PORT` / `DB_USER` /
//! `DB_PASSWORD` / `DB_NAME` quintet when no URL is given.

use crate::error::ConfigError;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".into());
                let port: u16 = parse_var(&lookup, "DB_PORT", 5432)?;
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".into());
                let name = lookup("DB_NAME").unwrap_or_else(|| "dealership".into());
                let credentials = match lookup("DB_PASSWORD") {
                    Some(pw) if !pw.is_empty() => format!("{}:{}", user, pw),
                    _ => user,
                };
                format!("postgres://{}@{}:{}/{}", credentials, host, port, name)
            }
        };
        Ok(Settings {
            database_url,
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_var(&lookup, "SERVER_PORT", 3000)?,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            body_limit: parse_var(&lookup, "BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, "postgres://postgres@localhost:5432/dealership");
        assert_eq!(s.bind_addr(), "0.0.0.0:3000");
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.body_limit, 1024 * 1024);
    }

    #[test]
    fn database_url_wins() {
        let s = settings(&[("DATABASE_URL", "postgres://a:b@db/x"), ("DB_HOST", "ignored")]).unwrap();
        assert_eq!(s.database_url, "postgres://a:b@db/x");
    }

    #[test]
    fn url_from_parts() {
        let s = settings(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "autos"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://app:pw@db:6543/autos");
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let err = settings(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "SERVER_PORT", .. }));
        assert!(settings(&[("DB_PORT", "99999")]).is_err());
    }
}
