//! Process configuration, read once at startup.
//!
//!   DATABASE_URL             - `postgres://…` or `memory://` (required)
//!   PORT                     - listen port (default: 5000)
//!   DATABASE_MAX_CONNECTIONS - pool size for Postgres (default: 10)

use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Which record store backs the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres(String),
    Memory,
}

impl DatabaseBackend {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.starts_with("memory:") {
            Ok(Self::Memory)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres(url.to_string()))
        } else {
            bail!("unsupported DATABASE_URL scheme (expected postgres:// or memory://)")
        }
    }

    /// Short label safe to log; never includes credentials.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database: DatabaseBackend,
    pub port: u16,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;
        let database = DatabaseBackend::parse(&database_url)?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT: {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {raw:?}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database,
            port,
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_applied() {
        let cfg = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "memory://")])).unwrap();
        assert_eq!(cfg.database, DatabaseBackend::Memory);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn postgres_url_and_port() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://ledger:secret@db/ledger"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.database,
            DatabaseBackend::Postgres("postgres://ledger:secret@db/ledger".into())
        );
        assert_eq!(cfg.database.kind(), "postgres");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "memory://"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }

    #[test]
    fn unknown_scheme_rejected() {
        assert!(DatabaseBackend::parse("mongodb://localhost/ledger").is_err());
    }
}
