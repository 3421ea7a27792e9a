use std::env;

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown USER_STORE {other:?}, expected postgres or memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Selects the create schema that mandates a `password` field.
    pub require_password: bool,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store: StoreKind = env::var("USER_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when USER_STORE=postgres");
        }

        Ok(Self {
            store,
            database_url,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS")?,
            require_password: parse_flag(
                &env::var("REQUIRE_PASSWORD").unwrap_or_default(),
            ),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT")?,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kind_parses_known_values() {
        assert_eq!("postgres".parse::<StoreKind>().unwrap(), StoreKind::Postgres);
        assert_eq!("PostgreSQL".parse::<StoreKind>().unwrap(), StoreKind::Postgres);
        assert_eq!(" memory ".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("sqlite".parse::<StoreKind>().is_err());
    }

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }
}
