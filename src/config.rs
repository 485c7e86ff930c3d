use std::{env, net::SocketAddr, num::NonZeroUsize};

pub const BIND_VAR: &str = "BOOKSHELF_BIND";
pub const WORKERS_VAR: &str = "BOOKSHELF_WORKERS";

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value:?}")]
    Bind {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{var} is not a positive integer: {value:?}")]
    Workers {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    /// Falls back to actix-web's default of one worker per core.
    pub workers: Option<NonZeroUsize>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind.trim().parse::<SocketAddr>().map_err(|source| ConfigError::Bind {
            var: BIND_VAR,
            value: bind.clone(),
            source,
        })?;

        let workers = lookup(WORKERS_VAR)
            .map(|value| {
                value
                    .trim()
                    .parse::<NonZeroUsize>()
                    .map_err(|source| ConfigError::Workers {
                        var: WORKERS_VAR,
                        value: value.clone(),
                        source,
                    })
            })
            .transpose()?;

        Ok(Config { bind, workers })
    }
}
