//! Startup configuration.
//!
//! Everything the loader needs is read once, here, into a [`LoaderConfig`] that
//! is then passed down by reference. Reads go through a lookup function so the
//! process environment is only touched by [`LoaderConfig::from_env`].

use std::path::PathBuf;

use indexmap::IndexSet;
use market_data_ingestor::models::request_params::ProviderParams;
use market_data_ingestor::providers::yahoo::{Adjustment, YahooChartParams};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::config::{ConfigError, require_all};
use shared_utils::env::{get_env_var, get_var_from, split_list};
use thiserror::Error;

/// Variables describing the PostgreSQL store, in [`DbConfig`] field order.
pub const DB_VARS: [&str; 5] = ["DB_NAME", "DB_USER", "DB_PASSWORD", "DB_HOST", "DB_PORT"];

/// Comma-separated symbol list used when no symbols are passed as arguments.
pub const SYMBOLS_VAR: &str = "STOCK_SYMBOLS";

/// Fatal configuration problems, detected before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoaderConfigError {
    /// Neither arguments nor the environment yielded a symbol.
    #[error("No symbols given: pass them as arguments or set {SYMBOLS_VAR} (e.g. 'AAPL,MSFT,GOOG')")]
    NoSymbols,

    /// Database settings are missing or invalid.
    #[error(transparent)]
    Env(#[from] ConfigError),
}

/// PostgreSQL connection settings.
#[derive(Debug)]
pub struct DbConfig {
    /// Database name.
    pub name: String,
    /// Role to connect as.
    pub user: String,
    /// Password for `user`.
    pub password: SecretString,
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl DbConfig {
    /// Reads the five [`DB_VARS`] through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = require_all(lookup, &DB_VARS)?;
        let [name, user, password, host, port]: [String; 5] = values
            .try_into()
            .map_err(|_| ConfigError::MissingEnvVars(DB_VARS.map(String::from).to_vec()))?;

        let port = port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            name: "DB_PORT".to_string(),
            message: format!("{port:?} is not a port number ({e})"),
        })?;

        Ok(Self {
            name,
            user,
            password: SecretString::new(password.into()),
            host,
            port,
        })
    }

    /// libpq keyword/value connection string, password included.
    pub fn connection_string(&self) -> SecretString {
        let conninfo = format!(
            "host={} port={} dbname={} user={} password={}",
            quote_conninfo(&self.host),
            self.port,
            quote_conninfo(&self.name),
            quote_conninfo(&self.user),
            quote_conninfo(self.password.expose_secret()),
        );
        SecretString::new(conninfo.into())
    }

    /// Description of the target that is safe to log.
    pub fn display_target(&self) -> String {
        format!(
            "database {} on {}:{} as {}",
            self.name, self.host, self.port, self.user
        )
    }
}

fn quote_conninfo(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Where the loaded rows go.
#[derive(Debug)]
pub enum StoreTarget {
    /// The PostgreSQL database described by the `DB_*` variables.
    Postgres(DbConfig),
    /// A local SQLite file.
    Sqlite(PathBuf),
}

/// Command-line inputs that shape the configuration.
#[derive(Debug, Default, Clone)]
pub struct LoaderArgs {
    /// Symbols given as arguments; each may itself be a comma-separated list.
    pub symbols: Vec<String>,
    /// Load into this SQLite file instead of PostgreSQL.
    pub sqlite: Option<PathBuf>,
    /// Store prices as traded instead of adjusted.
    pub raw: bool,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug)]
pub struct LoaderConfig {
    /// Normalized, de-duplicated symbols in input order.
    pub symbols: Vec<String>,
    /// Destination store.
    pub store: StoreTarget,
    /// Provider options applied to every fetch.
    pub provider_params: ProviderParams,
}

impl LoaderConfig {
    /// Resolves the configuration from the process environment.
    pub fn from_env(args: LoaderArgs) -> Result<Self, LoaderConfigError> {
        Self::from_lookup(|name| get_env_var(name).ok(), args)
    }

    /// Resolves the configuration, reading variables through `lookup`.
    ///
    /// Symbols are checked first; the `DB_*` variables are only required when
    /// the target is PostgreSQL.
    pub fn from_lookup<F>(lookup: F, args: LoaderArgs) -> Result<Self, LoaderConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let symbols = resolve_symbols(&args.symbols, &lookup)?;

        let store = match args.sqlite {
            Some(path) => StoreTarget::Sqlite(path),
            None => StoreTarget::Postgres(DbConfig::from_lookup(&lookup)?),
        };

        let adjustment = if args.raw {
            Adjustment::Raw
        } else {
            Adjustment::All
        };

        Ok(Self {
            symbols,
            store,
            provider_params: ProviderParams::Yahoo(YahooChartParams { adjustment }),
        })
    }
}

/// Picks the symbol list: arguments win over [`SYMBOLS_VAR`].
fn resolve_symbols<F>(args: &[String], lookup: F) -> Result<Vec<String>, LoaderConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw: Vec<String> = if args.is_empty() {
        get_var_from(lookup, SYMBOLS_VAR)
            .map(|v| split_list(&v))
            .unwrap_or_default()
    } else {
        args.iter().flat_map(|a| split_list(a)).collect()
    };

    let symbols = normalize_symbols(raw);
    if symbols.is_empty() {
        return Err(LoaderConfigError::NoSymbols);
    }
    Ok(symbols)
}

/// Trims and upper-cases symbols, dropping blanks and repeats (first one wins).
pub fn normalize_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
