use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use wink_core::obfuscator::{DEFAULT_MASK, DEFAULT_PRIME};
use wink_core::{CoreError, ExpirationPolicy, Obfuscator, ShortCodeCodec};
use wink_redirector::{CacheConfig, MokaUrlCache};
use wink_sequencer::BlockSequencerSettings;

pub const LISTEN_ADDR_ENV: &str = "WINK_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "WINK_STORAGE_BACKEND";
pub const SQLITE_DSN_ENV: &str = "WINK_SQLITE_DSN";
pub const BLOCK_SIZE_ENV: &str = "WINK_SEQUENCER_BLOCK_SIZE";
pub const SEQUENCE_START_ENV: &str = "WINK_SEQUENCE_START";
pub const DEFAULT_TTL_ENV: &str = "WINK_DEFAULT_TTL_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "WINK_SWEEP_INTERVAL_SECS";
pub const CACHE_CAPACITY_ENV: &str = "WINK_CACHE_CAPACITY";
pub const CACHE_TTL_ENV: &str = "WINK_CACHE_TTL_SECS";
pub const CACHE_TTI_ENV: &str = "WINK_CACHE_TTI_SECS";
pub const OBFUSCATE_ENV: &str = "WINK_OBFUSCATE";
pub const OBFUSCATION_PRIME_ENV: &str = "WINK_OBFUSCATION_PRIME";
pub const OBFUSCATION_MASK_ENV: &str = "WINK_OBFUSCATION_MASK";
pub const LOG_FORMAT_ENV: &str = "WINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_BLOCK_SIZE: u64 = wink_sequencer::DEFAULT_BLOCK_SIZE;
pub const DEFAULT_SEQUENCE_START: u64 = 1;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "wink", about = "Short-link service")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    /// SQLite connection string, e.g. `sqlite://wink.db`.
    #[arg(long, env = SQLITE_DSN_ENV, required_if_eq("storage", "sqlite"))]
    pub sqlite_dsn: Option<String>,

    /// Ids reserved from the durable sequence per refill.
    #[arg(
        long,
        env = BLOCK_SIZE_ENV,
        default_value_t = DEFAULT_BLOCK_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub block_size: u64,

    /// First id handed out by a fresh sequence.
    #[arg(long, env = SEQUENCE_START_ENV, default_value_t = DEFAULT_SEQUENCE_START)]
    pub sequence_start: u64,

    /// Lifetime of links created without `ttl_secs`. Unset means permanent.
    #[arg(long, env = DEFAULT_TTL_ENV)]
    pub default_ttl_secs: Option<u64>,

    #[arg(
        long,
        env = SWEEP_INTERVAL_ENV,
        default_value_t = DEFAULT_SWEEP_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sweep_interval_secs: u64,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: u64,

    #[arg(long, env = CACHE_TTL_ENV, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Evict cached records not read for this long. Unset disables idle eviction.
    #[arg(long, env = CACHE_TTI_ENV)]
    pub cache_tti_secs: Option<u64>,

    /// Scramble ids before encoding so consecutive codes are not adjacent.
    #[arg(long, env = OBFUSCATE_ENV)]
    pub obfuscate: bool,

    /// Odd multiplier used when obfuscating.
    #[arg(long, env = OBFUSCATION_PRIME_ENV, default_value_t = DEFAULT_PRIME)]
    pub obfuscation_prime: u64,

    #[arg(long, env = OBFUSCATION_MASK_ENV, default_value_t = DEFAULT_MASK)]
    pub obfuscation_mask: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

impl CLI {
    pub fn codec(&self) -> Result<ShortCodeCodec, CoreError> {
        if !self.obfuscate {
            return Ok(ShortCodeCodec::plain());
        }
        let obfuscator = Obfuscator::new(self.obfuscation_prime, self.obfuscation_mask)?;
        Ok(ShortCodeCodec::obfuscated(obfuscator))
    }

    /// Expiration for links created without `ttl_secs`.
    pub fn default_expiration(&self) -> Result<ExpirationPolicy, CoreError> {
        self.default_ttl_secs
            .map_or(Ok(ExpirationPolicy::Never), ExpirationPolicy::after_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn sequencer_settings(&self) -> BlockSequencerSettings {
        BlockSequencerSettings::builder()
            .block_size(self.block_size)
            .build()
    }

    pub fn url_cache(&self) -> MokaUrlCache {
        CacheConfig::builder()
            .max_capacity(self.cache_capacity)
            .ttl(Duration::from_secs(self.cache_ttl_secs))
            .tti(self.cache_tti_secs.map(Duration::from_secs))
            .build()
            .into()
    }
}
