//! Server configuration
//!
//! CLI flags with `PARLOR_*` environment fallbacks, validated into the
//! tunables the hub runs with.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

use crate::usecase::BOOTSTRAP_FRAMES;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ping interval ({ping:?}) must be shorter than the idle timeout ({idle:?})")]
    PingNotBelowIdle { ping: Duration, idle: Duration },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("outbound capacity ({capacity}) must hold the {min} bootstrap frames")]
    CapacityBelowBootstrap { capacity: usize, min: usize },
}

/// Per-connection tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// A peer that sends no pong within this window is disconnected
    pub idle_timeout: Duration,
    pub ping_interval: Duration,
    pub outbound_capacity: usize,
    pub history_limit: usize,
    pub write_timeout: Duration,
    pub max_frame_bytes: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            ping_interval: default_ping_interval(DEFAULT_IDLE_TIMEOUT),
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            history_limit: DEFAULT_HISTORY_LIMIT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl HubConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::Zero("idle timeout"));
        }
        if self.ping_interval.is_zero() {
            return Err(ConfigError::Zero("ping interval"));
        }
        if self.ping_interval >= self.idle_timeout {
            return Err(ConfigError::PingNotBelowIdle {
                ping: self.ping_interval,
                idle: self.idle_timeout,
            });
        }
        if self.outbound_capacity == 0 {
            return Err(ConfigError::Zero("outbound capacity"));
        }
        if self.outbound_capacity < BOOTSTRAP_FRAMES {
            return Err(ConfigError::CapacityBelowBootstrap {
                capacity: self.outbound_capacity,
                min: BOOTSTRAP_FRAMES,
            });
        }
        if self.write_timeout.is_zero() {
            return Err(ConfigError::Zero("write timeout"));
        }
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::Zero("max frame size"));
        }
        Ok(self)
    }
}

/// Ping cadence for an idle window: 9/10 of it
pub fn default_ping_interval(idle_timeout: Duration) -> Duration {
    idle_timeout * 9 / 10
}

#[derive(Parser, Debug, Clone)]
#[command(name = "parlor-server")]
#[command(about = "Real-time room hub: chat fan-out and call presence over WebSocket", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PARLOR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PARLOR_PORT", default_value_t = 8080)]
    pub port: u16,

    /// HS256 secret shared with the token issuer (at least 32 characters)
    #[arg(long, env = "PARLOR_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// JSON file with rooms and members to load into the in-memory store
    #[arg(long, env = "PARLOR_SEED")]
    pub seed: Option<PathBuf>,

    /// Comma-separated CORS origins for the HTTP API (empty: same-origin only)
    #[arg(long, env = "PARLOR_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "PARLOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Seconds without a pong before a connection is dropped
    #[arg(long, env = "PARLOR_IDLE_TIMEOUT_SECS", default_value_t = 60)]
    pub idle_timeout_secs: u64,

    /// Seconds between pings (default: 9/10 of the idle timeout)
    #[arg(long, env = "PARLOR_PING_INTERVAL_SECS")]
    pub ping_interval_secs: Option<u64>,

    /// Outbound queue capacity per connection
    #[arg(long, env = "PARLOR_OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// Number of recent messages sent on join
    #[arg(long, env = "PARLOR_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,

    /// Seconds allowed for a single socket write
    #[arg(long, env = "PARLOR_WRITE_TIMEOUT_SECS", default_value_t = 10)]
    pub write_timeout_secs: u64,

    /// Largest inbound frame accepted, in bytes
    #[arg(long, env = "PARLOR_MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,
}

impl ServerArgs {
    pub fn hub_config(&self) -> Result<HubConfig, ConfigError> {
        let idle_timeout = Duration::from_secs(self.idle_timeout_secs);
        let ping_interval = self
            .ping_interval_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| default_ping_interval(idle_timeout));

        HubConfig {
            idle_timeout,
            ping_interval,
            outbound_capacity: self.outbound_capacity,
            history_limit: self.history_limit,
            write_timeout: Duration::from_secs(self.write_timeout_secs),
            max_frame_bytes: self.max_frame_bytes,
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> ServerArgs {
        let mut argv = vec!["parlor-server", "--jwt-secret", "x"];
        argv.extend_from_slice(extra);
        ServerArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        // テスト項目: 既定値はアイドル 60 秒・ping 54 秒・キュー 64・履歴 50
        // given (前提条件):
        let args = parse(&[]);

        // when (操作):
        let config = args.hub_config().unwrap();

        // then (期待する結果):
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.ping_interval, Duration::from_secs(54));
        assert_eq!(args.port, 8080);
        assert!(args.allowed_origins.is_empty());
    }

    #[test]
    fn test_ping_defaults_to_nine_tenths_of_idle() {
        // テスト項目: ping 間隔を省略するとアイドル時間の 9/10 になる
        // given (前提条件):
        let args = parse(&["--idle-timeout-secs", "10"]);

        // when (操作):
        let config = args.hub_config().unwrap();

        // then (期待する結果):
        assert_eq!(config.ping_interval, Duration::from_secs(9));
    }

    #[test]
    fn test_ping_not_below_idle_is_rejected() {
        // テスト項目: ping 間隔がアイドル時間以上ならエラー
        // given (前提条件):
        let args = parse(&["--idle-timeout-secs", "10", "--ping-interval-secs", "10"]);

        // when (操作):
        let result = args.hub_config();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConfigError::PingNotBelowIdle {
                ping: Duration::from_secs(10),
                idle: Duration::from_secs(10)
            })
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        // テスト項目: 送信キュー容量 0 はエラー
        // given (前提条件):
        let args = parse(&["--outbound-capacity", "0"]);

        // when (操作):
        let result = args.hub_config();

        // then (期待する結果):
        assert_eq!(result, Err(ConfigError::Zero("outbound capacity")));
    }

    #[test]
    fn test_capacity_below_bootstrap_frames_is_rejected() {
        // テスト項目: 参加直後のスナップショットが入りきらない容量はエラー
        // given (前提条件):
        let config = HubConfig {
            outbound_capacity: BOOTSTRAP_FRAMES - 1,
            ..HubConfig::default()
        };

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConfigError::CapacityBelowBootstrap {
                capacity: BOOTSTRAP_FRAMES - 1,
                min: BOOTSTRAP_FRAMES
            })
        );
    }

    #[test]
    fn test_capacity_equal_to_bootstrap_frames_is_accepted() {
        // テスト項目: 容量がスナップショット数ちょうどなら受け付ける
        // given (前提条件):
        let config = HubConfig {
            outbound_capacity: BOOTSTRAP_FRAMES,
            ..HubConfig::default()
        };

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result.map(|c| c.outbound_capacity), Ok(BOOTSTRAP_FRAMES));
    }

    #[test]
    fn test_allowed_origins_are_comma_separated() {
        // テスト項目: CORS オリジンはカンマ区切りで複数指定できる
        // given (前提条件) / when (操作):
        let args = parse(&[
            "--allowed-origins",
            "http://localhost:5173,https://parlor.example",
        ]);

        // then (期待する結果):
        assert_eq!(
            args.allowed_origins,
            vec!["http://localhost:5173", "https://parlor.example"]
        );
    }

    #[test]
    fn test_missing_secret_fails_to_parse() {
        // テスト項目: JWT シークレットは必須
        // given (前提条件):
        let argv = ["parlor-server"];

        // when (操作):
        let result = ServerArgs::try_parse_from(argv);

        // then (期待する結果):
        // PARLOR_JWT_SECRET が環境に設定されていない前提
        if std::env::var_os("PARLOR_JWT_SECRET").is_none() {
            assert!(result.is_err());
        }
    }
}
