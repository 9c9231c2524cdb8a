//! # アプリケーション設定
//!
//! デフォルト値・JSON 設定ファイル・環境変数を重ねて設定を構築する。
//!
//! ## 優先順位（低 → 高）
//!
//! 1. 組み込みデフォルト値
//! 2. JSON 設定ファイル（`-c` / `--config`、未指定なら環境変数 `CONFIG`）
//! 3. 環境変数
//!
//! ## 設定項目
//!
//! | ファイルのキー | 環境変数 | デフォルト |
//! |----------------|----------|------------|
//! | `server.host` | `SERVER_HOST` | `0.0.0.0` |
//! | `server.port` | `SERVER_PORT` | `8080` |
//! | `server.shutdown_timeout_secs` | `SERVER_SHUTDOWN_TIMEOUT_SECS` | `10` |
//!
//! 空文字の環境変数は未設定として扱う。
//!
//! ## 設定ファイルの例
//!
//! ```json
//! {
//!   "server": {
//!     "host": "127.0.0.1",
//!     "port": 9090
//!   }
//! }
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ::config::{Config, File, FileFormat};
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: i64 = 8080;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: i64 = 10;

const ENV_SERVER_HOST: &str = "SERVER_HOST";
const ENV_SERVER_PORT: &str = "SERVER_PORT";
const ENV_SHUTDOWN_TIMEOUT: &str = "SERVER_SHUTDOWN_TIMEOUT_SECS";

/// コマンドライン引数
#[derive(Debug, Parser)]
#[command(name = "todo-server", version, about = "インメモリ Todo CRUD サーバー")]
pub struct Cli {
    /// 設定ファイル（JSON）のパス
    #[arg(short = 'c', long = "config", env = "CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 設定ファイルのパス（空文字は未指定扱い）
    pub fn config_path(&self) -> Option<&Path> {
        self
            .config
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// 設定の読み込み・検証で発生するエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 設定ファイルの読み込みまたはデシリアライズに失敗
    #[error("設定の読み込みに失敗しました: {0}")]
    Load(#[from] ::config::ConfigError),

    /// 環境変数の値が数値として解釈できない
    #[error("invalid {name} value '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    /// 値の検証に失敗
    #[error("{0}")]
    Invalid(&'static str),
}

/// HTTP サーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// バインドアドレス
    pub host:             String,
    /// ポート番号
    pub port:             u16,
    /// シャットダウン時に処理中リクエストの完了を待つ時間
    pub shutdown_timeout: Duration,
}

/// アプリケーション全体の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
}

/// 検証前の設定値
///
/// 範囲外の値もエラーメッセージ付きで弾けるよう、数値は `i64` で受ける。
#[derive(Debug, Deserialize)]
struct RawConfig {
    server: RawServerConfig,
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    host:                  String,
    port:                  i64,
    shutdown_timeout_secs: i64,
}

impl AppConfig {
    /// 設定を読み込む
    ///
    /// 環境変数はプロセスの環境から取得する。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// 環境変数の取得方法を指定して設定を読み込む
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|value| !value.is_empty());

        let mut builder = Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("server.shutdown_timeout_secs", DEFAULT_SHUTDOWN_TIMEOUT_SECS)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }

        if let Some(host) = lookup(ENV_SERVER_HOST) {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = lookup(ENV_SERVER_PORT) {
            builder = builder.set_override("server.port", parse_env_int(ENV_SERVER_PORT, port)?)?;
        }
        if let Some(timeout) = lookup(ENV_SHUTDOWN_TIMEOUT) {
            builder = builder.set_override(
                "server.shutdown_timeout_secs",
                parse_env_int(ENV_SHUTDOWN_TIMEOUT, timeout)?,
            )?;
        }

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        raw.validate()
    }
}

fn parse_env_int(name: &'static str, value: String) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}

impl RawConfig {
    fn validate(self) -> Result<AppConfig, ConfigError> {
        let server = self.server;

        if server.host.is_empty() {
            return Err(ConfigError::Invalid("server.host is required"));
        }
        if server.port <= 0 {
            return Err(ConfigError::Invalid("server.port must be > 0"));
        }
        let port = u16::try_from(server.port)
            .map_err(|_| ConfigError::Invalid("server.port must be <= 65535"))?;
        let timeout_secs = u64::try_from(server.shutdown_timeout_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid("server.shutdown_timeout_secs must be > 0"))?;

        Ok(AppConfig {
            server: ServerConfig {
                host: server.host,
                port,
                shutdown_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
