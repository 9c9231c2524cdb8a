//! # Observability 基盤
//!
//! トレーシング初期化とログ出力先の設定、リクエスト ID の発行を提供する。
//!
//! - 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替え
//! - 環境変数 `LOG_DIR` による日付付きログファイル（`app_YYYY-MM-DD.log`）への同時出力
//! - `x-request-id` の生成（UUID v7）と、それを含むリクエストスパンの作成

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing_subscriber::{
    EnvFilter,
    Layer,
    fmt::MakeWriter,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// リクエスト ID ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `LOG_DIR` 未設定時のログ出力ディレクトリ
pub const DEFAULT_LOG_DIR: &str = "logs";

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする
    ///
    /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
    /// stderr に警告を出力する。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（JSON ログの `span.service` フィールドに出力）
    pub service_name: String,
    /// ログ出力形式
    pub log_format:   LogFormat,
    /// ログファイルの出力先ディレクトリ（`None` なら標準出力のみ）
    pub log_dir:      Option<PathBuf>,
}

impl TracingConfig {
    /// 新しい設定を作成する（ログファイル出力なし）
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            log_dir: None,
        }
    }

    /// ログファイルの出力先ディレクトリを設定する
    pub fn with_log_dir(self, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: Some(log_dir.into()),
            ..self
        }
    }

    /// 環境変数から設定を読み取る
    ///
    /// - `LOG_FORMAT`: 出力形式
    /// - `LOG_DIR`: ログファイルの出力先。未設定なら [`DEFAULT_LOG_DIR`]、空文字なら無効
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self {
            log_dir: parse_log_dir(std::env::var("LOG_DIR").ok()),
            ..Self::new(service_name, LogFormat::from_env())
        }
    }
}

fn parse_log_dir(value: Option<String>) -> Option<PathBuf> {
    match value {
        None => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        Some(dir) if dir.trim().is_empty() => None,
        Some(dir) => Some(PathBuf::from(dir)),
    }
}

/// 指定日のログファイル名（`app_YYYY-MM-DD.log`）
pub fn log_file_name(date: NaiveDate) -> String {
    format!("app_{}.log", date.format("%Y-%m-%d"))
}

/// ログファイルを追記モードで開く
///
/// ディレクトリが存在しない場合は作成する。
pub fn open_log_file(dir: &Path, date: NaiveDate) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(log_file_name(date)))
}

fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// 未設定の場合は `"info,todoapp=debug"` をデフォルトとする。
///
/// `log_dir` が設定されている場合は、標準出力に加えて当日のログファイルにも
/// 同じイベントを出力する。ログファイルを開けない場合はエラーを返す。
pub fn init_tracing(config: &TracingConfig) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,todoapp=debug".into());

    let file_layer = match &config.log_dir {
        Some(dir) => {
            let file = open_log_file(dir, chrono::Local::now().date_naive())?;
            Some(fmt_layer(config.log_format, Mutex::new(file), false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(config.log_format, io::stdout, true))
        .with(file_layer)
        .init();

    Ok(())
}

/// UUID v7 でリクエスト ID を発行する
///
/// `SetRequestIdLayer` に渡す。クライアントが `x-request-id` を指定した場合は
/// そちらが優先される（レイヤー側の挙動）。
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// リクエストスパンを作成する
///
/// `TraceLayer::make_span_with` に渡す。スパン内のログにはメソッド・URI・
/// リクエスト ID が自動的に含まれる。
pub fn make_request_span<B>(request: &Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
