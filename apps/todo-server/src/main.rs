//! # todo-server
//!
//! インメモリ Todo CRUD サーバーのエントリーポイント。
//!
//! ## 環境変数
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `CONFIG` | - | 設定ファイル（JSON）のパス。`-c` / `--config` が優先 |
//! | `SERVER_HOST` | `0.0.0.0` | バインドアドレス |
//! | `SERVER_PORT` | `8080` | ポート番号 |
//! | `SERVER_SHUTDOWN_TIMEOUT_SECS` | `10` | シャットダウン猶予（秒） |
//! | `LOG_FORMAT` | `pretty` | `json` または `pretty` |
//! | `LOG_DIR` | `logs` | ログファイルの出力先。空文字で無効 |
//! | `RUST_LOG` | `info,todoapp=debug` | ログレベル |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p todoapp-server -- --config config.json
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use todoapp_infra::repository::{InMemoryTodoRepository, TodoRepository};
use todoapp_server::{
    app::build_app,
    config::{AppConfig, Cli},
    server,
    usecase::{TodoUseCase, TodoUseCaseImpl},
};
use todoapp_shared::observability::{self, TracingConfig};
use tokio::net::TcpListener;

/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. リポジトリ → ユースケース → ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("todo-server");
    observability::init_tracing(&tracing_config).context("ログファイルを開けませんでした")?;
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    // 設定読み込み
    let config = AppConfig::load(cli.config_path())
        .inspect_err(|e| tracing::error!("設定の読み込みに失敗しました: {}", e))?;

    tracing::info!(
        "todo-server を起動します: {}:{}",
        config.server.host,
        config.server.port
    );

    // 依存関係の初期化
    let repository: Arc<dyn TodoRepository> = Arc::new(InMemoryTodoRepository::new());
    let usecase: Arc<dyn TodoUseCase> = Arc::new(TodoUseCaseImpl::new(repository));
    let app = build_app(usecase);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "アドレスのバインドに失敗しました: {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("todo-server が起動しました: {}", listener.local_addr()?);

    server::serve(
        listener,
        app,
        config.server.shutdown_timeout,
        server::shutdown_signal(),
    )
    .await?;

    tracing::info!("todo-server を停止しました");
    Ok(())
}
