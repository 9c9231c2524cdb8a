//! # サーバーのライフサイクル
//!
//! 接続の受け付けと graceful shutdown を扱う。
//!
//! シャットダウン要求を受けると新規接続の受け付けを止め、処理中のリクエストの
//! 完了を猶予時間まで待つ。猶予を過ぎた場合はサーバータスクを中断してエラーを返す。

use std::{future::Future, io, net::SocketAddr, time::Duration};

use anyhow::{Context as _, bail};
use axum::Router;
use tokio::{net::TcpListener, sync::oneshot, task::JoinError};

/// graceful shutdown 付きでサーバーを実行する
///
/// `shutdown` が完了するとシャットダウンを開始する。
/// クライアントアドレスをアクセスログに出すため `ConnectInfo` を有効にする。
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (started_tx, started_rx) = oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        let _ = started_tx.send(());
    };

    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal)
        .await
    });

    tokio::select! {
        result = &mut server => return flatten(result),
        _ = started_rx => {}
    }

    tracing::info!(
        timeout_secs = shutdown_timeout.as_secs(),
        "シャットダウンを開始します。処理中のリクエストの完了を待ちます"
    );

    match tokio::time::timeout(shutdown_timeout, &mut server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            server.abort();
            tracing::error!(
                timeout_secs = shutdown_timeout.as_secs(),
                "猶予時間内に処理中のリクエストが完了しませんでした"
            );
            bail!("graceful shutdown timed out after {:?}", shutdown_timeout)
        }
    }
}

fn flatten(result: Result<io::Result<()>, JoinError>) -> anyhow::Result<()> {
    result
        .context("サーバータスクが異常終了しました")?
        .context("サーバーの実行に失敗しました")
}

/// SIGINT（Ctrl+C）または SIGTERM を待つ
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
