//! # アクセスログミドルウェア
//!
//! リクエスト完了時に、メソッド・パス・ステータス・クライアントアドレス・
//! レスポンスサイズ・処理時間を 1 行にまとめて出力する tower Layer。
//!
//! ## レイヤー配置
//!
//! TraceLayer の内側に置き、リクエストスパンのフィールド（request_id など）が
//! 同じイベントに含まれるようにする:
//!
//! ```text
//! SetRequestId → TraceLayer → PropagateRequestId → AccessLogLayer → Router
//! ```
//!
//! レスポンスは一切変更しない。`/health` は出力対象外。

use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::HttpBody, extract::ConnectInfo};
use http::{Request, Response};
use tower::{Layer, Service};

fn is_health_check_path(path: &str) -> bool {
    path == "/health"
}

/// クライアントアドレス（`ConnectInfo` がなければ `-`）
fn client_address<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_string(), |ConnectInfo(addr)| addr.to_string())
}

/// アクセスログを出力する Layer
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessLogLayer;

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

/// アクセスログを出力する Service
#[derive(Clone, Debug)]
pub struct AccessLogService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: HttpBody + Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if is_health_check_path(req.uri().path()) {
            return Box::pin(async move { inner.call(req).await });
        }

        let method = req.method().to_string();
        let path = req.uri().path().to_owned();
        let client = client_address(&req);
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    tracing::info!(
                        http.method = %method,
                        http.path = %path,
                        http.status_code = response.status().as_u16(),
                        client.address = %client,
                        http.response_bytes = response.body().size_hint().exact(),
                        http.latency_ms = latency_ms,
                        "リクエスト完了"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        http.method = %method,
                        http.path = %path,
                        client.address = %client,
                        http.latency_ms = latency_ms,
                        error.message = %err,
                        "リクエスト処理エラー"
                    );
                }
            }

            result
        })
    }
}
