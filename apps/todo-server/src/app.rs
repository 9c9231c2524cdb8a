//! # アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` は設定・トレーシングの初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use todoapp_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{TodoState, health_check, not_found, todo_item, todos_collection},
    middleware::AccessLogLayer,
    usecase::TodoUseCase,
};

/// ルーターを構築する
///
/// ミドルウェアは上に書いたものが外側:
///
/// 1. SetRequestIdLayer: UUID v7 を生成（クライアント提供値があればそれを使用）
/// 2. TraceLayer: request_id を含むリクエストスパンを作成
/// 3. PropagateRequestIdLayer: レスポンスヘッダーに `x-request-id` をコピー
/// 4. AccessLogLayer: 完了したリクエストを 1 行で記録
pub fn build_app(usecase: Arc<dyn TodoUseCase>) -> Router {
    let todo_state = Arc::new(TodoState { usecase });

    Router::new()
        .route("/health", get(health_check))
        .route("/todos", any(todos_collection))
        .route("/todos/{*rest}", any(todo_item))
        .fallback(not_found)
        .with_state(todo_state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(AccessLogLayer),
        )
}
