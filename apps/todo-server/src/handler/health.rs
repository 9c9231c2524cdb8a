//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! {"status":"healthy","version":"0.1.0"}
//! ```
//!
//! アクセスログの出力対象外。

use axum::Json;
use todoapp_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// ストアの状態は確認せず、プロセスが応答できることのみを返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
