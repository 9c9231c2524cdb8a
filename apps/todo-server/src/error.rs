//! # API エラー定義
//!
//! HTTP 層のエラーと、axum レスポンスへの変換を定義する。
//!
//! ## エラーの階層
//!
//! ```text
//! ドメイン層エラー (TodoError)
//!        ↓ #[from]
//! API エラー (ApiError)
//!        ↓ IntoResponse
//! HTTP レスポンス (StatusCode + {"error": "..."})
//! ```
//!
//! ステータスコードの対応表は [`ApiError::status`] の 1 箇所にのみ置く。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todoapp_domain::TodoError;
use todoapp_shared::ErrorResponse;

/// 末尾に余分なデータを含むリクエストボディのエラーメッセージ
pub const INVALID_JSON_PAYLOAD: &str = "invalid JSON payload";

/// HTTP 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// ユースケース・リポジトリから伝播したエラー
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// リクエストボディをデコードできない
    #[error("{0}")]
    MalformedPayload(String),

    /// `/todos/` 配下で ID として解釈できないパス
    #[error("todo not found")]
    TodoPathNotFound,

    /// どのルートにも一致しないパス
    #[error("not found")]
    RouteNotFound,

    /// パスは一致したがメソッドが対応していない
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// エラー種別に対応する HTTP ステータス
    ///
    /// | エラー | ステータス |
    /// |--------|-----------|
    /// | `InvalidId` / `EmptyTitle` | 400 |
    /// | `DuplicateId` | 409 |
    /// | `NotFound` | 404 |
    /// | `MalformedPayload` | 400 |
    /// | `TodoPathNotFound` / `RouteNotFound` | 404 |
    /// | `MethodNotAllowed` | 405 |
    /// | それ以外 | 500 |
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Todo(TodoError::InvalidId | TodoError::EmptyTitle) => StatusCode::BAD_REQUEST,
            ApiError::Todo(TodoError::DuplicateId(_)) => StatusCode::CONFLICT,
            ApiError::Todo(TodoError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::TodoPathNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Todo(TodoError::Unexpected(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            // 405 はボディなし
            ApiError::MethodNotAllowed => status.into_response(),
            err if status.is_server_error() => {
                // 内部エラーの詳細はログにのみ出力する
                tracing::error!(error = %err, "内部エラー");
                (status, Json(ErrorResponse::internal_error())).into_response()
            }
            err => (status, Json(ErrorResponse::new(err.to_string()))).into_response(),
        }
    }
}
