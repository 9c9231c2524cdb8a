//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - ワイヤ形式は `{"error": "<message>"}` の 1 フィールドのみ
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// 500 応答で返す固定メッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// 500 Internal Server Error
    ///
    /// メッセージは固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_jsonシリアライズはerrorフィールドのみ() {
        let error = ErrorResponse::new("todo with id 1 not found");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json, serde_json::json!({"error": "todo with id 1 not found"}));
    }

    #[test]
    fn test_internal_error_は固定メッセージを返す() {
        assert_eq!(ErrorResponse::internal_error().error, "internal server error");
    }

    #[test]
    fn test_jsonデシリアライズが正しく動作する() {
        let error: ErrorResponse =
            serde_json::from_str(r#"{"error":"invalid JSON payload"}"#).unwrap();

        assert_eq!(error, ErrorResponse::new("invalid JSON payload"));
    }
}
