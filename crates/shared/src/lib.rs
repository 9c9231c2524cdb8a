//! # todoapp 共有ユーティリティ
//!
//! ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各サービスの責務）
//! - トレーシング関連の依存は `observability` feature の背後に置く

pub mod error_response;
pub mod health;
#[cfg(feature = "observability")]
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
