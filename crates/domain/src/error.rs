//! # ドメイン層エラー定義
//!
//! Todo の操作で発生しうる失敗の種別を閉じた列挙型で表現する。
//!
//! ## 設計方針
//!
//! - **型による分類**: 種別はバリアントの同一性で判別し、文字列比較はしない
//! - **発生源の分離**: 入力検証（ユースケース層）とストレージ（リポジトリ層）で
//!   発生するバリアントを分けるが、型は共通にして層をまたいで素通しできるようにする
//! - **HTTP ステータスへのマッピング**: 変換表は HTTP 層（`todoapp-server`）が持つ
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | 発生源 | HTTP ステータス |
//! |-----------|--------|----------------|
//! | `InvalidId` | ユースケース | 400 Bad Request |
//! | `EmptyTitle` | ユースケース | 400 Bad Request |
//! | `DuplicateId` | リポジトリ | 409 Conflict |
//! | `NotFound` | リポジトリ | 404 Not Found |
//! | `Unexpected` | リポジトリ | 500 Internal Server Error |

use thiserror::Error;

use crate::todo::TodoId;

/// Todo の操作で発生するエラー
///
/// メッセージ（`Display`）はクライアントにそのまま返されるため、
/// `Unexpected` 以外は内部情報を含めないこと。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// ID が未指定または 0 以下
    #[error("id must be a positive integer")]
    InvalidId,

    /// タイトルが空（空白のみを含む）
    #[error("title must not be empty")]
    EmptyTitle,

    /// 作成しようとした ID が既に存在する
    #[error("todo with id {0} already exists (duplicate id)")]
    DuplicateId(TodoId),

    /// 対象の ID が存在しない
    #[error("todo with id {0} not found")]
    NotFound(TodoId),

    /// 上記に分類できないストレージの失敗
    ///
    /// 詳細はログにのみ出力し、クライアントには固定メッセージを返す。
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl TodoError {
    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// 入力検証で発生するエラーかどうか
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidId | Self::EmptyTitle)
    }
}
