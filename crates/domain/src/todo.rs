//! # Todo
//!
//! 管理対象となる唯一のエンティティ。
//!
//! ## 設計判断
//!
//! ### ID はクライアント指定
//!
//! ID はサーバーで採番せず、作成時にクライアントが指定する。
//! 一意性はリポジトリが、正の値であることはユースケース層が保証する。
//! そのため `TodoId` 自体は 0 以下の値も保持できる（検証前の入力を表現するため）。
//!
//! ### 値セマンティクス
//!
//! `Todo` は `Clone` 可能な値であり、リポジトリは読み出し時に常にコピーを返す。
//! 呼び出し側がコピーを変更しても保存済みの状態には影響しない。

use derive_more::{Display, From};

/// Todo の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// 永続化可能な ID（正の値）かどうか
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Todo エンティティ
///
/// 更新は常にレコード全体の置き換えで行う（部分更新はしない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id:          TodoId,
    pub title:       String,
    pub description: String,
    pub completed:   bool,
}

impl Todo {
    pub fn new(
        id: TodoId,
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    /// ID を差し替えた新しい Todo を返す
    ///
    /// `PUT /todos/{id}` でパスの ID をボディの ID より優先させるために使う。
    pub fn with_id(self, id: TodoId) -> Self {
        Self { id, ..self }
    }

    /// 前後の空白を除いたタイトルが空かどうか
    pub fn has_blank_title(&self) -> bool {
        self.title.trim().is_empty()
    }
}
