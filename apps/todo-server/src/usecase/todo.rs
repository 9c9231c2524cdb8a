//! # Todo ユースケース
//!
//! 入力を検証したうえでリポジトリに委譲する。
//!
//! ## 検証順序
//!
//! 1. ID が正の値であること（`InvalidId`）
//! 2. 前後の空白を除いたタイトルが空でないこと（`EmptyTitle`）
//!
//! 検証に失敗した場合、リポジトリは 1 度も呼ばれない。
//! リポジトリのエラー（`DuplicateId` / `NotFound` など）は変換せずに返す。

use std::sync::Arc;

use todoapp_domain::{
    TodoError,
    todo::{Todo, TodoId},
};
use todoapp_infra::repository::TodoRepository;

/// Todo ユースケースの実装
pub struct TodoUseCaseImpl {
    repository: Arc<dyn TodoRepository>,
}

impl TodoUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        validate_todo(&todo)?;

        self.repository.create(todo.clone()).await?;

        tracing::info!(id = %todo.id, "Todo を作成しました");
        Ok(todo)
    }

    pub async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        validate_todo(&todo)?;

        self.repository.update(todo.clone()).await?;

        tracing::info!(id = %todo.id, "Todo を更新しました");
        Ok(todo)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        validate_id(id)?;

        self.repository.delete(id).await?;

        tracing::info!(%id, "Todo を削除しました");
        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.repository.get_all().await
    }

    /// ID で Todo を取得する
    ///
    /// 0 以下の ID は存在確認をせず `InvalidId` を返す（404 ではなく 400 になる）。
    pub async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        validate_id(id)?;

        self.repository.get_by_id(id).await
    }
}

fn validate_id(id: TodoId) -> Result<(), TodoError> {
    if id.is_positive() {
        Ok(())
    } else {
        tracing::debug!(%id, "不正な ID");
        Err(TodoError::InvalidId)
    }
}

fn validate_todo(todo: &Todo) -> Result<(), TodoError> {
    validate_id(todo.id)?;

    if todo.has_blank_title() {
        tracing::debug!(id = %todo.id, "タイトルが空");
        return Err(TodoError::EmptyTitle);
    }

    Ok(())
}
