//! # ユースケース層
//!
//! Todo 管理のビジネスロジック（入力検証とリポジトリへの委譲）を実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラは `dyn TodoUseCase` 越しに呼び出す
//! - **依存性注入**: リポジトリは外部から注入する
//! - **薄いハンドラ**: ハンドラは HTTP の変換のみを行い、検証はここに集約する

pub mod todo;

use async_trait::async_trait;
pub use todo::TodoUseCaseImpl;
use todoapp_domain::{
    TodoError,
    todo::{Todo, TodoId},
};

/// Todo ユースケーストレイト
///
/// 具体的な実装は [`TodoUseCaseImpl`] で提供される。
#[async_trait]
pub trait TodoUseCase: Send + Sync {
    /// Todo を作成し、保存した値を返す
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Todo を置き換え、保存した値を返す
    async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Todo を削除する
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;

    /// すべての Todo を取得する
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// ID で Todo を取得する
    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError>;
}

#[async_trait]
impl TodoUseCase for TodoUseCaseImpl {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        TodoUseCaseImpl::create(self, todo).await
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        TodoUseCaseImpl::update(self, todo).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        TodoUseCaseImpl::delete(self, id).await
    }

    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        TodoUseCaseImpl::get_all(self).await
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        TodoUseCaseImpl::get_by_id(self, id).await
    }
}
