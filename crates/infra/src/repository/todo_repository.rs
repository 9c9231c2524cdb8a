//! # TodoRepository
//!
//! Todo の保存を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **読み書きロック**: 作成・更新・削除は書き込みロック、取得は読み込みロックを
//!   マップへのアクセス全体にわたって保持する。単一キー操作は線形化可能で、
//!   `get_all` は一貫したスナップショットを返す
//! - **値の返却**: 読み出しは常に複製を返し、内部のマップへの参照は外に出さない
//! - **検証しない**: ID の正負やタイトルの空判定はユースケース層の責務。
//!   リポジトリが返すのは `DuplicateId` と `NotFound` のみ
//! - **呼び出し間のトランザクションなし**: `get_by_id` → `update` のような
//!   複数回の呼び出しはアトミックではない

use std::collections::HashMap;

use async_trait::async_trait;
use todoapp_domain::{
    TodoError,
    todo::{Todo, TodoId},
};
use tokio::sync::RwLock;

/// Todo リポジトリトレイト
///
/// ユースケース層が利用するストレージの能力。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todo を追加する
    ///
    /// 同じ ID が既に存在する場合は `TodoError::DuplicateId` を返す。
    async fn create(&self, todo: Todo) -> Result<(), TodoError>;

    /// Todo を丸ごと置き換える
    ///
    /// ID が存在しない場合は `TodoError::NotFound` を返す。
    async fn update(&self, todo: Todo) -> Result<(), TodoError>;

    /// Todo を削除する
    ///
    /// ID が存在しない場合は `TodoError::NotFound` を返す。
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;

    /// すべての Todo を取得する
    ///
    /// 順序は不定。空の場合は空の Vec を返す。
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// ID で Todo を取得する
    ///
    /// ID が存在しない場合は `TodoError::NotFound` を返す。
    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError>;
}

/// インメモリ実装の TodoRepository
///
/// プロセス起動時に 1 度だけ生成し、`Arc` で共有する。
/// 保存内容はプロセス終了とともに失われる。
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    items: RwLock<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    /// 空のリポジトリを作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id))]
    async fn create(&self, todo: Todo) -> Result<(), TodoError> {
        let mut items = self.items.write().await;

        if items.contains_key(&todo.id) {
            return Err(TodoError::DuplicateId(todo.id));
        }

        items.insert(todo.id, todo);
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id))]
    async fn update(&self, todo: Todo) -> Result<(), TodoError> {
        let mut items = self.items.write().await;

        let Some(stored) = items.get_mut(&todo.id) else {
            return Err(TodoError::NotFound(todo.id));
        };

        *stored = todo;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let mut items = self.items.write().await;

        items
            .remove(&id)
            .map(|_| ())
            .ok_or(TodoError::NotFound(id))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        let items = self.items.read().await;

        Ok(items.values().cloned().collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        let items = self.items.read().await;

        items.get(&id).cloned().ok_or(TodoError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn todo(id: i64, title: &str) -> Todo {
        Todo::new(TodoId::new(id), title, "", false)
    }

    #[tokio::test]
    async fn test_create_した値をget_by_idで取得できる() {
        let sut = InMemoryTodoRepository::new();

        sut.create(todo(1, "牛乳を買う")).await.unwrap();

        assert_eq!(sut.get_by_id(TodoId::new(1)).await.unwrap(), todo(1, "牛乳を買う"));
    }

    #[tokio::test]
    async fn test_create_同じidはタイトルが違ってもduplicate_idになる() {
        let sut = InMemoryTodoRepository::new();
        sut.create(todo(1, "牛乳を買う")).await.unwrap();

        let result = sut.create(todo(1, "別のタイトル")).await;

        assert_eq!(result, Err(TodoError::DuplicateId(TodoId::new(1))));
        assert_eq!(sut.get_by_id(TodoId::new(1)).await.unwrap().title, "牛乳を買う");
    }

    #[tokio::test]
    async fn test_update_は値を丸ごと置き換える() {
        let sut = InMemoryTodoRepository::new();
        sut.create(Todo::new(TodoId::new(1), "牛乳を買う", "メモ", false))
            .await
            .unwrap();

        let replaced = Todo::new(TodoId::new(1), "牛乳と卵を買う", "", true);
        sut.update(replaced.clone()).await.unwrap();

        assert_eq!(sut.get_by_id(TodoId::new(1)).await.unwrap(), replaced);
    }

    #[tokio::test]
    async fn test_update_存在しないidはnot_foundで何も変えない() {
        let sut = InMemoryTodoRepository::new();
        sut.create(todo(1, "牛乳を買う")).await.unwrap();

        let result = sut.update(todo(2, "存在しない")).await;

        assert_eq!(result, Err(TodoError::NotFound(TodoId::new(2))));
        assert_eq!(sut.get_all().await.unwrap(), vec![todo(1, "牛乳を買う")]);
    }

    #[tokio::test]
    async fn test_delete_二回目はnot_foundになる() {
        let sut = InMemoryTodoRepository::new();
        sut.create(todo(1, "牛乳を買う")).await.unwrap();

        assert_eq!(sut.delete(TodoId::new(1)).await, Ok(()));
        assert_eq!(
            sut.delete(TodoId::new(1)).await,
            Err(TodoError::NotFound(TodoId::new(1)))
        );
        assert_eq!(
            sut.get_by_id(TodoId::new(1)).await,
            Err(TodoError::NotFound(TodoId::new(1)))
        );
    }

    #[tokio::test]
    async fn test_get_all_空のストアは空のvecを返す() {
        let sut = InMemoryTodoRepository::new();

        assert!(sut.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_読み出した値を変更しても保存内容は変わらない() {
        let sut = InMemoryTodoRepository::new();
        sut.create(todo(1, "牛乳を買う")).await.unwrap();

        let mut copy = sut.get_by_id(TodoId::new(1)).await.unwrap();
        copy.title = "書き換え".to_string();
        let mut all = sut.get_all().await.unwrap();
        all[0].completed = true;

        assert_eq!(sut.get_by_id(TodoId::new(1)).await.unwrap(), todo(1, "牛乳を買う"));
    }
}
