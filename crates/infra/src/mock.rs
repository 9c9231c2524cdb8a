//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todoapp-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 実装と同じ振る舞いに加えて、操作ごとの呼び出し回数を記録する。
//! 入力検証で弾かれたときにリポジトリが 1 度も呼ばれないことの検証に使う。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoapp_domain::{
    TodoError,
    todo::{Todo, TodoId},
};

use crate::repository::TodoRepository;

/// 操作ごとの呼び出し回数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create:    usize,
    pub update:    usize,
    pub delete:    usize,
    pub get_all:   usize,
    pub get_by_id: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.create + self.update + self.delete + self.get_all + self.get_by_id
    }
}

// ===== MockTodoRepository =====

#[derive(Clone, Default)]
pub struct MockTodoRepository {
    todos:     Arc<Mutex<Vec<Todo>>>,
    calls:     Arc<Mutex<CallCounts>>,
    fail_with: Option<TodoError>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が指定したエラーを返すモックを作成
    pub fn failing(error: TodoError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn add_todo(&self, todo: Todo) {
        self.todos.lock().unwrap().push(todo);
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    fn record(&self, f: impl FnOnce(&mut CallCounts)) -> Result<(), TodoError> {
        f(&mut *self.calls.lock().unwrap());
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn create(&self, todo: Todo) -> Result<(), TodoError> {
        self.record(|c| c.create += 1)?;
        let mut todos = self.todos.lock().unwrap();
        if todos.iter().any(|t| t.id == todo.id) {
            return Err(TodoError::DuplicateId(todo.id));
        }
        todos.push(todo);
        Ok(())
    }

    async fn update(&self, todo: Todo) -> Result<(), TodoError> {
        self.record(|c| c.update += 1)?;
        let mut todos = self.todos.lock().unwrap();
        let pos = todos
            .iter()
            .position(|t| t.id == todo.id)
            .ok_or(TodoError::NotFound(todo.id))?;
        todos[pos] = todo;
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        self.record(|c| c.delete += 1)?;
        let mut todos = self.todos.lock().unwrap();
        let pos = todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        todos.remove(pos);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.record(|c| c.get_all += 1)?;
        Ok(self.todos.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.record(|c| c.get_by_id += 1)?;
        self
            .todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TodoError::NotFound(id))
    }
}
