//! # リポジトリ実装
//!
//! ユースケース層が利用するリポジトリトレイトと、その具体的な実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存する
//! - **テスタビリティ**: トレイト経由でモックに差し替え可能

pub mod todo_repository;

pub use todo_repository::{InMemoryTodoRepository, TodoRepository};
