//! # todoapp インフラ層
//!
//! Todo の保存先を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ユースケース層が依存するのはリポジトリトレイト（[`TodoRepository`]）のみとし、
//! 具体的な保存先はこのクレートに閉じ込める。現状の実装はプロセス内メモリのみ。
//!
//! ## 依存関係
//!
//! ```text
//! server → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`repository`] - リポジトリトレイトとインメモリ実装
//! - `mock` - テスト用モック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use todoapp_infra::repository::{InMemoryTodoRepository, TodoRepository};
//!
//! // プロセス起動時に 1 度だけ生成し、参照を共有する
//! let repository: Arc<dyn TodoRepository> = Arc::new(InMemoryTodoRepository::new());
//! ```

pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use repository::{InMemoryTodoRepository, TodoRepository};
