//! # todoapp ドメイン層
//!
//! Todo 管理の中核となるエンティティとエラー語彙を定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つ [`Todo`](todo::Todo)
//! - **値オブジェクト**: 識別子の Newtype [`TodoId`](todo::TodoId)
//! - **ドメインエラー**: 閉じた列挙型 [`TodoError`] で失敗の種別を表現する
//!
//! ## 依存関係の方向
//!
//! ```text
//! server → infra → domain
//!    ↘
//!     shared
//! ```
//!
//! ドメイン層はインフラ層（ストレージ）や HTTP 層に一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use todoapp_domain::{
//!    TodoError,
//!    todo::{Todo, TodoId},
//! };
//!
//! let todo = Todo::new(TodoId::new(1), "牛乳を買う", "", false);
//! assert!(!todo.has_blank_title());
//!
//! let error = TodoError::NotFound(todo.id);
//! assert_eq!(error.to_string(), "todo with id 1 not found");
//! ```

pub mod error;
pub mod todo;

pub use error::TodoError;
