//! # HTTP ハンドラ
//!
//! 各エンドポイントのハンドラを定義する。

pub mod health;
pub mod todo;

pub use health::health_check;
pub use todo::{TodoState, not_found, todo_item, todos_collection};
