//! # ミドルウェア
//!
//! 全ルートに適用する tower Layer を定義する。

pub mod access_log;

pub use access_log::AccessLogLayer;
