//! # todoapp サーバー
//!
//! インメモリの Todo を CRUD する HTTP サーバー。
//!
//! ## モジュール構成
//!
//! - [`config`] - 設定の読み込みと検証
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`usecase`] - 入力検証とリポジトリへの委譲
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - アクセスログ
//! - [`app`] - ルーター構築
//! - [`server`] - graceful shutdown 付きのサーバー実行
//!
//! ## リクエストの流れ
//!
//! ```text
//! HTTP → ミドルウェア → ハンドラ（デコード）→ ユースケース（検証）→ リポジトリ
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod server;
pub mod usecase;
