//! 実 TCP 接続での E2E テスト
//!
//! エフェメラルポートでサーバーを起動し、reqwest でリクエストを送る。
//! graceful shutdown の挙動（処理中リクエストの完了待ちと猶予切れ）も検証する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p todoapp-server --test e2e_test
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use todoapp_domain::{
    TodoError,
    todo::{Todo, TodoId},
};
use todoapp_infra::repository::InMemoryTodoRepository;
use todoapp_server::{
    app::build_app,
    server,
    usecase::{TodoUseCase, TodoUseCaseImpl},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServer {
    addr:     SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle:   JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start(usecase: Arc<dyn TodoUseCase>, shutdown_timeout: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server::serve(
            listener,
            build_app(usecase),
            shutdown_timeout,
            async move {
                let _ = rx.await;
            },
        ));

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) -> anyhow::Result<()> {
        self.shutdown.send(()).unwrap();
        self.handle.await.unwrap()
    }
}

fn in_memory_usecase() -> Arc<dyn TodoUseCase> {
    Arc::new(TodoUseCaseImpl::new(Arc::new(InMemoryTodoRepository::new())))
}

/// 一覧取得に時間がかかるユースケース
struct SlowUseCase {
    delay: Duration,
}

#[async_trait]
impl TodoUseCase for SlowUseCase {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        Ok(todo)
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        Ok(todo)
    }

    async fn delete(&self, _id: TodoId) -> Result<(), TodoError> {
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![])
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        Err(TodoError::NotFound(id))
    }
}

#[tokio::test]
async fn test_tcp越しにcrudの一連の操作ができる() {
    let server = TestServer::start(in_memory_usecase(), Duration::from_secs(5)).await;
    let client = reqwest::Client::new();

    let created = client
        .post(server.url("/todos"))
        .json(&json!({"id": 1, "title": "Buy milk", "description": "2L", "completed": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    assert!(created.headers().contains_key("x-request-id"));

    let updated = client
        .put(server.url("/todos/1"))
        .json(&json!({"title": "Buy milk", "description": "2L", "completed": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), reqwest::StatusCode::OK);

    let list: Value = client
        .get(server.url("/todos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        list,
        json!([{"id": 1, "title": "Buy milk", "description": "2L", "completed": true}])
    );

    let deleted = client.delete(server.url("/todos/1")).send().await.unwrap();
    assert_eq!(deleted.status(), reqwest::StatusCode::NO_CONTENT);

    let missing = client.get(server.url("/todos/1")).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_シャットダウンは処理中のリクエストの完了を待つ() {
    let usecase = Arc::new(SlowUseCase {
        delay: Duration::from_millis(500),
    });
    let server = TestServer::start(usecase, Duration::from_secs(5)).await;

    let in_flight = tokio::spawn(reqwest::get(server.url("/todos")));
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.stop().await.unwrap();

    let response = in_flight.await.unwrap().unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn test_猶予時間を過ぎるとエラーで終了する() {
    let usecase = Arc::new(SlowUseCase {
        delay: Duration::from_secs(30),
    });
    let server = TestServer::start(usecase, Duration::from_millis(100)).await;

    let _in_flight = tokio::spawn(reqwest::get(server.url("/todos")));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = server.stop().await.unwrap_err();

    assert!(err.to_string().contains("timed out"));
}
