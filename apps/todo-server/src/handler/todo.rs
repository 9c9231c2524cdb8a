//! # Todo ハンドラ
//!
//! Todo の CRUD エンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `GET /todos` - 一覧取得
//! - `POST /todos` - 作成
//! - `GET /todos/{id}` - 取得
//! - `PUT /todos/{id}` - 更新（パスの ID がボディの ID より優先）
//! - `DELETE /todos/{id}` - 削除
//!
//! ## ルーティングの方針
//!
//! メソッドとパスの振り分けは axum のメソッドルーターではなく、ここで行う。
//! `/todos/` 配下で ID として解釈できないパスは、メソッドに関係なく
//! 404 `{"error":"todo not found"}` を返す必要があるため。

use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use todoapp_domain::todo::{Todo, TodoId};

use crate::{
    error::{ApiError, INVALID_JSON_PAYLOAD},
    usecase::TodoUseCase,
};

/// 単一の Todo を指すパスの接頭辞
pub const TODO_ITEM_PREFIX: &str = "/todos/";

/// 作成・更新リクエストのボディの上限（バイト）
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Todo ハンドラの共有状態
pub struct TodoState {
    pub usecase: Arc<dyn TodoUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// Todo 作成・更新リクエスト
///
/// 未知のフィールドは拒否する。欠けたフィールドと `null` のフィールドはゼロ値になり、
/// ID の欠落はユースケース層で `InvalidId` として扱われる。
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TodoRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub id:          i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title:       String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub completed:   bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl From<TodoRequest> for Todo {
    fn from(req: TodoRequest) -> Self {
        Todo::new(TodoId::new(req.id), req.title, req.description, req.completed)
    }
}

/// Todo レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id:          i64,
    pub title:       String,
    pub description: String,
    pub completed:   bool,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id:          todo.id.as_i64(),
            title:       todo.title,
            description: todo.description,
            completed:   todo.completed,
        }
    }
}

/// リクエストボディを読み切る
///
/// 上限を超えた場合や読み取りに失敗した場合は `MalformedPayload`。
async fn read_body(body: Body) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| ApiError::MalformedPayload(err.to_string()))
}

/// リクエストボディを 1 つの JSON オブジェクトとしてデコードする
///
/// オブジェクトの後ろに空白以外が続く場合は `invalid JSON payload` を返す。
/// それ以外のデコード失敗はデコーダのメッセージをそのまま返す。
pub fn decode_todo(body: &[u8]) -> Result<TodoRequest, ApiError> {
    let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<TodoRequest>();

    let request = match stream.next() {
        Some(Ok(request)) => request,
        Some(Err(err)) => return Err(ApiError::MalformedPayload(err.to_string())),
        None => return Err(ApiError::MalformedPayload("request body is empty".to_string())),
    };

    if stream.next().is_some() {
        return Err(ApiError::MalformedPayload(INVALID_JSON_PAYLOAD.to_string()));
    }

    Ok(request)
}

/// `/todos/{id}` のパスから ID を取り出す
///
/// 接頭辞の後ろが空でない 1 セグメントで、パーセントデコード後に
/// `i64` として解釈できる場合のみ `Some`。
/// 0 以下の値もここでは受け付ける（拒否はユースケース層で行う）。
pub fn parse_id(path: &str) -> Option<TodoId> {
    let rest = path.strip_prefix(TODO_ITEM_PREFIX)?;

    if rest.is_empty() || rest.contains('/') {
        return None;
    }

    urlencoding::decode(rest).ok()?.parse().ok().map(TodoId::new)
}

// --- ハンドラ ---

/// `/todos`
///
/// GET は一覧取得、POST は作成。それ以外のメソッドは 405。
/// ボディは POST のときだけ読む。
pub async fn todos_collection(
    State(state): State<Arc<TodoState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let method = request.method().clone();

    match method {
        Method::GET => list_todos(&state).await,
        Method::POST => {
            let body = read_body(request.into_body()).await?;
            create_todo(&state, &body).await
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// `/todos/{id}`
///
/// ID の解釈に失敗した場合はメソッドに関係なく 404。
/// パスとメソッドを確かめてから、PUT のときだけボディを読む。
pub async fn todo_item(
    State(state): State<Arc<TodoState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let id = parse_id(request.uri().path()).ok_or(ApiError::TodoPathNotFound)?;
    let method = request.method().clone();

    match method {
        Method::GET => get_todo(&state, id).await,
        Method::PUT => {
            let body = read_body(request.into_body()).await?;
            update_todo(&state, id, &body).await
        }
        Method::DELETE => delete_todo(&state, id).await,
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// ルーターのフォールバック
///
/// `/todos/` 配下は ID 不正として、それ以外は未知のパスとして 404 を返す。
pub async fn not_found(uri: Uri) -> ApiError {
    if uri.path().starts_with(TODO_ITEM_PREFIX) {
        ApiError::TodoPathNotFound
    } else {
        ApiError::RouteNotFound
    }
}

async fn list_todos(state: &TodoState) -> Result<Response, ApiError> {
    let todos: Vec<TodoResponse> = state
        .usecase
        .get_all()
        .await?
        .into_iter()
        .map(TodoResponse::from)
        .collect();

    Ok(Json(todos).into_response())
}

async fn create_todo(state: &TodoState, body: &[u8]) -> Result<Response, ApiError> {
    let todo = Todo::from(decode_todo(body)?);

    let created = state.usecase.create(todo).await?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(created))).into_response())
}

async fn get_todo(state: &TodoState, id: TodoId) -> Result<Response, ApiError> {
    let todo = state.usecase.get_by_id(id).await?;

    Ok(Json(TodoResponse::from(todo)).into_response())
}

async fn update_todo(state: &TodoState, id: TodoId, body: &[u8]) -> Result<Response, ApiError> {
    let todo = Todo::from(decode_todo(body)?).with_id(id);

    let updated = state.usecase.update(todo).await?;

    Ok(Json(TodoResponse::from(updated)).into_response())
}

async fn delete_todo(state: &TodoState, id: TodoId) -> Result<Response, ApiError> {
    state.usecase.delete(id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    // ===== decode_todo テスト =====

    #[test]
    fn test_decode_todo_全フィールドを読み取る() {
        let req =
            decode_todo(br#"{"id":1,"title":"a","description":"b","completed":true}"#).unwrap();

        assert_eq!(Todo::from(req), Todo::new(TodoId::new(1), "a", "b", true));
    }

    #[test]
    fn test_decode_todo_欠けたフィールドはゼロ値になる() {
        let req = decode_todo(br#"{"title":"a"}"#).unwrap();

        assert_eq!(req.id, 0);
        assert_eq!(req.description, "");
        assert!(!req.completed);
    }

    #[test]
    fn test_decode_todo_nullのフィールドはゼロ値になる() {
        let req = decode_todo(
            br#"{"id":null,"title":"a","description":null,"completed":null}"#,
        )
        .unwrap();

        assert_eq!(Todo::from(req), Todo::new(TodoId::new(0), "a", "", false));
    }

    #[test]
    fn test_decode_todo_末尾の空白は許容する() {
        assert!(decode_todo(b"{\"id\":1,\"title\":\"a\"}\n  \n").is_ok());
    }

    #[rstest]
    #[case(br#"{"id":1,"title":"a"}{"id":2}"#.as_slice())]
    #[case(br#"{"id":1,"title":"a"} garbage"#.as_slice())]
    #[case(br#"{"id":1,"title":"a"} 1"#.as_slice())]
    fn test_decode_todo_末尾に余分なデータがあるとinvalid_json_payload(#[case] body: &[u8]) {
        let err = decode_todo(body).unwrap_err();

        assert_eq!(err.to_string(), "invalid JSON payload");
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"{".as_slice())]
    #[case(br#"{"id":"1"}"#.as_slice())]
    #[case(br#"{"id":1,"priority":"high"}"#.as_slice())]
    #[case(br#""text""#.as_slice())]
    fn test_decode_todo_デコードできないボディはmalformed_payload(#[case] body: &[u8]) {
        let err = decode_todo(body).unwrap_err();

        assert!(matches!(err, ApiError::MalformedPayload(_)));
        assert_ne!(err.to_string(), "invalid JSON payload");
    }

    #[test]
    fn test_decode_todo_未知のフィールドはフィールド名をメッセージに含む() {
        let err = decode_todo(br#"{"id":1,"priority":"high"}"#).unwrap_err();

        assert!(err.to_string().contains("priority"));
    }

    #[tokio::test]
    async fn test_read_body_上限を超えるボディはmalformed_payload() {
        let body = Body::from(vec![b' '; MAX_BODY_BYTES + 1]);

        let err = read_body(body).await.unwrap_err();

        assert!(matches!(err, ApiError::MalformedPayload(_)));
    }

    // ===== parse_id テスト =====

    #[rstest]
    #[case("/todos/1", Some(1))]
    #[case("/todos/42", Some(42))]
    #[case("/todos/0", Some(0))]
    #[case("/todos/-3", Some(-3))]
    #[case("/todos/%31", Some(1))]
    #[case("/todos/%2D5", Some(-5))]
    #[case("/todos/1%2F2", None)]
    #[case("/todos/%ZZ", None)]
    #[case("/todos/", None)]
    #[case("/todos/abc", None)]
    #[case("/todos/1/extra", None)]
    #[case("/todos/1/", None)]
    #[case("/todos/99999999999999999999", None)]
    #[case("/todo/1", None)]
    fn test_parse_id(#[case] path: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_id(path), expected.map(TodoId::new));
    }
}
