//! 統合テスト用のモックバックエンド（axum）
//!
//! - `/upload`: ファイル名で応答を切り替える
//!   - `broken*` → 500 + `{"detail": ...}`
//!   - `blank*` → 成功・0件
//!   - それ以外 → 成功・3件
//! - `/export`: 受け取ったレコードから実際のxlsxを作って返す
//!   - ベース名 `plain*` → Content-Disposition なし
//!   - ベース名 `outage` → 500（本文はテキスト）

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use intel_extract::common::wire::XLSX_MIME_TYPE;
use intel_extract::common::Field;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Clone, Default)]
pub struct MockBackend {
    pub uploads: Arc<Mutex<Vec<(String, usize)>>>,
    pub exports: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn exports(&self) -> Vec<Value> {
        self.exports.lock().unwrap().clone()
    }
}

pub fn sample_records() -> Value {
    json!([
        {
            "date": "2024-01-01",
            "heading": "Contact near river crossing",
            "input_summary": "Patrol reported brief exchange of fire.",
            "district": "North",
            "cadres_min": 4,
            "cadres_max": 6
        },
        {
            "date": "2024-01-02",
            "heading": "Cache recovered",
            "weapons": "2 rifles",
            "ammunition": null
        },
        {
            "date": "2024-01-03",
            "heading": "Movement observed",
            "gp": "Faction B",
            "source_page": 12
        }
    ])
}

async fn upload(State(state): State<MockBackend>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        state.uploads.lock().unwrap().push((name.clone(), size));

        if name.starts_with("broken") {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Could not parse PDF"})),
            );
        }
        if name.starts_with("blank") {
            return (
                StatusCode::OK,
                Json(json!({"status": "success", "records": 0, "data": []})),
            );
        }
        return (
            StatusCode::OK,
            Json(json!({"status": "success", "records": 3, "data": sample_records()})),
        );
    }

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [{"loc": ["body", "file"], "msg": "field required"}]})),
    )
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn build_workbook(records: &[Value]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, field) in Field::ALL.iter().enumerate() {
        worksheet.write_string(0, col as u16, field.label())?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, field) in Field::ALL.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, cell_text(&record[field.key()]))?;
        }
    }

    workbook.save_to_buffer()
}

async fn export(State(state): State<MockBackend>, Json(body): Json<Value>) -> Response {
    state.exports.lock().unwrap().push(body.clone());

    let records = body["data"].as_array().cloned().unwrap_or_default();
    let base = body["filename"].as_str().unwrap_or("intelligence_data").to_string();

    if records.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "No data to export"}))).into_response();
    }
    if base == "outage" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let bytes = match build_workbook(&records) {
        Ok(bytes) => bytes,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME_TYPE));
    if !base.starts_with("plain") {
        let disposition = format!("attachment; filename=\"{}_records.xlsx\"", base);
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).unwrap(),
        );
    }
    (headers, bytes).into_response()
}

/// エフェメラルポートで起動し、ベースURLを返す
pub async fn spawn_backend(state: MockBackend) -> String {
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/export", post(export))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 何も待ち受けていないアドレス
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// 本文の途中で接続を切るサーバ
///
/// Content-Length より短い本文を返してすぐ閉じる。
pub async fn truncated_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = vec![0u8; 64 * 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"status\"")
                .await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{}", addr)
}
