//! 抽出バックエンド（fetch）
//!
//! - `POST /upload`: PDFを multipart で送り、抽出レコードを受け取る
//! - `POST /export`: レコードを JSON で送り、スプレッドシートをダウンロードする

use crate::export::download;
use intel_extract_common::wire::{
    self, ExportBody, EXPORT_PATH, PDF_MIME_TYPE, UPLOAD_FIELD_NAME, UPLOAD_PATH, XLSX_MIME_TYPE,
};
use intel_extract_common::{ChosenFile, ExportRequest, Record, SavedExport, Transport, TransportError};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

/// バックエンドクライアント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendClient {
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        wire::endpoint_url(&self.base_url, path)
    }
}

/// リクエストを組み立てられない・届かない場合はネットワークエラー扱い
fn network(e: JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", e))
}

async fn send(request: &Request) -> Result<Response, TransportError> {
    let window = web_sys::window().ok_or_else(|| TransportError::Network("no window".into()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(network)?;
    value.dyn_into::<Response>().map_err(network)
}

async fn read_text(response: &Response) -> Result<String, TransportError> {
    let value = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    Ok(value.as_string().unwrap_or_default())
}

async fn read_bytes(response: &Response) -> Result<Vec<u8>, TransportError> {
    let buffer = JsFuture::from(response.array_buffer().map_err(network)?)
        .await
        .map_err(network)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn header(response: &Response, name: &str) -> Option<String> {
    response.headers().get(name).ok().flatten()
}

impl Transport for BackendClient {
    async fn submit_for_extraction(&self, file: &ChosenFile) -> Result<Vec<Record>, TransportError> {
        let blob = download::bytes_to_blob(&file.bytes, PDF_MIME_TYPE).map_err(network)?;
        let form = FormData::new().map_err(network)?;
        form.append_with_blob_and_filename(UPLOAD_FIELD_NAME, &blob, &file.name)
            .map_err(network)?;

        let form_body: &JsValue = &form;
        let mut opts = RequestInit::new();
        opts.method("POST");
        opts.mode(RequestMode::Cors);
        opts.body(Some(form_body));

        let request = Request::new_with_str_and_init(&self.endpoint(UPLOAD_PATH), &opts).map_err(network)?;

        debug!(file = %file.name, size = file.size(), "uploading");
        let response = send(&request).await?;
        let body = read_text(&response).await?;
        let records = wire::parse_extraction_response(response.ok(), &body)?;
        info!(count = records.len(), status = response.status(), "upload response");
        Ok(records)
    }

    async fn submit_for_export(&self, request: &ExportRequest) -> Result<SavedExport, TransportError> {
        let body = serde_json::to_string(&ExportBody {
            data: &request.records,
            filename: &request.suggested_filename_base,
        })
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let mut opts = RequestInit::new();
        opts.method("POST");
        opts.mode(RequestMode::Cors);
        opts.body(Some(&JsValue::from_str(&body)));

        let fetch_request = Request::new_with_str_and_init(&self.endpoint(EXPORT_PATH), &opts).map_err(network)?;
        fetch_request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network)?;

        debug!(count = request.records.len(), "exporting");
        let response = send(&fetch_request).await?;
        if !response.ok() {
            let text = read_text(&response).await?;
            return Err(TransportError::Backend {
                message: wire::parse_failure_message(&text),
            });
        }

        let filename = wire::resolve_export_filename(
            header(&response, "content-disposition").as_deref(),
            &request.suggested_filename_base,
        );
        let mime_type = header(&response, "content-type").unwrap_or_else(|| XLSX_MIME_TYPE.to_string());
        let bytes = read_bytes(&response).await?;

        download::save_bytes(&bytes, &filename, &mime_type)
            .map_err(|e| TransportError::Download(format!("{:?}", e)))?;

        info!(filename = %filename, size = bytes.len(), "export downloaded");
        Ok(SavedExport {
            filename,
            size: bytes.len(),
        })
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_unreachable_backend_is_network_error() {
        // 閉じたポート
        let client = BackendClient::new("http://127.0.0.1:9");
        let file = ChosenFile::new("report.pdf", b"%PDF-1.4".to_vec());
        let err = client.submit_for_extraction(&file).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
