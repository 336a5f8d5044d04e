//! 抽出バックエンドのHTTPクライアント（reqwest）
//!
//! エクスポート結果は設定したダウンロードフォルダに保存する。
//! 保存名はファイル名部分だけを使うので、フォルダの外には書き込まない。

use crate::config::Config;
use crate::error::{AppError, Result};
use intel_extract_common::wire::{
    self, ExportBody, DEFAULT_FILENAME_BASE, EXPORT_PATH, PDF_MIME_TYPE, UPLOAD_FIELD_NAME, UPLOAD_PATH,
};
use intel_extract_common::{ChosenFile, ExportRequest, Record, SavedExport, Transport, TransportError};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    download_dir: PathBuf,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, download_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            download_dir: download_dir.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.backend_url, config.resolve_download_dir()?, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn endpoint(&self, path: &str) -> String {
        wire::endpoint_url(&self.base_url, path)
    }

    async fn save(&self, filename: &str, bytes: &[u8]) -> std::result::Result<PathBuf, TransportError> {
        let filename = wire::sanitize_filename(filename)
            .unwrap_or_else(|| wire::fallback_export_filename(DEFAULT_FILENAME_BASE));
        let path = self.download_dir.join(filename);

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;
        Ok(path)
    }
}

fn network(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

impl Transport for HttpTransport {
    async fn submit_for_extraction(&self, file: &ChosenFile) -> std::result::Result<Vec<Record>, TransportError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(PDF_MIME_TYPE)
            .map_err(network)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        debug!(file = %file.name, size = file.size(), "uploading");
        let response = self
            .client
            .post(self.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        let records = wire::parse_extraction_response(status.is_success(), &body)?;
        info!(count = records.len(), status = status.as_u16(), "upload response");
        Ok(records)
    }

    async fn submit_for_export(&self, request: &ExportRequest) -> std::result::Result<SavedExport, TransportError> {
        debug!(count = request.records.len(), "exporting");
        let response = self
            .client
            .post(self.endpoint(EXPORT_PATH))
            .json(&ExportBody {
                data: &request.records,
                filename: &request.suggested_filename_base,
            })
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            let body = response.text().await.map_err(network)?;
            return Err(TransportError::Backend {
                message: wire::parse_failure_message(&body),
            });
        }

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let filename = wire::resolve_export_filename(content_disposition.as_deref(), &request.suggested_filename_base);
        let bytes = response.bytes().await.map_err(network)?;

        let path = self.save(&filename, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "export saved");

        Ok(SavedExport {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename),
            size: bytes.len(),
        })
    }
}

/// ローカルのPDFをアップロード対象として読み込む
pub async fn read_chosen_file(path: &Path) -> Result<ChosenFile> {
    if !path.is_file() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ChosenFile::new(name, bytes))
}
