//! バックエンドとのワイヤ形式
//!
//! ブラウザ版（fetch）とネイティブ版（reqwest）で共有する。
//! - `POST /upload`: multipart の `file` パート → `{status, data | message}`
//! - `POST /export`: `{data, filename}` → スプレッドシートのバイナリ

use crate::error::TransportError;
use crate::types::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// バックエンドの既定アドレス
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

pub const UPLOAD_PATH: &str = "/upload";
pub const EXPORT_PATH: &str = "/export";

/// multipart のパート名
pub const UPLOAD_FIELD_NAME: &str = "file";
pub const PDF_MIME_TYPE: &str = "application/pdf";

pub const EXPORT_EXTENSION: &str = "xlsx";
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// ファイル名が取れない場合のベース名
pub const DEFAULT_FILENAME_BASE: &str = "intelligence_data";

const SUCCESS_STATUS: &str = "success";

/// `/upload` のレスポンス
///
/// 失敗時のメッセージは `message`、FastAPIの例外なら `detail` に入る。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionResponse {
    pub status: Option<String>,
    pub data: Option<Vec<Record>>,
    pub message: Option<String>,
    pub detail: Option<serde_json::Value>,
}

impl ExtractionResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// 失敗メッセージ（message → detail の順）
    pub fn failure_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| match &self.detail {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                _ => None,
            })
    }
}

/// ベースURLとパスを連結
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// `/upload` のレスポンスを解釈
///
/// `http_ok` はHTTPステータスが2xxかどうか。本文が読めない場合はメッセージなしの失敗扱い。
pub fn parse_extraction_response(http_ok: bool, body: &str) -> Result<Vec<Record>, TransportError> {
    let parsed: Option<ExtractionResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(response) if http_ok && response.is_success() => Ok(response.data.unwrap_or_default()),
        Some(response) => Err(TransportError::Backend {
            message: response.failure_message(),
        }),
        None => Err(TransportError::Backend { message: None }),
    }
}

/// 失敗レスポンス本文からメッセージを取り出す（`/export` のエラー用）
pub fn parse_failure_message(body: &str) -> Option<String> {
    serde_json::from_str::<ExtractionResponse>(body)
        .ok()
        .and_then(|r| r.failure_message())
}

/// `/export` のリクエスト本文
#[derive(Debug, Serialize)]
pub struct ExportBody<'a> {
    pub data: &'a [Record],
    pub filename: &'a str,
}

/// ファイル名からベース名を作る（最後の拡張子を除去）
pub fn filename_base(file_name: Option<&str>) -> String {
    let Some(name) = file_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return DEFAULT_FILENAME_BASE.to_string();
    };

    let name = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name);
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    };

    if stem.trim().is_empty() {
        DEFAULT_FILENAME_BASE.to_string()
    } else {
        stem.to_string()
    }
}

/// レスポンスヘッダに名前がない場合の保存名
pub fn fallback_export_filename(base: &str) -> String {
    format!("{}_export.{}", base, EXPORT_EXTENSION)
}

/// Content-Disposition から filename を取り出す
///
/// `filename*=UTF-8''...` があればそちらを優先する。
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref EXTENDED_RE: Regex =
            Regex::new(r#"(?i)filename\*\s*=\s*[\w-]*'[^']*'([^;\s]+)"#).unwrap();
        static ref PLAIN_RE: Regex =
            Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|'([^']*)'|([^;\s]+))"#).unwrap();
    }

    let extended = EXTENDED_RE
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| percent_decode(m.as_str()));

    let name = extended.or_else(|| {
        PLAIN_RE.captures(header).and_then(|c| {
            c.get(1)
                .or_else(|| c.get(2))
                .or_else(|| c.get(3))
                .map(|m| m.as_str().to_string())
        })
    })?;

    sanitize_filename(&name)
}

/// ヘッダの名前 → なければ `{base}_export.xlsx`
pub fn resolve_export_filename(content_disposition: Option<&str>, base: &str) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| fallback_export_filename(base))
}

/// パス区切りを落としてファイル名部分だけにする
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name).trim();
    if last.is_empty() || last == "." || last == ".." {
        None
    } else {
        Some(last.to_string())
    }
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
