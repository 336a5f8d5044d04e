//! エラー型定義

use thiserror::Error;

/// 通信不達時の表示メッセージ
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Check backend connection.";

/// 抽出失敗時（バックエンドがメッセージを返さない場合）
pub const EXTRACTION_FALLBACK_MESSAGE: &str = "Error processing PDF.";

/// エクスポート失敗時（バックエンドがメッセージを返さない場合）
pub const EXPORT_FALLBACK_MESSAGE: &str = "Export failed. Please try again.";

/// 入力検証エラー（Displayがそのまま画面表示文言）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a PDF file to upload.")]
    NoFileChosen,

    #[error("The selected file is empty.")]
    EmptyFile,

    #[error("The selected file could not be read.")]
    UnreadableFile,

    #[error("No records available to export.")]
    NothingToExport,
}

/// 選択操作のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("row {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

/// 通信層のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// レスポンスが得られなかった（詳細はログ用）
    #[error("no response from backend: {0}")]
    Network(String),

    /// バックエンドが失敗を返した
    #[error("backend reported failure: {}", message.as_deref().unwrap_or("<no message>"))]
    Backend { message: Option<String> },

    /// ファイル保存に失敗
    #[error("download failed: {0}")]
    Download(String),
}

impl TransportError {
    pub fn backend(message: impl Into<String>) -> Self {
        TransportError::Backend {
            message: Some(message.into()),
        }
    }

    fn backend_message(&self) -> Option<&str> {
        match self {
            TransportError::Backend { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("extraction failed: {0}")]
    Extraction(TransportError),

    #[error("export failed: {0}")]
    Export(TransportError),
}

impl Error {
    /// ステータス欄に出す文言。通信の内部詳細は出さない。
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Extraction(TransportError::Network(_)) | Error::Export(TransportError::Network(_)) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
            Error::Extraction(e) => e
                .backend_message()
                .unwrap_or(EXTRACTION_FALLBACK_MESSAGE)
                .to_string(),
            Error::Export(e) => e
                .backend_message()
                .unwrap_or(EXPORT_FALLBACK_MESSAGE)
                .to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
