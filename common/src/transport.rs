//! 通信クライアントの境界
//!
//! ブラウザ版（fetch）とネイティブ版（reqwest）がこのトレイトを実装し、
//! ワークフローには構築時に注入する。

use crate::error::TransportError;
use crate::types::{ChosenFile, Record};

/// エクスポート要求（エクスポート時に組み立てる一時データ）
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub records: Vec<Record>,
    pub suggested_filename_base: String,
}

/// 保存済みエクスポート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    pub filename: String,
    pub size: usize,
}

/// 抽出バックエンドへの2つの呼び出し
///
/// `submit_for_export` は成功時にファイル保存まで行う。
/// 保存の副作用を持つのはこのトレイトの実装だけ。
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn submit_for_extraction(&self, file: &ChosenFile) -> Result<Vec<Record>, TransportError>;

    async fn submit_for_export(&self, request: &ExportRequest) -> Result<SavedExport, TransportError>;
}
