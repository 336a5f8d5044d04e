//! エクスポート結果の保存

pub mod download;
