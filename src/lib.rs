//! Intel Extract（ネイティブ版）
//!
//! 共通ワークフローを reqwest のクライアントで動かす。

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use client::{read_chosen_file, HttpTransport};
pub use config::Config;
pub use error::{AppError, Result};
pub use intel_extract_common as common;

use intel_extract_common::Session;

/// 設定からセッションを組み立てる
pub fn session_from_config(config: &Config) -> Result<Session<HttpTransport>> {
    Ok(Session::new(HttpTransport::from_config(config)?))
}

/// ログを初期化し、設定ファイルと環境変数からセッションを組み立てる
pub fn connect() -> Result<Session<HttpTransport>> {
    logging::init();
    let config = Config::load()?;
    tracing::info!(backend = %config.backend_url, "session configured");
    session_from_config(&config)
}
