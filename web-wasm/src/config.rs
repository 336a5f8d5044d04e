//! ビルド時設定

use intel_extract_common::wire::DEFAULT_BACKEND_URL;

/// ビルド時に `INTEL_EXTRACT_BACKEND_URL` で上書きできる
pub fn backend_url() -> &'static str {
    resolve_backend_url(option_env!("INTEL_EXTRACT_BACKEND_URL"))
}

fn resolve_backend_url(configured: Option<&'static str>) -> &'static str {
    configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
}
