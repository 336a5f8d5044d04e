//! ログ出力の初期化

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "intel_extract=info,intel_extract_common=info";

/// グローバルsubscriberを登録（2回目以降は無視）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
