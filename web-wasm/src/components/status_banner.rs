//! ステータス表示コンポーネント

use intel_extract_common::{Phase, Workflow};
use leptos::prelude::*;

/// 表示内容と CSS クラス
fn banner(workflow: &Workflow) -> Option<(&'static str, String)> {
    if let Some(message) = workflow.status_message() {
        return Some(("status error", message.to_string()));
    }
    match workflow.phase() {
        Phase::Processing => Some(("status processing", "Processing intelligence report...".to_string())),
        Phase::Exporting => Some(("status processing", "Preparing export...".to_string())),
        Phase::Ready => match (workflow.last_export(), workflow.extracted()) {
            (Some(saved), _) => Some(("status success", format!("Saved as: {}", saved.filename))),
            (None, Some([])) => Some(("status info", "No records were found in this document.".to_string())),
            _ => None,
        },
        _ => None,
    }
}

#[component]
pub fn StatusBanner(workflow: ReadSignal<Workflow>) -> impl IntoView {
    move || {
        workflow.with(banner).map(|(class, text)| {
            view! { <div class=class role="status">{text}</div> }
        })
    }
}
