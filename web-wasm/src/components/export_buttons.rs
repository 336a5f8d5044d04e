//! 選択・エクスポートボタンコンポーネント

use intel_extract_common::{Intent, Phase, Workflow};
use leptos::prelude::*;

/// エクスポートボタンの表示
fn export_label(workflow: &Workflow) -> String {
    if workflow.phase() == Phase::Exporting {
        return "Exporting...".to_string();
    }
    let selection = workflow.selection();
    if selection.is_empty() {
        format!("Export All ({})", selection.record_count())
    } else {
        format!("Export Selected ({})", selection.len())
    }
}

#[component]
pub fn ExportButtons<F>(workflow: ReadSignal<Workflow>, on_intent: F) -> impl IntoView
where
    F: Fn(Intent) + 'static + Clone + Send + Sync,
{
    let can_export = move || workflow.with(|w| w.can_export());

    view! {
        <div class="export-buttons">
            <button
                class="btn btn-secondary"
                disabled=move || !can_export()
                on:click={
                    let on_intent = on_intent.clone();
                    move |_| on_intent(Intent::SelectAll)
                }
            >
                "Select All"
            </button>

            <button
                class="btn btn-secondary"
                disabled=move || !can_export()
                on:click={
                    let on_intent = on_intent.clone();
                    move |_| on_intent(Intent::DeselectAll)
                }
            >
                "Deselect All"
            </button>

            <button
                class="btn btn-primary"
                disabled=move || !can_export()
                on:click={
                    let on_intent = on_intent.clone();
                    move |_| on_intent(Intent::Export)
                }
            >
                {move || workflow.with(export_label)}
            </button>
        </div>
    }
}
