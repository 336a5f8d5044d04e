//! メインアプリケーションコンポーネント
//!
//! `Workflow` を1つのシグナルで持つ。操作は `dispatch` で適用し、
//! 返ってきた `Command` を `spawn_local` で実行して結果を `complete` に戻す。

use crate::api::BackendClient;
use crate::components::{
    data_table::DataTable, export_buttons::ExportButtons, header::Header,
    status_banner::StatusBanner, upload_form::UploadForm,
};
use intel_extract_common::{Intent, Workflow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::debug;

#[component]
pub fn App(client: BackendClient) -> impl IntoView {
    let (workflow, set_workflow) = signal(Workflow::new());

    let dispatch = move |intent: Intent| {
        let Some(command) = set_workflow.try_update(|w| w.dispatch(intent)).flatten() else {
            return;
        };
        let client = client.clone();
        spawn_local(async move {
            let completion = command.run(&client).await;
            set_workflow.update(|w| {
                if !w.complete(completion) {
                    debug!("completion discarded");
                }
            });
        });
    };

    let has_records = move || workflow.with(|w| !w.records().is_empty());
    let on_table_intent = dispatch.clone();

    view! {
        <div class="app-container">
            <Header />
            <main class="app-main">
                <div class="content-wrapper">
                    <UploadForm workflow=workflow on_intent=dispatch.clone() />
                    <StatusBanner workflow=workflow />
                    <Show when=has_records>
                        <ExportButtons workflow=workflow on_intent=on_table_intent.clone() />
                        <DataTable workflow=workflow on_intent=on_table_intent.clone() />
                    </Show>
                </div>
            </main>
        </div>
    }
}
