//! アップロードフォームコンポーネント
//!
//! ファイルは選択時にメモリへ読み込み、`Intent::ChooseFile` として渡す。

use intel_extract_common::{ChosenFile, Intent, Phase, Workflow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::error;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

#[component]
pub fn UploadForm<F>(workflow: ReadSignal<Workflow>, on_intent: F) -> impl IntoView
where
    F: Fn(Intent) + 'static + Clone + Send + Sync,
{
    let input_ref: NodeRef<leptos::html::Input> = NodeRef::new();
    let is_busy = move || workflow.with(|w| w.is_busy());
    let is_processing = move || workflow.with(|w| w.phase() == Phase::Processing);

    let on_change = {
        let on_intent = on_intent.clone();
        move |ev: web_sys::Event| {
            let input: HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let on_intent = on_intent.clone();
            spawn_local(async move {
                match read_chosen_file(file).await {
                    Ok(chosen) => on_intent(Intent::ChooseFile(chosen)),
                    Err(e) => {
                        error!("failed to read selected file: {:?}", e);
                        on_intent(Intent::FileUnreadable);
                    }
                }
            });
        }
    };

    let on_submit = {
        let on_intent = on_intent.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            on_intent(Intent::Upload);
        }
    };

    let on_reset = {
        let on_intent = on_intent.clone();
        move |_| {
            if let Some(input) = input_ref.get() {
                input.set_value("");
            }
            on_intent(Intent::Reset);
        }
    };

    view! {
        <section class="card upload-card">
            <h2>"Automated Intelligence Extraction System"</h2>
            <p>"Upload an intelligence PDF to extract structured operational data."</p>

            <form class="upload-form" on:submit=on_submit>
                <div class="upload-zone">
                    <strong>"Select Intelligence PDF"</strong>
                    <input
                        type="file"
                        accept=".pdf"
                        node_ref=input_ref
                        disabled=is_busy
                        on:change=on_change
                    />
                    {move || {
                        workflow
                            .with(|w| w.chosen_file().map(|f| (f.name.clone(), f.size())))
                            .map(|(name, size)| {
                                view! {
                                    <p class="chosen-file">{format!("{} ({} KB)", name, size.div_ceil(1024))}</p>
                                }
                            })
                    }}
                </div>

                <div class="upload-actions">
                    <button type="submit" class="btn btn-primary" disabled=is_busy>
                        {move || if is_processing() { "Processing..." } else { "Upload & Extract" }}
                    </button>
                    <button type="button" class="btn btn-secondary" disabled=is_busy on:click=on_reset>
                        "Reset"
                    </button>
                </div>
            </form>

            <Show when=is_processing>
                <div class="spinner"></div>
            </Show>
        </section>
    }
}

async fn read_chosen_file(file: File) -> Result<ChosenFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ChosenFile::new(file.name(), bytes))
}
