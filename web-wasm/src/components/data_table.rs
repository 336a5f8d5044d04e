//! 抽出レコード表コンポーネント
//!
//! 列幅は表示中レコードの最長値から決める。行は (レコード列の識別子, 行番号) を
//! キーにして、新しい抽出結果が来たら全行を作り直す。

use intel_extract_common::{column_layout, Column, Intent, Workflow};
use leptos::prelude::*;

#[component]
pub fn DataTable<F>(workflow: ReadSignal<Workflow>, on_intent: F) -> impl IntoView
where
    F: Fn(Intent) + 'static + Clone + Send + Sync,
{
    let columns = Memo::new(move |_| workflow.with(|w| column_layout(w.records())));
    let record_count = move || workflow.with(|w| w.records().len());
    let rows = move || workflow.with(|w| w.row_keys());
    let all_selected = move || workflow.with(|w| w.selection().is_all_selected());
    let is_locked = move || workflow.with(|w| !w.can_export());

    let on_toggle_all = {
        let on_intent = on_intent.clone();
        move |_| on_intent(Intent::ToggleAll)
    };

    view! {
        <section class="data-table-container">
            <div class="table-header">
                <h3 class="table-title">{move || format!("Extracted Records ({})", record_count())}</h3>
                <p class="table-description">"Below are the intelligence records extracted from your PDF"</p>
            </div>

            <div class="table-wrapper">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th class="row-select">
                                <input
                                    type="checkbox"
                                    title="Select all"
                                    prop:checked=all_selected
                                    disabled=is_locked
                                    on:change=on_toggle_all
                                />
                            </th>
                            <th class="row-number">"#"</th>
                            {move || {
                                columns
                                    .get()
                                    .into_iter()
                                    .map(|column| {
                                        view! {
                                            <th class=format!("table-header-cell {}", column.width.css_class())>
                                                {column.field.label()}
                                            </th>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=rows
                            key=|row| *row
                            children=move |(_, index)| {
                                let on_intent = on_intent.clone();
                                view! {
                                    <DataRow
                                        workflow=workflow
                                        columns=columns
                                        index=index
                                        on_intent=on_intent
                                    />
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </section>
    }
}

#[component]
fn DataRow<F>(
    workflow: ReadSignal<Workflow>,
    columns: Memo<Vec<Column>>,
    index: usize,
    on_intent: F,
) -> impl IntoView
where
    F: Fn(Intent) + 'static + Clone + Send + Sync,
{
    let is_selected = move || workflow.with(|w| w.selection().contains(index));
    let is_locked = move || workflow.with(|w| !w.can_export());

    view! {
        <tr class="table-row" class:selected=is_selected>
            <td class="row-select">
                <input
                    type="checkbox"
                    prop:checked=is_selected
                    disabled=is_locked
                    on:change=move |_| on_intent(Intent::ToggleRow(index))
                />
            </td>
            <td class="row-number">{index + 1}</td>
            {move || {
                workflow.with(|w| {
                    let record = w.records().get(index);
                    columns
                        .get()
                        .into_iter()
                        .map(|column| {
                            let text = record.map(|r| r.display(column.field)).unwrap_or_else(|| "-".to_string());
                            view! {
                                <td class=format!("table-cell {}", column.width.css_class())>{text}</td>
                            }
                        })
                        .collect_view()
                })
            }}
        </tr>
    }
}
