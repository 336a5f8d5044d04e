//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="app-header">
            <h1 class="app-title">"Intelligence Data Extraction System"</h1>
            <p class="app-subtitle">"Automated PDF Intelligence Processing"</p>
        </header>
    }
}
