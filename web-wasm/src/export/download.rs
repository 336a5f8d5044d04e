//! ブラウザのダウンロード
//!
//! バイト列を Blob にしてオブジェクトURLを作り、非表示のアンカーをクリックする。

use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// バイト列から Blob を作る
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array);

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// 指定したファイル名でダウンロードさせる
pub fn save_bytes(bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), JsValue> {
    let blob = bytes_to_blob(bytes, mime_type)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = gloo::utils::document();
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.set_attribute("style", "display: none")?;

    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    // クリック直後に revoke すると一部ブラウザで保存が中断される
    Timeout::new(0, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();

    Ok(())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_bytes_to_blob() {
        let blob = bytes_to_blob(b"PK\x03\x04", "application/zip").unwrap();
        assert_eq!(blob.size(), 4.0);
        assert_eq!(blob.type_(), "application/zip");
    }

    #[wasm_bindgen_test]
    fn test_save_bytes_cleans_up_anchor() {
        save_bytes(b"data", "report_export.xlsx", "application/octet-stream").unwrap();
        let leftover = gloo::utils::document()
            .query_selector("a[download]")
            .unwrap();
        assert!(leftover.is_none());
    }
}
