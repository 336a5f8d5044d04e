//! アップロード→抽出→エクスポートの統合テスト
//!
//! reqwest のクライアントでモックバックエンドと実際に通信する。

mod support;

use calamine::{open_workbook, Reader, Xlsx};
use intel_extract::common::error::{EXPORT_FALLBACK_MESSAGE, NETWORK_ERROR_MESSAGE};
use intel_extract::common::{ChosenFile, Field, Intent, Phase, Session, Transport, TransportError};
use intel_extract::{read_chosen_file, session_from_config, Config, HttpTransport};
use std::time::Duration;
use support::{spawn_backend, truncated_backend, unreachable_backend, MockBackend};
use tempfile::{tempdir, TempDir};

fn pdf(name: &str) -> ChosenFile {
    ChosenFile::new(name, b"%PDF-1.4 test".to_vec())
}

async fn session_for(base_url: &str, dir: &TempDir) -> Session<HttpTransport> {
    let config = Config {
        backend_url: base_url.to_string(),
        download_dir: Some(dir.path().join("exports")),
        timeout_seconds: 10,
    };
    intel_extract::logging::init();
    session_from_config(&config).expect("Failed to build session")
}

#[tokio::test]
async fn test_upload_then_export_all() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("sitrep.pdf"))).await;
    session.dispatch(Intent::Upload).await;

    let workflow = session.workflow();
    assert_eq!(workflow.phase(), Phase::Ready);
    assert_eq!(workflow.records().len(), 3);
    assert_eq!(workflow.records()[0].text(Field::Heading), "Contact near river crossing");
    assert_eq!(workflow.records()[0].text(Field::CadresMin), "4");
    assert_eq!(workflow.records()[1].display(Field::Ammunition), "-");
    assert_eq!(backend.uploads(), vec![("sitrep.pdf".to_string(), 13)]);

    session.dispatch(Intent::Export).await;

    let workflow = session.workflow();
    assert_eq!(workflow.phase(), Phase::Ready);
    assert!(workflow.status_message().is_none());
    let saved = workflow.last_export().expect("export should be recorded");
    assert_eq!(saved.filename, "sitrep_records.xlsx");

    let path = dir.path().join("exports").join("sitrep_records.xlsx");
    let bytes = std::fs::read(&path).expect("export file should exist");
    assert_eq!(bytes.len(), saved.size);
    assert!(bytes.starts_with(b"PK"));

    let mut workbook: Xlsx<_> = open_workbook(&path).expect("Failed to open workbook");
    let range = workbook.worksheet_range("Sheet1").expect("Failed to read sheet");
    assert_eq!(range.height(), 4);

    let exports = backend.exports();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0]["filename"], "sitrep");
    assert_eq!(exports[0]["data"].as_array().unwrap().len(), 3);
    // 未知のキーもそのまま送り返す
    assert_eq!(exports[0]["data"][2]["source_page"], 12);
}

#[tokio::test]
async fn test_export_selected_rows_in_table_order() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("sitrep.pdf"))).await;
    session.dispatch(Intent::Upload).await;
    session.dispatch(Intent::ToggleRow(2)).await;
    session.dispatch(Intent::ToggleRow(0)).await;
    session.dispatch(Intent::Export).await;

    let exports = backend.exports();
    let headings: Vec<&str> = exports[0]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["heading"].as_str().unwrap())
        .collect();
    assert_eq!(headings, vec!["Contact near river crossing", "Movement observed"]);
    assert!(session.workflow().selection().is_empty());
}

#[tokio::test]
async fn test_export_without_content_disposition_uses_fallback_name() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("plain_report.pdf"))).await;
    session.dispatch(Intent::Upload).await;
    session.dispatch(Intent::Export).await;

    assert_eq!(
        session.workflow().last_export().map(|s| s.filename.as_str()),
        Some("plain_report_export.xlsx")
    );
    assert!(dir.path().join("exports").join("plain_report_export.xlsx").exists());
}

#[tokio::test]
async fn test_backend_detail_is_shown() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("broken.pdf"))).await;
    session.dispatch(Intent::Upload).await;

    let workflow = session.workflow();
    assert_eq!(workflow.phase(), Phase::FileChosen);
    assert_eq!(workflow.status_message(), Some("Could not parse PDF"));
    assert!(workflow.records().is_empty());
}

#[tokio::test]
async fn test_export_failure_without_message() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("outage.pdf"))).await;
    session.dispatch(Intent::Upload).await;
    session.dispatch(Intent::ToggleRow(1)).await;
    session.dispatch(Intent::Export).await;

    let workflow = session.workflow();
    assert_eq!(workflow.phase(), Phase::Ready);
    assert_eq!(workflow.status_message(), Some(EXPORT_FALLBACK_MESSAGE));
    assert_eq!(workflow.selection().indices().collect::<Vec<_>>(), vec![1]);
    assert!(workflow.last_export().is_none());
}

#[tokio::test]
async fn test_zero_records_cannot_be_exported() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("blank.pdf"))).await;
    session.dispatch(Intent::Upload).await;
    assert_eq!(session.workflow().phase(), Phase::Ready);
    assert_eq!(session.workflow().extracted().map(|r| r.len()), Some(0));
    assert!(!session.workflow().can_export());

    session.dispatch(Intent::Export).await;
    assert_eq!(
        session.workflow().status_message(),
        Some("No records available to export.")
    );
    assert!(backend.exports().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let base_url = unreachable_backend().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = session_for(&base_url, &dir).await;

    session.dispatch(Intent::ChooseFile(pdf("sitrep.pdf"))).await;
    session.dispatch(Intent::Upload).await;

    assert_eq!(session.workflow().phase(), Phase::FileChosen);
    assert_eq!(session.workflow().status_message(), Some(NETWORK_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_transport_reports_backend_error_directly() {
    let base_url = spawn_backend(MockBackend::default()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let transport = HttpTransport::new(&base_url, dir.path(), Duration::from_secs(5)).unwrap();

    let err = transport.submit_for_extraction(&pdf("broken_scan.pdf")).await.unwrap_err();
    assert_eq!(err, TransportError::backend("Could not parse PDF"));
}

#[tokio::test]
async fn test_read_local_pdf_and_upload() {
    let backend = MockBackend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("weekly.pdf");
    std::fs::write(&path, b"%PDF-1.7 weekly").unwrap();

    let mut session = session_for(&base_url, &dir).await;
    let file = read_chosen_file(&path).await.unwrap();
    session.dispatch(Intent::ChooseFile(file)).await;
    session.dispatch(Intent::Upload).await;

    assert_eq!(session.workflow().records().len(), 3);
    assert_eq!(backend.uploads(), vec![("weekly.pdf".to_string(), 15)]);
}

#[tokio::test]
async fn test_truncated_body_is_network_error() {
    let base_url = truncated_backend().await;
    let dir = tempdir().expect("Failed to create temp dir");
    let transport = HttpTransport::new(&base_url, dir.path(), Duration::from_secs(5)).unwrap();

    let err = transport.submit_for_extraction(&pdf("sitrep.pdf")).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "unexpected error: {:?}", err);

    let mut session = session_for(&base_url, &dir).await;
    session.dispatch(Intent::ChooseFile(pdf("sitrep.pdf"))).await;
    session.dispatch(Intent::Upload).await;
    assert_eq!(session.workflow().status_message(), Some(NETWORK_ERROR_MESSAGE));
}
