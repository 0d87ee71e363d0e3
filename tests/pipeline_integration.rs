//! Integration tests for the retrieval pipeline.
//!
//! These tests verify the fetch-extract-hash-store flow against a mock
//! archive server.

use std::io::{Cursor, Write};

use harvester_core::catalog::{ArchiveReference, CatalogEntry, ClassLevel};
use harvester_core::retrieve::{ProcessError, RetrievalPipeline};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn build_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, bytes) in members {
        writer.start_file(*name, options).expect("start member");
        writer.write_all(bytes).expect("write member");
    }
    writer.finish().expect("finish archive").into_inner()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

async fn serve_archive(path_str: &str, bytes: Vec<u8>) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_pipeline_full_flow_extracts_primary_content() {
    let book_bytes = vec![0xB0u8; 500];
    let zip_bytes = build_zip(&[("book.pdf", &book_bytes[..]), ("cover.jpg", &[1u8; 10][..])]);
    let mock_server = serve_archive("/t.zip", zip_bytes).await;
    let out = TempDir::new().expect("temp dir");

    let entry = CatalogEntry::new(ClassLevel::Seven, "S", "T");
    let reference = ArchiveReference::new(format!("{}/t.zip", mock_server.uri()));

    let pipeline = RetrievalPipeline::new(out.path());
    let content = pipeline
        .process(&entry, &reference)
        .await
        .expect("process should succeed");

    assert_eq!(content.book_id, "c7_s_t");
    assert_eq!(
        content.content_path,
        out.path().join("class_7").join("s_t.pdf")
    );
    assert_eq!(
        std::fs::read(&content.content_path).expect("read output"),
        book_bytes,
        "output must hold exactly the primary content bytes"
    );
    assert_eq!(content.sha256, sha256_hex(&book_bytes));
}

#[tokio::test]
async fn test_pipeline_selects_largest_content_file() {
    // Sizes {10, 500, 200}: the 500-byte file wins regardless of order.
    let zip_bytes = build_zip(&[
        ("a.pdf", &[1u8; 10][..]),
        ("b.pdf", &[2u8; 500][..]),
        ("c.pdf", &[3u8; 200][..]),
    ]);
    let mock_server = serve_archive("/books.zip", zip_bytes).await;
    let out = TempDir::new().expect("temp dir");

    let entry = CatalogEntry::new(ClassLevel::Three, "Maths", "Magic");
    let reference = ArchiveReference::new(format!("{}/books.zip", mock_server.uri()));

    let pipeline = RetrievalPipeline::new(out.path());
    let content = pipeline
        .process(&entry, &reference)
        .await
        .expect("process should succeed");

    assert_eq!(
        std::fs::read(&content.content_path).expect("read output"),
        vec![2u8; 500]
    );
}

#[tokio::test]
async fn test_pipeline_no_content_creates_no_output() {
    let zip_bytes = build_zip(&[("cover.jpg", &[1u8; 10][..])]);
    let mock_server = serve_archive("/empty.zip", zip_bytes).await;
    let out = TempDir::new().expect("temp dir");

    let entry = CatalogEntry::new(ClassLevel::Seven, "S", "T");
    let reference = ArchiveReference::new(format!("{}/empty.zip", mock_server.uri()));

    let pipeline = RetrievalPipeline::new(out.path());
    let result = pipeline.process(&entry, &reference).await;

    assert!(matches!(result, Err(ProcessError::NoContent { .. })));
    assert!(
        !out.path().join("class_7").join("s_t.pdf").exists(),
        "no output file may be created without recognized content"
    );
    // Nothing else is left behind either (temp archive removed).
    let leftover = std::fs::read_dir(out.path().join("class_7"))
        .expect("class dir exists")
        .count();
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn test_pipeline_fetch_failure_leaves_prior_output_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t.zip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let out = TempDir::new().expect("temp dir");

    let class_dir = out.path().join("class_7");
    std::fs::create_dir_all(&class_dir).expect("create class dir");
    std::fs::write(class_dir.join("s_t.pdf"), b"prior content").expect("seed prior output");

    let entry = CatalogEntry::new(ClassLevel::Seven, "S", "T");
    let reference = ArchiveReference::new(format!("{}/t.zip", mock_server.uri()));

    let pipeline = RetrievalPipeline::new(out.path());
    let result = pipeline.process(&entry, &reference).await;

    assert!(matches!(
        result,
        Err(ProcessError::FetchStatus { status: 500, .. })
    ));
    assert_eq!(
        std::fs::read(class_dir.join("s_t.pdf")).expect("read prior output"),
        b"prior content"
    );
    // Only the prior output remains: no temp archive survives.
    let names: Vec<String> = std::fs::read_dir(&class_dir)
        .expect("class dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["s_t.pdf".to_string()]);
}

#[tokio::test]
async fn test_pipeline_is_idempotent_across_runs() {
    let book_bytes = vec![0xABu8; 321];
    let zip_bytes = build_zip(&[("book.pdf", &book_bytes[..])]);
    let mock_server = serve_archive("/t.zip", zip_bytes).await;
    let out = TempDir::new().expect("temp dir");

    let entry = CatalogEntry::new(ClassLevel::Seven, "S", "T");
    let reference = ArchiveReference::new(format!("{}/t.zip", mock_server.uri()));
    let pipeline = RetrievalPipeline::new(out.path());

    let first = pipeline
        .process(&entry, &reference)
        .await
        .expect("first run");
    let first_bytes = std::fs::read(&first.content_path).expect("read first output");

    let second = pipeline
        .process(&entry, &reference)
        .await
        .expect("second run");
    let second_bytes = std::fs::read(&second.content_path).expect("read second output");

    assert_eq!(first.book_id, second.book_id);
    assert_eq!(first.content_path, second.content_path);
    assert_eq!(first.sha256, second.sha256);
    assert_eq!(first_bytes, second_bytes, "runs must be byte-identical");
}
