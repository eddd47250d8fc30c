mod support;

use std::io::Write;
use std::sync::Arc;

use giftlink::application::seed::{GiftSeeder, SeedError, SeedOutcome};
use giftlink::application::repos::GiftsRepo;
use support::*;

fn seed_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write seed");
    file
}

#[tokio::test]
async fn imports_into_empty_collection() {
    let repo = Arc::new(MemoryGifts::default());
    let file = seed_file(
        r#"[
            {"id": "1", "name": "Sofa", "category": "Living", "age_years": 3},
            {"id": "2", "name": "Kettle", "category": "Kitchen", "date_added": 1690000000}
        ]"#,
    );

    let outcome = GiftSeeder::new(repo.clone())
        .seed_from_file(file.path())
        .await
        .expect("seed succeeds");

    assert_eq!(outcome, SeedOutcome::Inserted(2));
    let kettle = repo.find_gift("2").await.unwrap().expect("kettle stored");
    assert_eq!(kettle.date_added, 1_690_000_000);
    let sofa = repo.find_gift("1").await.unwrap().expect("sofa stored");
    assert!(sofa.date_added > 0);
}

#[tokio::test]
async fn accepts_docs_wrapper() {
    let repo = Arc::new(MemoryGifts::default());
    let file = seed_file(r#"{"docs": [{"name": "Rug"}]}"#);

    let outcome = GiftSeeder::new(repo.clone())
        .seed_from_file(file.path())
        .await
        .expect("seed succeeds");

    assert_eq!(outcome, SeedOutcome::Inserted(1));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn skips_populated_collection() {
    let repo = Arc::new(MemoryGifts::with(sample_gifts()));
    let file = seed_file(r#"[{"id": "9", "name": "Vase"}]"#);

    let outcome = GiftSeeder::new(repo.clone())
        .seed_from_file(file.path())
        .await
        .expect("seed succeeds");

    assert_eq!(outcome, SeedOutcome::SkippedNonEmpty(3));
    assert!(repo.find_gift("9").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_file_reports_path() {
    let repo = Arc::new(MemoryGifts::default());
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");

    let err = GiftSeeder::new(repo)
        .seed_from_file(&path)
        .await
        .expect_err("missing file fails");

    assert!(matches!(err, SeedError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[tokio::test]
async fn invalid_document_inserts_nothing() {
    let repo = Arc::new(MemoryGifts::default());
    let file = seed_file(r#"[{"id": "1", "name": "Ok"}, {"id": "2", "name": ""}]"#);

    let err = GiftSeeder::new(repo.clone())
        .seed_from_file(file.path())
        .await
        .expect_err("blank name fails");

    assert!(matches!(err, SeedError::Domain(_)));
    assert_eq!(repo.len().await, 0);
}
