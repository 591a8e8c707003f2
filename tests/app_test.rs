use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use samurai_sudoku_downloader::error::{CatalogFetchError, ExtractionError};
use samurai_sudoku_downloader::models::{Difficulty, Outcome};
use samurai_sudoku_downloader::services::extractor::write_atomically;
use samurai_sudoku_downloader::{
    App, AppError, CancelFlag, CatalogSource, Config, PuzzleDescriptor, PuzzleExtractor,
    RunRequest,
};
use tokio_test::{assert_err, assert_ok};

struct FakeCatalog {
    puzzles: Option<Vec<PuzzleDescriptor>>,
    fetches: AtomicUsize,
}

impl FakeCatalog {
    fn with(puzzles: Vec<PuzzleDescriptor>) -> Self {
        Self {
            puzzles: Some(puzzles),
            fetches: AtomicUsize::new(0),
        }
    }

    fn broken() -> Self {
        Self {
            puzzles: None,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<PuzzleDescriptor>, CatalogFetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.puzzles
            .clone()
            .ok_or_else(|| CatalogFetchError::LayoutChanged {
                url: "https://example.invalid/classic/".to_string(),
            })
    }
}

#[derive(Default)]
struct CountingExtractor {
    calls: AtomicUsize,
}

#[async_trait]
impl PuzzleExtractor for CountingExtractor {
    async fn extract(
        &self,
        _descriptor: &PuzzleDescriptor,
        destination: &Path,
    ) -> Result<(), ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        write_atomically(destination, b"%PDF-1.4").await
    }
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// 归档顺序是新到旧，和真实页面一致
fn archive() -> Vec<PuzzleDescriptor> {
    vec![
        PuzzleDescriptor::new(date(10, 31), Difficulty::Hard, "31"),
        PuzzleDescriptor::new(date(10, 30), Difficulty::Medium, "30"),
        PuzzleDescriptor::new(date(10, 29), Difficulty::Easy, "29"),
        PuzzleDescriptor::new(date(9, 15), Difficulty::Hard, "15"),
    ]
}

fn request(start: NaiveDate, end: NaiveDate, dir: &Path) -> RunRequest {
    RunRequest {
        start,
        end,
        output_dir: dir.join("puzzles"),
    }
}

#[tokio::test]
async fn test_invalid_range_fails_before_any_io() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(FakeCatalog::with(archive()));
    let extractor = Arc::new(CountingExtractor::default());
    let app = App::with_collaborators(Config::default(), catalog.clone(), extractor.clone());

    let req = request(date(10, 31), date(10, 1), dir.path());
    let err = assert_err!(app.run(&req, None, &CancelFlag::new()).await);

    assert!(matches!(err, AppError::InvalidRange(_)));
    assert_eq!(catalog.fetches.load(Ordering::SeqCst), 0);
    assert!(!req.output_dir.exists());
}

#[tokio::test]
async fn test_catalog_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = Arc::new(CountingExtractor::default());
    let app = App::with_collaborators(
        Config::default(),
        Arc::new(FakeCatalog::broken()),
        extractor.clone(),
    );

    let req = request(date(10, 1), date(10, 31), dir.path());
    let err = assert_err!(app.run(&req, None, &CancelFlag::new()).await);

    assert!(matches!(
        err,
        AppError::CatalogFetch(CatalogFetchError::LayoutChanged { .. })
    ));
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_range_returns_empty_summary() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = Arc::new(CountingExtractor::default());
    let app = App::with_collaborators(
        Config::default(),
        Arc::new(FakeCatalog::with(archive())),
        extractor.clone(),
    );

    let req = request(date(1, 1), date(1, 31), dir.path());
    let summary = assert_ok!(app.run(&req, None, &CancelFlag::new()).await);

    assert_eq!(summary.total, 0);
    assert!(summary.complete);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_downloads_only_puzzles_in_range_sorted_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = Arc::new(CountingExtractor::default());
    let app = App::with_collaborators(
        Config::default(),
        Arc::new(FakeCatalog::with(archive())),
        extractor.clone(),
    );

    let req = request(date(10, 29), date(10, 31), dir.path());
    let summary = assert_ok!(app.run(&req, None, &CancelFlag::new()).await);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 3);
    assert!(summary.results.iter().all(|r| r.outcome == Outcome::Success));

    let dates: Vec<NaiveDate> = summary
        .results
        .iter()
        .map(|r| r.task.descriptor.date)
        .collect();
    assert_eq!(dates, vec![date(10, 29), date(10, 30), date(10, 31)]);

    // 第二次运行全部跳过
    let again = assert_ok!(app.run(&req, None, &CancelFlag::new()).await);
    assert_eq!(again.skipped, 3);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 3);
}
