pub mod archive_date;
pub mod download;
pub mod puzzle;

pub use archive_date::parse_archive_date;
pub use download::{DownloadResult, DownloadTask, Outcome, RunSummary, SkipReason};
pub use puzzle::{Difficulty, PuzzleDescriptor};
