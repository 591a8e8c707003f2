pub mod download_ctx;
pub mod download_flow;

pub use download_ctx::DownloadCtx;
pub use download_flow::DownloadFlow;
