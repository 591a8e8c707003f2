pub mod catalog;
pub mod date_filter;
pub mod extractor;
pub mod path_resolver;

pub use catalog::{BrowserCatalog, CatalogSource};
pub use extractor::{BrowserExtractor, PuzzleExtractor};
