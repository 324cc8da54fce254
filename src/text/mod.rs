//! Article-text extraction and the cleaning applied before sentiment
//! scoring.

pub mod clean;
pub mod extract;

pub use clean::{collapse_newlines, preprocess_text, starts_with_block_marker};
pub use extract::{ExtractText, Lang, ScraperExtractor};
