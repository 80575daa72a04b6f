//! Open-government dataset loading.
//!
//! ## Pipeline
//!
//! ```text
//! Candidate URLs
//!     │
//!     ├──> Fetcher (first location that answers wins)
//!     │      └─> raw bytes + source URL
//!     │
//!     ├──> decode_text (UTF-8, Latin-1 fallback)
//!     │      └─> text payload
//!     │
//!     └──> parse_rows (delimiter sniffing, required-column check)
//!            └─> Vec<RawRow>
//! ```

mod decode;
mod error;
mod fetch;
mod table;

pub use decode::decode_text;
pub use error::{DatasetError, FetchAttempt, Result};
pub use fetch::{fetch_first, Fetcher, HttpFetcher, DEFAULT_TIMEOUT};
pub use table::{parse_rows, RawRow};
