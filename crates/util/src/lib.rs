pub mod text_processing;

pub use text_processing::{collapse_whitespace, contains_any_keyword, redact_sensitive, trimmed_char_count, truncate_for_log};
