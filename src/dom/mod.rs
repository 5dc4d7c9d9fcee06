pub mod query;

pub use query::{accessible_name, element_text, is_visible, Document};
