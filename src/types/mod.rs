mod document;
mod payload;

pub use document::Document;
pub use payload::{DocumentPayload, FieldError, DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN};
