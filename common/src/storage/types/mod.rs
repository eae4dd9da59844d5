pub mod index_document;
pub mod language;
