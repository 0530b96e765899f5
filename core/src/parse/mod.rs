pub mod cursor;
pub mod document;
#[cfg(test)]
pub(crate) mod testdata;

pub use cursor::FeatureCursor;
pub use document::CascadeDocument;
