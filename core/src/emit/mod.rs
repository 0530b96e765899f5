pub mod binary;
pub mod header;
pub mod report;
