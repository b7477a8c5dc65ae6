pub mod enrichment;
pub mod import;
