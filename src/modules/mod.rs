pub mod forum;
pub mod importer;
