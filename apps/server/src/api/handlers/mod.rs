pub mod operations;
pub mod static_files;
pub mod system;
