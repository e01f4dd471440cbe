pub mod file_entry;
pub mod partition;
pub mod program;
pub mod sample;
