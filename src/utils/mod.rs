// Utility helpers

pub mod file;

pub use file::FileUtils;
