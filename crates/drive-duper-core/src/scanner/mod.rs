pub mod walk;

pub use walk::files_with_extension;
