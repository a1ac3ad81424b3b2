pub mod digest;
pub mod local_file;

pub use digest::{hash_file, HashAlgorithm, CHUNK_SIZE};
pub use local_file::LocalFile;
