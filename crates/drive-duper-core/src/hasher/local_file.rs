use super::digest::{hash_file, HashAlgorithm};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A local file under verification. Size is read once on open; digests are
/// computed on first request and reused for every later candidate.
#[derive(Debug)]
pub struct LocalFile {
    path: PathBuf,
    size: u64,
    sha256: Option<String>,
    sha1: Option<String>,
    hash_passes: usize,
}

impl LocalFile {
    pub fn open(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            sha256: None,
            sha1: None,
            hash_passes: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of full reads of the file so far.
    pub fn hash_passes(&self) -> usize {
        self.hash_passes
    }

    pub fn digest(&mut self, algorithm: HashAlgorithm) -> io::Result<&str> {
        let slot = match algorithm {
            HashAlgorithm::Sha256 => &mut self.sha256,
            HashAlgorithm::Sha1 => &mut self.sha1,
        };

        if slot.is_none() {
            let digest = hash_file(&self.path, algorithm)?;
            trace!("{} for {}: {}", algorithm, self.path.display(), digest);
            self.hash_passes += 1;
            *slot = Some(digest);
        }

        Ok(slot.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_each_digest_computed_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, "abc").unwrap();

        let mut file = LocalFile::open(&path).unwrap();
        assert_eq!(file.size(), 3);
        assert_eq!(file.name(), "photo.jpg");
        assert_eq!(file.hash_passes(), 0);

        let first = file.digest(HashAlgorithm::Sha256).unwrap().to_string();
        let second = file.digest(HashAlgorithm::Sha256).unwrap().to_string();
        assert_eq!(first, second);
        assert_eq!(file.hash_passes(), 1);

        file.digest(HashAlgorithm::Sha1).unwrap();
        file.digest(HashAlgorithm::Sha1).unwrap();
        assert_eq!(file.hash_passes(), 2);
    }

    #[test]
    fn test_open_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = LocalFile::open(dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
