use crate::error::Error;
use crate::hasher::{HashAlgorithm, LocalFile};
use crate::remote::{RemoteItem, SearchBackend};
use std::fmt;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Why a candidate was not accepted as a duplicate. These are expected
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    SizeMismatch {
        remote: Option<u64>,
        local: u64,
    },
    HashMismatch {
        algorithm: HashAlgorithm,
        local: String,
        remote: String,
    },
    HashesAbsent,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SizeMismatch { remote, local } => {
                let remote = remote.map_or_else(|| "unknown".to_string(), |s| s.to_string());
                write!(f, "size different -> remote: {} local: {}", remote, local)
            }
            Rejection::HashMismatch {
                algorithm,
                local,
                remote,
            } => write!(
                f,
                "{} hash different -> local: {} remote: {}",
                algorithm, local, remote
            ),
            Rejection::HashesAbsent => write!(f, "hashes absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// Confirms remote search hits against local file content.
pub struct Verifier<'a, S: SearchBackend + ?Sized> {
    search: &'a S,
}

impl<'a, S: SearchBackend + ?Sized> Verifier<'a, S> {
    pub fn new(search: &'a S) -> Self {
        Self { search }
    }

    /// Search the remote index for `file_name` and return the candidates that
    /// are byte-identical to the file at `local_path`.
    ///
    /// When the search yields no candidates the local file is not touched at
    /// all. Search failures and local read failures are returned as errors,
    /// never as an empty match.
    pub fn verify(&self, file_name: &str, local_path: &Path) -> Result<Vec<RemoteItem>, Error> {
        let candidates = self.search.search(file_name)?;
        if candidates.is_empty() {
            debug!("No remote candidates for {}", local_path.display());
            return Ok(Vec::new());
        }
        debug!(
            "{} remote candidate(s) for {}",
            candidates.len(),
            local_path.display()
        );

        let mut local = LocalFile::open(local_path)?;
        Ok(match_candidates(candidates, &mut local)?)
    }
}

/// Keep the candidates that pass [`check_candidate`], in their original order.
pub fn match_candidates(
    candidates: Vec<RemoteItem>,
    local: &mut LocalFile,
) -> io::Result<Vec<RemoteItem>> {
    let mut matched = Vec::new();

    for candidate in candidates {
        match check_candidate(&candidate, local)? {
            Verdict::Accepted => {
                debug!(
                    "Remote item {} ({}) matches {}",
                    candidate.id,
                    candidate.name,
                    local.path().display()
                );
                matched.push(candidate);
            }
            Verdict::Rejected(reason) => {
                info!("Skipped as {}: {}", reason, local.path().display());
            }
        }
    }

    Ok(matched)
}

/// Size must match exactly; then the preferred remote digest (SHA-256 over
/// SHA-1) must equal the local one, ignoring hex case.
pub fn check_candidate(candidate: &RemoteItem, local: &mut LocalFile) -> io::Result<Verdict> {
    if candidate.size != Some(local.size()) {
        return Ok(Verdict::Rejected(Rejection::SizeMismatch {
            remote: candidate.size,
            local: local.size(),
        }));
    }

    let (algorithm, remote_digest) = match candidate.hashes.preferred() {
        Some(preferred) => preferred,
        None => return Ok(Verdict::Rejected(Rejection::HashesAbsent)),
    };

    let local_digest = local.digest(algorithm)?;
    if local_digest.eq_ignore_ascii_case(remote_digest) {
        Ok(Verdict::Accepted)
    } else {
        Ok(Verdict::Rejected(Rejection::HashMismatch {
            algorithm,
            local: local_digest.to_string(),
            remote: remote_digest.to_lowercase(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::hash_file;
    use crate::remote::MockSearch;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_size_mismatch_is_rejected_without_hashing() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "clip.mp4", &[7u8; 2048]);
        let mut local = LocalFile::open(&path).unwrap();

        let candidate = RemoteItem::new("clip.mp4", "1", 4096).with_sha256("00");
        assert_eq!(
            check_candidate(&candidate, &mut local).unwrap(),
            Verdict::Rejected(Rejection::SizeMismatch {
                remote: Some(4096),
                local: 2048
            })
        );
        assert_eq!(local.hash_passes(), 0);
    }

    #[test]
    fn test_unknown_remote_size_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let mut local = LocalFile::open(&path).unwrap();

        let mut candidate = RemoteItem::new("a.jpg", "1", 3);
        candidate.size = None;
        assert!(matches!(
            check_candidate(&candidate, &mut local).unwrap(),
            Verdict::Rejected(Rejection::SizeMismatch { remote: None, .. })
        ));
    }

    #[test]
    fn test_hashes_absent_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let mut local = LocalFile::open(&path).unwrap();

        let candidate = RemoteItem::new("a.jpg", "1", 3);
        assert_eq!(
            check_candidate(&candidate, &mut local).unwrap(),
            Verdict::Rejected(Rejection::HashesAbsent)
        );
        assert_eq!(local.hash_passes(), 0);
    }

    #[test]
    fn test_sha256_match_ignores_case_and_wrong_sha1() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let sha256 = hash_file(&path, HashAlgorithm::Sha256).unwrap();
        let mut local = LocalFile::open(&path).unwrap();

        let candidate = RemoteItem::new("a.jpg", "1", 3)
            .with_sha256(&sha256.to_uppercase())
            .with_sha1("0000000000000000000000000000000000000000");
        assert_eq!(
            check_candidate(&candidate, &mut local).unwrap(),
            Verdict::Accepted
        );
        assert_eq!(local.hash_passes(), 1);
    }

    #[test]
    fn test_sha1_fallback() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let mut local = LocalFile::open(&path).unwrap();

        let good = RemoteItem::new("a.jpg", "1", 3)
            .with_sha1("A9993E364706816ABA3E25717850C26C9CD0D89D");
        assert_eq!(check_candidate(&good, &mut local).unwrap(), Verdict::Accepted);

        let bad = RemoteItem::new("a.jpg", "2", 3).with_sha1("deadbeef");
        assert!(matches!(
            check_candidate(&bad, &mut local).unwrap(),
            Verdict::Rejected(Rejection::HashMismatch {
                algorithm: HashAlgorithm::Sha1,
                ..
            })
        ));
        assert_eq!(local.hash_passes(), 1);
    }

    #[test]
    fn test_sha256_mismatch_does_not_fall_back_to_sha1() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let mut local = LocalFile::open(&path).unwrap();

        let candidate = RemoteItem::new("a.jpg", "1", 3)
            .with_sha256("ffff")
            .with_sha1("a9993e364706816aba3e25717850c26c9cd0d89d");
        assert!(matches!(
            check_candidate(&candidate, &mut local).unwrap(),
            Verdict::Rejected(Rejection::HashMismatch {
                algorithm: HashAlgorithm::Sha256,
                ..
            })
        ));
    }

    #[test]
    fn test_no_candidates_skips_local_file_entirely() {
        let dir = tempdir().unwrap();
        let search = MockSearch::new();
        let verifier = Verifier::new(&search);

        // The path does not exist; touching it would be an IO error.
        let result = verifier
            .verify("ghost.jpg", &dir.path().join("ghost.jpg"))
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(search.call_count(), 1);
    }

    #[test]
    fn test_all_matching_candidates_returned_with_single_hash_pass() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let sha256 = hash_file(&path, HashAlgorithm::Sha256).unwrap();
        let mut local = LocalFile::open(&path).unwrap();

        let candidates = vec![
            RemoteItem::new("a.jpg", "1", 3).with_sha256(&sha256),
            RemoteItem::new("a.jpg", "2", 99).with_sha256(&sha256),
            RemoteItem::new("a.jpg", "3", 3).with_sha256("bad"),
            RemoteItem::new("a.jpg", "4", 3).with_sha256(&sha256),
        ];
        let matched = match_candidates(candidates, &mut local).unwrap();
        let ids: Vec<&str> = matched.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(local.hash_passes(), 1);
    }

    #[test]
    fn test_search_failure_propagates() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "a.jpg", b"abc");
        let search = MockSearch::new();
        search.fail_on("a.jpg", "unauthorized");

        let err = Verifier::new(&search).verify("a.jpg", &path).unwrap_err();
        assert!(matches!(err, Error::Search { .. }));
    }

    #[test]
    fn test_missing_local_file_with_candidates_is_io_error() {
        let dir = tempdir().unwrap();
        let search = MockSearch::new();
        search.add_item("gone.jpg", RemoteItem::new("gone.jpg", "1", 3));

        let err = Verifier::new(&search)
            .verify("gone.jpg", &dir.path().join("gone.jpg"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
