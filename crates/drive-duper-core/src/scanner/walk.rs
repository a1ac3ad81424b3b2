use glob::{glob_with, MatchOptions, Pattern};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, trace};

/// Recursively find regular files under `root` ending in `.ext`, checking the
/// lowercase spelling first and then the uppercase one. Symlinks and
/// directories are skipped, and a path is yielded at most once even when the
/// filesystem matches both spellings.
pub fn files_with_extension(root: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files: Vec<PathBuf> = Vec::new();

    let mut spellings = vec![ext.to_lowercase()];
    let upper = ext.to_uppercase();
    if upper != spellings[0] {
        spellings.push(upper);
    }

    for spelling in &spellings {
        for path in glob_files(root, spelling)? {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn glob_files(root: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(&root.to_string_lossy()),
        Pattern::escape(ext)
    );
    trace!("Enumerating {}", pattern);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob_with(&pattern, options).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid glob pattern '{}': {}", pattern, err),
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                error!("Error reading {}: {}", err.path().display(), err.error());
                continue;
            }
        };

        match fs::symlink_metadata(&path) {
            Ok(metadata) if metadata.file_type().is_file() => files.push(path),
            Ok(_) => trace!("Skipping non-regular file {}", path.display()),
            Err(err) => error!("Error getting metadata for {}: {}", path.display(), err),
        }
    }

    Ok(files)
}
