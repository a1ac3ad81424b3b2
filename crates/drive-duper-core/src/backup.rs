use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Copy `path` into `backup_root`, keeping its location relative to
/// `source_root`. Permissions and access/modification times are carried over
/// and the copy is flushed to disk before returning.
pub fn backup_file(path: &Path, source_root: &Path, backup_root: &Path) -> io::Result<PathBuf> {
    let relative = path.strip_prefix(source_root).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} is not under {}",
                path.display(),
                source_root.display()
            ),
        )
    })?;
    let destination = backup_root.join(relative);

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(path, &destination)?;
    copy_times(path, &destination)?;

    info!("Backed up: {} to {}", path.display(), destination.display());
    Ok(destination)
}

fn copy_times(source: &Path, destination: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // fs::copy already carried over permissions, so a read-only source gives a
    // read-only copy; the owner can still set times through a read handle.
    let file = match File::options().write(true).open(destination) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => File::open(destination)?,
        Err(err) => return Err(err),
    };
    file.set_times(times)?;
    file.sync_all()
}
