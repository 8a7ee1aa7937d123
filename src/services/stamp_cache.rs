use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Records the modification time of processed sources in
/// `<dir>/<name>.timestamp` so unchanged inputs can be skipped.
#[derive(Debug, Clone)]
pub struct StampCache {
    dir: PathBuf,
}

impl StampCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stamp_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.timestamp"))
    }

    /// True when the stamp for `name` holds exactly the current mtime of
    /// `source`.
    pub fn is_fresh(&self, source: &Path, name: &str) -> io::Result<bool> {
        let mtime = mtime_secs(source)?;
        match fs::read_to_string(self.stamp_path(name)) {
            Ok(content) => Ok(content
                .lines()
                .next()
                .and_then(|line| line.trim().parse::<f64>().ok())
                .is_some_and(|stamp| stamp == mtime)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Store the current mtime of `source` as the stamp for `name`.
    pub fn record(&self, source: &Path, name: &str) -> io::Result<()> {
        let mtime = mtime_secs(source)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.stamp_path(name), mtime.to_string())
    }
}

/// Modification time as fractional seconds since the Unix epoch.
fn mtime_secs(path: &Path) -> io::Result<f64> {
    let modified = fs::metadata(path)?.modified()?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(since_epoch.as_secs_f64())
}
