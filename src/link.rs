use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Subdirectory of the serving root the viewer loads scene files from.
pub const DATA_DIR: &str = "data";

/// Files exported by the reconstruction pipeline.
pub const SCENE_FILES: [&str; 2] = ["scene.ply", "scene.4d.bin"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked { source: PathBuf, dest: PathBuf },
    Missing { source: PathBuf },
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::Linked { source, dest } => {
                write!(f, "Linked: {} -> {}", source.display(), dest.display())
            }
            LinkOutcome::Missing { source } => {
                write!(f, "Warning: {} not found", source.display())
            }
        }
    }
}

/// Symlinks each scene file found in `source_dir` into
/// `<serving_root>/data/`, replacing whatever entry was there before.
/// Scene files absent from `source_dir` leave their destination untouched.
pub fn link_scene_data(serving_root: &Path, source_dir: &Path) -> Result<Vec<LinkOutcome>> {
    let data_dir = serving_root.join(DATA_DIR);
    std::fs::create_dir_all(&data_dir).map_err(|source| Error::Link {
        path: data_dir.clone(),
        source,
    })?;
    let source_dir = absolute(source_dir)?;

    let mut outcomes = Vec::with_capacity(SCENE_FILES.len());
    for name in SCENE_FILES {
        let source = source_dir.join(name);
        let dest = data_dir.join(name);

        if !source.exists() {
            log::debug!("{} not found, leaving {} as is", source.display(), dest.display());
            outcomes.push(LinkOutcome::Missing { source });
            continue;
        }

        replace_link(&source, &dest).map_err(|err| Error::Link {
            path: dest.clone(),
            source: err,
        })?;
        log::debug!("linked {} -> {}", source.display(), dest.display());
        outcomes.push(LinkOutcome::Linked { source, dest });
    }

    Ok(outcomes)
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(_) if path.is_absolute() => Ok(path.to_path_buf()),
        Err(_) => Ok(std::env::current_dir()?.join(path)),
    }
}

fn replace_link(source: &Path, dest: &Path) -> io::Result<()> {
    // symlink_metadata also sees dangling links, which exists() does not
    if dest.symlink_metadata().is_ok() {
        std::fs::remove_file(dest)?;
    }
    symlink(source, dest)
}

#[cfg(unix)]
fn symlink(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn symlink(source: &Path, dest: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, dest)
}
