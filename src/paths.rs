use std::io;
use std::path::{Path, PathBuf};

/// Built output produced by the viewer's bundler.
pub const DIST_DIR: &str = "dist";

/// Directory holding the running executable. Serving roots and TLS material
/// are looked up relative to it.
pub fn program_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        )
    })
}

/// Prefers `<program_dir>/dist` when it exists, otherwise the program
/// directory itself (development tree).
pub fn select_serving_root(program_dir: &Path) -> PathBuf {
    let dist = program_dir.join(DIST_DIR);
    if dist.is_dir() {
        dist
    } else {
        program_dir.to_path_buf()
    }
}
