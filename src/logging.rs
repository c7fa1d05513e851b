use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::app_dirs::AppDirs;

/// Route `log` output to a file so it never draws over the terminal UI.
///
/// Honours `RUST_LOG`; defaults to `warn`. Returns without installing a
/// logger if the log file cannot be opened.
pub fn init() {
    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = init_with_path(&path) {
            eprintln!("logging disabled: {}: {e}", path.display());
        }
    }
}

pub fn init_with_path(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();

    log::info!("archery mind trainer starting");
    Ok(())
}
