//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::commands::run_flatten;
use super::{BaselineArg, CliError, FlattenCommand, OutputFormat};

/// Two tight pairs that merge late: points `{0, 1}` and `{2, 3}`.
pub(super) const TWO_PAIRS: &str = "0 1 1.0 2\n2 3 1.0 2\n4 5 5.0 4\n";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_linkage_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn flatten_command(path: &Path) -> FlattenCommand {
    FlattenCommand {
        path: path.to_path_buf(),
        stiffness: 1.0,
        root_baseline: BaselineArg::MaxDistance,
        root_distance: None,
        format: OutputFormat::Text,
        lp_output: None,
    }
}

pub(super) fn run_flatten_expecting_error(command: FlattenCommand, panic_msg: &str) -> CliError {
    match run_flatten(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
