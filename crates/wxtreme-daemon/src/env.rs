//! `.env` loading for local runs

use std::path::{Path, PathBuf};

/// Load a `.env` file into the process environment.
///
/// Variables already set in the process keep their values. With no `path`
/// the file is searched for from the working directory upwards. Returns the
/// file that was read, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenv::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenv::dotenv().ok(),
    }
}
