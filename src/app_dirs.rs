use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("votebox");
            Some(state_dir.join("votebox.log"))
        } else {
            ProjectDirs::from("", "", "votebox")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("votebox.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_ends_with_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("votebox.log"));
        }
    }
}
