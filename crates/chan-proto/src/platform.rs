use std::path::PathBuf;

const APP_DIR: &str = "chandash";

pub fn data_dir() -> PathBuf {
    // Keep ~/.local/share on macOS too, same layout as Linux.
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(temp_dir)
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".config")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(temp_dir)
            .join(APP_DIR)
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

/// Default location of the channel snapshot written by the fetcher.
pub fn default_snapshot_path() -> PathBuf {
    data_dir().join("channels.json")
}

pub fn log_path() -> PathBuf {
    data_dir().join("chandash.log")
}
