use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Name of the secrets file looked up next to the executable.
pub const ENV_FILE_NAME: &str = ".env";

pub fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(profile) = env::var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }
    let drive = env::var("HOMEDRIVE").ok();
    let path = env::var("HOMEPATH").ok();
    match (drive, path) {
        (Some(drive), Some(path)) => Some(PathBuf::from(format!("{drive}{path}"))),
        _ => None,
    }
}

/// Directory containing the running executable.
pub fn exe_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("locate current executable")?;
    let dir = exe
        .parent()
        .with_context(|| format!("executable has no parent dir: {}", exe.display()))?;
    Ok(dir.to_path_buf())
}

pub fn default_env_path() -> Result<PathBuf> {
    Ok(exe_dir()?.join(ENV_FILE_NAME))
}
