use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Ensures that a directory exists at the specified path, creating it and any
/// missing parents if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn home_dir() -> Result<PathBuf> {
    let dir = std::env::var_os("HOME") // Unix/Linux/macOS
        .or_else(|| std::env::var_os("USERPROFILE")) // Windows
        .map(PathBuf::from);
    match dir {
        Some(dir) => Ok(dir),
        None => {
            bail!("could not determine home directory, please specify config path manually")
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    if is_root() {
        return Ok(PathBuf::from("/etc/topicgate"));
    }

    let home = home_dir()?;
    Ok(home.join(".config").join("topicgate"))
}

pub fn data_dir() -> Result<PathBuf> {
    if is_root() {
        return Ok(PathBuf::from("/var/lib/topicgate"));
    }

    let home = home_dir()?;

    if cfg!(windows) {
        return Ok(home.join("AppData").join("topicgate"));
    }

    Ok(home.join(".local").join("share").join("topicgate"))
}

#[cfg(unix)]
fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(windows)]
fn is_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_ensure_dir_exists() {
        let base_path = env::temp_dir().join("_topicgate_test_ensure_dir");
        let _ = fs::remove_dir_all(&base_path);

        let new_dir = base_path.join("_test_dir");
        ensure_dir_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());

        let nested_dir = base_path.join("parent/child/grandchild");
        ensure_dir_exists(&nested_dir).unwrap();
        assert!(nested_dir.is_dir());

        // Existing directory is fine
        ensure_dir_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());

        fs::remove_dir_all(&base_path).unwrap();
    }
}
