use std::env;
use std::path::{Path, PathBuf};

// =============================================================================
// Core Path Functions
// =============================================================================

/// Get user home directory
/// NEVER use "~" as Rust's std::fs does not expand it
pub fn get_home_dir() -> Result<PathBuf, String> {
    dirs::home_dir().ok_or_else(|| "Cannot determine home directory".to_string())
}

/// Get PropDesk data root directory
/// Priority:
/// 1. PROPDESK_DATA_ROOT environment variable
/// 2. Default to ~/.propdesk
pub fn get_data_root() -> Result<PathBuf, String> {
    if let Ok(data_root) = env::var("PROPDESK_DATA_ROOT") {
        let path = PathBuf::from(&data_root);
        ensure_dir(&path)?;
        return Ok(path);
    }

    let default_path = get_home_dir()?.join(".propdesk");
    ensure_dir(&default_path)?;
    Ok(default_path)
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    }
    Ok(())
}

// =============================================================================
// Config Directory
// =============================================================================

/// Returns: <data_root>/config
pub fn config_dir(data_root: &Path) -> PathBuf {
    data_root.join("config")
}

/// Returns: <data_root>/config/propdesk.yaml
pub fn config_file_path(data_root: &Path) -> PathBuf {
    config_dir(data_root).join("propdesk.yaml")
}

// =============================================================================
// Records Directory
// =============================================================================

/// Directory holding one JSONL file per record collection
/// Returns: <data_root>/data
pub fn records_dir(data_root: &Path) -> PathBuf {
    data_root.join("data")
}

/// Returns: <data_root>/data/{collection}.jsonl
pub fn collection_path(records_dir: &Path, collection: &str) -> PathBuf {
    records_dir.join(format!("{}.jsonl", collection))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_nested_under_data_root() {
        let root = PathBuf::from("/srv/propdesk");
        assert_eq!(
            config_file_path(&root),
            PathBuf::from("/srv/propdesk/config/propdesk.yaml")
        );
        assert_eq!(
            collection_path(&records_dir(&root), "leads"),
            PathBuf::from("/srv/propdesk/data/leads.jsonl")
        );
    }

    #[test]
    fn test_home_dir_is_absolute() {
        if let Ok(home) = get_home_dir() {
            assert!(!home.to_string_lossy().contains('~'));
        }
    }
}
