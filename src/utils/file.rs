use anyhow::{Context, Result};
use std::path::Path;

/// Creates the directory that will hold `file_path` if it doesn't exist
///
/// # Arguments
/// * `file_path` - Path of a file about to be written
pub fn ensure_parent_dir(file_path: &str) -> Result<()> {
    match Path::new(file_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => std::fs::create_dir_all(dir)
            .context(format!("Failed to create directory {}", dir.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_needs_no_directory() {
        assert!(ensure_parent_dir("Rolex_DataSheet.xlsx").is_ok());
    }

    #[test]
    fn nested_directories_are_created() {
        let dir = std::env::temp_dir().join(format!("watch_catalog_dirs_{}", std::process::id()));
        let file = dir.join("a/b/out.xlsx");
        ensure_parent_dir(file.to_str().unwrap()).unwrap();
        assert!(dir.join("a/b").is_dir());
        std::fs::remove_dir_all(dir).ok();
    }
}
