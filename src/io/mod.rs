pub mod walker;

pub use walker::{file_size, SourceWalker};

use crate::core::Result;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Render a path with `/` separators regardless of platform.
/// Exported paths and glob matching both rely on this form.
pub fn to_slash_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_slash_string_joins_components() {
        let path = PathBuf::from("src").join("main").join("App.java");
        assert_eq!(to_slash_string(&path), "src/main/App.java");
    }
}
