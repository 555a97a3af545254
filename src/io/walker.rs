use crate::core::{Result, Warning};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "java";

/// Walks a project root and selects the Java sources to analyze.
///
/// Exclude globs are matched against the `/`-joined path relative to the
/// root, so `**/target/**` behaves the same wherever the root lives.
pub struct SourceWalker {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
}

impl SourceWalker {
    pub fn new(root: impl Into<PathBuf>, exclude_patterns: &[String]) -> Result<Self> {
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            root: root.into(),
            exclude,
        })
    }

    /// Relative paths of admitted source files, sorted.
    ///
    /// Unreadable directory entries become warnings, never run failures.
    pub fn walk(&self) -> (Vec<PathBuf>, Vec<Warning>) {
        let mut files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warnings.push(Warning::file_read(&self.root, e.to_string()));
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = match path.strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };
            if self.should_process(&relative) {
                files.push(relative);
            }
        }

        files.sort();
        warnings.sort();
        (files, warnings)
    }

    fn should_process(&self, relative: &Path) -> bool {
        let is_source = relative
            .extension()
            .is_some_and(|ext| ext.to_string_lossy() == SOURCE_EXTENSION);
        if !is_source {
            return false;
        }

        let slashed = super::to_slash_string(relative);
        !self.exclude.iter().any(|pattern| pattern.matches(&slashed))
    }
}

pub fn file_size(path: &Path) -> std::io::Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "class X {}").unwrap();
    }

    #[test]
    fn test_walk_selects_only_java_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/b/B.java");
        touch(dir.path(), "src/a/A.java");
        touch(dir.path(), "README.md");
        touch(dir.path(), "pom.xml");

        let walker = SourceWalker::new(dir.path(), &[]).unwrap();
        let (files, warnings) = walker.walk();

        assert_eq!(
            files,
            vec![PathBuf::from("src/a/A.java"), PathBuf::from("src/b/B.java")]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_walk_applies_exclude_globs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/main/App.java");
        touch(dir.path(), "target/Gen.java");
        touch(dir.path(), "src/main/AppTest.java");

        let exclude = vec!["**/target/**".to_string(), "**/*Test.java".to_string()];
        let walker = SourceWalker::new(dir.path(), &exclude).unwrap();
        let (files, _) = walker.walk();

        assert_eq!(files, vec![PathBuf::from("src/main/App.java")]);
    }

    #[test]
    fn test_exclude_matches_root_level_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "AppTest.java");
        touch(dir.path(), "App.java");

        let exclude = vec!["**/*Test.java".to_string()];
        let walker = SourceWalker::new(dir.path(), &exclude).unwrap();
        let (files, _) = walker.walk();

        assert_eq!(files, vec![PathBuf::from("App.java")]);
    }

    #[test]
    fn test_invalid_pattern_is_rejected_up_front() {
        let dir = TempDir::new().unwrap();
        let result = SourceWalker::new(dir.path(), &["[".to_string()]);
        assert!(result.is_err());
    }
}
