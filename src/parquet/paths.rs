//! Output file path management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Name of the integrated luminosity side file.
pub const LUMI_FILE: &str = "lumi.txt";

/// Paths to all files written by one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// Ancestry table, `<name>.parquet`.
    pub table: PathBuf,
    /// Integrated luminosity, one line.
    pub lumi: PathBuf,
    /// Run summary, `<name>_summary.json`.
    pub summary: PathBuf,
}

impl OutputPaths {
    /// Create paths for a run's files in the given directory.
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            table: dir.join(format!("{name}.parquet")),
            lumi: dir.join(LUMI_FILE),
            summary: dir.join(format!("{name}_summary.json")),
        }
    }

    /// All paths with their names.
    pub fn all_paths_with_names(&self) -> [(&'static str, &Path); 3] {
        [
            ("table", self.table.as_path()),
            ("lumi", self.lumi.as_path()),
            ("summary", self.summary.as_path()),
        ]
    }

    /// List existing files with their sizes.
    pub fn file_sizes(&self) -> Vec<(String, u64)> {
        self.all_paths_with_names()
            .into_iter()
            .filter_map(|(name, path)| {
                fs::metadata(path)
                    .ok()
                    .map(|m| (name.to_string(), m.len()))
            })
            .collect()
    }
}

/// Make sure `dir` exists and set aside a previous table of the same name.
///
/// An existing `<name>.parquet` is renamed to `<name>.parquet.old`,
/// replacing any older backup.
pub fn prepare_output_dir(dir: &Path, paths: &OutputPaths) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        return Ok(());
    }
    if !dir.is_dir() {
        bail!(
            "Output path exists but is not a directory: {}",
            dir.display()
        );
    }

    if paths.table.exists() {
        let old_path = paths.table.with_extension("parquet.old");
        if old_path.exists() {
            fs::remove_file(&old_path).with_context(|| {
                format!("Failed to remove old backup: {}", old_path.display())
            })?;
        }
        fs::rename(&paths.table, &old_path).with_context(|| {
            format!("Failed to move aside existing table: {}", paths.table.display())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let paths = OutputPaths::new(Path::new("/out"), "pythia8_nobias_PDFpset13_nue");
        assert_eq!(
            paths.table,
            PathBuf::from("/out/pythia8_nobias_PDFpset13_nue.parquet")
        );
        assert_eq!(paths.lumi, PathBuf::from("/out/lumi.txt"));
        assert_eq!(
            paths.summary,
            PathBuf::from("/out/pythia8_nobias_PDFpset13_nue_summary.json")
        );
    }

    #[test]
    fn test_prepare_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");
        let paths = OutputPaths::new(&dir, "run");
        prepare_output_dir(&dir, &paths).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_prepare_reports_stuck_backup() {
        let tmp = TempDir::new().unwrap();
        let paths = OutputPaths::new(tmp.path(), "run");
        fs::write(&paths.table, b"table").unwrap();
        let old_path = tmp.path().join("run.parquet.old");
        fs::create_dir(&old_path).unwrap();

        let err = prepare_output_dir(tmp.path(), &paths).unwrap_err();
        assert!(err.to_string().contains("run.parquet.old"), "{err}");
        assert!(paths.table.exists());
    }

    #[test]
    fn test_prepare_moves_existing_table() {
        let tmp = TempDir::new().unwrap();
        let paths = OutputPaths::new(tmp.path(), "run");
        fs::write(&paths.table, b"first").unwrap();
        prepare_output_dir(tmp.path(), &paths).unwrap();
        assert!(!paths.table.exists());
        assert_eq!(fs::read(tmp.path().join("run.parquet.old")).unwrap(), b"first");

        fs::write(&paths.table, b"second").unwrap();
        prepare_output_dir(tmp.path(), &paths).unwrap();
        assert_eq!(fs::read(tmp.path().join("run.parquet.old")).unwrap(), b"second");
    }

    #[test]
    fn test_prepare_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not_a_dir");
        fs::write(&file, b"").unwrap();
        assert!(prepare_output_dir(&file, &OutputPaths::new(&file, "run")).is_err());
    }

    #[test]
    fn test_file_sizes_only_existing() {
        let tmp = TempDir::new().unwrap();
        let paths = OutputPaths::new(tmp.path(), "run");
        fs::write(&paths.lumi, b"1.5\n").unwrap();
        assert_eq!(paths.file_sizes(), vec![("lumi".to_string(), 4)]);
    }
}
