use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary project directory
pub fn create_test_project_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file in the project with content
pub fn create_test_file(project_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = project_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}
