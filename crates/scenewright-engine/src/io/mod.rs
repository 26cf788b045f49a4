use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Script not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid project directory: {0}")]
    InvalidProjectDir(String),
    #[error("Invalid scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Cannot read {path}: {source}")]
    Glob {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<glob::GlobError> for IoError {
    fn from(err: glob::GlobError) -> Self {
        let path = err.path().to_path_buf();
        IoError::Glob {
            path,
            source: err.into(),
        }
    }
}

/// Read a script and return its content
pub fn read_script(relative_path: &RelativePath, project_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(project_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write a script, creating parent directories as needed
pub fn write_script(
    relative_path: &RelativePath,
    project_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(project_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)?;
    log::debug!("wrote {}", absolute_path.display());
    Ok(())
}

/// All `*.md` scripts below `project_root`, sorted by path
pub fn scan_scripts(project_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_project_dir(project_root)?;

    let root = project_root.to_str().ok_or_else(|| {
        IoError::InvalidProjectDir("project path is not valid UTF-8".to_string())
    })?;
    let pattern = format!("{}/**/*.md", glob::Pattern::escape(root));

    let mut files = glob::glob(&pattern)?
        .map(|entry| entry.map_err(IoError::from))
        .filter(|entry| entry.as_ref().map_or(true, |path| path.is_file()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();

    log::debug!("found {} scripts in {}", files.len(), project_root.display());
    Ok(files)
}

pub fn validate_project_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidProjectDir(format!(
            "{} does not exist or is not a directory",
            path.display()
        )));
    }

    Ok(())
}
