use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs;

use crate::error::{RedlineError, Result};

/// Read-only directory of base documents offered to users.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names of the available `.docx` templates, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Template directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_template_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        debug!("Found {} templates in {}", names.len(), self.dir.display());
        Ok(names)
    }

    /// Resolves `name` inside the store. Anything that is not a plain `.docx`
    /// file name is reported as not found.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let plain = !name.contains(['/', '\\']) && name != "." && name != "..";
        if !plain || !is_template_name(name) {
            return Err(RedlineError::TemplateNotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RedlineError::TemplateNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_template_name(name: &str) -> bool {
    !name.starts_with('.') && name.to_ascii_lowercase().ends_with(".docx")
}
