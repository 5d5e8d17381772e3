use crate::domain::mapping::StubMapping;
use crate::domain::ports::MappingSource;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads stub mappings from a JSON file or a directory tree of `*.json` files.
///
/// Each file holds one mapping, an array of mappings, or `{"mappings": [...]}`.
/// Directory entries are visited in file-name order so loading is deterministic.
pub struct JsonMappingSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    Wrapped { mappings: Vec<StubMapping> },
    Many(Vec<StubMapping>),
    Single(Box<StubMapping>),
}

impl JsonMappingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_file(path: &Path) -> Result<Vec<StubMapping>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
        let parsed: MappingFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse mapping file: {}", path.display()))?;
        Ok(match parsed {
            MappingFile::Wrapped { mappings } | MappingFile::Many(mappings) => mappings,
            MappingFile::Single(mapping) => vec![*mapping],
        })
    }

    /// `*.json` files under `dir` in file-name order. Symlinks are not
    /// followed, so a link back to an ancestor cannot repeat the walk.
    fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to read mapping directory: {}", dir.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

impl MappingSource for JsonMappingSource {
    fn load(&self) -> Result<Vec<StubMapping>> {
        if self.path.is_file() {
            return Self::load_file(&self.path);
        }
        if !self.path.is_dir() {
            bail!("Mapping path not found: {}", self.path.display());
        }

        let files = Self::collect_json_files(&self.path)?;
        let mut mappings = Vec::new();
        for file in &files {
            mappings.extend(Self::load_file(file)?);
        }
        Ok(mappings)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
