//! File collection and source decoding

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use std::fs;

/// Collect files with one of `extensions` under `paths`.
///
/// Directories are walked with gitignore filtering; explicit file paths are
/// always included whatever their extension.
pub fn collect_source_files(
    paths: &[Utf8PathBuf],
    extensions: &[&str],
) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = fs::metadata(path).with_context(|| format!("cannot access {path}"))?;
        if metadata.is_file() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkBuilder::new(path).standard_filters(true).build();
        let mut found = Vec::new();
        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let p = Utf8PathBuf::from_path_buf(entry.path().to_owned())
                .map_err(|_| anyhow::anyhow!("non-utf8 path: {}", entry.path().display()))?;
            if p.extension().is_some_and(|ext| extensions.contains(&ext)) {
                found.push(p);
            }
        }
        // walk order depends on the filesystem
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// How a source file was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

/// Decoded contents of one file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub text: String,
    pub encoding: Encoding,
}

impl SourceFile {
    /// Decode bytes as UTF-8, falling back to Latin-1.
    #[must_use]
    pub fn decode(path: &Utf8Path, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self {
                text,
                encoding: Encoding::Utf8,
            },
            Err(err) => {
                tracing::warn!(%path, "not valid UTF-8, reading as Latin-1");
                Self {
                    text: err.into_bytes().iter().map(|&b| char::from(b)).collect(),
                    encoding: Encoding::Latin1,
                }
            }
        }
    }

    pub fn read(path: &Utf8Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("cannot read {path}"))?;
        Ok(Self::decode(path, bytes))
    }

    /// Encode `text` back into this file's encoding.
    pub fn encode(&self, path: &Utf8Path, text: &str) -> Result<Vec<u8>> {
        match self.encoding {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)))
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| anyhow::anyhow!("{path}: text no longer fits Latin-1")),
        }
    }
}
