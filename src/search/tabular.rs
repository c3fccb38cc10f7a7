//! Backends over already computed tabular output

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{Direction, HitStream, SearchBackend};

/// Two outfmt 6 files produced elsewhere, one per direction.
#[derive(Debug, Clone)]
pub struct TabularFiles {
    pub forward: PathBuf,
    pub reverse: PathBuf,
}

impl TabularFiles {
    pub fn new(forward: impl Into<PathBuf>, reverse: impl Into<PathBuf>) -> Self {
        Self {
            forward: forward.into(),
            reverse: reverse.into(),
        }
    }

    fn path(&self, direction: Direction) -> &PathBuf {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}

impl SearchBackend for TabularFiles {
    fn name(&self) -> &str {
        "tabular"
    }

    fn search(&self, direction: Direction) -> Result<HitStream> {
        let path = self.path(direction);
        let file = File::open(path)
            .with_context(|| format!("Failed to open {} hits: {}", direction, path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn stream_name(&self, direction: Direction) -> String {
        self.path(direction).display().to_string()
    }
}

/// Tabular text held in memory.
#[derive(Debug, Clone, Default)]
pub struct TabularText {
    pub forward: String,
    pub reverse: String,
}

impl TabularText {
    pub fn new(forward: impl Into<String>, reverse: impl Into<String>) -> Self {
        Self {
            forward: forward.into(),
            reverse: reverse.into(),
        }
    }
}

impl SearchBackend for TabularText {
    fn name(&self) -> &str {
        "text"
    }

    fn search(&self, direction: Direction) -> Result<HitStream> {
        let text = match direction {
            Direction::Forward => self.forward.clone(),
            Direction::Reverse => self.reverse.clone(),
        };
        Ok(Box::new(Cursor::new(text.into_bytes())))
    }
}
