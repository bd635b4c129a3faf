//! JSON artifact files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info};
use serde::Serialize;

use crate::{
    PageResult,
    export::{self, Exporter},
};

pub const REGIONS_FILE: &str = "regions.json";
pub const TEXT_KNOWLEDGE_FILE: &str = "text_knowledge.json";
pub const GRAPH_KNOWLEDGE_FILE: &str = "graph_knowledge.json";
pub const SIMPLIFIED_FILE: &str = "simplified_output.json";

/// Writes the page artifacts as pretty-printed JSON into a directory.
///
/// The directory is created when missing. Files:
///
/// - `regions.json` - consolidated regions, `{"regions": [...]}`
/// - `text_knowledge.json` - text chunks
/// - `graph_knowledge.json` - the knowledge graph
/// - `simplified_output.json` - text and graphs without geometry
pub struct JsonExporter {
    output_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<(), export::Error> {
        let path = self.output_dir.join(file_name);
        let content = serde_json::to_string_pretty(value).map_err(export::Error::Json)?;
        if let Err(err) = fs::write(&path, content) {
            error!(path:? = path, err:err; "Failed to write artifact");
            return Err(export::Error::Io(err));
        }
        info!(path:? = path; "Wrote artifact");
        Ok(())
    }
}

impl Exporter for JsonExporter {
    fn export_page(&self, page: &PageResult) -> Result<(), export::Error> {
        fs::create_dir_all(&self.output_dir).map_err(export::Error::Io)?;

        let knowledge = page.knowledge();
        self.write_json(REGIONS_FILE, page.consolidated())?;
        self.write_json(TEXT_KNOWLEDGE_FILE, &knowledge.text_knowledge)?;
        self.write_json(GRAPH_KNOWLEDGE_FILE, &knowledge.graph_knowledge)?;
        self.write_json(SIMPLIFIED_FILE, &page.simplified())?;
        Ok(())
    }
}
