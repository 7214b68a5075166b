use crate::domain::entities::{ApplicationExport, WrittenFile};
use crate::domain::errors::Result;

/// Port for persisting exported application files.
pub trait ArtifactPort {
    /// Writes every file of `export` using `stem` as the name component.
    /// Returns what was written, in the order the files were returned.
    fn write_export(&self, export: &ApplicationExport, stem: &str, split: bool)
        -> Result<Vec<WrittenFile>>;
}
