// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Infrastructure adapter for writing exported application files to local storage.

use crate::domain::entities::{ApplicationExport, WrittenFile};
use crate::domain::errors::{ExportError, Result};
use crate::domain::naming::{base_name, relative_export_path};
use crate::ports::artifact_port::ArtifactPort;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Concrete implementation of `ArtifactPort` for the local filesystem.
pub struct LocalArtifactAdapter {
    output_dir: PathBuf,
}

impl LocalArtifactAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Writes `content` to `path`, creating parent directories, and returns
    /// the size and digest of what was written.
    fn write_file(&self, path: &Path, content: &str) -> Result<WrittenFile> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(128 * 1024, file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;

        let written = WrittenFile {
            path: path.display().to_string(),
            bytes: content.len() as u64,
            sha256: format!("{:x}", Sha256::digest(content.as_bytes())),
        };
        debug!("Wrote {} bytes to file {}", written.bytes, written.path);
        Ok(written)
    }
}

impl ArtifactPort for LocalArtifactAdapter {
    fn write_export(
        &self,
        export: &ApplicationExport,
        stem: &str,
        split: bool,
    ) -> Result<Vec<WrittenFile>> {
        let base = base_name(&export.workspace, stem, &export.alias);

        // A non-split export is one script named after the application.
        if !split && export.files.len() == 1 {
            let path = self.output_dir.join(format!("{}.sql", base));
            let written = self.write_file(&path, &export.files[0].contents)?;
            info!(
                "Application {} exported to {} ({} bytes)",
                export.app_id, written.path, written.bytes
            );
            return Ok(vec![written]);
        }

        let root = self.output_dir.join(&base);
        let mut written = Vec::with_capacity(export.files.len());
        for file in &export.files {
            let rel = relative_export_path(&file.name)?;
            written.push(self.write_file(&root.join(rel), &file.contents)?);
        }
        if written.is_empty() {
            return Err(ExportError::ArtifactError(format!(
                "Nothing to write for application {}",
                export.app_id
            )));
        }
        info!(
            "Application {} exported to {} ({} files)",
            export.app_id,
            root.display(),
            written.len()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ExportFile;

    fn export_with(files: Vec<ExportFile>) -> ApplicationExport {
        ApplicationExport {
            app_id: 100,
            workspace: "DEV_WS".into(),
            alias: "HR".into(),
            files,
        }
    }

    #[test]
    fn test_single_file_export() {
        let temp_dir = tempfile::tempdir().unwrap();
        let adapter = LocalArtifactAdapter::new(temp_dir.path());
        let export = export_with(vec![ExportFile {
            name: "f100.sql".into(),
            contents: "prompt --application/set_environment\n".into(),
        }]);

        let written = adapter.write_export(&export, "f100", false).unwrap();
        assert_eq!(written.len(), 1);

        let expected = temp_dir.path().join("dev_ws_f100_hr.sql");
        assert_eq!(written[0].path, expected.display().to_string());
        assert_eq!(
            fs::read_to_string(&expected).unwrap(),
            "prompt --application/set_environment\n"
        );
        assert_eq!(written[0].bytes, 37);
        assert_eq!(written[0].sha256.len(), 64);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let adapter = LocalArtifactAdapter::new(temp_dir.path());
        let target = temp_dir.path().join("dev_ws_f100_hr.sql");
        fs::write(&target, "old content that is longer").unwrap();

        let export = export_with(vec![ExportFile {
            name: "f100.sql".into(),
            contents: "new".into(),
        }]);
        adapter.write_export(&export, "f100", false).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_split_export_preserves_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let adapter = LocalArtifactAdapter::new(temp_dir.path().join("out"));
        let export = export_with(vec![
            ExportFile {
                name: "f100/install.sql".into(),
                contents: "@@application/init.sql\n".into(),
            },
            ExportFile {
                name: "f100/application/pages/page_00001.sql".into(),
                contents: "-- page 1\n".into(),
            },
        ]);

        let written = adapter.write_export(&export, "backup", true).unwrap();
        assert_eq!(written.len(), 2);

        let root = temp_dir.path().join("out").join("dev_ws_backup_hr");
        assert!(root.join("f100/install.sql").exists());
        assert_eq!(
            fs::read_to_string(root.join("f100/application/pages/page_00001.sql")).unwrap(),
            "-- page 1\n"
        );
    }

    #[test]
    fn test_split_export_rejects_escaping_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let adapter = LocalArtifactAdapter::new(temp_dir.path());
        let export = export_with(vec![ExportFile {
            name: "../escape.sql".into(),
            contents: String::new(),
        }]);

        assert!(adapter.write_export(&export, "f100", true).is_err());
        assert!(!temp_dir.path().join("../escape.sql").exists());
    }

    #[test]
    fn test_digest_matches_known_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let adapter = LocalArtifactAdapter::new(temp_dir.path());
        let export = export_with(vec![ExportFile {
            name: "f100.sql".into(),
            contents: "abc".into(),
        }]);
        let written = adapter.write_export(&export, "f100", false).unwrap();
        assert_eq!(
            written[0].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
