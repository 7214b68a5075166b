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

//! Infrastructure adapter that drives `apex_export` over a single Oracle connection.

use crate::domain::entities::{ApplicationExport, ExportFile, ExportOptions};
use crate::domain::errors::{ExportError, Result};
use crate::infrastructure::oracle::sql_utils::{build_export_block, SQL_APPLICATION_INFO};
use crate::ports::apex_export_port::ApexExportPort;
use log::debug;
use oracle::sql_type::{OracleType, RefCursor};
use oracle::Connection;

/// Concrete implementation of `ApexExportPort` for Oracle databases.
///
/// Holds the one connection the run uses; it is closed when the adapter drops.
pub struct OracleApexExportAdapter {
    conn: Connection,
}

impl OracleApexExportAdapter {
    /// Connects and tags the session so DBAs can see who is exporting.
    pub fn connect(user: &str, pass: &str, conn_str: &str) -> Result<Self> {
        let conn = Connection::connect(user, pass, conn_str)?;
        conn.set_module("apex-exporter")?;
        Ok(Self { conn })
    }

    /// Looks up the owning workspace and alias of an application.
    fn fetch_application_info(&self, app_id: u32) -> Result<(String, String)> {
        let mut rows = self
            .conn
            .query_as::<(String, Option<String>)>(SQL_APPLICATION_INFO, &[&i64::from(app_id)])?;
        match rows.next() {
            Some(row) => {
                let (workspace, alias) = row?;
                Ok((workspace, alias.unwrap_or_default()))
            }
            None => Err(ExportError::ApplicationNotFound(app_id)),
        }
    }

    /// Runs the export block and drains the REF CURSOR into memory.
    fn fetch_files(&self, app_id: u32, options: &ExportOptions) -> Result<Vec<ExportFile>> {
        let block = build_export_block(options);
        debug!("Export block:\n{}", block);

        let supporting_objects = options
            .with_supporting_objects
            .map(|s| s.as_flag().to_string())
            .unwrap_or_default();

        let mut stmt = self.conn.statement(&block).build()?;
        stmt.execute_named(&[
            ("app_id", &i64::from(app_id)),
            ("supporting_objects", &supporting_objects),
            ("files", &OracleType::RefCursor),
        ])
        .map_err(|e| ExportError::ExtractionError {
            app_id,
            reason: e.to_string(),
        })?;

        let mut cursor: RefCursor = stmt.bind_value("files")?;
        let mut files = Vec::new();
        for row_result in cursor.query()? {
            let row = row_result?;
            let name: String = row.get(0)?;
            let contents: Option<String> = row.get(1)?;
            let contents = contents.unwrap_or_default();
            debug!("Fetched {} ({} bytes)", name, contents.len());
            files.push(ExportFile { name, contents });
        }
        Ok(files)
    }
}

impl ApexExportPort for OracleApexExportAdapter {
    fn export_application(
        &self,
        app_id: u32,
        options: &ExportOptions,
    ) -> Result<ApplicationExport> {
        let (workspace, alias) = self.fetch_application_info(app_id)?;
        debug!(
            "Application {} belongs to workspace {} (alias {})",
            app_id, workspace, alias
        );

        let files = self.fetch_files(app_id, options)?;
        if files.is_empty() {
            return Err(ExportError::ExtractionError {
                app_id,
                reason: "apex_export returned no files".to_string(),
            });
        }

        Ok(ApplicationExport {
            app_id,
            workspace,
            alias,
            files,
        })
    }
}
