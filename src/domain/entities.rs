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

//! # Domain Entities
//!
//! The nouns of the exporter: what we ask `apex_export` for (`ExportOptions`),
//! what it hands back (`ApplicationExport`, `ExportFile`), and how each
//! application's run is reported (`ExportResult`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of `p_with_supporting_objects`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SupportingObjects {
    /// Export supporting object definitions.
    #[serde(alias = "Y", alias = "y", alias = "yes")]
    Yes,
    /// Do not export supporting object definitions.
    #[serde(alias = "N", alias = "n", alias = "no")]
    No,
    /// Export them and install on import.
    #[serde(alias = "I", alias = "i", alias = "install")]
    Install,
}

impl SupportingObjects {
    /// The single-letter flag `apex_export` expects.
    pub fn as_flag(&self) -> &'static str {
        match self {
            SupportingObjects::Yes => "Y",
            SupportingObjects::No => "N",
            SupportingObjects::Install => "I",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "Y" | "YES" => Some(SupportingObjects::Yes),
            "N" | "NO" => Some(SupportingObjects::No),
            "I" | "INSTALL" => Some(SupportingObjects::Install),
            _ => None,
        }
    }
}

impl fmt::Display for SupportingObjects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

/// Switches passed through to `apex_export.get_application`.
///
/// Every flag defaults to `false`, matching the package defaults, so an empty
/// `export_options` section produces the same file as a bare call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    /// Split the export into one file per component.
    pub split: bool,
    pub with_date: bool,
    pub with_ir_public_reports: bool,
    pub with_ir_private_reports: bool,
    pub with_ir_notifications: bool,
    pub with_translations: bool,
    pub with_pkg_app_mapping: bool,
    pub with_original_ids: bool,
    pub with_no_subscriptions: bool,
    pub with_comments: bool,
    pub with_acl_assignments: bool,
    pub with_supporting_objects: Option<SupportingObjects>,
}

/// One file of an export as returned by `apex_t_export_files`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// Name assigned by APEX, e.g. `f100.sql` or `f100/application/pages/page_00001.sql`.
    pub name: String,
    pub contents: String,
}

/// Everything the database returned for one application.
#[derive(Debug, Clone)]
pub struct ApplicationExport {
    pub app_id: u32,
    pub workspace: String,
    pub alias: String,
    pub files: Vec<ExportFile>,
}

impl ApplicationExport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.contents.len() as u64).sum()
    }
}

/// A file that landed on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WrittenFile {
    pub path: String,
    pub bytes: u64,
    pub sha256: String,
}

/// Report card for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub app_id: u32,
    pub workspace: Option<String>,
    pub alias: Option<String>,
    pub files: Vec<WrittenFile>,
    /// How long it took (in seconds).
    pub duration: f64,
    /// Either "SUCCESS" or "FAILED".
    pub status: String,
    pub error: Option<String>,
}

impl ExportResult {
    pub fn success(export: &ApplicationExport, files: Vec<WrittenFile>, duration: f64) -> Self {
        Self {
            app_id: export.app_id,
            workspace: Some(export.workspace.clone()),
            alias: Some(export.alias.clone()),
            files,
            duration,
            status: "SUCCESS".to_string(),
            error: None,
        }
    }

    pub fn failure(app_id: u32, duration: f64, error: String) -> Self {
        Self {
            app_id,
            workspace: None,
            alias: None,
            files: Vec::new(),
            duration,
            status: "FAILED".to_string(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "SUCCESS"
    }

    pub fn bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}
