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

//! Output naming rules.
//!
//! Files are named `<workspace>_<stem>_<alias>`, lowercased around the stem,
//! so that exports from several workspaces can share one directory.

use crate::domain::errors::{ExportError, Result};
use std::path::{Component, Path, PathBuf};

/// Picks the stem for the application at `index`.
///
/// With zero or one output names every application gets `f<app_id>`; a
/// single name cannot be shared without collisions.
pub fn output_stem(app_id: u32, index: usize, output_names: &[String]) -> String {
    if output_names.len() <= 1 {
        return format!("f{}", app_id);
    }
    output_names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("f{}", app_id))
}

/// `<workspace>_<stem>_<alias>`, without extension.
pub fn base_name(workspace: &str, stem: &str, alias: &str) -> String {
    format!(
        "{}_{}_{}",
        workspace.to_lowercase(),
        stem,
        alias.to_lowercase()
    )
}

/// Validates a file name returned by a split export and turns it into a
/// relative path. Absolute names and `..` components are refused.
pub fn relative_export_path(name: &str) -> Result<PathBuf> {
    let path = Path::new(name);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(ExportError::ArtifactError(format!(
                    "Refusing to write export file outside the output directory: {}",
                    name
                )))
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(ExportError::ArtifactError(format!(
            "Export file has an empty name: '{}'",
            name
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem(100, 0, &[]), "f100");
        assert_eq!(output_stem(100, 0, &["backup".to_string()]), "f100");
        let names = vec!["hr".to_string(), "crm".to_string()];
        assert_eq!(output_stem(100, 0, &names), "hr");
        assert_eq!(output_stem(200, 1, &names), "crm");
        assert_eq!(output_stem(300, 2, &names), "f300");
    }

    #[test]
    fn test_base_name_lowercases_workspace_and_alias() {
        assert_eq!(base_name("DEV_WS", "f100", "HR_APP"), "dev_ws_f100_hr_app");
        assert_eq!(base_name("DEV", "MyStem", "A"), "dev_MyStem_a");
    }

    #[test]
    fn test_relative_export_path() {
        assert_eq!(
            relative_export_path("f100/application/pages/page_00001.sql").unwrap(),
            PathBuf::from("f100/application/pages/page_00001.sql")
        );
        assert_eq!(
            relative_export_path("./f100.sql").unwrap(),
            PathBuf::from("f100.sql")
        );
        assert!(relative_export_path("../etc/passwd").is_err());
        assert!(relative_export_path("/tmp/x.sql").is_err());
        assert!(relative_export_path("").is_err());
    }
}
