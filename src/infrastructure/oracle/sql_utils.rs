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

//! SQL and PL/SQL text used by the Oracle adapter.
//!
//! PL/SQL `BOOLEAN` cannot be bound from a client before 23ai, so boolean
//! switches are rendered as literals. Everything user supplied is bound.

use crate::domain::entities::ExportOptions;

pub const SQL_APPLICATION_INFO: &str = "
    SELECT a.workspace, a.alias
      FROM apex_applications a
     WHERE a.application_id = :1
";

/// Renders a Rust bool as a PL/SQL boolean literal.
pub fn plsql_bool(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Builds the anonymous block that runs `apex_export.get_application` and
/// opens `:files` over the returned `apex_t_export_files`.
///
/// Binds: `:app_id` (in), `:supporting_objects` (in, NULL for the package
/// default), `:files` (out, REF CURSOR of `name, contents`).
pub fn build_export_block(options: &ExportOptions) -> String {
    let flags = [
        ("p_split", options.split),
        ("p_with_date", options.with_date),
        ("p_with_ir_public_reports", options.with_ir_public_reports),
        ("p_with_ir_private_reports", options.with_ir_private_reports),
        ("p_with_ir_notifications", options.with_ir_notifications),
        ("p_with_translations", options.with_translations),
        ("p_with_pkg_app_mapping", options.with_pkg_app_mapping),
        ("p_with_original_ids", options.with_original_ids),
        ("p_with_no_subscriptions", options.with_no_subscriptions),
        ("p_with_comments", options.with_comments),
        ("p_with_acl_assignments", options.with_acl_assignments),
    ];

    let mut args = vec!["p_application_id => :app_id".to_string()];
    for (name, value) in flags {
        args.push(format!("{} => {}", name, plsql_bool(value)));
    }
    args.push("p_with_supporting_objects => :supporting_objects".to_string());

    format!(
        "DECLARE
    l_files apex_t_export_files;
BEGIN
    l_files := apex_export.get_application(
        {}
    );
    OPEN :files FOR
        SELECT f.name, f.contents
          FROM TABLE(l_files) f;
END;",
        args.join(",\n        ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SupportingObjects;

    #[test]
    fn test_default_block_uses_false_literals() {
        let block = build_export_block(&ExportOptions::default());
        assert!(block.contains("p_application_id => :app_id"));
        assert!(block.contains("p_split => FALSE"));
        assert!(block.contains("p_with_acl_assignments => FALSE"));
        assert!(!block.contains("TRUE"));
        assert!(block.contains("p_with_supporting_objects => :supporting_objects"));
        assert!(block.contains("OPEN :files FOR"));
    }

    #[test]
    fn test_block_renders_enabled_flags() {
        let opts = ExportOptions {
            split: true,
            with_comments: true,
            with_supporting_objects: Some(SupportingObjects::Yes),
            ..Default::default()
        };
        let block = build_export_block(&opts);
        assert!(block.contains("p_split => TRUE"));
        assert!(block.contains("p_with_comments => TRUE"));
        assert!(block.contains("p_with_date => FALSE"));
        // Supporting objects stays a bind regardless of value.
        assert!(!block.contains("'Y'"));
    }
}
