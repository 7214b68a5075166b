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

//! # APEX Export Port
//!
//! The contract for anything that can produce an application export. The
//! Oracle adapter is the real implementation; tests plug in mocks.

use crate::domain::entities::{ApplicationExport, ExportOptions};
use crate::domain::errors::Result;

pub trait ApexExportPort {
    /// Exports a single application with the given options.
    ///
    /// Returns the owning workspace, the application alias and every file
    /// `apex_export` produced (one file unless `options.split` is set).
    fn export_application(&self, app_id: u32, options: &ExportOptions)
        -> Result<ApplicationExport>;
}
