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

//! # Runtime Context
//!
//! Sets up what the run needs before the first export:
//! 1. **Logging**: `env_logger`, raised to `debug` by `--debug`/`debug_mode`.
//! 2. **Credentials**: the password from config, environment, or a prompt.
//! 3. **Connection**: exactly one Oracle session for the whole run.

use crate::config::AppConfig;
use crate::domain::errors::{ExportError, Result};
use crate::infrastructure::oracle::apex_export_adapter::OracleApexExportAdapter;
use log::info;

/// Environment variable consulted when no password is configured.
pub const PASSWORD_ENV: &str = "APEX_EXPORT_PASSWORD";

/// Initializes logging. `RUST_LOG` still wins when set.
pub fn init_logging(debug_mode: bool) {
    let default_level = if debug_mode { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .try_init();
}

/// Returns the configured password, falling back to `env_password` and
/// then to `prompt`.
pub fn resolve_password<E, F>(configured: Option<&str>, env_password: E, prompt: F) -> Result<String>
where
    E: FnOnce() -> Option<String>,
    F: FnOnce() -> std::io::Result<String>,
{
    if let Some(p) = configured.filter(|p| !p.is_empty()) {
        return Ok(p.to_string());
    }
    if let Some(p) = env_password().filter(|p| !p.is_empty()) {
        return Ok(p);
    }

    let entered = prompt()
        .map_err(|e| ExportError::CredentialError(format!("Failed to read password: {}", e)))?;
    if entered.is_empty() {
        return Err(ExportError::CredentialError(
            "An empty password was entered".to_string(),
        ));
    }
    Ok(entered)
}

/// Reads `APEX_EXPORT_PASSWORD`.
pub fn password_from_env() -> Option<String> {
    std::env::var(PASSWORD_ENV).ok()
}

/// Reads a password from the terminal without echo.
pub fn prompt_password() -> std::io::Result<String> {
    rpassword::prompt_password("Password: ")
}

/// Collects credentials and opens the connection.
pub fn connect(config: &AppConfig) -> Result<OracleApexExportAdapter> {
    let password = resolve_password(
        config.database.password.as_deref(),
        password_from_env,
        prompt_password,
    )?;
    let conn_str = config.database.get_connection_string();

    info!(
        "Connecting to {} as {}...",
        conn_str, config.database.username
    );
    OracleApexExportAdapter::connect(&config.database.username, &password, &conn_str)
}
