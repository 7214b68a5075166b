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

//! # Configuration
//!
//! Settings come from three layers, highest priority first:
//! 1. **CLI flags** (`CliArgs`).
//! 2. **Connection file**: `<connections_dir>/<connection_config>`, holding
//!    credentials and the target database.
//! 3. **General config file**: `--config`, defaulting to `config` in the
//!    working directory.
//!
//! Files are YAML unless the extension is `.json`. A file name may be given
//! without extension; `.yaml`, `.yml` and `.json` are tried in that order.

use crate::domain::entities::{ExportOptions, SupportingObjects};
use crate::domain::errors::{ExportError, Result};
use clap::Parser;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Config file looked up when `--config` is not given. Optional.
pub const DEFAULT_CONFIG: &str = "config";
pub const DEFAULT_PORT: u16 = 1521;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Export Oracle APEX applications to SQL files", long_about = None)]
pub struct CliArgs {
    /// General configuration file (YAML or JSON) [default: config]
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Application ID(s) to export, comma separated
    #[arg(short, long = "app-id")]
    pub app_id: Option<String>,

    /// Output name stem(s), comma separated, one per application
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the export files are written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Connection configuration name
    #[arg(long)]
    pub connection: Option<String>,

    /// Directory containing connection configurations
    #[arg(long)]
    pub connections_dir: Option<String>,

    /// Database connection, e.g. user/password@host:port/service
    #[arg(long)]
    pub db: Option<String>,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub service: Option<String>,

    /// Write a JSON run report to the output directory
    #[arg(long)]
    pub report: bool,

    // apex_export switches
    #[arg(long)]
    pub split: bool,
    #[arg(long)]
    pub with_date: bool,
    #[arg(long)]
    pub with_ir_public_reports: bool,
    #[arg(long)]
    pub with_ir_private_reports: bool,
    #[arg(long)]
    pub with_ir_notifications: bool,
    #[arg(long)]
    pub with_translations: bool,
    #[arg(long)]
    pub with_pkg_app_mapping: bool,
    #[arg(long)]
    pub with_original_ids: bool,
    #[arg(long)]
    pub with_no_subscriptions: bool,
    #[arg(long)]
    pub with_comments: bool,
    #[arg(long)]
    pub with_acl_assignments: bool,
    /// Supporting objects: Y, N or I (install on import)
    #[arg(long)]
    pub supporting_objects: Option<String>,
}

/// Application IDs as they may appear in a file: `100`, `"100,200"` or `[100, 200]`.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum AppIdSpec {
    One(u32),
    Many(Vec<u32>),
    Text(String),
}

impl AppIdSpec {
    fn to_ids(&self) -> Result<Vec<u32>> {
        match self {
            AppIdSpec::One(id) => Ok(vec![check_app_id(*id)?]),
            AppIdSpec::Many(ids) => ids.iter().map(|id| check_app_id(*id)).collect(),
            AppIdSpec::Text(s) => parse_app_ids(s),
        }
    }
}

/// Shape of the general config file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GeneralConfigFile {
    #[serde(alias = "debugMode")]
    pub debug_mode: bool,
    #[serde(alias = "connectionsDir")]
    pub connections_dir: Option<String>,
    #[serde(alias = "connectionConfig")]
    pub connection_config: Option<String>,
    #[serde(alias = "appID", alias = "appId")]
    pub app_id: Option<AppIdSpec>,
    pub output_dir: Option<String>,
    pub write_report: bool,
    pub export_options: Option<ExportOptions>,
}

/// Shape of a connection file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ConnectionFile {
    #[serde(alias = "dbConnectionString")]
    pub db_connection_string: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub service: Option<String>,
    #[serde(alias = "appID", alias = "appId")]
    pub app_id: Option<AppIdSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub service: String,
    /// Ready-made connect string (TNS alias or full descriptor); wins over host/port/service.
    pub connection_string: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            host: String::new(),
            port: DEFAULT_PORT,
            service: String::new(),
            connection_string: None,
        }
    }
}

impl DatabaseConfig {
    /// Connect string for `oracle::Connection::connect`, EZConnect by default.
    pub fn get_connection_string(&self) -> String {
        match &self.connection_string {
            Some(s) => s.clone(),
            None => format!("//{}:{}/{}", self.host, self.port, self.service),
        }
    }

    /// Applies a `user/password@host:port/service` descriptor. Strings
    /// without `@` are kept verbatim as the connect string, and so is a
    /// target without `/` (`scott/tiger@ORCL` names a TNS alias).
    pub fn apply_descriptor(&mut self, descriptor: &str) -> Result<()> {
        let descriptor = descriptor.trim();
        let Some((credentials, target)) = descriptor.rsplit_once('@') else {
            self.connection_string = Some(descriptor.to_string());
            return Ok(());
        };

        match credentials.split_once('/') {
            Some((user, pass)) => {
                self.username = user.to_string();
                if !pass.is_empty() {
                    self.password = Some(pass.to_string());
                }
            }
            None => self.username = credentials.to_string(),
        }

        let target = target.trim_start_matches("//");
        let Some((host_port, service)) = target.split_once('/') else {
            if target.is_empty() {
                return Err(ExportError::ConfigError(format!(
                    "Connection '{}' has no target after '@'",
                    descriptor
                )));
            }
            self.connection_string = Some(target.to_string());
            return Ok(());
        };
        let (host, port) = match host_port.rsplit_once(':') {
            Some((h, p)) => {
                let port = p.parse::<u16>().map_err(|_| {
                    ExportError::ConfigError(format!("Invalid port in connection: '{}'", p))
                })?;
                (h, port)
            }
            None => (host_port, DEFAULT_PORT),
        };

        self.host = host.to_string();
        self.port = port;
        self.service = service.to_string();
        self.connection_string = None;
        Ok(())
    }

    fn merge_connection_file(&mut self, file: &ConnectionFile) -> Result<()> {
        if let Some(s) = non_empty(&file.db_connection_string) {
            self.apply_descriptor(s)?;
        }
        if let Some(u) = non_empty(&file.username) {
            self.username = u.to_string();
        }
        if let Some(p) = non_empty(&file.password) {
            self.password = Some(p.to_string());
        }
        if let Some(h) = non_empty(&file.hostname) {
            self.host = h.to_string();
            self.connection_string = None;
        }
        if let Some(p) = file.port {
            self.port = p;
        }
        if let Some(s) = non_empty(&file.service) {
            self.service = s.to_string();
            self.connection_string = None;
        }
        Ok(())
    }

    fn merge_cli(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(db) = &args.db {
            self.apply_descriptor(db)?;
        }
        if let Some(u) = &args.username {
            self.username = u.clone();
        }
        if let Some(p) = &args.password {
            self.password = Some(p.clone());
        }
        if let Some(h) = &args.host {
            self.host = h.clone();
            self.connection_string = None;
        }
        if let Some(p) = args.port {
            self.port = p;
        }
        if let Some(s) = &args.service {
            self.service = s.clone();
            self.connection_string = None;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub app_ids: Vec<u32>,
    pub output_names: Vec<String>,
    pub output_dir: String,
    pub write_report: bool,
    pub options: ExportOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            app_ids: Vec::new(),
            output_names: Vec::new(),
            output_dir: ".".to_string(),
            write_report: false,
            options: ExportOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
    pub debug_mode: bool,
    /// Files that contributed to this config, for the debug dump.
    pub sources: Vec<PathBuf>,
    /// Set when the implicit `config` file was looked up and not found.
    pub missing_default_config: bool,
}

impl AppConfig {
    /// Builds the effective configuration from files and CLI flags.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = AppConfig::default();

        // 1. General config file
        let general = match resolve_config_path(args.config.as_deref().unwrap_or(DEFAULT_CONFIG)) {
            Some(path) => {
                let general: GeneralConfigFile = from_file(&path)?;
                config.sources.push(path);
                general
            }
            None if args.config.is_some() => {
                return Err(ExportError::ConfigError(format!(
                    "Config file not found: {}",
                    args.config.as_deref().unwrap_or_default()
                )))
            }
            None => {
                config.missing_default_config = true;
                GeneralConfigFile::default()
            }
        };

        // 2. Connection file
        let connection_name = args
            .connection
            .clone()
            .or_else(|| general.connection_config.clone());
        let connection = match connection_name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => {
                let dir = args
                    .connections_dir
                    .clone()
                    .or_else(|| general.connections_dir.clone())
                    .unwrap_or_else(|| ".".to_string());
                let candidate = Path::new(&dir).join(name);
                let path = resolve_config_path(&candidate.to_string_lossy()).ok_or_else(|| {
                    ExportError::ConfigError(format!(
                        "Connection config not found: {}",
                        candidate.display()
                    ))
                })?;
                let file: ConnectionFile = from_file(&path)?;
                config.sources.push(path);
                file
            }
            None => ConnectionFile::default(),
        };

        // 3. Database: connection file, then CLI
        config.database.merge_connection_file(&connection)?;
        config.database.merge_cli(args)?;

        // 4. Export settings
        config.export.app_ids = match &args.app_id {
            Some(ids) => parse_app_ids(ids)?,
            None => match connection.app_id.as_ref().or(general.app_id.as_ref()) {
                Some(spec) => spec.to_ids()?,
                None => Vec::new(),
            },
        };
        config.export.output_names = args
            .output
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        if let Some(dir) = args.output_dir.clone().or(general.output_dir.clone()) {
            config.export.output_dir = dir;
        }
        config.export.write_report = args.report || general.write_report;
        config.export.options = general.export_options.clone().unwrap_or_default();
        config.merge_export_flags(args)?;

        config.debug_mode = args.debug || general.debug_mode;
        Ok(config)
    }

    /// CLI switches can only turn export options on.
    fn merge_export_flags(&mut self, args: &CliArgs) -> Result<()> {
        let o = &mut self.export.options;
        o.split |= args.split;
        o.with_date |= args.with_date;
        o.with_ir_public_reports |= args.with_ir_public_reports;
        o.with_ir_private_reports |= args.with_ir_private_reports;
        o.with_ir_notifications |= args.with_ir_notifications;
        o.with_translations |= args.with_translations;
        o.with_pkg_app_mapping |= args.with_pkg_app_mapping;
        o.with_original_ids |= args.with_original_ids;
        o.with_no_subscriptions |= args.with_no_subscriptions;
        o.with_comments |= args.with_comments;
        o.with_acl_assignments |= args.with_acl_assignments;
        if let Some(s) = &args.supporting_objects {
            o.with_supporting_objects = Some(SupportingObjects::parse(s).ok_or_else(|| {
                ExportError::ConfigError(format!(
                    "Invalid supporting objects value '{}' (expected Y, N or I)",
                    s
                ))
            })?);
        }
        Ok(())
    }

    /// Checks that we have enough to run: a connection and at least one application.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.database.username.is_empty() {
            problems.push("requires a DB username".to_string());
        }
        if self.database.connection_string.is_none()
            && (self.database.host.is_empty() || self.database.service.is_empty())
        {
            problems.push("requires a DB connection to be specified".to_string());
        }
        if self.export.app_ids.is_empty() {
            problems.push("requires at least 1 application id to export".to_string());
        }
        if self.export.app_ids.contains(&0) {
            problems.push("application ids must be positive".to_string());
        }
        let names = self.export.output_names.len();
        if names > 1 && names != self.export.app_ids.len() {
            problems.push(format!(
                "{} output names given for {} applications",
                names,
                self.export.app_ids.len()
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ExportError::ConfigError(problems.join("; ")))
        }
    }

    /// Dumps the effective settings at debug level. The password is never printed.
    pub fn log_summary(&self) {
        if self.missing_default_config {
            debug!(
                "default config file '{}' not found, using defaults",
                DEFAULT_CONFIG
            );
        }
        for source in &self.sources {
            debug!("config source: {}", source.display());
        }
        debug!("config.debug_mode: {}", self.debug_mode);
        debug!("config.app_ids: {:?}", self.export.app_ids);
        debug!("config.output_names: {:?}", self.export.output_names);
        debug!("config.output_dir: {}", self.export.output_dir);
        debug!("config.options: {:?}", self.export.options);
        debug!("database.username: {}", self.database.username);
        debug!("database.connection: {}", self.database.get_connection_string());
        debug!(
            "database.password: {}",
            if self.database.password.is_some() { "<set>" } else { "<unset>" }
        );
    }
}

fn check_app_id(id: u32) -> Result<u32> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ExportError::ConfigError(format!(
            "Invalid application id: '{}'",
            id
        )))
    }
}

/// Parses `"100, 200"` into application IDs.
pub fn parse_app_ids(s: &str) -> Result<Vec<u32>> {
    split_list(s)
        .iter()
        .map(|id| match id.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ExportError::ConfigError(format!(
                "Invalid application id: '{}'",
                id
            ))),
        })
        .collect()
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Finds `name` as given or with one of the supported extensions.
pub fn resolve_config_path(name: &str) -> Option<PathBuf> {
    let exact = PathBuf::from(name);
    if exact.is_file() {
        return Some(exact);
    }
    ["yaml", "yml", "json"]
        .iter()
        .map(|ext| PathBuf::from(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
}

/// Reads a YAML or JSON file into `T`, picking the format from the extension.
pub fn from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let parsed = if is_json {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|e| ExportError::ConfigError(format!("{}: {}", path.display(), e)))
}
