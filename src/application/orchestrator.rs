//! The core application logic that drives the export run.
//!
//! This module walks the requested application IDs in order, asks the export
//! port for each application, hands the result to the artifact port and
//! aggregates the outcome into a report.

use crate::config::AppConfig as Config;
use crate::domain::entities::ExportResult;
use crate::domain::errors::{ExportError, Result};
use crate::domain::naming::output_stem;
use crate::ports::apex_export_port::ApexExportPort;
use crate::ports::artifact_port::ArtifactPort;
use log::{debug, error, info};
use serde_json::json;
use std::path::Path;
use std::time::Instant;

/// Orchestrates the export of every requested APEX application.
pub struct Orchestrator {
    export_port: Box<dyn ApexExportPort>,
    artifact_port: Box<dyn ArtifactPort>,
    config: Config,
}

impl Orchestrator {
    pub fn new(
        export_port: Box<dyn ApexExportPort>,
        artifact_port: Box<dyn ArtifactPort>,
        config: Config,
    ) -> Self {
        Self {
            export_port,
            artifact_port,
            config,
        }
    }

    /// Exports all applications sequentially.
    ///
    /// A failing application is recorded and the run moves on; the returned
    /// list has one entry per requested application, in request order.
    pub fn run(&self) -> Result<Vec<ExportResult>> {
        let start_time = Instant::now();
        let app_ids = &self.config.export.app_ids;
        let total = app_ids.len();

        let mut results = Vec::with_capacity(total);
        for (i, &app_id) in app_ids.iter().enumerate() {
            info!("Exporting application [{} / {}]: {}", i + 1, total, app_id);
            let started = Instant::now();
            let result = match self.process_application(i, app_id) {
                Ok(r) => r,
                Err(e) => {
                    error!("Application {} failed: {}", app_id, e);
                    ExportResult::failure(app_id, started.elapsed().as_secs_f64(), e.to_string())
                }
            };
            results.push(result);
        }

        if self.config.export.write_report {
            self.generate_report(&results, start_time.elapsed().as_secs_f64())?;
        }

        Ok(results)
    }

    fn process_application(&self, index: usize, app_id: u32) -> Result<ExportResult> {
        let started = Instant::now();
        let options = &self.config.export.options;
        let stem = output_stem(app_id, index, &self.config.export.output_names);
        debug!("Application {} uses output stem {}", app_id, stem);

        let export = self.export_port.export_application(app_id, options)?;
        debug!(
            "Application {} returned {} file(s), {} bytes",
            app_id,
            export.files.len(),
            export.total_bytes()
        );

        let files = self
            .artifact_port
            .write_export(&export, &stem, options.split)?;

        Ok(ExportResult::success(
            &export,
            files,
            started.elapsed().as_secs_f64(),
        ))
    }

    fn generate_report(&self, results: &[ExportResult], duration_secs: f64) -> Result<()> {
        let success = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - success;
        let total_files: usize = results.iter().map(|r| r.files.len()).sum();
        let total_bytes: u64 = results.iter().map(|r| r.bytes()).sum();

        let report = json!({
            "summary": {
                "total_applications": results.len(),
                "success": success,
                "failed": failed,
                "total_files": total_files,
                "total_bytes": total_bytes,
                "total_duration_seconds": duration_secs,
            },
            "details": results
        });

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let output_dir = Path::new(&self.config.export.output_dir);
        let report_path = output_dir.join(format!("report_{}.json", timestamp));

        std::fs::create_dir_all(output_dir)?;
        let file = std::fs::File::create(&report_path).map_err(ExportError::IoError)?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| ExportError::ArtifactError(e.to_string()))?;

        info!("Run report written to {}", report_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ApplicationExport, ExportFile, ExportOptions, WrittenFile};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MockExportPort;
    impl ApexExportPort for MockExportPort {
        fn export_application(
            &self,
            app_id: u32,
            options: &ExportOptions,
        ) -> Result<ApplicationExport> {
            if app_id == 404 {
                return Err(ExportError::ApplicationNotFound(app_id));
            }
            let files = if options.split {
                vec![
                    ExportFile { name: format!("f{}/install.sql", app_id), contents: "a".into() },
                    ExportFile { name: format!("f{}/app.sql", app_id), contents: "bb".into() },
                ]
            } else {
                vec![ExportFile { name: format!("f{}.sql", app_id), contents: "abc".into() }]
            };
            Ok(ApplicationExport {
                app_id,
                workspace: "WS".into(),
                alias: format!("APP{}", app_id),
                files,
            })
        }
    }

    /// Records (app_id, stem, split) for every write.
    struct MockArtifactPort {
        calls: Rc<RefCell<Vec<(u32, String, bool)>>>,
    }
    impl ArtifactPort for MockArtifactPort {
        fn write_export(
            &self,
            export: &ApplicationExport,
            stem: &str,
            split: bool,
        ) -> Result<Vec<WrittenFile>> {
            self.calls
                .borrow_mut()
                .push((export.app_id, stem.to_string(), split));
            Ok(export
                .files
                .iter()
                .map(|f| WrittenFile {
                    path: f.name.clone(),
                    bytes: f.contents.len() as u64,
                    sha256: String::new(),
                })
                .collect())
        }
    }

    fn config_for(out_dir: &str, app_ids: Vec<u32>, names: Vec<&str>) -> Config {
        let mut config = Config::default();
        config.database.apply_descriptor("apex/pw@localhost:1521/XE").unwrap();
        config.export.app_ids = app_ids;
        config.export.output_names = names.into_iter().map(String::from).collect();
        config.export.output_dir = out_dir.to_string();
        config
    }

    #[test]
    fn test_orchestrator_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_dir = temp_dir.path().to_str().unwrap().to_string();
        let mut config = config_for(&out_dir, vec![100, 200], vec![]);
        config.export.write_report = true;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = Orchestrator::new(
            Box::new(MockExportPort),
            Box::new(MockArtifactPort { calls: calls.clone() }),
            config,
        );

        let results = orchestrator.run().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(results[1].alias.as_deref(), Some("APP200"));
        assert_eq!(results[0].bytes(), 3);

        assert_eq!(
            *calls.borrow(),
            vec![(100, "f100".to_string(), false), (200, "f200".to_string(), false)]
        );

        let report_found = std::fs::read_dir(&out_dir).unwrap().any(|entry| {
            let name = entry.unwrap().file_name().into_string().unwrap();
            name.starts_with("report_") && name.ends_with(".json")
        });
        assert!(report_found);
    }

    #[test]
    fn test_report_lands_in_nested_output_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_path = temp_dir.path().join("exports").join("nightly");
        let mut config = config_for(out_path.to_str().unwrap(), vec![100], vec![]);
        config.export.write_report = true;

        let orchestrator = Orchestrator::new(
            Box::new(MockExportPort),
            Box::new(MockArtifactPort { calls: Rc::new(RefCell::new(Vec::new())) }),
            config,
        );
        orchestrator.run().unwrap();

        let reports: Vec<_> = std::fs::read_dir(&out_path)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].parent(), Some(out_path.as_path()));

        let report: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&reports[0]).unwrap()).unwrap();
        assert_eq!(report["summary"]["total_applications"], 1);
        assert_eq!(report["summary"]["total_bytes"], 3);
        assert_eq!(report["details"][0]["status"], "SUCCESS");
    }

    #[test]
    fn test_orchestrator_uses_output_names_and_split() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_dir = temp_dir.path().to_str().unwrap().to_string();
        let mut config = config_for(&out_dir, vec![100, 200], vec!["hr", "crm"]);
        config.export.options.split = true;

        let calls = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = Orchestrator::new(
            Box::new(MockExportPort),
            Box::new(MockArtifactPort { calls: calls.clone() }),
            config,
        );

        let results = orchestrator.run().unwrap();
        assert_eq!(results[0].files.len(), 2);
        assert_eq!(
            *calls.borrow(),
            vec![(100, "hr".to_string(), true), (200, "crm".to_string(), true)]
        );

        // No report unless asked for.
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_orchestrator_continues_after_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_dir = temp_dir.path().to_str().unwrap().to_string();
        let config = config_for(&out_dir, vec![404, 100], vec![]);

        let calls = Rc::new(RefCell::new(Vec::new()));
        let orchestrator = Orchestrator::new(
            Box::new(MockExportPort),
            Box::new(MockArtifactPort { calls: calls.clone() }),
            config,
        );

        let results = orchestrator.run().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, "FAILED");
        assert!(results[0].error.as_deref().unwrap().contains("404"));
        assert!(results[1].is_success());
        assert_eq!(calls.borrow().len(), 1);
    }
}
