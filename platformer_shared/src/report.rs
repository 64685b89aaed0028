//! Scenario reports.
//!
//! Collects the outcome of scripted controller scenarios (coyote window, jump
//! buffer, variable height, ...) and writes them as JSON for CI.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Scenario result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

impl ScenarioStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            ScenarioStatus::Passed => "✓",
            ScenarioStatus::Failed => "✗",
            ScenarioStatus::Skipped => "○",
        }
    }
}

/// A single scenario outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario ID (e.g., "JMP-003").
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ScenarioStatus,
    pub duration: Duration,
    /// Failure reason.
    pub error_message: Option<String>,
    /// Frames simulated, if the scenario drove a host loop.
    pub frames: Option<u32>,
}

impl ScenarioResult {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        ScenarioResult {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            status: ScenarioStatus::Skipped,
            duration: Duration::ZERO,
            error_message: None,
            frames: None,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn pass(mut self, duration: Duration) -> Self {
        self.status = ScenarioStatus::Passed;
        self.duration = duration;
        self.error_message = None;
        self
    }

    pub fn fail(mut self, duration: Duration, error: &str) -> Self {
        self.status = ScenarioStatus::Failed;
        self.duration = duration;
        self.error_message = Some(error.to_string());
        self
    }
}

/// Summary statistics for a set of results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total_duration: Duration,
}

impl CategoryStats {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    pub fn add_result(&mut self, result: &ScenarioResult) {
        self.total += 1;
        self.total_duration += result.duration;
        match result.status {
            ScenarioStatus::Passed => self.passed += 1,
            ScenarioStatus::Failed => self.failed += 1,
            ScenarioStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Full scenario report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub title: String,
    /// Seconds since the Unix epoch when the report was created.
    pub timestamp: u64,
    /// Controller tuning the scenarios ran with, as JSON.
    pub config: Option<serde_json::Value>,
    pub results: Vec<ScenarioResult>,
}

impl ScenarioReport {
    pub fn new(title: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        ScenarioReport {
            title: title.to_string(),
            timestamp,
            config: None,
            results: Vec::new(),
        }
    }

    /// Attaches the tuning used for the run.
    pub fn with_config<T: Serialize>(mut self, config: &T) -> serde_json::Result<Self> {
        self.config = Some(serde_json::to_value(config)?);
        Ok(self)
    }

    pub fn add_result(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    pub fn overall_stats(&self) -> CategoryStats {
        let mut stats = CategoryStats::default();
        for result in &self.results {
            stats.add_result(result);
        }
        stats
    }

    /// Stats keyed by category, sorted by name.
    pub fn stats_by_category(&self) -> BTreeMap<String, CategoryStats> {
        let mut map: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for result in &self.results {
            map.entry(result.category.clone())
                .or_default()
                .add_result(result);
        }
        map
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Failed)
    }

    pub fn all_passed(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.status == ScenarioStatus::Passed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScenarioReport {
        let mut report = ScenarioReport::new("Controller Scenarios");
        report.add_result(
            ScenarioResult::new("MOV-001", "Accelerate", "Movement").pass(Duration::from_millis(1)),
        );
        report.add_result(
            ScenarioResult::new("JMP-001", "Coyote", "Jump").pass(Duration::from_millis(2)),
        );
        report.add_result(
            ScenarioResult::new("JMP-002", "Buffer", "Jump")
                .fail(Duration::from_millis(2), "expected trigger at t=90"),
        );
        report
    }

    #[test]
    fn stats_count_by_status() {
        let report = sample();
        let stats = report.overall_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn stats_by_category_split() {
        let by_cat = sample().stats_by_category();
        assert_eq!(by_cat["Movement"].passed, 1);
        assert_eq!(by_cat["Jump"].passed, 1);
        assert_eq!(by_cat["Jump"].failed, 1);
        assert!((by_cat["Jump"].pass_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn json_contains_ids_and_config() {
        #[derive(Serialize)]
        struct Tuning {
            coyote_ms: f64,
        }
        let report = sample().with_config(&Tuning { coyote_ms: 90.0 }).unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("JMP-002"));
        assert!(json.contains("coyote_ms"));

        let back: ScenarioReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results.len(), 3);
    }
}
