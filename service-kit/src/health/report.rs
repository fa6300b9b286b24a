//! Health report payloads.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit used for every latency in a report.
pub const LATENCY_MEASURE_UNIT: &str = "seconds";

/// Build metadata attached to every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVersion {
    /// Release tag, omitted when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Source branch
    pub branch: String,
    /// Commit hash
    pub commit: String,
    /// Build date
    pub date: String,
}

impl BuildVersion {
    /// Create build metadata from explicit values.
    #[must_use]
    pub fn new(
        tag: impl Into<String>,
        branch: impl Into<String>,
        commit: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            branch: branch.into(),
            commit: commit.into(),
            date: date.into(),
        }
    }

    /// Read `BUILD_TAG`, `BUILD_BRANCH`, `BUILD_COMMIT` and `BUILD_DATE`
    /// from the environment. Missing variables stay empty.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self::new(
            var("BUILD_TAG"),
            var("BUILD_BRANCH"),
            var("BUILD_COMMIT"),
            var("BUILD_DATE"),
        )
    }
}

/// Result of one dependency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// 200 when the check passed, 400 otherwise
    pub status: u16,
    /// Check duration in seconds
    pub latency: f64,
}

impl DependencyReport {
    pub(crate) fn new(passed: bool, latency: Duration) -> Self {
        Self {
            status: status_for(passed).as_u16(),
            latency: latency.as_secs_f64(),
        }
    }

    /// True when the check passed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Body of `/health/info` and `/health/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// 200 when every dependency is up, 400 otherwise
    pub status: u16,
    /// Build metadata
    pub build: BuildVersion,
    /// Per-dependency results, present on the info endpoint only
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, DependencyReport>,
    /// Always `seconds`
    pub latency_measure_unit: String,
    /// When the checks ran
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub(crate) fn new(build: BuildVersion) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            build,
            dependencies: BTreeMap::new(),
            latency_measure_unit: LATENCY_MEASURE_UNIT.to_string(),
            checked_at: Utc::now(),
        }
    }

    pub(crate) fn add_dependency(&mut self, name: &str, report: DependencyReport) {
        if !report.is_ok() {
            self.mark_failed();
        }
        self.dependencies.insert(name.to_string(), report);
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = StatusCode::BAD_REQUEST.as_u16();
    }

    /// HTTP status answered with this report.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_REQUEST)
    }

    /// True when every dependency is up.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self)).into_response()
    }
}

fn status_for(passed: bool) -> StatusCode {
    if passed {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tag_is_omitted() {
        let json = serde_json::to_value(BuildVersion::new("", "main", "abc", "2024-01-01")).unwrap();
        assert!(json.get("tag").is_none());
        assert_eq!(json["branch"], "main");

        let json = serde_json::to_value(BuildVersion::new("v1.2", "main", "abc", "")).unwrap();
        assert_eq!(json["tag"], "v1.2");
    }

    #[test]
    fn test_failed_dependency_fails_report() {
        let mut report = HealthReport::new(BuildVersion::default());
        report.add_dependency("redis", DependencyReport::new(true, Duration::from_millis(10)));
        assert!(report.is_healthy());

        report.add_dependency("cassandra", DependencyReport::new(false, Duration::ZERO));
        assert!(!report.is_healthy());
        assert_eq!(report.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = HealthReport::new(BuildVersion::new("", "main", "abc", "today"));
        report.add_dependency("redis", DependencyReport::new(true, Duration::from_millis(250)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["latency_measure_unit"], "seconds");
        assert_eq!(json["dependencies"]["redis"]["status"], 200);
        assert_eq!(json["dependencies"]["redis"]["latency"], 0.25);
        assert!(json["checked_at"].is_string());
    }

    #[test]
    fn test_dependencies_omitted_when_empty() {
        let json = serde_json::to_value(HealthReport::new(BuildVersion::default())).unwrap();
        assert!(json.get("dependencies").is_none());
    }
}
