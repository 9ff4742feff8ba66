use serde::Serialize;

use crate::domain::{AnalysisResult, HistoricalEntry};
use crate::state::Dashboard;

/// Upper bound of the gauge arc; ratios above it pin the needle at 100%.
pub const GAUGE_SCALE_MAX: f64 = 2.5;

/// Qualitative efficiency label for display.
pub fn efficiency_label(atr: f64) -> &'static str {
    if atr < 1.0 {
        "Needs Improvement"
    } else if atr < 1.5 {
        "Efficient"
    } else {
        "Very Efficient"
    }
}

pub fn gauge_percentage(atr: f64) -> f64 {
    ((atr / GAUGE_SCALE_MAX) * 100.0).min(100.0)
}

#[derive(Debug, Serialize)]
pub struct GaugeView {
    pub percentage: f64,
    pub label: &'static str,
}

/// Everything the frontend needs to render the results pane: the three UI
/// states (loading, error, data) plus the gauge and the trend series.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AnalysisResult>,
    pub gauge: Option<GaugeView>,
    pub trend: Vec<HistoricalEntry>,
}

pub fn dashboard_view(dashboard: &Dashboard, trend: Vec<HistoricalEntry>) -> DashboardView {
    DashboardView {
        loading: dashboard.loading,
        error: dashboard.error.clone(),
        result: dashboard.result.clone(),
        gauge: dashboard.result.as_ref().map(|r| GaugeView {
            percentage: gauge_percentage(r.atr),
            label: efficiency_label(r.atr),
        }),
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds() {
        assert_eq!(efficiency_label(0.0), "Needs Improvement");
        assert_eq!(efficiency_label(0.99), "Needs Improvement");
        assert_eq!(efficiency_label(1.0), "Efficient");
        assert_eq!(efficiency_label(1.49), "Efficient");
        assert_eq!(efficiency_label(1.5), "Very Efficient");
        assert_eq!(efficiency_label(3.0), "Very Efficient");
    }

    #[test]
    fn gauge_pins_at_full_scale() {
        assert_eq!(gauge_percentage(2.5), 100.0);
        assert_eq!(gauge_percentage(5.0), 100.0);
        assert_eq!(gauge_percentage(1.25), 50.0);
    }
}
