//! HTML dashboard page.
//!
//! Rendered from the askama templates under `templates/`. The page is
//! self-contained: inline CSS, inline SVG charts, and plain GET forms for the
//! raw-data toggle and the threshold slider. Every control change reloads the
//! page, which recomputes the views from the cached dataset.

pub mod chart;

use askama::Template;

use crate::analyzers::types::{
    ClassificationSummary, GovernorateAggregate, RoadCondition, TransportAvailability,
    TransportMode,
};
use crate::dataset::{Dataset, RawPreview};
use crate::session::DashboardViews;
use chart::{BarLabels, GroupedBarChart, Series};

pub const RAW_PREVIEW_ROWS: usize = 20;

/// Governorate table row with proportions already formatted.
struct GovernorateRow {
    area_label: String,
    towns: usize,
    good: String,
    acceptable: String,
    bad: String,
}

impl From<&GovernorateAggregate> for GovernorateRow {
    fn from(row: &GovernorateAggregate) -> Self {
        Self {
            area_label: row.area_label.clone(),
            towns: row.towns,
            good: format_proportion(row.good),
            acceptable: format_proportion(row.acceptable),
            bad: format_proportion(row.bad),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    rows: usize,
    source: &'a str,
    loaded_at: String,
    threshold_pct: u8,
    /// Present only while the raw-data toggle is on.
    raw_preview: Option<RawPreview>,
    governorates: Vec<GovernorateRow>,
    classification: &'a ClassificationSummary,
    governorate_chart: String,
    transport_chart: String,
    filtered_chart: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

fn format_proportion(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

/// Renders the full dashboard.
pub fn render_dashboard(
    dataset: &Dataset,
    views: &DashboardViews,
    show_raw: bool,
) -> askama::Result<String> {
    let percent = views.threshold.percent();

    DashboardTemplate {
        rows: dataset.len(),
        source: &dataset.source,
        loaded_at: dataset.loaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        threshold_pct: percent,
        raw_preview: show_raw.then(|| dataset.preview(RAW_PREVIEW_ROWS)),
        governorates: views.governorates.iter().map(GovernorateRow::from).collect(),
        classification: &views.classification,
        governorate_chart: governorate_chart(views).to_svg()?,
        transport_chart: transport_chart(
            "Transport Availability by Road Condition",
            &views.transport,
            BarLabels::Percent,
        )
        .to_svg()?,
        filtered_chart: transport_chart(
            &format!("Transport Availability at or above {percent}%"),
            &views.filtered,
            BarLabels::PercentNonZero,
        )
        .to_svg()?,
    }
    .render()
}

/// Page shown instead of the dashboard when the dataset cannot be loaded.
pub fn render_error_page(message: &str) -> askama::Result<String> {
    ErrorTemplate { message }.render()
}

fn governorate_chart(views: &DashboardViews) -> GroupedBarChart {
    let series = [
        (RoadCondition::Good, "#2CA02C"),
        (RoadCondition::Acceptable, "#FF7F0E"),
        (RoadCondition::Bad, "#D62728"),
    ]
    .into_iter()
    .map(|(condition, color)| Series {
        name: condition.label().to_string(),
        color: color.to_string(),
        values: views.governorates.iter().map(|g| g.value(condition)).collect(),
    })
    .collect();

    GroupedBarChart {
        title: "Main Road Quality by Governorate".to_string(),
        x_title: "Governorate".to_string(),
        y_title: "Proportion of Towns".to_string(),
        categories: views
            .governorates
            .iter()
            .map(|g| g.area_label.clone())
            .collect(),
        series,
        labels: BarLabels::None,
    }
}

fn transport_chart(title: &str, table: &TransportAvailability, labels: BarLabels) -> GroupedBarChart {
    let series = TransportMode::CHARTED
        .into_iter()
        .map(|mode| Series {
            name: mode.label().to_string(),
            color: mode.color().to_string(),
            values: RoadCondition::ALL
                .into_iter()
                .map(|condition| table.get(condition, mode))
                .collect(),
        })
        .collect();

    GroupedBarChart {
        title: title.to_string(),
        x_title: "Road Quality".to_string(),
        y_title: "Proportion of Towns".to_string(),
        categories: RoadCondition::ALL
            .into_iter()
            .map(|c| c.label().to_string())
            .collect(),
        series,
        labels,
    }
}
