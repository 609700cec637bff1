//! Grouped bar charts rendered as inline SVG.
//!
//! Geometry is laid out here; markup lives in `templates/chart.html` so every
//! piece of text goes through the template escaper.

use askama::Template;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 380.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 64.0;
const PLOT_WIDTH: f64 = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
const PLOT_HEIGHT: f64 = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
const BASELINE: f64 = MARGIN_TOP + PLOT_HEIGHT;
const TICK_STEPS: u8 = 5;

/// Which bars get a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLabels {
    None,
    Percent,
    /// Percent labels on bars above zero only; zeroed bars stay unlabeled.
    PercentNonZero,
}

impl BarLabels {
    fn labels(self, value: f64) -> bool {
        match self {
            BarLabels::None => false,
            BarLabels::Percent => true,
            BarLabels::PercentNonZero => value > 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: String,
    /// One value per category; `None` draws no bar and an "n/a" marker.
    pub values: Vec<Option<f64>>,
}

/// Proportion chart: the y axis always spans 0 to 100%.
#[derive(Debug, Clone)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub labels: BarLabels,
}

pub fn percent_label(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

struct Tick {
    y: f64,
    text_y: f64,
    label: String,
}

/// A bar slot within a category group. `height` is `None` for an undefined
/// value.
struct Bar {
    x: f64,
    center: f64,
    top: f64,
    width: f64,
    height: Option<f64>,
    text_y: f64,
    color: String,
    tooltip: String,
    label: Option<String>,
}

struct Category {
    center: f64,
    name: String,
}

struct LegendEntry {
    y: f64,
    text_y: f64,
    color: String,
    name: String,
}

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartTemplate<'a> {
    width: f64,
    height: f64,
    left: f64,
    right: f64,
    baseline: f64,
    center: f64,
    tick_x: f64,
    category_y: f64,
    x_title_y: f64,
    y_title_y: f64,
    title: &'a str,
    x_title: &'a str,
    y_title: &'a str,
    ticks: Vec<Tick>,
    bars: Vec<Bar>,
    categories: Vec<Category>,
    legend_x: f64,
    legend_text_x: f64,
    legend: Vec<LegendEntry>,
}

fn y_of(value: f64) -> f64 {
    BASELINE - value.clamp(0.0, 1.0) * PLOT_HEIGHT
}

impl GroupedBarChart {
    fn layout(&self) -> ChartTemplate<'_> {
        let ticks = (0..=TICK_STEPS)
            .map(|step| {
                let v = f64::from(step) / f64::from(TICK_STEPS);
                let y = y_of(v);
                Tick {
                    y,
                    text_y: y + 4.0,
                    label: percent_label(v),
                }
            })
            .collect();

        let group_w = PLOT_WIDTH / self.categories.len().max(1) as f64;
        let bar_w = group_w * 0.8 / self.series.len().max(1) as f64;

        let mut bars = Vec::with_capacity(self.categories.len() * self.series.len());
        for (ci, category) in self.categories.iter().enumerate() {
            let group_x = MARGIN_LEFT + group_w * ci as f64 + group_w * 0.1;

            for (si, series) in self.series.iter().enumerate() {
                let x = group_x + bar_w * si as f64;
                let value = series.values.get(ci).copied().flatten();
                let top = value.map_or(BASELINE, y_of);

                bars.push(Bar {
                    x,
                    center: x + bar_w / 2.0,
                    top,
                    width: bar_w,
                    height: value.map(|_| BASELINE - top),
                    text_y: top - 4.0,
                    color: series.color.clone(),
                    tooltip: format!(
                        "{} / {}: {}",
                        series.name,
                        category,
                        value.map_or_else(|| "n/a".to_string(), percent_label)
                    ),
                    label: value
                        .filter(|v| self.labels.labels(*v))
                        .map(percent_label),
                });
            }
        }

        let categories = self
            .categories
            .iter()
            .enumerate()
            .map(|(ci, name)| Category {
                center: MARGIN_LEFT + group_w * (ci as f64 + 0.5),
                name: name.clone(),
            })
            .collect();

        let legend = self
            .series
            .iter()
            .enumerate()
            .map(|(si, series)| {
                let y = MARGIN_TOP + 20.0 * si as f64;
                LegendEntry {
                    y,
                    text_y: y + 10.0,
                    color: series.color.clone(),
                    name: series.name.clone(),
                }
            })
            .collect();

        ChartTemplate {
            width: WIDTH,
            height: HEIGHT,
            left: MARGIN_LEFT,
            right: MARGIN_LEFT + PLOT_WIDTH,
            baseline: BASELINE,
            center: MARGIN_LEFT + PLOT_WIDTH / 2.0,
            tick_x: MARGIN_LEFT - 6.0,
            category_y: BASELINE + 18.0,
            x_title_y: HEIGHT - 12.0,
            y_title_y: MARGIN_TOP + PLOT_HEIGHT / 2.0,
            title: &self.title,
            x_title: &self.x_title,
            y_title: &self.y_title,
            ticks,
            bars,
            categories,
            legend_x: WIDTH - MARGIN_RIGHT + 16.0,
            legend_text_x: WIDTH - MARGIN_RIGHT + 34.0,
            legend,
        }
    }

    pub fn to_svg(&self) -> askama::Result<String> {
        self.layout().render()
    }
}
