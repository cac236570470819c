//! Declarative chart configuration builders.
//!
//! A `ChartConfig` is a plain data structure handed to whatever renders the
//! dashboard; this layer never draws anything. Rebuilding a chart replaces
//! the previous config wholesale (there is no incremental update path).

use std::collections::HashMap;

use serde::Serialize;

/// Fixed palette cycled by index for multi-series charts.
pub const PALETTE: [&str; 12] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#06B6D4", "#F97316", "#84CC16",
    "#EC4899", "#6366F1", "#14B8A6", "#F472B6",
];

/// `count` colors drawn from the palette at `i % 12`.
pub fn generate_colors(count: usize) -> Vec<&'static str> {
    (0..count).map(|i| PALETTE[i % PALETTE.len()]).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Doughnut,
    Bar,
    Bubble,
    Radar,
}

/// How an axis tick renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisFormat {
    Plain,
    /// `"$1,200"`
    Currency,
    /// `"$2.4M"` style for values already scaled to millions.
    Millions,
    /// `"87%"`
    Percent,
    /// `"+30%"` growth-style ticks.
    PercentDelta,
}

impl AxisFormat {
    /// Render one tick value. Mirrors the legend/tooltip templates so the
    /// two never drift apart.
    pub fn tick(&self, value: f64) -> String {
        match self {
            AxisFormat::Plain => format!("{}", value),
            AxisFormat::Currency => crate::format::currency(value),
            AxisFormat::Millions => format!("${}M", value),
            AxisFormat::Percent => format!("{}%", value),
            AxisFormat::PercentDelta => format!("+{}%", value),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub colors: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

/// A bubble point: x/y in data units, r in pixels.
#[derive(Debug, Clone, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bubbles: Vec<BubblePoint>,
    pub y_format: AxisFormat,
    pub legend_position: &'static str,
    /// Radar charts pin the radial axis to a fixed maximum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_max: Option<f64>,
}

impl ChartConfig {
    fn new(kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            kind,
            title: None,
            labels,
            datasets: Vec::new(),
            bubbles: Vec::new(),
            y_format: AxisFormat::Plain,
            legend_position: "bottom",
            radial_max: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Single-series line chart, one color, filled area.
pub fn line_chart(labels: Vec<String>, label: &str, data: Vec<f64>, y_format: AxisFormat) -> ChartConfig {
    let mut cfg = ChartConfig::new(ChartKind::Line, labels);
    cfg.y_format = y_format;
    cfg.datasets.push(Dataset {
        label: label.to_string(),
        data,
        colors: vec![PALETTE[0]],
        fill: Some(true),
    });
    cfg
}

/// Doughnut over one labeled series, palette cycled across slices.
pub fn doughnut_chart(labels: Vec<String>, data: Vec<f64>) -> ChartConfig {
    let colors = generate_colors(labels.len());
    let mut cfg = ChartConfig::new(ChartKind::Doughnut, labels);
    cfg.datasets.push(Dataset {
        label: String::new(),
        data,
        colors,
        fill: None,
    });
    cfg
}

/// Bar chart over one labeled series, palette cycled across bars.
pub fn bar_chart(labels: Vec<String>, label: &str, data: Vec<f64>, y_format: AxisFormat) -> ChartConfig {
    let colors = generate_colors(labels.len());
    let mut cfg = ChartConfig::new(ChartKind::Bar, labels);
    cfg.y_format = y_format;
    cfg.datasets.push(Dataset {
        label: label.to_string(),
        data,
        colors,
        fill: None,
    });
    cfg
}

/// Bubble chart from pre-computed points; both axes are currency.
pub fn bubble_chart(label: &str, bubbles: Vec<BubblePoint>) -> ChartConfig {
    let mut cfg = ChartConfig::new(ChartKind::Bubble, Vec::new());
    cfg.y_format = AxisFormat::Currency;
    cfg.bubbles = bubbles;
    cfg.datasets.push(Dataset {
        label: label.to_string(),
        data: Vec::new(),
        colors: vec![PALETTE[0]],
        fill: None,
    });
    cfg
}

/// Radar chart comparing named series over shared axes, pinned to 0-100.
pub fn radar_chart(axes: Vec<String>, series: Vec<(String, Vec<f64>)>) -> ChartConfig {
    let mut cfg = ChartConfig::new(ChartKind::Radar, axes);
    cfg.radial_max = Some(100.0);
    for (i, (label, data)) in series.into_iter().enumerate() {
        cfg.datasets.push(Dataset {
            label,
            data,
            colors: vec![PALETTE[i % PALETTE.len()]],
            fill: None,
        });
    }
    cfg
}

/// Holds the current chart config per widget id. Inserting under an existing
/// id drops the previous config first, mirroring the dispose-then-recreate
/// render cycle.
#[derive(Default)]
pub struct ChartRegistry {
    charts: HashMap<String, ChartConfig>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart under `id`, returning the disposed config if any.
    pub fn render(&mut self, id: &str, config: ChartConfig) -> Option<ChartConfig> {
        self.charts.insert(id.to_string(), config)
    }

    pub fn get(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.get(id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_mod_12() {
        let colors = generate_colors(30);
        assert_eq!(colors.len(), 30);
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(*c, PALETTE[i % 12]);
        }
    }

    #[test]
    fn axis_formats() {
        assert_eq!(AxisFormat::Millions.tick(2.4), "$2.4M");
        assert_eq!(AxisFormat::Percent.tick(87.0), "87%");
        assert_eq!(AxisFormat::PercentDelta.tick(30.0), "+30%");
        assert_eq!(AxisFormat::Currency.tick(1500.0), "$1,500");
    }

    #[test]
    fn doughnut_colors_match_slice_count() {
        let cfg = doughnut_chart(
            vec!["a".into(), "b".into(), "c".into()],
            vec![1.0, 2.0, 3.0],
        );
        assert_eq!(cfg.datasets[0].colors.len(), 3);
        assert_eq!(cfg.datasets[0].colors[1], PALETTE[1]);
    }

    #[test]
    fn registry_replaces_previous_instance() {
        let mut reg = ChartRegistry::new();
        assert!(reg
            .render("roi", line_chart(vec![], "ROI", vec![], AxisFormat::Millions))
            .is_none());
        let disposed = reg.render("roi", doughnut_chart(vec![], vec![]));
        assert_eq!(disposed.unwrap().kind, ChartKind::Line);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("roi").unwrap().kind, ChartKind::Doughnut);
    }
}
