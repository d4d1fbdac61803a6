use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

// Chart data structures, serialized in the shape the browser charting library expects
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Colors {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: Colors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: ChartPlugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<ChartScales>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartPlugins {
    pub title: ChartTitle,
    pub legend: ChartLegend,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartTitle {
    pub display: bool,
    pub text: String,
    pub font: ChartFont,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartFont {
    pub size: u32,
    pub weight: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartLegend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartScales {
    pub y: ChartAxis,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartAxis {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    // Appended to each tick label by the page script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_suffix: Option<String>,
}

impl ChartOptions {
    pub fn titled(text: &str, legend: ChartLegend) -> Self {
        ChartOptions {
            responsive: true,
            maintain_aspect_ratio: true,
            plugins: ChartPlugins {
                title: ChartTitle {
                    display: true,
                    text: text.to_string(),
                    font: ChartFont { size: 18, weight: "bold".to_string() },
                },
                legend,
            },
            scales: None,
        }
    }

    pub fn with_y_axis(mut self, axis: ChartAxis) -> Self {
        self.scales = Some(ChartScales { y: axis });
        self
    }
}

impl ChartLegend {
    pub fn hidden() -> Self {
        ChartLegend { display: Some(false), position: None }
    }

    pub fn at(position: &str) -> Self {
        ChartLegend { display: None, position: Some(position.to_string()) }
    }
}

impl ChartConfig {
    pub fn to_json(&self) -> String {
        // Only plain strings and finite-or-null floats; this cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    pub id: ChartId,
    pub canvas: String,
    pub config: ChartConfig,
}

/// One live chart per canvas.
///
/// `render` destroys whatever was bound to the canvas before binding the new
/// chart, so repeated renders never stack charts on the same canvas.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    live: HashMap<String, ChartHandle>,
    next_id: u64,
    created: u64,
    destroyed: u64,
}

impl ChartRegistry {
    pub fn new() -> Self {
        ChartRegistry::default()
    }

    pub fn render(&mut self, canvas: &str, config: ChartConfig) -> ChartId {
        if let Some(previous) = self.live.remove(canvas) {
            self.destroyed += 1;
            debug!(canvas, chart = previous.id.0, "destroyed chart");
        }
        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.created += 1;
        self.live.insert(
            canvas.to_string(),
            ChartHandle { id, canvas: canvas.to_string(), config },
        );
        id
    }

    pub fn get(&self, canvas: &str) -> Option<&ChartHandle> {
        self.live.get(canvas)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_total(&self) -> u64 {
        self.created
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed
    }
}
