use crate::charts::{ChartAxis, ChartConfig, ChartData, ChartDataset, ChartKind, ChartLegend, ChartOptions, ChartRegistry, Colors};
use crate::model::ModelMetrics;
use crate::ordered::OrderedMap;
use crate::page::{escape_html, Page, PageError};
use crate::prediction::format_percent;

pub const MODEL_COMPARISON: &str = "model-comparison";
pub const METRICS_CANVAS: &str = "modelMetricsChart";

pub const UNAVAILABLE_MESSAGE: &str = "Model results not available. Please train models first.";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading model performance data.";

pub const SERIES_COLORS: [&str; 3] = ["#2563eb", "#10b981", "#f59e0b"];

const METRIC_LABELS: [&str; 4] = ["Accuracy", "Precision", "Recall", "F1-Score"];

fn metric_values(metrics: &ModelMetrics) -> [f64; 4] {
    [metrics.accuracy, metrics.precision, metrics.recall, metrics.f1_score]
}

pub fn render_model_comparison(page: &mut Page, charts: &mut ChartRegistry, results: &OrderedMap<ModelMetrics>) -> Result<(), PageError> {
    let mut html = String::new();
    for (name, metrics) in results.iter() {
        html.push_str(&model_card_html(name, metrics));
    }
    page.set_html(MODEL_COMPARISON, html)?;
    charts.render(METRICS_CANVAS, metrics_chart(results));
    Ok(())
}

pub fn render_unavailable(page: &mut Page, message: &str) -> Result<(), PageError> {
    page.set_html(MODEL_COMPARISON, format!("<div class=\"error\">{}</div>", escape_html(message)))
}

fn model_card_html(name: &str, metrics: &ModelMetrics) -> String {
    let mut html = format!(
        "<div class=\"model-card\"><h3>{}</h3><div class=\"metrics-grid\">",
        escape_html(name)
    );
    for (label, value) in METRIC_LABELS.iter().zip(metric_values(metrics)) {
        html.push_str(&format!(
            "<div class=\"metric-item\"><div class=\"metric-label\">{label}</div><div class=\"metric-value\">{}</div></div>",
            format_percent(value * 100.0, 2)
        ));
    }
    html.push_str("</div>");
    if let Some(matrix) = metrics.confusion_matrix.as_deref() {
        html.push_str(&confusion_matrix_html(matrix));
    }
    html.push_str("</div>");
    html
}

// Rows are actual class, columns predicted class (0 = not eligible, 1 = eligible).
fn confusion_matrix_html(matrix: &[Vec<u64>]) -> String {
    if matrix.len() != 2 || matrix.iter().any(|row| row.len() != 2) {
        return String::new();
    }
    format!(
        "<table class=\"confusion-matrix\"><thead><tr><th></th><th>Predicted Not Eligible</th><th>Predicted Eligible</th></tr></thead>\
         <tbody><tr><th>Actual Not Eligible</th><td>{}</td><td>{}</td></tr><tr><th>Actual Eligible</th><td>{}</td><td>{}</td></tr></tbody></table>",
        matrix[0][0], matrix[0][1], matrix[1][0], matrix[1][1]
    )
}

pub fn metrics_chart(results: &OrderedMap<ModelMetrics>) -> ChartConfig {
    let datasets = results
        .iter()
        .enumerate()
        .map(|(index, (name, metrics))| ChartDataset {
            label: Some(name.to_string()),
            data: metric_values(metrics).iter().map(|v| v * 100.0).collect(),
            background_color: Colors::Single(SERIES_COLORS[index % SERIES_COLORS.len()].to_string()),
            border_width: None,
            border_color: None,
            border_radius: Some(8),
        })
        .collect();

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: METRIC_LABELS.iter().map(|l| l.to_string()).collect(),
            datasets,
        },
        options: ChartOptions::titled("Model Performance Comparison", ChartLegend::at("top")).with_y_axis(ChartAxis {
            begin_at_zero: true,
            max: Some(100.0),
            tick_suffix: Some("%".to_string()),
        }),
    }
}
