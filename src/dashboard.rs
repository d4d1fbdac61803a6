use crate::charts::{ChartAxis, ChartConfig, ChartData, ChartDataset, ChartKind, ChartLegend, ChartOptions, ChartRegistry, Colors};
use crate::model::{DatasetStats, FeatureSummary};
use crate::ordered::OrderedMap;
use crate::page::{escape_html, Page, PageError};
use crate::prediction::{format_percent, to_fixed};

pub const TOTAL_STUDENTS: &str = "total-students";
pub const ELIGIBLE_COUNT: &str = "eligible-count";
pub const NOT_ELIGIBLE_COUNT: &str = "not-eligible-count";
pub const ELIGIBILITY_RATE: &str = "eligibility-rate";
pub const FEATURE_SUMMARY: &str = "feature-summary";

pub const ELIGIBILITY_CANVAS: &str = "eligibilityChart";
pub const CGPA_CANVAS: &str = "cgpaChart";
pub const INCOME_CANVAS: &str = "incomeChart";

// Illustrative sample buckets. The stats endpoint does not report distributions,
// so these are fixed and unrelated to `total_samples`.
pub const CGPA_BUCKETS: [(&str, f64); 4] = [
    ("2.0-2.5", 150.0),
    ("2.5-3.0", 400.0),
    ("3.0-3.5", 800.0),
    ("3.5-4.0", 650.0),
];

pub const INCOME_BUCKETS: [(&str, f64); 5] = [
    ("0-30k", 400.0),
    ("30k-60k", 500.0),
    ("60k-90k", 450.0),
    ("90k-120k", 350.0),
    ("120k+", 300.0),
];

// Fill the summary counters and rebuild the three dashboard charts
pub fn render_dashboard(page: &mut Page, charts: &mut ChartRegistry, stats: &DatasetStats) -> Result<(), PageError> {
    page.set_text(TOTAL_STUDENTS, &stats.total_samples.to_string())?;
    page.set_text(ELIGIBLE_COUNT, &stats.eligible_count.to_string())?;
    page.set_text(NOT_ELIGIBLE_COUNT, &stats.not_eligible_count.to_string())?;
    page.set_text(ELIGIBILITY_RATE, &format_percent(stats.eligible_percentage, 1))?;
    page.set_html(FEATURE_SUMMARY, feature_summary_html(&stats.features))?;

    charts.render(ELIGIBILITY_CANVAS, eligibility_chart(stats));
    charts.render(CGPA_CANVAS, cgpa_chart());
    charts.render(INCOME_CANVAS, income_chart());
    Ok(())
}

pub fn eligibility_chart(stats: &DatasetStats) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: vec!["Eligible".to_string(), "Not Eligible".to_string()],
            datasets: vec![ChartDataset {
                label: None,
                data: vec![stats.eligible_count as f64, stats.not_eligible_count as f64],
                background_color: Colors::PerPoint(vec!["#10b981".to_string(), "#ef4444".to_string()]),
                border_width: Some(2),
                border_color: Some("#ffffff".to_string()),
                border_radius: None,
            }],
        },
        options: ChartOptions::titled("Scholarship Eligibility Distribution", ChartLegend::at("bottom")),
    }
}

pub fn cgpa_chart() -> ChartConfig {
    bucket_chart(&CGPA_BUCKETS, "#2563eb", "CGPA Distribution (sample)")
}

pub fn income_chart() -> ChartConfig {
    bucket_chart(&INCOME_BUCKETS, "#8b5cf6", "Family Income Distribution (RM, sample)")
}

fn bucket_chart(buckets: &[(&str, f64)], color: &str, title: &str) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: buckets.iter().map(|(label, _)| label.to_string()).collect(),
            datasets: vec![ChartDataset {
                label: Some("Number of Students".to_string()),
                data: buckets.iter().map(|(_, count)| *count).collect(),
                background_color: Colors::Single(color.to_string()),
                border_width: None,
                border_color: None,
                border_radius: Some(8),
            }],
        },
        options: ChartOptions::titled(title, ChartLegend::hidden())
            .with_y_axis(ChartAxis { begin_at_zero: true, max: None, tick_suffix: None }),
    }
}

fn feature_summary_html(features: &OrderedMap<FeatureSummary>) -> String {
    if features.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        "<table class=\"feature-table\"><thead><tr><th>Feature</th><th>Min</th><th>Max</th><th>Mean</th></tr></thead><tbody>",
    );
    for (name, summary) in features.iter() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&feature_label(name)),
            summary.min,
            summary.max,
            to_fixed(summary.mean, 2)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

// year_of_study -> Year Of Study
fn feature_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
