use crate::charts::ChartRegistry;
use crate::comparison::{METRICS_CANVAS, MODEL_COMPARISON};
use crate::dashboard::{
    CGPA_CANVAS, ELIGIBILITY_CANVAS, ELIGIBILITY_RATE, ELIGIBLE_COUNT, FEATURE_SUMMARY, INCOME_CANVAS, NOT_ELIGIBLE_COUNT,
    TOTAL_STUDENTS,
};
use crate::form::FIELD_IDS;
use crate::page::{escape_html, Page};
use crate::prediction::{RESULT_CONTAINER, RESULT_CONTENT};
use crate::tabs::{button_id, panel_id, ACTIVE_CLASS, BUTTON_CLASS, PANEL_CLASS, TABS};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

// (label, step, default value) per profile input, in FIELD_IDS order
const FIELD_INPUTS: [(&str, &str, &str); 6] = [
    ("Year of Study", "1", "2"),
    ("CGPA", "0.01", "3.20"),
    ("Family Income (RM / year)", "1", "50000"),
    ("Co-curricular Score", "1", "50"),
    ("Leadership Positions", "1", "1"),
    ("Community Service Hours", "1", "10"),
];

/// Every element the renderers address, with `initial_tab` marked active.
pub fn skeleton(initial_tab: &str) -> Page {
    let mut page = Page::new();
    for tab in TABS {
        let active = tab == initial_tab;
        let panel: &[&str] = if active { &[PANEL_CLASS, ACTIVE_CLASS] } else { &[PANEL_CLASS] };
        let button: &[&str] = if active { &[BUTTON_CLASS, ACTIVE_CLASS] } else { &[BUTTON_CLASS] };
        page.insert(panel_id(tab), panel, true);
        page.insert(button_id(tab), button, true);
    }
    for (id, (_, _, default)) in FIELD_IDS.iter().zip(FIELD_INPUTS) {
        page.insert_input(*id, default);
    }
    page.insert(RESULT_CONTAINER, &["result-container"], false);
    page.insert(RESULT_CONTENT, &[], true);
    for id in [TOTAL_STUDENTS, ELIGIBLE_COUNT, NOT_ELIGIBLE_COUNT, ELIGIBILITY_RATE] {
        page.insert(id, &["stat-value"], true);
    }
    page.insert(FEATURE_SUMMARY, &[], true);
    page.insert(MODEL_COMPARISON, &["model-comparison"], true);
    page
}

fn tab_label(tab: &str) -> &'static str {
    match tab {
        "predict" => "🎯 Predict",
        "dashboard" => "📊 Dashboard",
        "models" => "🤖 Model Performance",
        "about" => "ℹ️ About",
        _ => "",
    }
}

pub fn render_document(page: &Page, charts: &ChartRegistry) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Scholarship Eligibility Dashboard</title>
<style>
body { font-family: Arial, sans-serif; max-width: 1100px; margin: 30px auto; padding: 0 20px; background: #f8fafc; }
.tab-btn { display: inline-block; padding: 10px 18px; margin-right: 6px; border-radius: 6px; background: #e2e8f0; color: #1e293b; text-decoration: none; }
.tab-btn.active { background: #2563eb; color: white; }
.tab-content { display: none; background: white; padding: 24px; border-radius: 10px; margin-top: 16px; }
.tab-content.active { display: block; }
.result-container { margin-top: 20px; padding: 20px; border-radius: 10px; }
.result-eligible { background: #10b981; color: white; }
.result-not-eligible { background: #ef4444; color: white; }
.result-container.error, .error { background: #fef2f2; color: #991b1b; padding: 12px; border-radius: 8px; }
.probability-bar-container { background: rgba(255,255,255,0.3); border-radius: 6px; }
.probability-bar-fill { background: white; color: #1e293b; border-radius: 6px; padding: 4px; text-align: right; }
.model-row { background: rgba(255,255,255,0.2); padding: 12px; border-radius: 8px; margin: 8px 0; }
.model-row.primary { border: 2px solid white; }
.stats-grid, .metrics-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
.stat-card, .metric-item, .model-card, .scholarship-card { background: #f1f5f9; padding: 12px; border-radius: 8px; color: #1e293b; }
.model-card, .scholarship-card { margin: 10px 0; }
.stat-value { font-size: 24px; color: #2563eb; }
label { display: block; margin-top: 10px; font-weight: bold; }
input { width: 100%; padding: 8px; border: 1px solid #cbd5e1; border-radius: 4px; }
button { margin-top: 14px; background: #2563eb; color: white; padding: 12px 24px; border: none; border-radius: 6px; cursor: pointer; }
</style>
</head>
<body>
<h1>🎓 Scholarship Eligibility Dashboard</h1>
<nav>
"#,
    );

    for tab in TABS {
        let id = button_id(tab);
        out.push_str(&format!(
            "<a id=\"{id}\" class=\"{}\" href=\"/tab/{tab}\">{}</a>\n",
            class_of(page, &id),
            tab_label(tab)
        ));
    }
    out.push_str("</nav>\n");

    out.push_str(&panel_open(page, "predict"));
    out.push_str("<h2>Check Your Eligibility</h2>\n<form id=\"prediction-form\" method=\"post\" action=\"/predict\">\n");
    for (id, (label, step, _)) in FIELD_IDS.iter().zip(FIELD_INPUTS) {
        out.push_str(&format!(
            "<label for=\"{id}\">{label}</label><input type=\"number\" id=\"{id}\" name=\"{id}\" step=\"{step}\" value=\"{}\">\n",
            escape_html(page.value(id))
        ));
    }
    out.push_str("<button type=\"submit\">Predict Eligibility</button>\n</form>\n");
    out.push_str(&element_block(page, RESULT_CONTAINER, &element_block(page, RESULT_CONTENT, "")));
    out.push_str("</div>\n");

    out.push_str(&panel_open(page, "dashboard"));
    out.push_str("<h2>Dataset Overview</h2>\n<div class=\"stats-grid\">\n");
    for (id, label) in [
        (TOTAL_STUDENTS, "Total Students"),
        (ELIGIBLE_COUNT, "Eligible"),
        (NOT_ELIGIBLE_COUNT, "Not Eligible"),
        (ELIGIBILITY_RATE, "Eligibility Rate"),
    ] {
        out.push_str(&format!("<div class=\"stat-card\"><h4>{label}</h4>{}</div>\n", element_block(page, id, "")));
    }
    out.push_str("</div>\n");
    for canvas in [ELIGIBILITY_CANVAS, CGPA_CANVAS, INCOME_CANVAS] {
        out.push_str(&canvas_html(charts, canvas));
    }
    out.push_str(&element_block(page, FEATURE_SUMMARY, ""));
    out.push_str("</div>\n");

    out.push_str(&panel_open(page, "models"));
    out.push_str("<h2>Model Performance</h2>\n");
    out.push_str(&element_block(page, MODEL_COMPARISON, ""));
    out.push_str(&canvas_html(charts, METRICS_CANVAS));
    out.push_str("</div>\n");

    out.push_str(&panel_open(page, "about"));
    out.push_str(
        "<h2>About</h2>\n<p>Eligibility is predicted by three classifiers (Logistic Regression, Decision Tree and Random Forest) \
         trained on historical applications. The Random Forest verdict is used as the primary result when available.</p>\n\
         <p>The CGPA and income charts on the dashboard show illustrative sample distributions.</p>\n</div>\n",
    );

    out.push_str(&format!("<script src=\"{CHART_JS_CDN}\"></script>\n"));
    out.push_str(CHART_BOOTSTRAP);
    if let Some(scroll) = page.scroll_request() {
        out.push_str(&format!(
            "<script>document.getElementById('{}').scrollIntoView({{ behavior: 'smooth', block: 'nearest' }});</script>\n",
            escape_html(&scroll.target)
        ));
    }
    out.push_str("</body>\n</html>\n");
    out
}

// Instantiates every canvas that carries a serialized chart config.
const CHART_BOOTSTRAP: &str = r#"<script>
document.querySelectorAll('canvas[data-chart]').forEach(function (canvas) {
    var config = JSON.parse(canvas.dataset.chart);
    var y = config.options.scales && config.options.scales.y;
    if (y && y.tickSuffix) {
        var suffix = y.tickSuffix;
        y.ticks = { callback: function (value) { return value + suffix; } };
        delete y.tickSuffix;
    }
    new Chart(canvas.getContext('2d'), config);
});
</script>
"#;

fn class_of(page: &Page, id: &str) -> String {
    page.element(id).map(|e| e.class_attr()).unwrap_or_default()
}

fn panel_open(page: &Page, tab: &str) -> String {
    let id = panel_id(tab);
    format!("<div id=\"{id}\" class=\"{}\">\n", class_of(page, &id))
}

// `<div>` for a page element: its classes, visibility and html, followed by `children`.
fn element_block(page: &Page, id: &str, children: &str) -> String {
    let Some(element) = page.element(id) else {
        return String::new();
    };
    let style = if element.visible { "" } else { " style=\"display: none\"" };
    format!(
        "<div id=\"{id}\" class=\"{}\"{style}>{}{children}</div>\n",
        element.class_attr(),
        element.html
    )
}

fn canvas_html(charts: &ChartRegistry, canvas: &str) -> String {
    match charts.get(canvas) {
        Some(handle) => format!(
            "<canvas id=\"{canvas}\" data-chart=\"{}\"></canvas>\n",
            escape_html(&handle.config.to_json())
        ),
        None => format!("<canvas id=\"{canvas}\"></canvas>\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_marks_initial_tab() {
        let page = skeleton("dashboard");
        assert_eq!(page.ids_with_class(ACTIVE_CLASS), vec!["dashboard-btn", "dashboard-tab"]);
        assert!(!page.element(RESULT_CONTAINER).unwrap().visible);
        assert_eq!(page.value("cgpa"), "3.20");
    }

    #[test]
    fn document_contains_dom_contract() {
        let page = skeleton("predict");
        let doc = render_document(&page, &ChartRegistry::new());
        for id in FIELD_IDS {
            assert!(doc.contains(&format!("id=\"{id}\"")), "missing input {id}");
        }
        for id in ["prediction-form", "prediction-result", "result-content", "eligibilityChart", "cgpaChart", "incomeChart", "modelMetricsChart", "model-comparison"] {
            assert!(doc.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(doc.contains("id=\"prediction-result\" class=\"result-container\" style=\"display: none\""));
        assert!(!doc.contains("scrollIntoView({"));
    }

    #[test]
    fn charts_are_embedded_escaped() {
        let page = skeleton("dashboard");
        let mut charts = ChartRegistry::new();
        charts.render(CGPA_CANVAS, crate::dashboard::cgpa_chart());
        let doc = render_document(&page, &charts);
        assert!(doc.contains("<canvas id=\"cgpaChart\" data-chart=\"{&quot;type&quot;:&quot;bar&quot;"));
        assert!(doc.contains("<canvas id=\"incomeChart\"></canvas>"));
    }
}
