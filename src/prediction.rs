//! Renders a `/predict` response into the result container.

use crate::model::{ClassProbability, PredictionResponse, ScholarshipRecommendation};
use crate::page::{escape_html, Page, PageError};

pub const RESULT_CONTAINER: &str = "prediction-result";
pub const RESULT_CONTENT: &str = "result-content";

pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server. Please try again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// Which optional sections of the result are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub recommendations: bool,
    pub explanations: bool,
}

impl RenderOptions {
    pub fn compact() -> Self {
        RenderOptions { recommendations: false, explanations: false }
    }

    pub fn rich() -> Self {
        RenderOptions { recommendations: true, explanations: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Eligible,
    NotEligible,
    Error(String),
}

pub fn format_percent(percent: f64, decimals: usize) -> String {
    format!("{}%", to_fixed(percent, decimals))
}

/// Fixed-point text for `value`, rounding exact ties away from zero the way
/// `Number.prototype.toFixed` does (`{:.*}` alone rounds ties to even).
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    // a tie is representable only with a short binary fraction, so 30 extra
    // digits always reach the end of its exact decimal expansion
    let wide = format!("{:.*}", decimals + 30, value.abs());
    let tail = &wide[wide.len() - 30..];
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if tie {
        // the next float away from zero is past the tie and rounds up
        let bumped = f64::from_bits(value.to_bits() + 1);
        format!("{:.*}", decimals, bumped)
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Render a decoded response. Non-success and structurally incomplete responses
/// take the error path.
pub fn render_prediction(page: &mut Page, response: &PredictionResponse, options: &RenderOptions) -> Result<ResultView, PageError> {
    if !response.success {
        let message = response.error.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE);
        return show_error(page, message);
    }
    let (Some(prediction), Some(probability)) = (response.prediction, response.probability.as_ref()) else {
        return show_error(page, INVALID_RESPONSE_MESSAGE);
    };

    // `null` is present and simply not 1
    let eligible = prediction == Some(1);
    let mut html = banner_html(eligible);
    html.push_str(&gauge_html(probability.eligible_percent()));
    if options.recommendations {
        if let Some(recommendations) = response.scholarship_recommendations.as_deref().filter(|r| !r.is_empty()) {
            html.push_str(&recommendations_html(recommendations, response));
        }
    }
    html.push_str(&model_breakdown_html(response, options));

    let outcome = if eligible { "result-eligible" } else { "result-not-eligible" };
    page.set_classes(RESULT_CONTAINER, &["result-container", outcome])?;
    page.set_html(RESULT_CONTENT, html)?;
    page.show(RESULT_CONTAINER)?;
    page.scroll_into_view(RESULT_CONTAINER)?;

    Ok(if eligible { ResultView::Eligible } else { ResultView::NotEligible })
}

/// Transport or decode failure while the prediction was in flight.
pub fn render_failure(page: &mut Page, description: &str) -> Result<ResultView, PageError> {
    show_error(page, &format!("An error occurred. Please try again. Error: {description}"))
}

pub fn show_error(page: &mut Page, message: &str) -> Result<ResultView, PageError> {
    page.set_classes(RESULT_CONTAINER, &["result-container", "error"])?;
    page.set_html(RESULT_CONTENT, format!("<p>{}</p>", escape_html(message)))?;
    page.show(RESULT_CONTAINER)?;
    Ok(ResultView::Error(message.to_string()))
}

fn verdict(eligible: bool) -> &'static str {
    if eligible { "✅ Eligible" } else { "❌ Not Eligible" }
}

fn banner_html(eligible: bool) -> String {
    let copy = if eligible {
        "Congratulations! You are eligible for scholarships."
    } else {
        "You may not meet the current eligibility criteria."
    };
    format!(
        r#"<div class="result-banner"><h2>{}</h2><p>{}</p></div>"#,
        verdict(eligible),
        copy
    )
}

fn gauge_html(percent: f64) -> String {
    let shown = format_percent(percent, 1);
    let width = to_fixed(if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 }, 1);
    format!(
        r#"<div class="probability-bar"><div class="probability-item"><div class="probability-label"><span>Eligibility Probability</span><span>{shown}</span></div><div class="probability-bar-container"><div class="probability-bar-fill" style="width: {width}%">{shown}</div></div></div></div>"#
    )
}

fn recommendations_html(recommendations: &[ScholarshipRecommendation], response: &PredictionResponse) -> String {
    let mut html = String::from(r#"<div class="scholarship-recommendations"><h4>Scholarship Recommendations:</h4>"#);
    for rec in recommendations {
        let state = if rec.eligible { "eligible" } else { "not-eligible" };
        html.push_str(&format!(
            r#"<div class="scholarship-card {state}"><div class="scholarship-header"><strong>{}</strong><span class="scholarship-badge">{}</span></div><p>{}</p>"#,
            escape_html(&rec.name),
            verdict(rec.eligible),
            escape_html(&rec.description)
        ));
        if !rec.reasons.is_empty() {
            html.push_str("<ol class=\"scholarship-reasons\">");
            for reason in &rec.reasons {
                html.push_str(&format!("<li>{}</li>", escape_html(reason)));
            }
            html.push_str("</ol>");
        }
        html.push_str("</div>");
    }

    let eligible = recommendations.iter().filter(|r| r.eligible).count();
    html.push_str(&format!(
        r#"<div class="scholarship-summary"><p>{}</p>"#,
        recommendation_summary(eligible, recommendations.len())
    ));
    if response.eligible_scholarships_count.unwrap_or(0) > 0 {
        let names: Vec<String> = response
            .eligible_scholarships
            .iter()
            .flatten()
            .map(|n| escape_html(n))
            .collect();
        html.push_str(&format!("<p><strong>Eligible scholarships:</strong> {}</p>", names.join(", ")));
    } else {
        html.push_str("<p>Consider improving your CGPA, co-curricular involvement, leadership roles or community service to qualify for more scholarships.</p>");
    }
    html.push_str("</div></div>");
    html
}

pub fn recommendation_summary(eligible: usize, total: usize) -> String {
    format!("You are eligible for {eligible} out of {total} scholarship providers.")
}

fn model_breakdown_html(response: &PredictionResponse, options: &RenderOptions) -> String {
    let primary = response.model_used.as_deref();
    let mut html = String::from(r#"<div class="model-predictions"><h4>Model Predictions:</h4><div class="model-list">"#);

    for (name, prediction) in response.all_predictions.iter() {
        let Some(probability) = response.all_probabilities.get(name) else {
            continue;
        };
        let explanation = response.model_explanations.get(name);
        if options.explanations && explanation.is_none() {
            continue;
        }
        html.push_str(&model_row_html(name, *prediction == 1, probability, primary == Some(name)));
        if let (true, Some(explanation)) = (options.explanations, explanation) {
            html.push_str(&format!(
                r#"<div class="model-explanation"><p>{}</p><p><strong>Strength:</strong> {}</p><p><strong>Best for:</strong> {}</p></div>"#,
                escape_html(&explanation.description),
                escape_html(&explanation.strength),
                escape_html(&explanation.use_case)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    if let Some(primary) = primary {
        html.push_str(&format!(
            r#"<p class="primary-model">Primary Model: <strong>{}</strong></p>"#,
            escape_html(primary)
        ));
    }
    html.push_str("</div>");
    html
}

// Leaves the row open so an explanation can follow inside it.
fn model_row_html(name: &str, eligible: bool, probability: &ClassProbability, primary: bool) -> String {
    let class = if primary { "model-row primary" } else { "model-row" };
    let badge = if primary { r#" <span class="primary-badge">Primary</span>"# } else { "" };
    format!(
        r#"<div class="{class}"><div class="model-row-header"><span><strong>{}:</strong> {}{badge}</span><span>{}</span></div>"#,
        escape_html(name),
        verdict(eligible),
        format_percent(probability.eligible_percent(), 1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_page() -> Page {
        let mut page = Page::new();
        page.insert(RESULT_CONTAINER, &["result-container"], false);
        page.insert(RESULT_CONTENT, &[], true);
        page
    }

    fn response(body: &str) -> PredictionResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn gauge_rounds_to_one_decimal() {
        let mut page = result_page();
        let r = response(r#"{"success":true,"prediction":1,"probability":{"eligible":0.734},"model_used":"Random Forest"}"#);
        assert_eq!(render_prediction(&mut page, &r, &RenderOptions::compact()).unwrap(), ResultView::Eligible);
        assert!(page.html(RESULT_CONTENT).contains("<span>73.4%</span>"));
        assert!(page.element(RESULT_CONTAINER).unwrap().visible);
        assert_eq!(page.scroll_request().unwrap().target, RESULT_CONTAINER);
    }

    #[test]
    fn missing_eligible_probability_counts_as_zero() {
        let mut page = result_page();
        let r = response(r#"{"success":true,"prediction":0,"probability":{}}"#);
        assert_eq!(render_prediction(&mut page, &r, &RenderOptions::compact()).unwrap(), ResultView::NotEligible);
        assert!(page.html(RESULT_CONTENT).contains("<span>0.0%</span>"));
        assert!(page.html(RESULT_CONTENT).contains("You may not meet the current eligibility criteria."));
    }

    #[test]
    fn gauge_width_is_clamped() {
        assert!(gauge_html(140.0).contains("width: 100.0%"));
        assert!(gauge_html(-3.0).contains("width: 0.0%"));
    }

    #[test]
    fn failure_shows_backend_error_text() {
        let mut page = result_page();
        let r = response(r#"{"success":false,"error":"Prediction failed: bad input"}"#);
        let view = render_prediction(&mut page, &r, &RenderOptions::rich()).unwrap();
        assert_eq!(view, ResultView::Error("Prediction failed: bad input".into()));
        assert!(!page.html(RESULT_CONTENT).contains("Eligible"));
        assert!(page.element(RESULT_CONTAINER).unwrap().has_class("error"));
    }

    #[test]
    fn failure_without_text_uses_generic_message() {
        let mut page = result_page();
        let view = render_prediction(&mut page, &response(r#"{"success":false}"#), &RenderOptions::compact()).unwrap();
        assert_eq!(view, ResultView::Error(GENERIC_FAILURE_MESSAGE.into()));
    }

    #[test]
    fn incomplete_response_is_invalid() {
        for body in [
            r#"{"success":true,"probability":{"eligible":0.5}}"#,
            r#"{"success":true,"prediction":1}"#,
            r#"{"success":true,"prediction":1,"probability":null}"#,
        ] {
            let mut page = result_page();
            let view = render_prediction(&mut page, &response(body), &RenderOptions::compact()).unwrap();
            assert_eq!(view, ResultView::Error(INVALID_RESPONSE_MESSAGE.into()));
        }
    }

    #[test]
    fn null_prediction_renders_not_eligible() {
        let mut page = result_page();
        let r = response(r#"{"success":true,"prediction":null,"probability":{"eligible":0.4}}"#);
        assert_eq!(render_prediction(&mut page, &r, &RenderOptions::compact()).unwrap(), ResultView::NotEligible);
        assert!(page.html(RESULT_CONTENT).contains("<span>40.0%</span>"));
    }

    #[test]
    fn transport_failure_includes_description() {
        let mut page = result_page();
        render_failure(&mut page, "connection refused").unwrap();
        assert_eq!(
            page.html(RESULT_CONTENT),
            "<p>An error occurred. Please try again. Error: connection refused</p>"
        );
    }

    #[test]
    fn compact_breakdown_ignores_explanations() {
        let r = response(
            r#"{"success":true,"prediction":1,"probability":{"eligible":0.9},
                "all_predictions":{"Random Forest":1,"Decision Tree":0},
                "all_probabilities":{"Random Forest":{"eligible":0.9},"Decision Tree":{"eligible":0.35}},
                "model_used":"Random Forest"}"#,
        );
        let html = model_breakdown_html(&r, &RenderOptions::compact());
        assert!(html.contains("<strong>Random Forest:</strong> ✅ Eligible"));
        assert!(html.contains("<strong>Decision Tree:</strong> ❌ Not Eligible"));
        assert!(html.contains("<span>35.0%</span>"));
        assert_eq!(html.matches("model-row primary").count(), 1);
        assert!(!html.contains("model-explanation"));
    }

    #[test]
    fn breakdown_skips_models_without_probabilities() {
        let r = response(
            r#"{"success":true,"prediction":1,"probability":{"eligible":0.9},
                "all_predictions":{"Random Forest":1,"Logistic Regression":1},
                "all_probabilities":{"Random Forest":{"eligible":0.9}},
                "model_used":"Random Forest"}"#,
        );
        let html = model_breakdown_html(&r, &RenderOptions::compact());
        assert!(!html.contains("Logistic Regression"));
    }

    #[test]
    fn rich_breakdown_requires_explanations() {
        let r = response(
            r#"{"success":true,"prediction":1,"probability":{"eligible":0.9},
                "all_predictions":{"Random Forest":1,"Decision Tree":0},
                "all_probabilities":{"Random Forest":{"eligible":0.9},"Decision Tree":{"eligible":0.35}},
                "model_explanations":{"Random Forest":{"description":"Ensemble of trees","strength":"Robust","use_case":"Mixed features"}},
                "model_used":"Random Forest"}"#,
        );
        let html = model_breakdown_html(&r, &RenderOptions::rich());
        assert!(html.contains("Ensemble of trees"));
        assert!(html.contains("<strong>Best for:</strong> Mixed features"));
        assert!(!html.contains("Decision Tree:"));
    }

    #[test]
    fn ties_round_up_like_to_fixed() {
        assert_eq!(to_fixed(12.25, 1), "12.3");
        assert_eq!(to_fixed(0.4025 * 100.0, 1), "40.3");
        assert_eq!(to_fixed(0.125 * 100.0, 0), "13");
        assert_eq!(to_fixed(87.5, 0), "88");
        assert_eq!(to_fixed(-2.25, 1), "-2.3");
        // 1.005 is stored just below the tie
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(73.4, 1), "73.4");
        assert_eq!(format_percent(40.25, 1), "40.3%");
    }

    #[test]
    fn gauge_shows_tie_rounded_up() {
        let mut page = result_page();
        let r = response(r#"{"success":true,"prediction":1,"probability":{"eligible":0.4025}}"#);
        render_prediction(&mut page, &r, &RenderOptions::compact()).unwrap();
        assert!(page.html(RESULT_CONTENT).contains("<span>40.3%</span>"));
    }

    #[test]
    fn summary_text() {
        assert_eq!(recommendation_summary(2, 3), "You are eligible for 2 out of 3 scholarship providers.");
    }

    #[test]
    fn recommendations_prompt_when_none_eligible() {
        let mut page = result_page();
        let r = response(
            r#"{"success":true,"prediction":0,"probability":{"eligible":0.2},
                "scholarship_recommendations":[{"name":"JPA","eligible":false,"description":"Federal","reasons":["CGPA below 3.5"]}],
                "eligible_scholarships_count":0,"eligible_scholarships":[]}"#,
        );
        render_prediction(&mut page, &r, &RenderOptions::rich()).unwrap();
        let html = page.html(RESULT_CONTENT);
        assert!(html.contains("You are eligible for 0 out of 1 scholarship providers."));
        assert!(html.contains("Consider improving"));
        assert!(html.contains("<li>CGPA below 3.5</li>"));
    }

    #[test]
    fn model_names_are_escaped() {
        let r = response(
            r#"{"success":true,"prediction":1,"probability":{"eligible":0.9},
                "all_predictions":{"<script>":1},"all_probabilities":{"<script>":{"eligible":0.9}}}"#,
        );
        let html = model_breakdown_html(&r, &RenderOptions::compact());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
