use serde::{Deserialize, Deserializer, Serialize};

use crate::ordered::OrderedMap;

// Request sent to POST /predict.
// `None` stands for a field that did not parse as a number; it goes out as JSON null.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionRequest {
    pub year_of_study: Option<i64>,
    pub cgpa: Option<f64>,
    pub family_income: Option<i64>,
    pub cocurricular_score: Option<i64>,
    pub leadership_positions: Option<i64>,
    pub community_service_hours: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ClassProbability {
    #[serde(default)]
    pub eligible: Option<f64>,
}

impl ClassProbability {
    // Missing probability counts as zero, like the browser's `|| 0`.
    pub fn eligible_percent(&self) -> f64 {
        self.eligible.unwrap_or(0.0) * 100.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ModelExplanation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub use_case: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ScholarshipRecommendation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub eligible: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

// Response from POST /predict. Every field is optional on the wire; the result
// renderer decides what counts as a usable response.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PredictionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Outer `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub prediction: Option<Option<i64>>,
    #[serde(default)]
    pub probability: Option<ClassProbability>,
    #[serde(default)]
    pub all_predictions: OrderedMap<i64>,
    #[serde(default)]
    pub all_probabilities: OrderedMap<ClassProbability>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub model_explanations: OrderedMap<ModelExplanation>,
    #[serde(default)]
    pub scholarship_recommendations: Option<Vec<ScholarshipRecommendation>>,
    #[serde(default)]
    pub eligible_scholarships_count: Option<u64>,
    #[serde(default)]
    pub eligible_scholarships: Option<Vec<String>>,
}

// Wraps whatever is on the wire, `null` included, so absence stays distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FeatureSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetStats {
    pub total_samples: u64,
    pub eligible_count: u64,
    pub not_eligible_count: u64,
    pub eligible_percentage: f64,
    #[serde(default)]
    pub features: OrderedMap<FeatureSummary>,
}

// Envelope of GET /dataset_stats
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetStatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: Option<DatasetStats>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    #[serde(default)]
    pub confusion_matrix: Option<Vec<Vec<u64>>>,
}

// Envelope of GET /model_info
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelInfoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<OrderedMap<ModelMetrics>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsed_fields_serialize_as_null() {
        let request = PredictionRequest {
            year_of_study: Some(2),
            cgpa: None,
            family_income: Some(45000),
            cocurricular_score: Some(70),
            leadership_positions: Some(1),
            community_service_hours: Some(20),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cgpa"], serde_json::Value::Null);
        assert_eq!(json["family_income"], 45000);
    }

    #[test]
    fn decodes_full_prediction_response() {
        let body = r#"{
            "success": true,
            "prediction": 1,
            "probability": {"not_eligible": 0.2, "eligible": 0.8},
            "all_predictions": {"Random Forest": 1, "Decision Tree": 0},
            "all_probabilities": {
                "Random Forest": {"eligible": 0.8},
                "Decision Tree": {"eligible": 0.4}
            },
            "model_used": "Random Forest"
        }"#;
        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.prediction, Some(Some(1)));
        assert_eq!(response.all_predictions.len(), 2);
        assert!(response.model_explanations.is_empty());
        assert!(response.scholarship_recommendations.is_none());
    }

    #[test]
    fn null_prediction_is_present_but_empty() {
        let null: PredictionResponse = serde_json::from_str(r#"{"success":true,"prediction":null}"#).unwrap();
        assert_eq!(null.prediction, Some(None));
        let absent: PredictionResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(absent.prediction, None);
    }

    #[test]
    fn decodes_failure_envelope() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"success": false, "error": "Models not loaded. Please train models first."}"#).unwrap();
        assert!(!response.success);
        assert!(response.prediction.is_none());
        assert_eq!(response.error.as_deref(), Some("Models not loaded. Please train models first."));
    }

    #[test]
    fn decodes_model_info_with_confusion_matrix() {
        let body = r#"{"success": true, "results": {
            "Logistic Regression": {"accuracy": 0.91, "precision": 0.88, "recall": 0.9, "f1_score": 0.89, "confusion_matrix": [[250, 20], [15, 315]]}
        }}"#;
        let response: ModelInfoResponse = serde_json::from_str(body).unwrap();
        let results = response.results.unwrap();
        let metrics = results.get("Logistic Regression").unwrap();
        assert_eq!(metrics.confusion_matrix.as_ref().unwrap()[1][1], 315);
    }
}
