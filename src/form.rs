//! Profile form serialization.
//!
//! Field values arrive as raw text. They are coerced with the same leading-prefix
//! rules a browser applies (`parseInt` / `parseFloat`), so `"3.9abc"` is `3.9`
//! and `"abc"` is not a number. Nothing is range-checked here; the prediction
//! service is the only validator.

use serde::Deserialize;

use crate::model::PredictionRequest;

/// Element ids of the six profile inputs, in form order.
pub const FIELD_IDS: [&str; 6] = [
    "year_of_study",
    "cgpa",
    "family_income",
    "cocurricular_score",
    "leadership_positions",
    "community_service_hours",
];

/// Raw text of the profile inputs, as posted by the form.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ProfileForm {
    #[serde(default)]
    pub year_of_study: String,
    #[serde(default)]
    pub cgpa: String,
    #[serde(default)]
    pub family_income: String,
    #[serde(default)]
    pub cocurricular_score: String,
    #[serde(default)]
    pub leadership_positions: String,
    #[serde(default)]
    pub community_service_hours: String,
}

impl ProfileForm {
    pub fn value(&self, id: &str) -> Option<&str> {
        let value = match id {
            "year_of_study" => &self.year_of_study,
            "cgpa" => &self.cgpa,
            "family_income" => &self.family_income,
            "cocurricular_score" => &self.cocurricular_score,
            "leadership_positions" => &self.leadership_positions,
            "community_service_hours" => &self.community_service_hours,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn serialize(&self) -> PredictionRequest {
        PredictionRequest {
            year_of_study: parse_int(&self.year_of_study),
            cgpa: parse_float(&self.cgpa),
            family_income: parse_int(&self.family_income),
            cocurricular_score: parse_int(&self.cocurricular_score),
            leadership_positions: parse_int(&self.leadership_positions),
            community_service_hours: parse_int(&self.community_service_hours),
        }
    }
}

/// Leading-integer parse. Accepts surrounding junk after the digits and a `0x`
/// prefix for hex. Values that overflow `i64` are treated as not a number.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = split_sign(s);
    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let magnitude = i64::from_str_radix(&s[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Leading-decimal parse: optional sign, digits, fraction and exponent.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    // exponent only counts when digits follow it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}
