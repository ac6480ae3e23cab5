//! Model output parsing into a typed [`SimulationResponse`].
//!
//! The model returns raw text that is usually, but not always, clean JSON.
//! Extraction tries several recovery strategies; once a JSON object is in
//! hand, validation is strict. A missing field, a wrong type, or a
//! sentiment or classification outside the fixed sets fails the turn.
//! Only the two percentage fields are forgiven: out-of-range integers are
//! clamped into `0..=100` before typed deserialization.

use prosperity_types::{GAUGE_MAX, SimulationResponse};
use serde_json::Value;

use crate::error::OracleClientError;

/// JSON pointers of the percentage fields clamped before validation.
const PERCENT_FIELDS: [&str; 2] = [
    "/windows/warRoom/resourceAllocation",
    "/windows/internalReport/veracityScore",
];

/// Pointer of the street view image, which only the image backend may set.
const IMAGE_FIELD_PARENT: &str = "/windows/streetView";

/// Parse model output into a validated [`SimulationResponse`].
///
/// Recovery strategies, in order:
/// 1. Direct `serde_json` parse
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Code block extraction followed by comma stripping
///
/// # Errors
///
/// Returns [`OracleClientError::Parse`] if no strategy yields a JSON
/// object, or if the object does not satisfy the response contract.
pub fn parse_simulation_response(raw: &str) -> Result<SimulationResponse, OracleClientError> {
    let mut value = extract_json_object(raw)?;
    normalize(&mut value);
    serde_json::from_value(value)
        .map_err(|e| OracleClientError::Parse(format!("response violates contract: {e}")))
}

/// Run the recovery strategies and return the first JSON object found.
fn extract_json_object(raw: &str) -> Result<Value, OracleClientError> {
    let trimmed = raw.trim();
    let as_object = |text: &str| serde_json::from_str::<Value>(text).ok().filter(Value::is_object);

    // Strategy 1: direct parse
    if let Some(value) = as_object(trimmed) {
        return Ok(value);
    }

    // Strategy 2: extract from markdown code block
    let block = extract_json_from_codeblock(trimmed);
    if let Some(value) = block.and_then(as_object) {
        return Ok(value);
    }

    // Strategy 3: strip trailing commas and retry
    if let Some(value) = as_object(&strip_trailing_commas(trimmed)) {
        return Ok(value);
    }

    // Strategy 4: extract from code block then strip commas
    if let Some(value) = block.and_then(|b| as_object(&strip_trailing_commas(b))) {
        return Ok(value);
    }

    Err(OracleClientError::Parse(format!(
        "no JSON object found in response of {} bytes",
        trimmed.len()
    )))
}

/// Clamp percentage fields and drop any image the model invented.
fn normalize(value: &mut Value) {
    for pointer in PERCENT_FIELDS {
        if let Some(field) = value.pointer_mut(pointer)
            && let Some(n) = field.as_i64()
        {
            *field = Value::from(n.clamp(0, i64::from(GAUGE_MAX)));
        }
    }
    if let Some(view) = value
        .pointer_mut(IMAGE_FIELD_PARENT)
        .and_then(Value::as_object_mut)
    {
        view.remove("image");
    }
}

/// Extract the body of the first fenced code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    // Look for ```json ... ``` or ``` ... ```
    let fence = text.find("```")?;
    let after_fence = fence.checked_add(3)?;
    let rest = text.get(after_fence..)?;
    let body_start = rest.find('\n').and_then(|nl| nl.checked_add(1)).unwrap_or(0);
    let body = rest.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// Strip trailing commas before closing braces and brackets (common LLM error).
///
/// Commas inside string literals are left alone.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                result.push(c);
            }
            ',' => {
                let lookahead = chars.clone().find(|n| !n.is_whitespace());
                if !matches!(lookahead, Some('}' | ']')) {
                    result.push(c);
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prosperity_types::{IntelligenceLevel, Sentiment};

    use super::*;

    fn valid_json() -> Value {
        serde_json::json!({
            "narrativeOutcome": "港口罢工平息。",
            "visualChanges": "办公室灯光闪烁。",
            "deltaFog": -2,
            "deltaClarity": 3,
            "windows": {
                "warRoom": {
                    "status": "黄色警戒",
                    "activeThreats": ["能源过载"],
                    "resourceAllocation": 64
                },
                "media": {
                    "headlines": ["聚变并网延期"],
                    "sentiment": "愤怒",
                    "trendingTopic": "机器税"
                },
                "streetView": {
                    "description": "自动化港口的夜景。",
                    "weather": "酸雨",
                    "crowdMood": "焦躁",
                    "visualDetails": ["集装箱", "巡逻无人机"]
                },
                "internalReport": {
                    "title": "能源部密报",
                    "content": "反应堆三号机组温度异常。",
                    "intelligenceLevel": "内部限阅",
                    "veracityScore": 55
                }
            },
            "nextSceneContext": "内阁要求您在下午给出预算方案。",
            "newClauses": ["征收机器人税", "延长宵禁"],
            "newQuickReplies": ["静观其变。"]
        })
    }

    #[test]
    fn parse_clean_json() {
        let response = parse_simulation_response(&valid_json().to_string()).unwrap();
        assert_eq!(response.delta_fog, -2);
        assert_eq!(response.windows.media.sentiment, Sentiment::Angry);
        assert_eq!(
            response.windows.internal_report.intelligence_level,
            IntelligenceLevel::InternalRestricted
        );
        assert_eq!(response.windows.street_view.image, None);
    }

    #[test]
    fn parse_from_code_block() {
        let raw = format!("好的，以下是结果：\n```json\n{}\n```\n", valid_json());
        let response = parse_simulation_response(&raw).unwrap();
        assert_eq!(response.new_clauses.len(), 2);
    }

    #[test]
    fn parse_from_untagged_code_block_with_trailing_commas() {
        let pretty = serde_json::to_string_pretty(&valid_json()).unwrap();
        let sloppy = pretty.replace("\"巡逻无人机\"", "\"巡逻无人机\",");
        let raw = format!("```\n{sloppy}\n```");
        let response = parse_simulation_response(&raw).unwrap();
        assert_eq!(response.windows.street_view.visual_details.len(), 2);
    }

    #[test]
    fn trailing_comma_repair_keeps_commas_inside_strings() {
        let input = r#"{"a": "x, }", "b": [1, 2,],}"#;
        assert_eq!(strip_trailing_commas(input), r#"{"a": "x, }", "b": [1, 2]}"#);
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut json = valid_json();
        json.as_object_mut().unwrap().remove("newQuickReplies");
        let result = parse_simulation_response(&json.to_string());
        assert!(matches!(result, Err(OracleClientError::Parse(_))));
    }

    #[test]
    fn unknown_sentiment_is_rejected() {
        let mut json = valid_json();
        *json.pointer_mut("/windows/media/sentiment").unwrap() = Value::from("cheerful");
        assert!(parse_simulation_response(&json.to_string()).is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut json = valid_json();
        *json.pointer_mut("/deltaFog").unwrap() = Value::from("minus two");
        assert!(parse_simulation_response(&json.to_string()).is_err());
    }

    #[test]
    fn percentages_are_clamped() {
        let mut json = valid_json();
        *json.pointer_mut("/windows/warRoom/resourceAllocation").unwrap() = Value::from(140);
        *json.pointer_mut("/windows/internalReport/veracityScore").unwrap() = Value::from(-8);
        let response = parse_simulation_response(&json.to_string()).unwrap();
        assert_eq!(response.windows.war_room.resource_allocation, 100);
        assert_eq!(response.windows.internal_report.veracity_score, 0);
    }

    #[test]
    fn model_supplied_image_is_dropped() {
        let mut json = valid_json();
        json.pointer_mut("/windows/streetView")
            .and_then(Value::as_object_mut)
            .unwrap()
            .insert("image".to_owned(), Value::from("https://example.com/fake.png"));
        let response = parse_simulation_response(&json.to_string()).unwrap();
        assert_eq!(response.windows.street_view.image, None);
    }

    #[test]
    fn prose_without_json_is_rejected() {
        assert!(parse_simulation_response("联邦主脑拒绝回答。").is_err());
        assert!(parse_simulation_response("[1, 2, 3]").is_err());
    }
}
