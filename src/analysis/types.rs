//! Analysis payload model.

use serde::Deserialize;

/// One successful strategy mined from the session history
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessPattern {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub thought_sequence: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Payload from the analysis endpoint. `successful_patterns` only
/// appears once the backend has mined at least one session; while it
/// is absent the metrics block renders nothing at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisData {
    #[serde(default)]
    pub successful_patterns: Option<Vec<SuccessPattern>>,
    #[serde(default)]
    pub reasoning_patterns: serde_json::Value,
    #[serde(default)]
    pub tool_usage_patterns: serde_json::Value,
}

/// Display items for a thought sequence row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceItem {
    Step(String),
    Separator,
}

/// Interleave numbered steps with arrow separators. n steps yield
/// n chips and n-1 separators.
pub fn sequence_chips(steps: &[String]) -> Vec<SequenceItem> {
    let mut items = Vec::with_capacity(steps.len().saturating_mul(2));
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            items.push(SequenceItem::Separator);
        }
        items.push(SequenceItem::Step(format!("{}. {}", i + 1, step)));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_chips_interleave_separators() {
        let steps = vec!["plan".to_string(), "act".to_string(), "check".to_string()];
        let items = sequence_chips(&steps);

        assert_eq!(items.len(), 5);
        assert_eq!(items[0], SequenceItem::Step("1. plan".to_string()));
        assert_eq!(items[1], SequenceItem::Separator);
        assert_eq!(items[2], SequenceItem::Step("2. act".to_string()));
        assert_eq!(items[3], SequenceItem::Separator);
        assert_eq!(items[4], SequenceItem::Step("3. check".to_string()));
    }

    #[test]
    fn test_single_step_has_no_separator() {
        let items = sequence_chips(&["only".to_string()]);
        assert_eq!(items, vec![SequenceItem::Step("1. only".to_string())]);
    }

    #[test]
    fn test_empty_sequence_yields_nothing() {
        assert!(sequence_chips(&[]).is_empty());
    }

    #[test]
    fn test_absent_patterns_deserialize_as_none() {
        let data: AnalysisData =
            serde_json::from_str(r#"{"reasoning_patterns": {"depth": 3}}"#).unwrap();

        assert!(data.successful_patterns.is_none());
        assert_eq!(data.reasoning_patterns["depth"], 3);
        assert!(data.tool_usage_patterns.is_null());
    }

    #[test]
    fn test_empty_patterns_list_stays_present() {
        // An empty list still renders the metrics block header, unlike
        // a missing key
        let data: AnalysisData = serde_json::from_str(r#"{"successful_patterns": []}"#).unwrap();
        assert_eq!(data.successful_patterns.map(|p| p.len()), Some(0));
    }

    #[test]
    fn test_pattern_fields_default_when_missing() {
        let data: AnalysisData = serde_json::from_str(
            r#"{"successful_patterns": [{"strategy": "retry with backoff"}]}"#,
        )
        .unwrap();

        let patterns = data.successful_patterns.unwrap();
        assert_eq!(patterns[0].strategy, "retry with backoff");
        assert!(patterns[0].thought_sequence.is_empty());
        assert!(patterns[0].indicators.is_empty());
    }
}
