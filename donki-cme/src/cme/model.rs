//! Upstream CME records
//!
//! Events and analyses are kept as loose JSON attribute maps: the upstream
//! payload varies (numbers where strings are expected, `null` arrays), and a
//! single odd attribute must not fail the whole response. Accessors return
//! `None` for anything absent, `null` or of the wrong shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// One coronal mass ejection activity record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmeEvent {
    /// Nested analyses; `null`, a missing key or any non-array means none
    #[serde(rename = "cmeAnalyses", default, deserialize_with = "lenient_analyses")]
    pub analyses: Vec<CmeAnalysis>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// One analysis of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmeAnalysis {
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Array elements that are not objects are dropped
fn lenient_analyses<'de, D>(deserializer: D) -> Result<Vec<CmeAnalysis>, D::Error>
where
    D: Deserializer<'de>,
{
    let analyses = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(attributes) => Some(CmeAnalysis { attributes }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(analyses)
}

impl CmeEvent {
    pub fn analyses(&self) -> &[CmeAnalysis] {
        &self.analyses
    }

    pub fn has_analyses(&self) -> bool {
        !self.analyses.is_empty()
    }

    /// Analysis used for field extraction
    ///
    /// The first analysis flagged most accurate; otherwise the first analysis
    /// in upstream order; None when the event has no analyses.
    pub fn resolved_analysis(&self) -> Option<&CmeAnalysis> {
        self.analyses
            .iter()
            .find(|analysis| analysis.is_most_accurate())
            .or_else(|| self.analyses.first())
    }
}

impl CmeAnalysis {
    /// Only a JSON `true` counts; strings such as `"true"` do not
    pub fn is_most_accurate(&self) -> bool {
        matches!(self.attributes.get("isMostAccurate"), Some(Value::Bool(true)))
    }
}

/// Typed read access to a record's attributes
pub trait Attributes {
    fn attributes(&self) -> &Map<String, Value>;

    /// Non-null attribute value
    fn value(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key).filter(|v| !v.is_null())
    }

    /// String attribute; numbers and booleans are rendered as text
    fn text(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(n)),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric attribute; numeric strings are not coerced
    fn number(&self, key: &str) -> Option<Number> {
        match self.value(key)? {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Timestamp attribute parsed as UTC
    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.value(key)? {
            Value::String(s) => donki_common::time::parse_timestamp(s),
            _ => None,
        }
    }
}

impl Attributes for CmeEvent {
    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl Attributes for CmeAnalysis {
    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Shortest textual form of a number (`15.0` renders as `15`)
pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
    }
}

/// Parse a DONKI response body
///
/// An empty body means no events in the range. The body must be a JSON
/// array; elements that are not objects are skipped with a warning.
pub fn parse_events(body: &str) -> Result<Vec<CmeEvent>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<Value> = serde_json::from_str(body)?;
    let events = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<CmeEvent>(item) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, "Skipping malformed CME event: {}", e);
                None
            }
        })
        .collect();

    Ok(events)
}
