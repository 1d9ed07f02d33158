//! Tabular schema types exchanged with the reporting host
//!
//! Field descriptors serialize in the host's wire format (`dataType`,
//! `semantics.conceptType`, `defaultAggregationType`, upper-case enum values),
//! so a [`Schema`] can be returned to the host as-is.

use serde::{Deserialize, Serialize};

/// Ordered list of field descriptors
pub type Schema = Vec<FieldDescriptor>;

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    String,
    Number,
    Boolean,
}

/// Whether a column is a dimension or a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConceptType {
    Dimension,
    Metric,
}

/// Default aggregation the host applies to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationType {
    #[serde(rename = "AVG")]
    Average,
    #[serde(rename = "COUNT")]
    Count,
    #[serde(rename = "COUNT_DISTINCT")]
    CountDistinct,
    #[serde(rename = "MAX")]
    Max,
    #[serde(rename = "MIN")]
    Min,
    #[serde(rename = "SUM")]
    Sum,
}

/// Semantic subtype (temporal, geo, numeric, text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    Year,
    YearQuarter,
    YearMonth,
    YearWeek,
    YearMonthDay,
    YearMonthDayHour,
    Quarter,
    Month,
    Week,
    MonthDay,
    DayOfWeek,
    Day,
    Hour,
    Minute,
    Duration,
    Country,
    CountryCode,
    Continent,
    ContinentCode,
    SubContinent,
    SubContinentCode,
    Region,
    RegionCode,
    City,
    CityCode,
    MetroCode,
    LatitudeLongitude,
    Number,
    Percent,
    Text,
    Boolean,
    Url,
    Image,
}

/// Semantic role of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semantics {
    pub concept_type: ConceptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<SemanticType>,
}

/// Metadata describing one output column
///
/// Construct with [`FieldDescriptor::dimension`] or [`FieldDescriptor::metric`];
/// only metrics carry a default aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Stable identifier, unique within a schema
    pub name: String,
    /// Display name
    pub label: String,
    pub data_type: DataType,
    pub semantics: Semantics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_aggregation_type: Option<AggregationType>,
}

impl FieldDescriptor {
    /// Dimension column without a default aggregation
    pub fn dimension(name: impl Into<String>, label: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            data_type,
            semantics: Semantics {
                concept_type: ConceptType::Dimension,
                semantic_type: None,
            },
            default_aggregation_type: None,
        }
    }

    /// Metric column with a default aggregation
    pub fn metric(
        name: impl Into<String>,
        label: impl Into<String>,
        data_type: DataType,
        aggregation: AggregationType,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            data_type,
            semantics: Semantics {
                concept_type: ConceptType::Metric,
                semantic_type: None,
            },
            default_aggregation_type: Some(aggregation),
        }
    }

    pub fn with_semantic_type(mut self, semantic_type: SemanticType) -> Self {
        self.semantics.semantic_type = Some(semantic_type);
        self
    }

    pub fn concept_type(&self) -> ConceptType {
        self.semantics.concept_type
    }
}

/// Field requested by the host, referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedField {
    pub name: String,
}

impl RequestedField {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Narrow a schema to the requested fields
///
/// Returns the descriptors of `full` whose names match `requested`, in the
/// order given by `requested`. Names with no match are dropped silently.
/// `full` is never modified.
pub fn narrow_schema(requested: &[RequestedField], full: &[FieldDescriptor]) -> Schema {
    let subset: Schema = requested
        .iter()
        .filter_map(|field| full.iter().find(|descriptor| descriptor.name == field.name))
        .cloned()
        .collect();

    tracing::debug!(
        requested = requested.len(),
        matched = subset.len(),
        "Narrowed schema to requested fields"
    );

    subset
}

/// One cell of a data row
///
/// Serializes untagged, so a row reads `["A1", 500]` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Data type this value satisfies; `None` for null, which fits any column
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            FieldValue::Null => None,
            FieldValue::Boolean(_) => Some(DataType::Boolean),
            FieldValue::Number(_) => Some(DataType::Number),
            FieldValue::String(_) => Some(DataType::String),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// One output record, values in requested-field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub values: Vec<FieldValue>,
}

impl DataRow {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }
}
