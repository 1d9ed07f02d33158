//! CME field registry and extractors
//!
//! Every output column is a [`CmeField`] variant. The descriptor, the wire
//! name and the extractor are exhaustive matches on the variant, so adding a
//! column without an extractor does not compile.

use donki_common::schema::{AggregationType, DataType, FieldDescriptor, SemanticType};
use donki_common::time::to_hour_precision;
use donki_common::{FieldValue, Schema};
use once_cell::sync::Lazy;

use super::model::{format_number, Attributes, CmeAnalysis, CmeEvent};

/// Output columns, in canonical schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmeField {
    ActivityId,
    StartTime,
    SourceLocation,
    ActiveRegionNum,
    AnalysisTime21_5,
    AnalysisLatitudeLongitude,
    AnalysisHalfAngle,
    AnalysisSpeed,
    AnalysisType,
    AnalysisNote,
    AnalysisLevelOfData,
    Note,
    Catalog,
}

static FULL_SCHEMA: Lazy<Schema> =
    Lazy::new(|| CmeField::ALL.iter().map(|field| field.descriptor()).collect());

/// Canonical schema, built once per process
pub fn full_schema() -> &'static Schema {
    &FULL_SCHEMA
}

impl CmeField {
    pub const ALL: [CmeField; 13] = [
        CmeField::ActivityId,
        CmeField::StartTime,
        CmeField::SourceLocation,
        CmeField::ActiveRegionNum,
        CmeField::AnalysisTime21_5,
        CmeField::AnalysisLatitudeLongitude,
        CmeField::AnalysisHalfAngle,
        CmeField::AnalysisSpeed,
        CmeField::AnalysisType,
        CmeField::AnalysisNote,
        CmeField::AnalysisLevelOfData,
        CmeField::Note,
        CmeField::Catalog,
    ];

    /// Name used by the host to request this column
    pub fn name(self) -> &'static str {
        match self {
            CmeField::ActivityId => "activityID",
            CmeField::StartTime => "startTime",
            CmeField::SourceLocation => "sourceLocation",
            CmeField::ActiveRegionNum => "activeRegionNum",
            CmeField::AnalysisTime21_5 => "cmeAnalysisTime21_5",
            CmeField::AnalysisLatitudeLongitude => "cmeAnalysisLatitudeLongitude",
            CmeField::AnalysisHalfAngle => "cmeAnalysisHalfAngle",
            CmeField::AnalysisSpeed => "cmeAnalysisSpeed",
            CmeField::AnalysisType => "cmeAnalysisType",
            CmeField::AnalysisNote => "cmeAnalysisNote",
            CmeField::AnalysisLevelOfData => "cmeAnalysisLevelOfData",
            CmeField::Note => "note",
            CmeField::Catalog => "catalog",
        }
    }

    pub fn from_name(name: &str) -> Option<CmeField> {
        CmeField::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn descriptor(self) -> FieldDescriptor {
        let name = self.name();
        match self {
            CmeField::ActivityId => FieldDescriptor::dimension(name, "Activity ID", DataType::String),
            CmeField::StartTime => FieldDescriptor::dimension(name, "Start Time", DataType::String)
                .with_semantic_type(SemanticType::YearMonthDayHour),
            CmeField::SourceLocation => FieldDescriptor::dimension(name, "Source Location", DataType::String),
            CmeField::ActiveRegionNum => FieldDescriptor::dimension(name, "Active Region", DataType::String),
            CmeField::AnalysisTime21_5 => FieldDescriptor::dimension(name, "CME Time", DataType::String)
                .with_semantic_type(SemanticType::YearMonthDayHour),
            CmeField::AnalysisLatitudeLongitude => {
                FieldDescriptor::dimension(name, "CME Latitude and Longitude", DataType::String)
                    .with_semantic_type(SemanticType::LatitudeLongitude)
            }
            CmeField::AnalysisHalfAngle => {
                FieldDescriptor::metric(name, "CME Half Angle", DataType::Number, AggregationType::Average)
                    .with_semantic_type(SemanticType::Number)
            }
            CmeField::AnalysisSpeed => {
                FieldDescriptor::metric(name, "CME Speed", DataType::Number, AggregationType::Average)
                    .with_semantic_type(SemanticType::Number)
            }
            CmeField::AnalysisType => FieldDescriptor::dimension(name, "CME Type", DataType::String),
            CmeField::AnalysisNote => FieldDescriptor::dimension(name, "CME Note", DataType::String)
                .with_semantic_type(SemanticType::Text),
            CmeField::AnalysisLevelOfData => {
                FieldDescriptor::dimension(name, "CME Level of Data", DataType::Number)
                    .with_semantic_type(SemanticType::Number)
            }
            CmeField::Note => FieldDescriptor::dimension(name, "Note", DataType::String)
                .with_semantic_type(SemanticType::Text),
            CmeField::Catalog => FieldDescriptor::dimension(name, "Catalog", DataType::String),
        }
    }

    /// Value of this column for one event and its resolved analysis
    ///
    /// Absent or mistyped attributes produce `FieldValue::Null`.
    pub fn extract(self, event: &CmeEvent, analysis: &CmeAnalysis) -> FieldValue {
        match self {
            CmeField::ActivityId => event.text("activityID").into(),
            CmeField::StartTime => event
                .timestamp("startTime")
                .map(|t| to_hour_precision(&t))
                .into(),
            CmeField::SourceLocation => event.text("sourceLocation").into(),
            CmeField::ActiveRegionNum => event.text("activeRegionNum").into(),
            CmeField::AnalysisTime21_5 => analysis
                .timestamp("time21_5")
                .map(|t| to_hour_precision(&t))
                .into(),
            CmeField::AnalysisLatitudeLongitude => {
                match (analysis.number("latitude"), analysis.number("longitude")) {
                    (Some(lat), Some(lon)) => {
                        format!("{},{}", format_number(&lat), format_number(&lon)).into()
                    }
                    _ => FieldValue::Null,
                }
            }
            CmeField::AnalysisHalfAngle => analysis.number("halfAngle").map(FieldValue::Number).into(),
            CmeField::AnalysisSpeed => analysis.number("speed").map(FieldValue::Number).into(),
            CmeField::AnalysisType => analysis.text("type").into(),
            CmeField::AnalysisNote => analysis.text("note").into(),
            CmeField::AnalysisLevelOfData => {
                analysis.number("levelOfData").map(FieldValue::Number).into()
            }
            CmeField::Note => event.text("note").into(),
            CmeField::Catalog => event.text("catalog").into(),
        }
    }
}
