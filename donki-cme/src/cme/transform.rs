//! Event-to-row transform pipeline
//!
//! **Algorithm:**
//! 1. Resolve every requested name to a [`CmeField`]; an unknown name fails
//!    the whole call before any row is built
//! 2. For each event in upstream order, skip it if it has no analyses
//! 3. Otherwise resolve its analysis (most accurate, else first) and extract
//!    each requested field in request order
//!
//! No sorting, filtering, deduplication or aggregation happens here; the host
//! aggregates.

use donki_common::{DataRow, RequestedField};
use thiserror::Error;

use super::fields::CmeField;
use super::model::CmeEvent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("No extractor for requested field '{0}'")]
    UnknownField(String),
}

/// Resolve requested names to fields, preserving order
pub fn resolve_fields(requested: &[RequestedField]) -> Result<Vec<CmeField>, TransformError> {
    requested
        .iter()
        .map(|field| {
            CmeField::from_name(&field.name)
                .ok_or_else(|| TransformError::UnknownField(field.name.clone()))
        })
        .collect()
}

/// Convert upstream events to rows of the requested fields
pub fn transform(
    events: &[CmeEvent],
    requested: &[RequestedField],
) -> Result<Vec<DataRow>, TransformError> {
    let fields = resolve_fields(requested)?;

    let rows: Vec<DataRow> = events
        .iter()
        .filter_map(|event| {
            let analysis = event.resolved_analysis()?;
            let values = fields
                .iter()
                .map(|field| field.extract(event, analysis))
                .collect();
            Some(DataRow::new(values))
        })
        .collect();

    let skipped = events.len() - rows.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped events without analyses");
    }
    tracing::debug!(
        events = events.len(),
        rows = rows.len(),
        fields = fields.len(),
        "Transformed CME events"
    );

    Ok(rows)
}
