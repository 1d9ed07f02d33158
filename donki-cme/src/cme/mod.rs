//! CME domain: upstream record model, field registry and the transform pipeline

pub mod fields;
pub mod model;
pub mod transform;

pub use fields::{full_schema, CmeField};
pub use model::{CmeAnalysis, CmeEvent};
pub use transform::{transform, TransformError};
