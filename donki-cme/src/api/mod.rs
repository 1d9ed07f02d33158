//! HTTP API handlers exposing the connector to the reporting host

pub mod auth;
pub mod data;
pub mod health;
pub mod schema;

pub use auth::auth_routes;
pub use data::data_routes;
pub use health::health_routes;
pub use schema::schema_routes;
