//! # Datapoint Resource
//!
//! Sensor-reading records and their lifecycle: model and projection,
//! input validation, and repository operations over a store.

pub mod errors;
pub mod id;
pub mod model;
pub mod repository;
pub mod validation;

pub use errors::{DatapointError, DatapointResult, ErrorResponse, FieldError, Location};
pub use id::{DatapointId, InvalidId};
pub use model::{now, Datapoint, DatapointFields, DatapointView, DayNight, WindDirection};
pub use repository::DatapointRepository;
pub use validation::ListQuery;
