//! datapoint-api - REST service for meteorological sensor readings
//!
//! Records hold wind speed and direction, temperature, humidity,
//! barometric pressure, altitude and a day/night flag. The service
//! validates, stores, projects and paginates them behind a bearer-token
//! check.

pub mod auth;
pub mod cli;
pub mod datapoint;
pub mod http_server;
pub mod store;
