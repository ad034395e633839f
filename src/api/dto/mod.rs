//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire to match what the device
//! firmware and the browser console already parse.

pub mod auth_dto;
pub mod device_dto;
pub mod led_dto;
pub mod sensor_dto;
pub mod system_dto;

pub use auth_dto::*;
pub use device_dto::*;
pub use led_dto::*;
pub use sensor_dto::*;
pub use system_dto::*;
