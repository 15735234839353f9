//! sunsa-api: Wire types for the Sunsa public REST API
//!
//! Contains the device records, request bodies and status envelopes exchanged
//! with `sunsahomes.com`, shared by the client library and the CLI.

pub mod device;
pub mod requests;
pub mod responses;

pub use device::{Device, DeviceId, Position};
pub use requests::PositionUpdate;
pub use responses::{ApiStatus, DevicesResponse, ERROR_STATUS};
