//! sunsa-client: HTTP client library for Sunsa smart blinds
//!
//! Wraps the public REST API at `sunsahomes.com`: list the devices on an
//! account, look one up, and move a blind to a new position.
//!
//! Two kinds of failure surface through [`ClientError`]: a response with a
//! status other than `200 OK` ([`ClientError::Api`]) and a `200 OK` whose body
//! says `"status": "Error"` ([`ClientError::Application`]).
//!
//! # Example
//!
//! ```no_run
//! use sunsa_client::SunsaClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = reqwest::Client::new();
//! let client = SunsaClient::with_client(http, 1234, "my-public-api-key")?;
//!
//! // List devices
//! let devices = client.list_devices().await?;
//!
//! // Look one up
//! if let Some(device) = client.get_device_info(5).await? {
//!     println!("{:?} is at {:?}", device.name(), device.position());
//! }
//!
//! // Open it
//! client.update_device_position(5, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;

pub use client::SunsaClient;
pub use error::{ClientError, ErrorCode, Result};
pub use http::{RequestHandler, RequestKind};
pub use sunsa_api::{Device, DeviceId, Position};
