//! Device-level client for the Sunsa API

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Client;
use serde_json::Value;
use sunsa_api::{
    ApiStatus, Device, DeviceId, DevicesResponse, ERROR_STATUS, Position, PositionUpdate,
};

use crate::error::{ClientError, Result};
use crate::http::{RequestHandler, RequestKind};

/// Client for controlling Sunsa blinds
///
/// Cloning is cheap; clones share the HTTP connection pool and the
/// last-fetched device list.
#[derive(Debug, Clone)]
pub struct SunsaClient {
    handler: RequestHandler,
    devices: Arc<Mutex<Option<Vec<Device>>>>,
}

impl SunsaClient {
    /// Create a client with its own `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the API URL cannot be parsed.
    ///
    /// # Example
    /// ```no_run
    /// use sunsa_client::SunsaClient;
    ///
    /// let client = SunsaClient::new(1234, "my-public-api-key")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(user_id: u64, api_key: impl Into<String>) -> Result<Self> {
        Self::with_client(Client::new(), user_id, api_key)
    }

    /// Create a client on top of an existing `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the API URL cannot be parsed.
    pub fn with_client(client: Client, user_id: u64, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_handler(RequestHandler::new(client, user_id, api_key)?))
    }

    /// Create a client against a different API root, e.g. a proxy
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_base_url(
        base_url: impl AsRef<str>,
        client: Client,
        user_id: u64,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::from_handler(RequestHandler::with_base_url(
            base_url, client, user_id, api_key,
        )?))
    }

    fn from_handler(handler: RequestHandler) -> Self {
        Self {
            handler,
            devices: Arc::new(Mutex::new(None)),
        }
    }

    /// The user id requests are issued for
    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.handler.user_id()
    }

    /// Perform a request and reject bodies that report `"status": "Error"`
    ///
    /// # Errors
    /// Returns [`ClientError::Application`] when the body carries the error
    /// marker, otherwise whatever the transport reports.
    pub async fn send_command(
        &self,
        kind: RequestKind,
        api_method: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let data = self.handler.query(kind, api_method, &[], body).await?;

        if let Some(message) = ApiStatus::from_body(&data).error_message() {
            return Err(ClientError::Application {
                code: ERROR_STATUS.to_string(),
                message: message.to_string(),
            });
        }

        Ok(data)
    }

    /// List every device on the account, in server order
    ///
    /// # Errors
    /// Returns an error if the request fails or the API reports an error.
    ///
    /// # Example
    /// ```no_run
    /// # use sunsa_client::SunsaClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SunsaClient::new(1234, "my-public-api-key")?;
    /// for device in client.list_devices().await? {
    ///     println!("{:?}: {:?}", device.id(), device.position());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let data = self.send_command(RequestKind::Get, "devices", None).await?;
        let DevicesResponse { devices } = serde_json::from_value(data)?;

        *self.devices.lock().unwrap_or_else(PoisonError::into_inner) = Some(devices.clone());

        Ok(devices)
    }

    /// Find a device by id
    ///
    /// Fetches the full list on every call. Returns `Ok(None)` when no device
    /// has the given id.
    ///
    /// # Errors
    /// Returns an error if listing the devices fails.
    pub async fn get_device_info(&self, device_id: impl Into<DeviceId>) -> Result<Option<Device>> {
        let device_id = device_id.into();
        Ok(self
            .list_devices()
            .await?
            .into_iter()
            .find(|device| device.has_id(&device_id)))
    }

    /// Move a blind to `position`
    ///
    /// The position is sent as given, without range checks.
    ///
    /// # Errors
    /// Returns an error if the request fails or the API reports an error.
    ///
    /// # Example
    /// ```no_run
    /// # use sunsa_client::SunsaClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SunsaClient::new(1234, "my-public-api-key")?;
    /// client.update_device_position(5, -30).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_device_position(
        &self,
        device_id: impl Into<DeviceId>,
        position: impl Into<Position>,
    ) -> Result<()> {
        let body = serde_json::to_value(PositionUpdate::new(position))?;
        self.send_command(
            RequestKind::Put,
            &format!("devices/{}", device_id.into()),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    /// The list returned by the last successful [`Self::list_devices`]
    ///
    /// Advisory only: it is never refreshed on its own and concurrent calls
    /// may overwrite each other.
    #[must_use]
    pub fn cached_devices(&self) -> Option<Vec<Device>> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
