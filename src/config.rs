use bon::Builder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{BrazeError, Result};

/// Key under which the host delivers this destination's settings
pub const INTEGRATION_KEY: &str = "Appboy";

/// How a settings delivery relates to the plugin's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    /// First delivery after the plugin was added
    Initial,
    /// Any later delivery (periodic settings refresh)
    Refresh,
}

/// Raw settings as delivered by the host, keyed by integration name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub integrations: Map<String, Value>,
}

impl Settings {
    pub fn new(integrations: Map<String, Value>) -> Self {
        Self { integrations }
    }

    pub fn has_integration_settings(&self, key: &str) -> bool {
        self.integrations.contains_key(key)
    }

    /// Deserializes the settings object for `key`
    ///
    /// Returns `Ok(None)` when the host did not send settings for the key.
    pub fn destination_settings<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.integrations.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| BrazeError::from(e).with_context(key)),
        }
    }
}

/// Typed settings for the Braze destination
///
/// Values not configured here are expected to come from the engagement
/// SDK's own static configuration.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize, Validate)]
pub struct BrazeSettings {
    #[serde(rename = "apiKey")]
    #[builder(into)]
    #[validate(custom(function = "validate_not_blank"))]
    pub api_key: String,

    #[serde(rename = "customEndpoint", default)]
    #[builder(into, default)]
    pub custom_endpoint: String,

    #[serde(rename = "automatic_in_app_message_registration_enabled", default)]
    #[builder(default = false)]
    pub automatic_in_app_message_registration_enabled: bool,

    #[serde(rename = "logPurchaseWhenRevenuePresent", default = "default_true")]
    #[builder(default = true)]
    pub log_purchase_when_revenue_present: bool,
}

fn default_true() -> bool {
    true
}

#[allow(clippy::ptr_arg)]
fn validate_not_blank(value: &String) -> std::result::Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

impl BrazeSettings {
    pub fn validate_settings(&self) -> Result<()> {
        self.validate()
            .map_err(|e| BrazeError::from(e).with_context("Braze settings"))
    }

    /// The SDK configuration these settings resolve to
    pub fn sdk_config(&self) -> BrazeConfig {
        let custom_endpoint = if self.custom_endpoint.trim().is_empty() {
            None
        } else {
            Some(self.custom_endpoint.clone())
        };

        BrazeConfig::builder()
            .api_key(self.api_key.clone())
            .maybe_custom_endpoint(custom_endpoint)
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SdkFlavor {
    Segment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SdkMetadata {
    Segment,
}

/// Configuration handed to the engagement SDK once, on initial settings
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct BrazeConfig {
    #[builder(into)]
    pub api_key: String,
    #[builder(into)]
    pub custom_endpoint: Option<String>,
    #[builder(default = SdkFlavor::Segment)]
    pub sdk_flavor: SdkFlavor,
    #[builder(default = vec![SdkMetadata::Segment])]
    pub sdk_metadata: Vec<SdkMetadata>,
}
