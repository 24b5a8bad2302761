//! Braze destination for Segment-style analytics pipelines
//!
//! Maps loosely typed identify and track payloads onto the Braze engagement
//! SDK's user-profile and event-logging model.
//!
//! # Example
//!
//! ```rust, ignore
//! use std::sync::Arc;
//! use braze_destination::{BrazeDestination, IdentifyEvent, Settings, UpdateType};
//!
//! async fn forward(sink: Arc<MySink>, settings: Settings) {
//!     let destination = BrazeDestination::new(sink);
//!     destination.update(&settings, UpdateType::Initial);
//!
//!     let event = IdentifyEvent::builder()
//!         .user_id("user-123")
//!         .traits(serde_json::json!({ "email": "user@example.com" }).as_object().cloned().unwrap())
//!         .build();
//!
//!     let echoed = destination.identify(event).await;
//! }
//! ```

pub mod config;
pub mod dates;
pub mod error;
pub mod events;
mod identify;
pub mod resolver;
pub mod sink;
mod track;
pub mod user;
pub mod value;

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

pub use config::{
    BrazeConfig, BrazeSettings, INTEGRATION_KEY, SdkFlavor, SdkMetadata, Settings, UpdateType,
};
pub use error::{BrazeError, Result};
pub use events::{Event, GroupEvent, IdentifyEvent, JsonObject, TrackEvent};
pub use identify::{RESERVED_KEYS, SUBSCRIPTION_GROUP_KEY, set_custom_attribute};
pub use resolver::{UserCallback, resolve_with_callback};
pub use sink::BrazeSink;
pub use track::{DEFAULT_CURRENCY_CODE, INSTALL_EVENT_NAME, PURCHASE_EVENT_NAMES};
pub use user::{AttributionData, BrazeUser, Gender, Month};
pub use value::{AttributeValue, BrazeProperties};

/// Destination plugin forwarding analytics events to a [`BrazeSink`]
///
/// The destination stays inert until an initial settings delivery with a
/// usable API key arrives. From then on the settings are fixed for the
/// plugin's lifetime.
pub struct BrazeDestination<S: BrazeSink> {
    sink: Arc<S>,
    settings: OnceLock<BrazeSettings>,
}

impl<S: BrazeSink> BrazeDestination<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            settings: OnceLock::new(),
        }
    }

    /// Integration key this destination reads its settings from
    pub fn key(&self) -> &'static str {
        INTEGRATION_KEY
    }

    pub fn settings(&self) -> Option<&BrazeSettings> {
        self.settings.get()
    }

    /// Applies a settings delivery from the host
    ///
    /// Only the first successful [`UpdateType::Initial`] delivery configures
    /// the SDK. Refreshes and later initial deliveries leave the settings
    /// untouched. Bad settings are logged and never surface to the host.
    pub fn update(&self, settings: &Settings, update_type: UpdateType) {
        if !settings.has_integration_settings(self.key()) {
            info!("Braze destination is disabled via settings");
            return;
        }
        info!("Braze destination is enabled");

        if update_type != UpdateType::Initial {
            return;
        }
        if self.settings.get().is_some() {
            debug!("Braze destination already initialized, ignoring initial settings");
            return;
        }

        let braze_settings = match self.resolve_settings(settings) {
            Ok(braze_settings) => braze_settings,
            Err(e) => {
                warn!("Braze settings not available, not loading Braze destination: {e}");
                return;
            }
        };

        let config = braze_settings.sdk_config();
        if self.settings.set(braze_settings).is_err() {
            debug!("Braze destination initialized concurrently, ignoring initial settings");
            return;
        }
        self.sink.configure(&config);
        info!("Braze destination loaded");
    }

    fn resolve_settings(&self, settings: &Settings) -> Result<BrazeSettings> {
        let braze_settings: BrazeSettings = settings
            .destination_settings(self.key())?
            .ok_or_else(|| BrazeError::configuration("no settings for integration"))?;
        braze_settings.validate_settings()?;
        Ok(braze_settings)
    }

    /// Routes an event to its handler and returns it unchanged
    pub async fn execute(&self, event: Event) -> Event {
        match event {
            Event::Identify(identify) => Event::Identify(self.identify(identify).await),
            Event::Track(track) => Event::Track(self.track(track).await),
            Event::Group(group) => Event::Group(self.group(group)),
        }
    }

    /// Group calls have no Braze counterpart and pass through untouched
    pub fn group(&self, event: GroupEvent) -> GroupEvent {
        debug!("Ignoring group call for group {}", event.group_id);
        event
    }

    pub fn flush(&self) {
        debug!("Calling braze.requestImmediateDataFlush()");
        self.sink.request_immediate_data_flush();
    }

    pub fn on_activity_started(&self, activity: &S::Activity) {
        self.sink.open_session(activity);
    }

    pub fn on_activity_stopped(&self, activity: &S::Activity) {
        self.sink.close_session(activity);
    }

    pub fn on_activity_resumed(&self, activity: &S::Activity) {
        if self.in_app_registration_enabled() {
            self.sink.register_in_app_message_manager(activity);
        }
    }

    pub fn on_activity_paused(&self, activity: &S::Activity) {
        if self.in_app_registration_enabled() {
            self.sink.unregister_in_app_message_manager(activity);
        }
    }

    fn in_app_registration_enabled(&self) -> bool {
        self.settings()
            .is_some_and(|s| s.automatic_in_app_message_registration_enabled)
    }
}
