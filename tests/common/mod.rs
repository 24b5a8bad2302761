#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use braze_destination::{
    AttributionData, BrazeConfig, BrazeDestination, BrazeProperties, BrazeSink, BrazeUser, Gender,
    Month, Settings, UpdateType, resolve_with_callback,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Configure(BrazeConfig),
    ChangeUser(String),
    CustomEvent {
        name: String,
        properties: Option<BrazeProperties>,
    },
    Purchase {
        product_id: String,
        currency_code: String,
        price: Decimal,
        properties: Option<BrazeProperties>,
    },
    Flush,
    OpenSession(String),
    CloseSession(String),
    RegisterInAppMessages(String),
    UnregisterInAppMessages(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCall {
    Email(String),
    FirstName(String),
    LastName(String),
    Phone(String),
    HomeCity(String),
    Country(String),
    Gender(Gender),
    DateOfBirth(i32, Month, u32),
    Subscribe(String),
    Unsubscribe(String),
    CustomBool(String, bool),
    CustomInt(String, i32),
    CustomLong(String, i64),
    CustomFloat(String, f32),
    CustomDouble(String, f64),
    CustomString(String, String),
    CustomEpochSeconds(String, i64),
    CustomArray(String, Vec<String>),
    CustomObject(String, BrazeProperties),
    Attribution(AttributionData),
}

/// Profile handle that records every mutation into the owning sink's log
#[derive(Debug, Clone)]
pub struct RecordingUser {
    calls: Arc<Mutex<Vec<UserCall>>>,
}

impl RecordingUser {
    fn record(&self, call: UserCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BrazeUser for RecordingUser {
    fn set_email(&self, email: &str) {
        self.record(UserCall::Email(email.to_string()));
    }
    fn set_first_name(&self, first_name: &str) {
        self.record(UserCall::FirstName(first_name.to_string()));
    }
    fn set_last_name(&self, last_name: &str) {
        self.record(UserCall::LastName(last_name.to_string()));
    }
    fn set_phone_number(&self, phone_number: &str) {
        self.record(UserCall::Phone(phone_number.to_string()));
    }
    fn set_home_city(&self, city: &str) {
        self.record(UserCall::HomeCity(city.to_string()));
    }
    fn set_country(&self, country: &str) {
        self.record(UserCall::Country(country.to_string()));
    }
    fn set_gender(&self, gender: Gender) {
        self.record(UserCall::Gender(gender));
    }
    fn set_date_of_birth(&self, year: i32, month: Month, day: u32) {
        self.record(UserCall::DateOfBirth(year, month, day));
    }
    fn add_to_subscription_group(&self, group_id: &str) {
        self.record(UserCall::Subscribe(group_id.to_string()));
    }
    fn remove_from_subscription_group(&self, group_id: &str) {
        self.record(UserCall::Unsubscribe(group_id.to_string()));
    }
    fn set_custom_bool(&self, key: &str, value: bool) {
        self.record(UserCall::CustomBool(key.to_string(), value));
    }
    fn set_custom_int(&self, key: &str, value: i32) {
        self.record(UserCall::CustomInt(key.to_string(), value));
    }
    fn set_custom_long(&self, key: &str, value: i64) {
        self.record(UserCall::CustomLong(key.to_string(), value));
    }
    fn set_custom_float(&self, key: &str, value: f32) {
        self.record(UserCall::CustomFloat(key.to_string(), value));
    }
    fn set_custom_double(&self, key: &str, value: f64) {
        self.record(UserCall::CustomDouble(key.to_string(), value));
    }
    fn set_custom_string(&self, key: &str, value: &str) {
        self.record(UserCall::CustomString(key.to_string(), value.to_string()));
    }
    fn set_custom_attribute_to_seconds_from_epoch(&self, key: &str, seconds: i64) {
        self.record(UserCall::CustomEpochSeconds(key.to_string(), seconds));
    }
    fn set_custom_attribute_array(&self, key: &str, values: &[String]) {
        self.record(UserCall::CustomArray(key.to_string(), values.to_vec()));
    }
    fn set_custom_object(&self, key: &str, value: &BrazeProperties) {
        self.record(UserCall::CustomObject(key.to_string(), value.clone()));
    }
    fn set_attribution_data(&self, data: &AttributionData) {
        self.record(UserCall::Attribution(data.clone()));
    }
}

/// How the recording sink answers current-user requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserResolution {
    /// Callback fires before `current_user` returns control
    Immediate,
    /// Callback fires later on a separate thread
    Deferred,
    /// No user profile is available
    Unavailable,
}

pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    user_calls: Arc<Mutex<Vec<UserCall>>>,
    resolution: UserResolution,
}

impl RecordingSink {
    pub fn new(resolution: UserResolution) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            user_calls: Arc::new(Mutex::new(Vec::new())),
            resolution,
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn user_calls(&self) -> Vec<UserCall> {
        self.user_calls.lock().unwrap().clone()
    }

    pub fn purchases(&self) -> Vec<SinkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SinkCall::Purchase { .. }))
            .collect()
    }

    pub fn custom_events(&self) -> Vec<SinkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SinkCall::CustomEvent { .. }))
            .collect()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BrazeSink for RecordingSink {
    type User = RecordingUser;
    type Activity = String;

    fn configure(&self, config: &BrazeConfig) {
        self.record(SinkCall::Configure(config.clone()));
    }

    fn change_user(&self, user_id: &str) {
        self.record(SinkCall::ChangeUser(user_id.to_string()));
    }

    async fn current_user(&self) -> Option<RecordingUser> {
        let user = RecordingUser {
            calls: Arc::clone(&self.user_calls),
        };
        match self.resolution {
            UserResolution::Immediate => {
                resolve_with_callback(move |callback| callback.on_success(user)).await
            }
            UserResolution::Deferred => {
                resolve_with_callback(move |callback| {
                    std::thread::spawn(move || callback.on_success(user));
                })
                .await
            }
            UserResolution::Unavailable => {
                resolve_with_callback(|callback| callback.on_error()).await
            }
        }
    }

    fn log_custom_event(&self, event_name: &str, properties: Option<&BrazeProperties>) {
        self.record(SinkCall::CustomEvent {
            name: event_name.to_string(),
            properties: properties.cloned(),
        });
    }

    fn log_purchase(
        &self,
        product_id: &str,
        currency_code: &str,
        price: Decimal,
        properties: Option<&BrazeProperties>,
    ) {
        self.record(SinkCall::Purchase {
            product_id: product_id.to_string(),
            currency_code: currency_code.to_string(),
            price,
            properties: properties.cloned(),
        });
    }

    fn request_immediate_data_flush(&self) {
        self.record(SinkCall::Flush);
    }

    fn open_session(&self, activity: &String) {
        self.record(SinkCall::OpenSession(activity.clone()));
    }

    fn close_session(&self, activity: &String) {
        self.record(SinkCall::CloseSession(activity.clone()));
    }

    fn register_in_app_message_manager(&self, activity: &String) {
        self.record(SinkCall::RegisterInAppMessages(activity.clone()));
    }

    fn unregister_in_app_message_manager(&self, activity: &String) {
        self.record(SinkCall::UnregisterInAppMessages(activity.clone()));
    }
}

pub const API_KEY: &str = "MY_API_KEY";
pub const CUSTOM_ENDPOINT: &str = "https://api.braze.com/v3/";

pub fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn mock_settings(
    api_key: &str,
    custom_endpoint: &str,
    auto_in_app_registration: bool,
    log_purchase_when_revenue_present: bool,
) -> Settings {
    Settings::new(object(json!({
        "Appboy": {
            "apiKey": api_key,
            "customEndpoint": custom_endpoint,
            "automatic_in_app_message_registration_enabled": auto_in_app_registration,
            "logPurchaseWhenRevenuePresent": log_purchase_when_revenue_present
        }
    })))
}

pub fn default_settings() -> Settings {
    mock_settings(API_KEY, CUSTOM_ENDPOINT, true, true)
}

/// Destination initialized with `settings`, plus a handle to its sink
pub fn destination_with(
    settings: &Settings,
    resolution: UserResolution,
) -> (BrazeDestination<RecordingSink>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new(resolution));
    let destination = BrazeDestination::new(Arc::clone(&sink));
    destination.update(settings, UpdateType::Initial);
    (destination, sink)
}

pub fn destination() -> (BrazeDestination<RecordingSink>, Arc<RecordingSink>) {
    destination_with(&default_settings(), UserResolution::Immediate)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
