//! Identify mapping: traits onto the current Braze user profile

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    BrazeDestination,
    dates,
    events::{IdentifyEvent, JsonObject},
    sink::BrazeSink,
    user::{BrazeUser, Gender, Month},
    value::{self, AttributeValue},
};

pub const SUBSCRIPTION_GROUP_KEY: &str = "braze_subscription_groups";
const SUBSCRIPTION_ID_KEY: &str = "subscription_group_id";
const SUBSCRIPTION_STATE_KEY: &str = "subscription_state_id";

/// Traits consumed by dedicated setters, never sent as custom attributes
pub const RESERVED_KEYS: [&str; 10] = [
    "birthday",
    "email",
    "firstName",
    "lastName",
    "gender",
    "phone",
    "address",
    "anonymousId",
    "userId",
    SUBSCRIPTION_GROUP_KEY,
];

impl<S: BrazeSink> BrazeDestination<S> {
    /// Maps an identify call onto the Braze user and returns it unchanged
    pub async fn identify(&self, event: IdentifyEvent) -> IdentifyEvent {
        if self.settings().is_none() {
            debug!("Braze destination not initialized, skipping identify");
            return event;
        }

        if !event.user_id.trim().is_empty() {
            self.sink.change_user(&event.user_id);
        }

        debug!("Traits in BrazeDestination::identify = {:?}", event.traits);

        let Some(user) = self.sink.current_user().await else {
            warn!("Braze current user was not available, skipping identify traits");
            return event;
        };

        map_traits(&user, &event.traits);
        event
    }
}

pub(crate) fn map_traits<U: BrazeUser + ?Sized>(user: &U, traits: &JsonObject) {
    if let Some(groups) = traits.get(SUBSCRIPTION_GROUP_KEY) {
        map_subscription_groups(user, groups);
    }

    if let Some(birthday) = non_blank(traits, "birthday") {
        map_birthday(user, &birthday);
    }

    if let Some(email) = non_blank(traits, "email") {
        user.set_email(&email);
    }
    if let Some(first_name) = non_blank(traits, "firstName") {
        user.set_first_name(&first_name);
    }
    if let Some(last_name) = non_blank(traits, "lastName") {
        user.set_last_name(&last_name);
    }

    if let Some(gender) = non_blank(traits, "gender").and_then(|g| Gender::from_token(&g)) {
        user.set_gender(gender);
    }

    if let Some(phone) = non_blank(traits, "phone") {
        user.set_phone_number(&phone);
    }

    if let Some(address) = traits.get("address").and_then(Value::as_object) {
        if let Some(city) = non_blank(address, "city") {
            user.set_home_city(&city);
        }
        if let Some(country) = non_blank(address, "country") {
            user.set_country(&country);
        }
    }

    for (key, raw) in traits {
        if is_reserved(key) {
            debug!("Skipping reserved key {}", key);
            continue;
        }

        match value::coerce(key, raw) {
            Ok(attribute) => set_custom_attribute(user, key, attribute),
            Err(e) => warn!(
                "Braze can't map segment value for custom Braze user attribute with key {} and value {}: {}",
                key, raw, e
            ),
        }
    }
}

/// Sends a coerced value through the matching typed custom-attribute setter
///
/// Strings that parse as timestamps are stored as seconds since the epoch.
/// Lists are stored as string arrays; empty lists are not stored.
pub fn set_custom_attribute<U: BrazeUser + ?Sized>(user: &U, key: &str, value: AttributeValue) {
    match value {
        AttributeValue::Bool(b) => user.set_custom_bool(key, b),
        AttributeValue::Int(i) => user.set_custom_int(key, i),
        AttributeValue::Long(l) => user.set_custom_long(key, l),
        AttributeValue::Float(f) => user.set_custom_float(key, f),
        AttributeValue::Double(d) => user.set_custom_double(key, d),
        AttributeValue::String(s) => match dates::seconds_from_epoch(&s) {
            Ok(seconds) => user.set_custom_attribute_to_seconds_from_epoch(key, seconds),
            Err(_) => user.set_custom_string(key, &s),
        },
        AttributeValue::List(items) => {
            if items.is_empty() {
                debug!("Skipping empty array for custom attribute {}", key);
                return;
            }
            let values: Vec<String> = items.iter().map(ToString::to_string).collect();
            user.set_custom_attribute_array(key, &values);
        }
        AttributeValue::Map(properties) => user.set_custom_object(key, &properties),
    }
}

fn map_subscription_groups<U: BrazeUser + ?Sized>(user: &U, groups: &Value) {
    let Some(groups) = groups.as_array() else {
        warn!("{} is not an array, skipping", SUBSCRIPTION_GROUP_KEY);
        return;
    };

    for group in groups {
        let Some(group) = group.as_object() else {
            debug!("Skipping subscription group entry that is not an object");
            continue;
        };
        let Some(group_id) = non_blank(group, SUBSCRIPTION_ID_KEY) else {
            debug!("Skipping subscription group entry without a group id");
            continue;
        };

        match group.get(SUBSCRIPTION_STATE_KEY).and_then(Value::as_str) {
            Some("subscribed") => user.add_to_subscription_group(&group_id),
            Some("unsubscribed") => user.remove_from_subscription_group(&group_id),
            state => warn!("Unrecognized Braze subscription state: {:?}", state),
        }
    }
}

fn map_birthday<U: BrazeUser + ?Sized>(user: &U, birthday: &str) {
    let date = match dates::calendar_date(birthday) {
        Ok(date) => date,
        Err(e) => {
            warn!("birthday was in an incorrect format, skipping: {}", e);
            return;
        }
    };

    match Month::from_number(date.month) {
        Some(month) => user.set_date_of_birth(date.year, month, date.day),
        None => warn!("Could not get birthday month from {}, skipping", birthday),
    }
}

pub(crate) fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.iter().any(|reserved| *reserved == key)
}

fn non_blank(object: &JsonObject, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(value::as_string)
        .filter(|s| !s.trim().is_empty())
}
