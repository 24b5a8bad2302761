use serde::{Deserialize, Serialize};

use crate::value::BrazeProperties;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

const MALE_TOKENS: [&str; 2] = ["M", "MALE"];
const FEMALE_TOKENS: [&str; 2] = ["F", "FEMALE"];

impl Gender {
    /// Case-insensitive match against the known gender tokens
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_uppercase();
        if MALE_TOKENS.iter().any(|t| *t == token) {
            Some(Self::Male)
        } else if FEMALE_TOKENS.iter().any(|t| *t == token) {
            Some(Self::Female)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month for a 1-based month number
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }
}

/// Install campaign metadata attached to a user once, at install time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionData {
    #[serde(rename = "source")]
    pub network: String,
    pub campaign: String,
    #[serde(rename = "adgroup")]
    pub ad_group: String,
    #[serde(rename = "ad")]
    pub creative: String,
}

impl AttributionData {
    pub fn new(
        network: impl Into<String>,
        campaign: impl Into<String>,
        ad_group: impl Into<String>,
        creative: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            campaign: campaign.into(),
            ad_group: ad_group.into(),
            creative: creative.into(),
        }
    }
}

/// A resolved user profile in the engagement SDK
///
/// Implementations are expected to be internally synchronized; every
/// mutation takes `&self` and may run on a thread owned by the SDK.
pub trait BrazeUser: Send + Sync {
    fn set_email(&self, email: &str);
    fn set_first_name(&self, first_name: &str);
    fn set_last_name(&self, last_name: &str);
    fn set_phone_number(&self, phone_number: &str);
    fn set_home_city(&self, city: &str);
    fn set_country(&self, country: &str);
    fn set_gender(&self, gender: Gender);
    fn set_date_of_birth(&self, year: i32, month: Month, day: u32);

    fn add_to_subscription_group(&self, group_id: &str);
    fn remove_from_subscription_group(&self, group_id: &str);

    fn set_custom_bool(&self, key: &str, value: bool);
    fn set_custom_int(&self, key: &str, value: i32);
    fn set_custom_long(&self, key: &str, value: i64);
    fn set_custom_float(&self, key: &str, value: f32);
    fn set_custom_double(&self, key: &str, value: f64);
    fn set_custom_string(&self, key: &str, value: &str);
    fn set_custom_attribute_to_seconds_from_epoch(&self, key: &str, seconds: i64);
    fn set_custom_attribute_array(&self, key: &str, values: &[String]);
    fn set_custom_object(&self, key: &str, value: &BrazeProperties);

    fn set_attribution_data(&self, data: &AttributionData);
}
