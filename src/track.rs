//! Track mapping: attribution, purchases and custom events

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    BrazeDestination,
    error::{BrazeError, Result},
    events::{JsonObject, TrackEvent},
    sink::BrazeSink,
    user::{AttributionData, BrazeUser},
    value::{self, BrazeProperties},
};

pub const INSTALL_EVENT_NAME: &str = "Install Attributed";
pub const PURCHASE_EVENT_NAMES: [&str; 2] = ["Order Completed", "Completed Order"];
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

const REVENUE_KEY: &str = "revenue";
const CURRENCY_KEY: &str = "currency";
const PRODUCTS_KEY: &str = "products";
const CAMPAIGN_KEY: &str = "campaign";

impl<S: BrazeSink> BrazeDestination<S> {
    /// Maps a track call onto Braze and returns it unchanged
    ///
    /// The first matching shape wins: install attribution, purchase, then
    /// a plain custom event.
    pub async fn track(&self, event: TrackEvent) -> TrackEvent {
        let Some(settings) = self.settings() else {
            debug!("Braze destination not initialized, skipping track");
            return event;
        };

        let properties = &event.properties;
        let revenue = properties
            .get(REVENUE_KEY)
            .and_then(value::as_double)
            .unwrap_or(0.0);

        if event.event == INSTALL_EVENT_NAME {
            self.log_attribution(properties).await;
        } else if (settings.log_purchase_when_revenue_present && revenue != 0.0)
            || is_purchase_event(&event.event)
        {
            self.log_purchases(&event.event, revenue, properties);
        } else {
            self.log_custom_event(&event.event, properties);
        }

        event
    }

    async fn log_attribution(&self, properties: &JsonObject) {
        let data = match attribution_data(properties) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "This Install Attributed event is not in the proper format and cannot be logged: {}",
                    e
                );
                return;
            }
        };

        match self.sink.current_user().await {
            Some(user) => user.set_attribution_data(&data),
            None => warn!("Braze current user was not available, dropping attribution data"),
        }
    }

    fn log_purchases(&self, event_name: &str, revenue: f64, properties: &JsonObject) {
        let currency_code = properties
            .get(CURRENCY_KEY)
            .and_then(value::as_string)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let purchase_properties = strip_purchase_keys(properties);
        let purchase_properties = Some(&purchase_properties).filter(|p| !p.is_empty());

        let Some(products) = properties.get(PRODUCTS_KEY).and_then(Value::as_array) else {
            self.log_single_purchase(event_name, &currency_code, revenue, purchase_properties);
            return;
        };

        for product in products {
            let Some(product) = product.as_object() else {
                warn!("Skipping product that is not an object: {}", product);
                continue;
            };
            let Some(product_id) = product
                .get("id")
                .and_then(value::as_string)
                .filter(|id| !id.trim().is_empty())
            else {
                warn!("Skipping product without an id");
                continue;
            };
            let price = product
                .get("price")
                .and_then(value::as_double)
                .unwrap_or(0.0);

            self.log_single_purchase(&product_id, &currency_code, price, purchase_properties);
        }
    }

    fn log_single_purchase(
        &self,
        product_id: &str,
        currency_code: &str,
        price: f64,
        properties: Option<&BrazeProperties>,
    ) {
        let price = match to_decimal(price) {
            Ok(price) => price,
            Err(e) => {
                warn!("Skipping purchase {}: {}", product_id, e);
                return;
            }
        };

        match properties {
            None => info!(
                "Calling braze.logPurchase for purchase {} for {:.2} {} with no properties.",
                product_id, price, currency_code
            ),
            Some(properties) => info!(
                "Calling braze.logPurchase for purchase {} for {:.2} {} with properties {}.",
                product_id, price, currency_code, properties
            ),
        }
        self.sink
            .log_purchase(product_id, currency_code, price, properties);
    }

    fn log_custom_event(&self, event_name: &str, properties: &JsonObject) {
        if properties.is_empty() {
            info!("Calling braze.logCustomEvent for event {}", event_name);
            self.sink.log_custom_event(event_name, None);
            return;
        }

        let braze_properties = strip_purchase_keys(properties);
        info!(
            "Calling braze.logCustomEvent for event {} with properties {}.",
            event_name, braze_properties
        );
        self.sink
            .log_custom_event(event_name, Some(&braze_properties));
    }
}

fn is_purchase_event(event_name: &str) -> bool {
    PURCHASE_EVENT_NAMES.iter().any(|name| *name == event_name)
}

fn attribution_data(properties: &JsonObject) -> Result<AttributionData> {
    let campaign = properties
        .get(CAMPAIGN_KEY)
        .ok_or_else(|| BrazeError::validation("missing campaign"))?
        .as_object()
        .ok_or_else(|| BrazeError::validation("campaign is not an object"))?;

    let field = |key: &str| {
        campaign
            .get(key)
            .and_then(value::as_string)
            .unwrap_or_default()
    };

    Ok(AttributionData::new(
        field("source"),
        field("name"),
        field("ad_group"),
        field("ad_creative"),
    ))
}

/// Event properties without the keys already expressed by a purchase call
fn strip_purchase_keys(properties: &JsonObject) -> BrazeProperties {
    let mut braze_properties = BrazeProperties::from(properties.clone());
    braze_properties.remove_property(REVENUE_KEY);
    braze_properties.remove_property(CURRENCY_KEY);
    braze_properties
}

/// Decimal with the same digits as the shortest rendering of `price`
fn to_decimal(price: f64) -> Result<Decimal> {
    Decimal::from_str(&price.to_string())
        .map_err(|e| BrazeError::validation(format!("invalid price {}: {}", price, e)))
}
