//! The engagement SDK surface the destination drives
//!
//! Everything network- or storage-related lives behind [`BrazeSink`]. The
//! destination is handed a sink at construction and never reaches for a
//! process-wide instance.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::config::BrazeConfig;
use crate::user::BrazeUser;
use crate::value::BrazeProperties;

#[async_trait]
pub trait BrazeSink: Send + Sync {
    /// Profile handle returned by [`BrazeSink::current_user`]
    type User: BrazeUser;

    /// Platform activity handed through on lifecycle callbacks
    type Activity: Send + Sync;

    /// Applies the SDK configuration; called once, on initial settings
    fn configure(&self, config: &BrazeConfig);

    fn change_user(&self, user_id: &str);

    /// Resolves the active user profile
    ///
    /// The SDK may answer on one of its own threads. `None` means no
    /// profile is available and no user mutation should happen.
    async fn current_user(&self) -> Option<Self::User>;

    fn log_custom_event(&self, event_name: &str, properties: Option<&BrazeProperties>);

    fn log_purchase(
        &self,
        product_id: &str,
        currency_code: &str,
        price: Decimal,
        properties: Option<&BrazeProperties>,
    );

    fn request_immediate_data_flush(&self);

    fn open_session(&self, activity: &Self::Activity);
    fn close_session(&self, activity: &Self::Activity);

    fn register_in_app_message_manager(&self, activity: &Self::Activity);
    fn unregister_in_app_message_manager(&self, activity: &Self::Activity);
}
