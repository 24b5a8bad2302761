use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct IdentifyEvent {
    #[serde(rename = "userId", default)]
    #[builder(into, default)]
    pub user_id: String,

    #[serde(rename = "anonymousId", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub anonymous_id: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub traits: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct TrackEvent {
    #[builder(into)]
    pub event: String,

    #[serde(default)]
    #[builder(default)]
    pub properties: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct GroupEvent {
    #[serde(rename = "groupId")]
    #[builder(into)]
    pub group_id: String,

    #[serde(default)]
    #[builder(default)]
    pub traits: JsonObject,
}

/// An analytics event as delivered by the host pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Identify(IdentifyEvent),
    Track(TrackEvent),
    Group(GroupEvent),
}

impl From<IdentifyEvent> for Event {
    fn from(event: IdentifyEvent) -> Self {
        Self::Identify(event)
    }
}

impl From<TrackEvent> for Event {
    fn from(event: TrackEvent) -> Self {
        Self::Track(event)
    }
}

impl From<GroupEvent> for Event {
    fn from(event: GroupEvent) -> Self {
        Self::Group(event)
    }
}
