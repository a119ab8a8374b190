//! Fixture records for provmap tests
//!
//! Model/Plain pairs shaped like a monitoring provider's resources: checks
//! with nested schedules, status-page components scoped under a page, and
//! alert channels whose id is numeric on one side and text on the other.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use provmap_codec::{Decimal, Duration, HeaderBlock, RawJson};
use provmap_mapper::{record, resolve_identity, Identity, PrimaryKey, TriState};

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ScheduleModel {
        pub weekdays: TriState<IndexSet<String>>,
        pub start: TriState<String>,
        pub timeout: TriState<Duration>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SchedulePlain {
        pub weekdays: Vec<String>,
        pub start: String,
        pub timeout: Option<String>,
    }
}

record! {
    /// Configuration side of an uptime check
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CheckModel {
        #[map(rename = "check_id", pk, opt)]
        pub id: TriState<i64>,
        pub name: TriState<String>,
        pub url: TriState<String>,
        pub frequency: TriState<Duration>,
        pub paused: TriState<bool>,
        pub description: TriState<String>,
        pub threshold: TriState<Decimal>,
        pub tags: TriState<IndexSet<String>>,
        pub labels: TriState<IndexMap<String, String>>,
        pub schedule: TriState<Vec<ScheduleModel>>,
        /// Extra request headers, one entry per header name
        #[map(extra = HeaderBlock)]
        pub request_headers: TriState<HeaderBlock>,
        pub body: TriState<RawJson>,
    }
}

record! {
    /// API side of an uptime check
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CheckPlain {
        #[map(rename = "id", pk, opt)]
        pub check_id: Option<i64>,
        pub name: String,
        pub url: String,
        pub frequency: String,
        pub paused: bool,
        pub description: Option<String>,
        pub threshold: Option<String>,
        pub tags: Vec<String>,
        pub labels: BTreeMap<String, String>,
        pub schedule: Vec<SchedulePlain>,
        /// Header block wire text
        #[map(extra = HeaderBlock)]
        pub request_headers: String,
        pub body: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ComponentModel {
        #[map(pk)]
        pub id: TriState<i64>,
        pub page_id: TriState<i64>,
        pub name: TriState<String>,
        pub status: TriState<String>,
    }
}

record! {
    /// Status-page component; `page_id` addresses the parent page
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ComponentPlain {
        #[map(pk)]
        pub id: i64,
        pub page_id: i64,
        pub name: String,
        pub status: String,
    }
}

record! {
    /// Create request for a component; the id is assigned remotely
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ComponentDraft {
        pub page_id: i64,
        pub name: String,
        pub status: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AlertChannel {
        #[map(rename = "channel_id", pk)]
        pub id: i64,
        pub kind: String,
        pub target: String,
    }
}

record! {
    /// Alert channel as stored in state, with a textual id
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AlertChannelState {
        #[map(rename = "id", pk)]
        pub channel_id: String,
        pub kind: String,
        pub target: String,
    }
}

impl PrimaryKey for CheckModel {
    fn primary_key(&self) -> Identity {
        resolve_identity(&self.id).unwrap_or_default()
    }
}

impl PrimaryKey for CheckPlain {
    fn primary_key(&self) -> Identity {
        self.check_id.map(Identity::new).unwrap_or_default()
    }
}

impl PrimaryKey for ComponentModel {
    fn primary_key(&self) -> Identity {
        resolve_identity(&self.id).unwrap_or_default()
    }
}

impl PrimaryKey for ComponentPlain {
    fn primary_key(&self) -> Identity {
        Identity::new(self.id)
    }
}

impl PrimaryKey for AlertChannel {
    fn primary_key(&self) -> Identity {
        Identity::new(self.id)
    }
}

impl PrimaryKey for AlertChannelState {
    fn primary_key(&self) -> Identity {
        self.channel_id.parse().unwrap_or_default()
    }
}

/// A fully populated plain check
#[must_use]
pub fn sample_check_plain() -> CheckPlain {
    CheckPlain {
        check_id: Some(42),
        name: "api".to_string(),
        url: "https://example.com/health".to_string(),
        frequency: "1h30m".to_string(),
        paused: false,
        description: None,
        threshold: Some("0.95".to_string()),
        tags: vec!["prod".to_string(), "edge".to_string()],
        labels: BTreeMap::from([("env".to_string(), "prod".to_string())]),
        schedule: vec![
            SchedulePlain {
                weekdays: vec!["mon".to_string(), "tue".to_string()],
                start: "09:00".to_string(),
                timeout: Some("30s".to_string()),
            },
            SchedulePlain {
                weekdays: vec!["sat".to_string()],
                start: "10:00".to_string(),
                timeout: None,
            },
        ],
        request_headers: "Foo: Bar\r\nFoo: Baz\r\nQux: Quux\r\n".to_string(),
        body: Some("{\"a\": \"b\"}".to_string()),
    }
}

/// A known model schedule
#[must_use]
pub fn sample_schedule_model(weekdays: &[&str], start: &str) -> ScheduleModel {
    ScheduleModel {
        weekdays: TriState::Known(weekdays.iter().map(|d| (*d).to_string()).collect()),
        start: TriState::Known(start.to_string()),
        timeout: TriState::Null,
    }
}

/// A model check with every field known except the id
///
/// # Panics
/// Never; the fixed request header is well formed.
#[must_use]
pub fn sample_check_model() -> CheckModel {
    CheckModel {
        id: TriState::Unknown,
        name: TriState::known("api".to_string()),
        url: TriState::known("https://example.com/health".to_string()),
        frequency: TriState::known(Duration::from_secs(60)),
        paused: TriState::known(true),
        description: TriState::Null,
        threshold: TriState::Null,
        tags: TriState::known(IndexSet::from(["prod".to_string()])),
        labels: TriState::known(IndexMap::from([("team".to_string(), "sre".to_string())])),
        schedule: TriState::known(vec![sample_schedule_model(&["mon"], "08:00")]),
        request_headers: TriState::known(
            HeaderBlock::from_pairs([("Destination", "Eschaton")]).expect("static header is valid"),
        ),
        body: TriState::Null,
    }
}
