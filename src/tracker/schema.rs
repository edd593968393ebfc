//! Typed tracker responses.
//!
//! Decoding fails closed: absent or malformed parts become "no data" instead
//! of failing the whole response.

use crate::domain::{
    sprint::parse_date,
    Board, EpicRef, Sprint, SprintState, Ticket,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Custom field holding a ticket's sprint memberships, oldest first
pub const SPRINT_FIELD: &str = "customfield_10020";

/// The sprint-membership field as JQL refers to it
pub const SPRINT_FIELD_JQL: &str = "cf[10020]";

/// One page of a board's sprint listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintPage {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub values: Vec<Sprint>,
    #[serde(default)]
    pub is_last: bool,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Board listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardPage {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub values: Vec<Board>,
}

/// Issue search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub issues: Vec<IssueRecord>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl SearchPage {
    /// Converts the records into tickets, skipping any without a key
    pub fn into_tickets(self) -> Vec<Ticket> {
        self.issues
            .into_iter()
            .filter_map(IssueRecord::into_ticket)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusField {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentFields {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<ParentFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<StatusField>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<ParentRecord>,
    /// Everything else, custom fields included
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A ticket as returned by the detail and search endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<IssueFields>,
}

impl IssueRecord {
    pub fn status_name(&self) -> Option<&str> {
        self.fields
            .as_ref()
            .and_then(|fields| fields.status.as_ref())
            .map(|status| status.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Whether the sprint-membership field is present and non-null
    pub fn has_sprint_field(&self) -> bool {
        self.sprint_field()
            .map(|value| !value.is_null())
            .unwrap_or(false)
    }

    /// The sprint the ticket joined most recently
    ///
    /// The tracker appends memberships, so this is the last entry. Returns
    /// `None` when the field is missing, not a list, empty, or its last entry
    /// cannot be read.
    pub fn latest_sprint(&self) -> Option<Sprint> {
        match self.sprint_field()? {
            Value::Array(entries) => entries.last().and_then(decode_sprint_entry),
            _ => None,
        }
    }

    pub fn into_ticket(self) -> Option<Ticket> {
        if self.key.is_empty() {
            return None;
        }
        let fields = self.fields.unwrap_or_default();
        let epic = fields
            .parent
            .filter(|parent| !parent.key.is_empty())
            .map(|parent| {
                let summary = parent
                    .fields
                    .and_then(|fields| fields.summary)
                    .unwrap_or_default();
                EpicRef::new(parent.key, summary)
            });

        Some(Ticket {
            id: self.id,
            key: self.key,
            summary: fields.summary.unwrap_or_default(),
            status: fields.status.map(|status| status.name).unwrap_or_default(),
            epic,
        })
    }

    fn sprint_field(&self) -> Option<&Value> {
        self.fields.as_ref()?.other.get(SPRINT_FIELD)
    }
}

fn decode_sprint_entry(entry: &Value) -> Option<Sprint> {
    match entry {
        Value::Object(_) => serde_json::from_value(entry.clone()).ok(),
        Value::String(raw) => parse_legacy_sprint(raw),
        _ => None,
    }
}

/// Parses the older server string form of a sprint membership
///
/// e.g. `com.atlassian.greenhopper.service.sprint.Sprint@1b2c[id=1,rapidViewId=3,state=ACTIVE,name=S1,startDate=...,endDate=<null>,...]`
pub fn parse_legacy_sprint(raw: &str) -> Option<Sprint> {
    let open = raw.find('[')?;
    let close = raw.rfind(']')?;
    if close <= open {
        return None;
    }

    let mut pairs: Vec<(String, String)> = Vec::new();
    for piece in raw[open + 1..close].split(',') {
        match piece.split_once('=') {
            Some((key, value)) if is_attribute_name(key) => {
                pairs.push((key.to_string(), value.to_string()));
            }
            // a comma inside a value, most often the sprint name
            _ => {
                let (_, value) = pairs.last_mut()?;
                value.push(',');
                value.push_str(piece);
            }
        }
    }

    let id = legacy_attribute(&pairs, "id")?.parse().ok()?;
    let mut sprint = Sprint::new(
        id,
        legacy_attribute(&pairs, "name").unwrap_or_default(),
        legacy_attribute(&pairs, "state")
            .map(SprintState::from)
            .unwrap_or_default(),
    );
    sprint.start_date = legacy_attribute(&pairs, "startDate").and_then(parse_date);
    sprint.end_date = legacy_attribute(&pairs, "endDate").and_then(parse_date);
    sprint.complete_date = legacy_attribute(&pairs, "completeDate").and_then(parse_date);
    sprint.goal = legacy_attribute(&pairs, "goal").map(str::to_string);
    Some(sprint)
}

fn is_attribute_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
}

fn legacy_attribute<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .filter(|value| *value != "<null>" && !value.is_empty())
}

/// Decodes a list, dropping elements that do not fit `T`
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decodes an optional value, treating a shape mismatch as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}
