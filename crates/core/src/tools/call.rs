//! Serialized tool calls and the tool catalogue.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A tool invocation as emitted by the agent:
/// `{"name": "check_ticket", "arguments": {"ticket_id": "..."}}`.
///
/// An absent or null `arguments` is read as an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "name",
    content = "arguments",
    rename_all = "snake_case"
)]
pub enum ToolCall {
    /// Missing text fields decode as empty so the store can name them.
    CreateTicket {
        #[serde(default)]
        user: String,
        #[serde(default)]
        subject: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        priority: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
    UpdateTicket {
        ticket_id: String,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        assigned_to: Option<String>,
        #[serde(default)]
        priority: Option<String>,
    },
    DeleteTicket {
        ticket_id: String,
    },
    CheckTicket {
        ticket_id: String,
    },
    ListTickets {
        user: String,
        #[serde(default, deserialize_with = "lenient_limit")]
        limit: Option<i64>,
    },
    SearchTickets {
        #[serde(default)]
        query: String,
        #[serde(default, deserialize_with = "lenient_limit")]
        limit: Option<i64>,
    },
    GetCurrentDatetime {},
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::CreateTicket { .. } => "create_ticket",
            ToolCall::UpdateTicket { .. } => "update_ticket",
            ToolCall::DeleteTicket { .. } => "delete_ticket",
            ToolCall::CheckTicket { .. } => "check_ticket",
            ToolCall::ListTickets { .. } => "list_tickets",
            ToolCall::SearchTickets { .. } => "search_tickets",
            ToolCall::GetCurrentDatetime {} => "get_current_datetime",
        }
    }
}

impl Serialize for ToolCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ToolCall::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for ToolCall {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let mut value = Value::deserialize(deserializer)?;
        if let Value::Object(map) = &mut value {
            if map.get("arguments").map_or(true, Value::is_null) {
                map.insert("arguments".to_string(), Value::Object(Map::new()));
            }
        }
        ToolCall::deserialize(value).map_err(D::Error::custom)
    }
}

/// Accepts a limit as an integer, a float (truncated) or a numeric string.
fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid limit: {n}"))),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid limit: {s:?}")))
        }
        Some(other) => Err(D::Error::custom(format!("invalid limit: {other}"))),
    }
}

/// Description of one tool for registration with an agent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const TOOL_SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: "create_ticket",
        description: "Create a new support ticket. Returns a friendly confirmation string.",
        required: &["user", "subject", "description"],
        optional: &["priority", "category"],
    },
    ToolSpec {
        name: "update_ticket",
        description: "Update ticket fields. ticket_id must be the ticket UUID string.",
        required: &["ticket_id"],
        optional: &["status", "assigned_to", "priority"],
    },
    ToolSpec {
        name: "delete_ticket",
        description: "Delete a ticket by id.",
        required: &["ticket_id"],
        optional: &[],
    },
    ToolSpec {
        name: "check_ticket",
        description: "Return a short summary of a ticket.",
        required: &["ticket_id"],
        optional: &[],
    },
    ToolSpec {
        name: "list_tickets",
        description: "List tickets for a user (most recent first).",
        required: &["user"],
        optional: &["limit"],
    },
    ToolSpec {
        name: "search_tickets",
        description: "Search subject and description (case-insensitive).",
        required: &["query"],
        optional: &["limit"],
    },
    ToolSpec {
        name: "get_current_datetime",
        description: "Returns the current server date/time in a human-friendly format.",
        required: &[],
        optional: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ToolCall {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_update_with_optional_fields() {
        let call = parse(
            r#"{"name": "update_ticket", "arguments": {"ticket_id": "abc", "status": "closed"}}"#,
        );
        assert_eq!(
            call,
            ToolCall::UpdateTicket {
                ticket_id: "abc".to_string(),
                status: Some("closed".to_string()),
                assigned_to: None,
                priority: None,
            }
        );
    }

    #[test]
    fn test_deserialize_limit_forms() {
        for (raw, expected) in [
            ("5", Some(5)),
            ("\"7\"", Some(7)),
            ("3.9", Some(3)),
            ("\" 2.0 \"", Some(2)),
            ("null", None),
        ] {
            let json = format!(
                r#"{{"name": "list_tickets", "arguments": {{"user": "alice", "limit": {raw}}}}}"#
            );
            match parse(&json) {
                ToolCall::ListTickets { limit, .. } => assert_eq!(limit, expected, "{raw}"),
                other => panic!("unexpected call {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_limit_is_none() {
        match parse(r#"{"name": "search_tickets", "arguments": {"query": "login"}}"#) {
            ToolCall::SearchTickets { limit, .. } => assert!(limit.is_none()),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let json = r#"{"name": "list_tickets", "arguments": {"user": "a", "limit": "many"}}"#;
        assert!(serde_json::from_str::<ToolCall>(json).is_err());
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let json = r#"{"name": "drop_tables", "arguments": {}}"#;
        assert!(serde_json::from_str::<ToolCall>(json).is_err());
    }

    #[test]
    fn test_missing_ticket_id_rejected() {
        let json = r#"{"name": "check_ticket", "arguments": {}}"#;
        assert!(serde_json::from_str::<ToolCall>(json).is_err());
    }

    #[test]
    fn test_missing_create_field_decodes_empty() {
        match parse(r#"{"name": "create_ticket", "arguments": {"user": "a", "subject": "b"}}"#) {
            ToolCall::CreateTicket { description, .. } => assert!(description.is_empty()),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_arguments_may_be_omitted() {
        let call = parse(r#"{"name": "get_current_datetime"}"#);
        assert_eq!(call, ToolCall::GetCurrentDatetime {});

        let call = parse(r#"{"name": "get_current_datetime", "arguments": null}"#);
        assert_eq!(call, ToolCall::GetCurrentDatetime {});

        assert!(serde_json::from_str::<ToolCall>(r#"{"name": "check_ticket"}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_name_and_arguments() {
        let value = serde_json::to_value(ToolCall::CheckTicket {
            ticket_id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "check_ticket", "arguments": {"ticket_id": "abc"}})
        );
    }

    #[test]
    fn test_datetime_call() {
        let call = parse(r#"{"name": "get_current_datetime", "arguments": {}}"#);
        assert_eq!(call.name(), "get_current_datetime");
    }

    #[test]
    fn test_specs_cover_every_tool_name() {
        let calls = [
            parse(r#"{"name": "create_ticket", "arguments": {"user": "a", "subject": "b", "description": "c"}}"#),
            parse(r#"{"name": "update_ticket", "arguments": {"ticket_id": "a"}}"#),
            parse(r#"{"name": "delete_ticket", "arguments": {"ticket_id": "a"}}"#),
            parse(r#"{"name": "check_ticket", "arguments": {"ticket_id": "a"}}"#),
            parse(r#"{"name": "list_tickets", "arguments": {"user": "a"}}"#),
            parse(r#"{"name": "search_tickets", "arguments": {"query": "a"}}"#),
            parse(r#"{"name": "get_current_datetime", "arguments": {}}"#),
        ];
        assert_eq!(calls.len(), TOOL_SPECS.len());
        for call in &calls {
            assert!(TOOL_SPECS.iter().any(|spec| spec.name == call.name()));
        }
    }
}
