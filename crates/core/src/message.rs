use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One conversation turn, as held by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable identifier, used as the render key
    pub id: String,
    pub role: Role,
    /// Display text
    pub content: String,
    /// Epoch milliseconds; `None` when missing or not a number
    #[serde(
        rename = "createdAt",
        alias = "created_at",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<i64>,
    /// Evidence bundle, only meaningful on assistant turns
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub meta: Option<EvidenceBundle>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            created_at: Some(created_at),
            meta: None,
        }
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            created_at: Some(created_at),
            meta: None,
        }
    }

    /// Build the assistant turn for a backend answer. The full retrieval
    /// result, when the backend sends one, becomes `retrieval_raw`.
    pub fn from_ask_response(
        id: impl Into<String>,
        response: AskResponse,
        created_at: i64,
    ) -> Self {
        let AskResponse {
            answer,
            retrieved,
            reranked_ids,
            retrieval,
        } = response;
        Self {
            meta: Some(EvidenceBundle {
                retrieved: Some(retrieved),
                reranked_ids: Some(reranked_ids),
                retrieval_raw: retrieval,
            }),
            ..Self::assistant(id, answer, created_at)
        }
    }

    pub fn with_meta(mut self, meta: EvidenceBundle) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Retrieval and ranking metadata attached to an assistant turn.
///
/// Every field distinguishes "absent" (`None`) from "present but empty".
/// A field holding the wrong JSON shape is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    /// Retrieved document chunks, one list of strings per query
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub retrieved: Option<Vec<Vec<String>>>,
    /// Indices of the chunks selected by the reranker
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub reranked_ids: Option<Vec<i64>>,
    /// Full upstream retrieval result; preferred over `retrieved` for display
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub retrieval_raw: Option<Value>,
}

/// Answer payload returned by the question-answering backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub retrieved: Vec<Vec<String>>,
    #[serde(default)]
    pub reranked_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(error) => {
            tracing::debug!(%error, "ignoring malformed evidence field");
            Ok(None)
        }
    }
}

/// Fractional milliseconds are truncated. Anything that is not a finite
/// number in `i64` range reads as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let millis = match &value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|ms| ms.is_finite() && *ms >= i64::MIN as f64 && *ms < i64::MAX as f64)
                .map(|ms| ms.trunc() as i64)
        }),
        _ => None,
    };
    if millis.is_none() {
        tracing::debug!(%value, "ignoring malformed timestamp");
    }
    Ok(millis)
}
