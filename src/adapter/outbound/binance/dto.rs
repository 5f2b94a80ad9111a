//! Binance response envelopes.
//!
//! C2C and Pay endpoints wrap their data:
//!
//! ```json
//! {"code":"000000","message":"success","data":[...],"total":1,"success":true}
//! ```
//!
//! The deposit history returns a bare array. Rejected requests return
//! `{"code":-1022,"msg":"Signature for this request is not valid."}` with a
//! non-2xx status.

use serde::Deserialize;

use crate::error::Error;

/// Code reported by wrapped endpoints on success.
pub const SUCCESS_CODE: &str = "000000";

/// Wrapped response used by the C2C and Pay endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Absent and `null` both mean no data.
    #[serde(default)]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl<T> Envelope<T> {
    /// Unwrap the data, turning an unsuccessful envelope into an error.
    pub fn into_data(self) -> Result<Vec<T>, Error> {
        let code_ok = self.code.as_deref().map_or(true, |code| code == SUCCESS_CODE);
        if self.success == Some(false) || !code_ok {
            return Err(Error::Exchange {
                code: self.code.unwrap_or_else(|| "unknown".into()),
                message: self.message.unwrap_or_default(),
            });
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
    #[serde(alias = "message")]
    pub msg: Option<String>,
}

impl ErrorBody {
    /// Map an error response to [`Error::Exchange`], falling back to the raw
    /// body when it is not the usual shape.
    pub fn into_error(status: reqwest::StatusCode, body: &str) -> Error {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Error::Exchange {
                code: parsed.code.unwrap_or_else(|| status.as_u16().to_string()),
                message: parsed.msg.unwrap_or_default(),
            },
            Err(_) => Error::Exchange {
                code: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            },
        }
    }
}

/// Binance reports codes as strings on some endpoints and integers on others.
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
