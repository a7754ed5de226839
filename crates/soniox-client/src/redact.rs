use std::borrow::Cow;

use serde_json::Value;

/// Key holding the webhook authentication secret
pub const WEBHOOK_SECRET_KEY: &str = "webhook_auth_header_value";

/// Replacement written over redacted secrets
pub const REDACTED: &str = "[REDACTED]";

/// Hide the webhook secret in an object echoed back to the caller
///
/// Objects without the key (or with a null value) come back borrowed and
/// untouched.
pub fn redact_webhook_secret(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Object(map) if map.get(WEBHOOK_SECRET_KEY).is_some_and(|v| !v.is_null()) => {
            let mut redacted = map.clone();
            redacted.insert(WEBHOOK_SECRET_KEY.to_owned(), Value::String(REDACTED.to_owned()));
            Cow::Owned(Value::Object(redacted))
        }
        _ => Cow::Borrowed(value),
    }
}
