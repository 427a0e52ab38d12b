use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the host. Replaced wholesale on every
/// authentication event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: String,
    #[serde(default)]
    pub expires_at: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub plan_id: String,
    /// File handed to the host's launch callback when this plan is loaded.
    #[serde(default)]
    pub default_file_id: String,
    /// Encoded PNG or JPEG shown on the product card.
    #[serde(default, with = "blob")]
    pub image: Option<Vec<u8>>,
    #[serde(default, with = "blob")]
    pub video: Option<Vec<u8>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("active")
    }

    pub fn launch_file_id(&self) -> Option<&str> {
        let id = self.default_file_id.trim();
        (!id.is_empty()).then_some(id)
    }

    /// Key used for per-product caches. Falls back to the plan name for hosts
    /// that do not send plan ids.
    pub fn view_key(&self) -> &str {
        if self.plan_id.is_empty() {
            &self.plan
        } else {
            &self.plan_id
        }
    }

    pub fn expiry(&self) -> Option<DateTime<Local>> {
        parse_expiry(&self.expires_at)
    }

    /// Human readable expiry relative to `now`, e.g. `in 12 days`.
    pub fn expiry_label(&self, now: DateTime<Local>) -> String {
        match self.expiry() {
            Some(at) if at <= now => "expired".into(),
            Some(at) => {
                let left = at - now;
                if left.num_days() >= 1 {
                    format!("in {} days", left.num_days())
                } else if left.num_hours() >= 1 {
                    format!("in {} hours", left.num_hours())
                } else {
                    format!("in {} minutes", left.num_minutes().max(1))
                }
            }
            None => self.expires_at.clone(),
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` (midnight,
/// local time).
pub fn parse_expiry(input: &str) -> Option<DateTime<Local>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest();
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

/// Blobs travel as base64 strings in JSON profiles.
mod blob {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        match encoded {
            Some(text) if !text.is_empty() => STANDARD
                .decode(text.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
