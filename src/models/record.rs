use serde::{Deserialize, Deserializer, Serialize};

/// One engagement event as delivered by the ingestion layer.
///
/// Every field is optional at this boundary; records missing any of the
/// required fields (location, language, reach, retweets, likes) are dropped
/// during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementRecord {
    /// Numeric ids from dataframe exports are rendered as strings.
    #[serde(default, alias = "locationid", deserialize_with = "lenient_label")]
    pub location_id: Option<String>,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
    #[serde(default)]
    pub reach: Option<f64>,
    #[serde(default, alias = "retweetcount")]
    pub retweet_count: Option<f64>,
    #[serde(default)]
    pub likes: Option<f64>,
    #[serde(default)]
    pub weekday: Option<String>,
    /// Hour of day, 0-23. Anything outside that range is treated as missing.
    #[serde(default, deserialize_with = "lenient_hour")]
    pub hour: Option<u8>,
}

/// A scalar cell as spreadsheet and dataframe exports write it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Other(#[allow(dead_code)] serde::de::IgnoredAny),
}

impl Cell {
    fn into_label(self) -> Option<String> {
        match self {
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{}", f as i64)),
            Cell::Float(f) if f.is_finite() => Some(f.to_string()),
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    fn into_hour(self) -> Option<u8> {
        let value = match self {
            Cell::Int(i) => i as f64,
            Cell::Float(f) => f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Other(_) => return None,
        };
        if value.fract() == 0.0 && (0.0..24.0).contains(&value) {
            Some(value as u8)
        } else {
            None
        }
    }
}

fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?.and_then(Cell::into_label))
}

fn lenient_hour<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?.and_then(Cell::into_hour))
}

/// A record whose required fields are all present.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRecord<'a> {
    pub location_id: &'a str,
    pub lang: &'a str,
    pub reach: f64,
    pub retweet_count: f64,
    pub likes: f64,
    pub weekday: Option<&'a str>,
    pub hour: Option<u8>,
}

impl EngagementRecord {
    /// Borrow the record as a complete one, or `None` if any required field is
    /// missing or a numeric field is not finite.
    pub fn complete(&self) -> Option<CompleteRecord<'_>> {
        let reach = self.reach.filter(|v| v.is_finite())?;
        let retweet_count = self.retweet_count.filter(|v| v.is_finite())?;
        let likes = self.likes.filter(|v| v.is_finite())?;
        Some(CompleteRecord {
            location_id: self.location_id.as_deref()?,
            lang: self.lang.as_deref()?,
            reach,
            retweet_count,
            likes,
            weekday: self.weekday.as_deref(),
            hour: self.hour.filter(|h| *h < 24),
        })
    }
}
