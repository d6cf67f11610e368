//! Test data builders for engagement records.
//!
//! Provides fluent API for creating records with sensible defaults.

use geoweave::models::EngagementRecord;

/// Builder for creating test engagement records.
pub struct RecordBuilder {
    record: EngagementRecord,
}

impl RecordBuilder {
    /// Create a complete English record for `location` with zero engagement.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            record: EngagementRecord {
                location_id: Some(location.into()),
                lang: Some("en".to_string()),
                reach: Some(0.0),
                retweet_count: Some(0.0),
                likes: Some(0.0),
                weekday: None,
                hour: None,
            },
        }
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.record.lang = Some(lang.into());
        self
    }

    /// Set reach, retweets and likes in one call.
    pub fn engagement(mut self, reach: f64, retweets: f64, likes: f64) -> Self {
        self.record.reach = Some(reach);
        self.record.retweet_count = Some(retweets);
        self.record.likes = Some(likes);
        self
    }

    pub fn at(mut self, weekday: impl Into<String>, hour: u8) -> Self {
        self.record.weekday = Some(weekday.into());
        self.record.hour = Some(hour);
        self
    }

    /// Drop the reach field so the record is incomplete.
    pub fn without_reach(mut self) -> Self {
        self.record.reach = None;
        self
    }

    pub fn build(self) -> EngagementRecord {
        self.record
    }
}

/// Two tight pairs with opposite engagement profiles: `a`/`b` small and early,
/// `c`/`d` large and late.
pub fn two_pairs() -> Vec<EngagementRecord> {
    vec![
        RecordBuilder::new("a")
            .engagement(100.0, 2.0, 5.0)
            .at("Monday", 2)
            .build(),
        RecordBuilder::new("b")
            .engagement(104.0, 2.2, 5.3)
            .at("Monday", 2)
            .build(),
        RecordBuilder::new("c")
            .engagement(10_000.0, 500.0, 900.0)
            .at("Friday", 22)
            .build(),
        RecordBuilder::new("d")
            .engagement(10_200.0, 510.0, 915.0)
            .at("Friday", 22)
            .build(),
    ]
}
