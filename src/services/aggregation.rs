//! Per-location feature aggregation.
//!
//! Collapses engagement records into one `LocationFeatures` per location key.
//! Conventions:
//! - reach standard deviation is the sample deviation (n - 1); single-record
//!   locations get 0
//! - dominant language / weekday is the most frequent value, ties going to the
//!   value seen first for that location
//! - weekday defaults to Monday, mean hour to noon, when a location has no
//!   usable values for them

use std::collections::BTreeMap;

use crate::models::{CompleteRecord, EngagementRecord, LocationFeatures};
use crate::utils::math::{mean, sample_std};

pub const DEFAULT_WEEKDAY: &str = "Monday";
pub const DEFAULT_HOUR: f64 = 12.0;

/// Outcome of an aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One entry per surviving location, ascending by location key.
    pub locations: Vec<LocationFeatures>,
    /// Records dropped for missing required fields.
    pub dropped_records: usize,
    /// Locations dropped for having fewer than `min_records` records.
    pub sparse_locations: usize,
}

#[derive(Debug, Clone)]
pub struct FeatureAggregator {
    min_records: usize,
}

impl Default for FeatureAggregator {
    fn default() -> Self {
        Self { min_records: 1 }
    }
}

/// Frequency table that remembers first-seen order.
#[derive(Default)]
struct Tally<'a> {
    counts: Vec<(&'a str, usize)>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, value: &'a str) {
        match self.counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((value, 1)),
        }
    }

    fn mode(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for &(value, count) in &self.counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((value, count));
            }
        }
        best.map(|(v, _)| v)
    }
}

#[derive(Default)]
struct Group<'a> {
    reach: Vec<f64>,
    retweets: Vec<f64>,
    likes: Vec<f64>,
    hours: Vec<f64>,
    langs: Tally<'a>,
    weekdays: Tally<'a>,
}

impl<'a> Group<'a> {
    fn push(&mut self, rec: CompleteRecord<'a>) {
        self.reach.push(rec.reach);
        self.retweets.push(rec.retweet_count);
        self.likes.push(rec.likes);
        self.langs.add(rec.lang);
        if let Some(day) = rec.weekday {
            self.weekdays.add(day);
        }
        if let Some(hour) = rec.hour {
            self.hours.push(hour as f64);
        }
    }

    fn finish(self, location_id: &str) -> LocationFeatures {
        LocationFeatures {
            location_id: location_id.to_string(),
            reach_sum: self.reach.iter().sum(),
            reach_mean: mean(&self.reach),
            reach_std: sample_std(&self.reach),
            retweet_sum: self.retweets.iter().sum(),
            retweet_mean: mean(&self.retweets),
            likes_sum: self.likes.iter().sum(),
            likes_mean: mean(&self.likes),
            tweet_count: self.reach.len(),
            dominant_language: self.langs.mode().unwrap_or_default().to_string(),
            dominant_weekday: self.weekdays.mode().unwrap_or(DEFAULT_WEEKDAY).to_string(),
            mean_hour: if self.hours.is_empty() {
                DEFAULT_HOUR
            } else {
                mean(&self.hours)
            },
        }
    }
}

impl FeatureAggregator {
    pub fn new(min_records: usize) -> Self {
        Self {
            min_records: min_records.max(1),
        }
    }

    /// Group records by location and compute their feature vectors.
    ///
    /// Incomplete records are excluded silently (counted in
    /// `Aggregation::dropped_records`). An empty result is not an error here;
    /// callers decide whether enough locations remain.
    pub fn aggregate(&self, records: &[EngagementRecord]) -> Aggregation {
        let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
        let mut dropped_records = 0;

        for record in records {
            match record.complete() {
                Some(rec) => groups.entry(rec.location_id).or_default().push(rec),
                None => dropped_records += 1,
            }
        }

        let mut sparse_locations = 0;
        let mut locations = Vec::with_capacity(groups.len());
        for (location_id, group) in groups {
            if group.reach.len() < self.min_records {
                sparse_locations += 1;
                continue;
            }
            locations.push(group.finish(location_id));
        }

        if dropped_records > 0 {
            tracing::debug!(dropped_records, "Dropped incomplete records");
        }
        if sparse_locations > 0 {
            tracing::debug!(
                sparse_locations,
                min_records = self.min_records,
                "Dropped locations below minimum record count"
            );
        }

        Aggregation {
            locations,
            dropped_records,
            sparse_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(loc: &str, lang: &str, reach: f64, rts: f64, likes: f64) -> EngagementRecord {
        EngagementRecord {
            location_id: Some(loc.to_string()),
            lang: Some(lang.to_string()),
            reach: Some(reach),
            retweet_count: Some(rts),
            likes: Some(likes),
            weekday: None,
            hour: None,
        }
    }

    fn with_time(mut r: EngagementRecord, weekday: &str, hour: u8) -> EngagementRecord {
        r.weekday = Some(weekday.to_string());
        r.hour = Some(hour);
        r
    }

    #[test]
    fn test_empty_input_yields_empty_aggregate() {
        let agg = FeatureAggregator::default().aggregate(&[]);
        assert!(agg.locations.is_empty());
        assert_eq!(agg.dropped_records, 0);
    }

    #[test]
    fn test_incomplete_records_are_dropped() {
        let mut missing = rec("a", "en", 1.0, 1.0, 1.0);
        missing.reach = None;
        let agg = FeatureAggregator::default().aggregate(&[missing, rec("b", "en", 2.0, 0.0, 0.0)]);
        assert_eq!(agg.dropped_records, 1);
        assert_eq!(agg.locations.len(), 1);
        assert_eq!(agg.locations[0].location_id, "b");
    }

    #[test]
    fn test_sums_means_and_sample_std() {
        let records = vec![
            rec("x", "en", 10.0, 1.0, 2.0),
            rec("x", "en", 20.0, 3.0, 4.0),
            rec("x", "en", 30.0, 5.0, 6.0),
        ];
        let loc = &FeatureAggregator::default().aggregate(&records).locations[0];
        assert_eq!(loc.reach_sum, 60.0);
        assert_eq!(loc.reach_mean, 20.0);
        assert!((loc.reach_std - 10.0).abs() < 1e-12);
        assert_eq!(loc.retweet_sum, 9.0);
        assert_eq!(loc.retweet_mean, 3.0);
        assert_eq!(loc.likes_sum, 12.0);
        assert_eq!(loc.likes_mean, 4.0);
        assert_eq!(loc.tweet_count, 3);
    }

    #[test]
    fn test_single_record_std_is_zero_not_nan() {
        let loc = &FeatureAggregator::default()
            .aggregate(&[rec("solo", "fr", 5.0, 0.0, 0.0)])
            .locations[0];
        assert_eq!(loc.reach_std, 0.0);
    }

    #[test]
    fn test_language_tie_goes_to_first_seen() {
        let records = vec![
            rec("x", "es", 1.0, 0.0, 0.0),
            rec("x", "en", 1.0, 0.0, 0.0),
            rec("x", "en", 1.0, 0.0, 0.0),
            rec("x", "es", 1.0, 0.0, 0.0),
        ];
        let loc = &FeatureAggregator::default().aggregate(&records).locations[0];
        assert_eq!(loc.dominant_language, "es");
    }

    #[test]
    fn test_language_majority_wins() {
        let records = vec![
            rec("x", "es", 1.0, 0.0, 0.0),
            rec("x", "en", 1.0, 0.0, 0.0),
            rec("x", "en", 1.0, 0.0, 0.0),
        ];
        let loc = &FeatureAggregator::default().aggregate(&records).locations[0];
        assert_eq!(loc.dominant_language, "en");
    }

    #[test]
    fn test_weekday_and_hour_defaults() {
        let loc = &FeatureAggregator::default()
            .aggregate(&[rec("x", "en", 1.0, 0.0, 0.0)])
            .locations[0];
        assert_eq!(loc.dominant_weekday, DEFAULT_WEEKDAY);
        assert_eq!(loc.mean_hour, DEFAULT_HOUR);
    }

    #[test]
    fn test_weekday_mode_and_mean_hour() {
        let records = vec![
            with_time(rec("x", "en", 1.0, 0.0, 0.0), "Friday", 10),
            with_time(rec("x", "en", 1.0, 0.0, 0.0), "Sunday", 20),
            with_time(rec("x", "en", 1.0, 0.0, 0.0), "Sunday", 0),
        ];
        let loc = &FeatureAggregator::default().aggregate(&records).locations[0];
        assert_eq!(loc.dominant_weekday, "Sunday");
        assert!((loc.mean_hour - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_locations_sorted_by_key() {
        let records = vec![
            rec("b", "en", 1.0, 0.0, 0.0),
            rec("a", "en", 1.0, 0.0, 0.0),
            rec("c", "en", 1.0, 0.0, 0.0),
        ];
        let ids: Vec<String> = FeatureAggregator::default()
            .aggregate(&records)
            .locations
            .into_iter()
            .map(|l| l.location_id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_min_records_filters_sparse_locations() {
        let records = vec![
            rec("busy", "en", 1.0, 0.0, 0.0),
            rec("busy", "en", 1.0, 0.0, 0.0),
            rec("busy", "en", 1.0, 0.0, 0.0),
            rec("quiet", "en", 1.0, 0.0, 0.0),
        ];
        let agg = FeatureAggregator::new(3).aggregate(&records);
        assert_eq!(agg.locations.len(), 1);
        assert_eq!(agg.locations[0].location_id, "busy");
        assert_eq!(agg.sparse_locations, 1);
    }
}
