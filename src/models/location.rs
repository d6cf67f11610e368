use serde::{Deserialize, Serialize};

/// Aggregated feature record for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFeatures {
    pub location_id: String,
    pub reach_sum: f64,
    pub reach_mean: f64,
    pub reach_std: f64,
    pub retweet_sum: f64,
    pub retweet_mean: f64,
    pub likes_sum: f64,
    pub likes_mean: f64,
    pub tweet_count: usize,
    pub dominant_language: String,
    pub dominant_weekday: String,
    pub mean_hour: f64,
}

/// Numeric columns that may take part in similarity computation.
///
/// The dominant language is metadata only and has no column here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    ReachSum,
    ReachMean,
    ReachStd,
    RetweetSum,
    RetweetMean,
    LikesSum,
    LikesMean,
    TweetCount,
    Hour,
}

impl FeatureColumn {
    /// Default similarity columns, in matrix order.
    pub const DEFAULT: [FeatureColumn; 8] = [
        FeatureColumn::ReachSum,
        FeatureColumn::ReachMean,
        FeatureColumn::ReachStd,
        FeatureColumn::RetweetSum,
        FeatureColumn::RetweetMean,
        FeatureColumn::LikesSum,
        FeatureColumn::LikesMean,
        FeatureColumn::Hour,
    ];

    pub fn value(&self, loc: &LocationFeatures) -> f64 {
        match self {
            FeatureColumn::ReachSum => loc.reach_sum,
            FeatureColumn::ReachMean => loc.reach_mean,
            FeatureColumn::ReachStd => loc.reach_std,
            FeatureColumn::RetweetSum => loc.retweet_sum,
            FeatureColumn::RetweetMean => loc.retweet_mean,
            FeatureColumn::LikesSum => loc.likes_sum,
            FeatureColumn::LikesMean => loc.likes_mean,
            FeatureColumn::TweetCount => loc.tweet_count as f64,
            FeatureColumn::Hour => loc.mean_hour,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::ReachSum => "reach_sum",
            FeatureColumn::ReachMean => "reach_mean",
            FeatureColumn::ReachStd => "reach_std",
            FeatureColumn::RetweetSum => "retweet_sum",
            FeatureColumn::RetweetMean => "retweet_mean",
            FeatureColumn::LikesSum => "likes_sum",
            FeatureColumn::LikesMean => "likes_mean",
            FeatureColumn::TweetCount => "tweet_count",
            FeatureColumn::Hour => "hour",
        }
    }
}
