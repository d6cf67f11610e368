pub mod aggregation;
pub mod community;
pub mod community_graph;
pub mod export;
pub mod import;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod similarity;

pub use aggregation::{Aggregation, FeatureAggregator};
pub use community::{modularity, CommunityDetector};
pub use community_graph::CommunityAggregator;
pub use export::NetworkExport;
pub use import::{load_records, parse_records, RecordFormat};
pub use layout::SpatialLayoutEngine;
pub use normalize::CoordinateNormalizer;
pub use pipeline::{Pipeline, PipelineOutput, RunSummary, MIN_LOCATIONS};
pub use similarity::SimilarityGraphBuilder;
