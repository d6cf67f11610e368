pub mod community;
pub mod graph;
pub mod location;
pub mod partition;
pub mod record;

pub use community::{CommunityEdge, CommunityGraph, CommunityNode};
pub use graph::{LocationGraph, Positions, SimilarityEdge};
pub use location::{FeatureColumn, LocationFeatures};
pub use partition::Partition;
pub use record::{CompleteRecord, EngagementRecord};
