//! End-to-end pipeline: aggregate → similarity graph → communities → layout →
//! normalization → community graph.
//!
//! Stages run strictly in order on one immutable record snapshot. Any stage
//! error aborts the run.

use serde::Serialize;
use tracing::info_span;

use crate::config::PipelineConfig;
use crate::models::{CommunityGraph, EngagementRecord, LocationGraph, Partition, Positions};
use crate::services::aggregation::FeatureAggregator;
use crate::services::community::{modularity, CommunityDetector};
use crate::services::community_graph::CommunityAggregator;
use crate::services::layout::SpatialLayoutEngine;
use crate::services::normalize::CoordinateNormalizer;
use crate::services::similarity::SimilarityGraphBuilder;
use crate::GeoweaveError;

/// Fewest locations the pipeline will cluster and lay out.
pub const MIN_LOCATIONS: usize = 2;

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: LocationGraph,
    pub partition: Partition,
    /// Normalized positions, indexed like `graph` nodes.
    pub positions: Positions,
    pub communities: CommunityGraph,
    /// Independent layout of the community graph, indexed like `communities.nodes`.
    pub community_layout: Option<Positions>,
    pub modularity: f64,
    pub dropped_records: usize,
    pub sparse_locations: usize,
}

/// Headline numbers of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub locations: usize,
    pub edges: usize,
    pub communities: usize,
    pub inter_community_edges: usize,
    pub modularity: f64,
    pub dropped_records: usize,
    pub sparse_locations: usize,
}

impl PipelineOutput {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            locations: self.graph.node_count(),
            edges: self.graph.edge_count(),
            communities: self.communities.nodes.len(),
            inter_community_edges: self.communities.edges.len(),
            modularity: self.modularity,
            dropped_records: self.dropped_records,
            sparse_locations: self.sparse_locations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    aggregator: FeatureAggregator,
    similarity: SimilarityGraphBuilder,
    detector: CommunityDetector,
    layout: SpatialLayoutEngine,
    normalizer: CoordinateNormalizer,
    community_layout: Option<SpatialLayoutEngine>,
}

impl Pipeline {
    /// Validate the configuration and prepare every stage.
    pub fn new(config: PipelineConfig) -> Result<Self, GeoweaveError> {
        config.validate()?;
        let community_layout = if config.community_layout.enabled {
            Some(SpatialLayoutEngine::from_config(
                &config.community_layout.as_layout(),
            )?)
        } else {
            None
        };
        Ok(Self {
            aggregator: FeatureAggregator::new(config.aggregation.min_records),
            similarity: SimilarityGraphBuilder::from_config(&config.similarity)?,
            detector: CommunityDetector::from_config(&config.community)?,
            layout: SpatialLayoutEngine::from_config(&config.layout)?,
            normalizer: CoordinateNormalizer::new(config.normalize.range),
            community_layout,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, records: &[EngagementRecord]) -> Result<PipelineOutput, GeoweaveError> {
        let _run = info_span!("pipeline", records = records.len()).entered();

        let aggregation = {
            let _span = info_span!("aggregate").entered();
            self.aggregator.aggregate(records)
        };
        let location_count = aggregation.locations.len();
        if location_count < MIN_LOCATIONS {
            return Err(GeoweaveError::DataInsufficiency {
                locations: location_count,
                required: MIN_LOCATIONS,
            });
        }
        tracing::info!(
            locations = location_count,
            dropped_records = aggregation.dropped_records,
            "Aggregated location features"
        );

        let graph = {
            let _span = info_span!("similarity").entered();
            self.similarity.build(aggregation.locations)
        };
        tracing::info!(
            locations = graph.node_count(),
            edges = graph.edge_count(),
            "Built similarity graph"
        );

        let partition = {
            let _span = info_span!("communities").entered();
            self.detector.detect(&graph)
        };
        let score = modularity(&graph, &partition, self.detector.resolution());
        tracing::info!(
            communities = partition.community_count(),
            modularity = score,
            "Detected communities"
        );

        let mut positions = {
            let _span = info_span!("layout").entered();
            self.layout.layout(&graph)
        };
        self.normalizer.normalize(&mut positions);
        tracing::info!(nodes = positions.len(), "Computed normalized 3D layout");

        let communities = {
            let _span = info_span!("community_graph").entered();
            CommunityAggregator::new().aggregate(&graph, &partition, &positions)?
        };
        tracing::info!(
            communities = communities.nodes.len(),
            inter_community_edges = communities.edges.len(),
            "Built community graph"
        );

        let community_layout = self.community_layout.as_ref().map(|engine| {
            let _span = info_span!("community_layout").entered();
            let mut laid_out =
                engine.layout_edges(communities.nodes.len(), &communities.weighted_edges());
            self.normalizer.normalize(&mut laid_out);
            laid_out
        });

        Ok(PipelineOutput {
            graph,
            partition,
            positions,
            communities,
            community_layout,
            modularity: score,
            dropped_records: aggregation.dropped_records,
            sparse_locations: aggregation.sparse_locations,
        })
    }
}
