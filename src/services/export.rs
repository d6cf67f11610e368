//! Renderer-facing export of a pipeline run.
//!
//! Flattens the location graph, partition, positions and community graph into
//! four serializable tables keyed by location and community ids.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::services::pipeline::PipelineOutput;
use crate::utils::math::Vec3;
use crate::GeoweaveError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNodeExport {
    pub location_id: String,
    pub reach_sum: f64,
    pub retweet_sum: f64,
    pub likes_sum: f64,
    pub tweet_count: usize,
    pub dominant_language: String,
    pub community_id: usize,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEdgeExport {
    pub source_id: String,
    pub target_id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityNodeExport {
    pub community_id: usize,
    pub centroid: Vec3,
    pub member_count: usize,
    pub reach_sum: f64,
    pub retweet_sum: f64,
    pub likes_sum: f64,
    pub tweet_sum: usize,
    pub connections: Vec<usize>,
    /// Position from the independent community layout, when one was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_position: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityEdgeExport {
    pub community_a: usize,
    pub community_b: usize,
    pub weight_sum: f64,
    pub crossing_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMetadata {
    pub location_count: usize,
    pub edge_count: usize,
    pub exported_edge_count: usize,
    pub community_count: usize,
    pub modularity: f64,
    /// Effective configuration of the run.
    pub config: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkExport {
    pub metadata: ExportMetadata,
    pub locations: Vec<LocationNodeExport>,
    pub edges: Vec<LocationEdgeExport>,
    pub communities: Vec<CommunityNodeExport>,
    pub community_edges: Vec<CommunityEdgeExport>,
}

impl NetworkExport {
    /// Build the export. Location edges are ordered strongest first (ties by
    /// endpoint indices) and cut to `config.export.max_edges` when set.
    pub fn from_output(output: &PipelineOutput, config: &PipelineConfig) -> Self {
        let graph = &output.graph;

        let locations = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, loc)| LocationNodeExport {
                location_id: loc.location_id.clone(),
                reach_sum: loc.reach_sum,
                retweet_sum: loc.retweet_sum,
                likes_sum: loc.likes_sum,
                tweet_count: loc.tweet_count,
                dominant_language: loc.dominant_language.clone(),
                community_id: output.partition.assignment()[i],
                position: output.positions[i],
            })
            .collect();

        let mut ranked: Vec<_> = graph.edges().to_vec();
        ranked.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then(a.source.cmp(&b.source))
                .then(a.target.cmp(&b.target))
        });
        if let Some(limit) = config.export.max_edges {
            ranked.truncate(limit);
        }
        let edges: Vec<LocationEdgeExport> = ranked
            .iter()
            .map(|e| LocationEdgeExport {
                source_id: graph.nodes()[e.source].location_id.clone(),
                target_id: graph.nodes()[e.target].location_id.clone(),
                weight: e.weight,
            })
            .collect();

        let community_graph = &output.communities;
        let communities = community_graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, c)| CommunityNodeExport {
                community_id: c.community_id,
                centroid: c.centroid,
                member_count: c.member_count,
                reach_sum: c.reach_sum,
                retweet_sum: c.retweet_sum,
                likes_sum: c.likes_sum,
                tweet_sum: c.tweet_sum,
                connections: community_graph.connections(c.community_id),
                layout_position: output
                    .community_layout
                    .as_ref()
                    .and_then(|layout| layout.get(i).copied()),
            })
            .collect();

        let community_edges = community_graph
            .edges
            .iter()
            .map(|e| CommunityEdgeExport {
                community_a: e.community_a,
                community_b: e.community_b,
                weight_sum: e.weight_sum,
                crossing_count: e.crossing_count,
            })
            .collect();

        Self {
            metadata: ExportMetadata {
                location_count: graph.node_count(),
                edge_count: graph.edge_count(),
                exported_edge_count: edges.len(),
                community_count: community_graph.nodes.len(),
                modularity: output.modularity,
                config: config.clone(),
            },
            locations,
            edges,
            communities,
            community_edges,
        }
    }

    pub fn to_json(&self) -> Result<String, GeoweaveError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GeoweaveError::Export(format!("JSON serialization failed: {}", e)))
    }

    /// Write pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), GeoweaveError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            GeoweaveError::Export(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!(
            path = %path.display(),
            locations = self.locations.len(),
            edges = self.edges.len(),
            communities = self.communities.len(),
            "Wrote network export"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::models::EngagementRecord;
    use crate::services::pipeline::Pipeline;

    fn rec(loc: &str, reach: f64, rts: f64, likes: f64, hour: u8) -> EngagementRecord {
        EngagementRecord {
            location_id: Some(loc.to_string()),
            lang: Some("en".to_string()),
            reach: Some(reach),
            retweet_count: Some(rts),
            likes: Some(likes),
            weekday: None,
            hour: Some(hour),
        }
    }

    fn output() -> PipelineOutput {
        let records = vec![
            rec("a", 100.0, 5.0, 10.0, 9),
            rec("b", 110.0, 5.0, 11.0, 9),
            rec("c", 5000.0, 300.0, 900.0, 22),
            rec("d", 5200.0, 280.0, 950.0, 23),
            rec("e", 2500.0, 100.0, 400.0, 15),
            rec("f", 90.0, 4.0, 9.0, 8),
        ];
        Pipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&records)
            .unwrap()
    }

    #[test]
    fn test_export_covers_every_location_and_community() {
        let out = output();
        let export = NetworkExport::from_output(&out, &PipelineConfig::default());
        assert_eq!(export.locations.len(), 6);
        assert_eq!(export.edges.len(), out.graph.edge_count());
        assert_eq!(export.communities.len(), out.communities.nodes.len());
        assert_eq!(export.metadata.exported_edge_count, export.edges.len());
    }

    #[test]
    fn test_edges_sorted_strongest_first_and_truncated() {
        let out = output();
        let full = NetworkExport::from_output(&out, &PipelineConfig::default());
        for pair in full.edges.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
        let mut config = PipelineConfig::default();
        config.export.max_edges = Some(1);
        let cut = NetworkExport::from_output(&out, &config);
        assert!(cut.edges.len() <= 1);
        assert_eq!(cut.metadata.edge_count, out.graph.edge_count());
        if let (Some(a), Some(b)) = (cut.edges.first(), full.edges.first()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_connections_are_symmetric() {
        let export = NetworkExport::from_output(&output(), &PipelineConfig::default());
        for c in &export.communities {
            for other in &c.connections {
                let peer = export
                    .communities
                    .iter()
                    .find(|p| p.community_id == *other)
                    .unwrap();
                assert!(peer.connections.contains(&c.community_id));
            }
        }
    }

    #[test]
    fn test_json_field_names() {
        let export = NetworkExport::from_output(&output(), &PipelineConfig::default());
        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        let loc = &value["locations"][0];
        for key in [
            "location_id",
            "reach_sum",
            "retweet_sum",
            "likes_sum",
            "tweet_count",
            "dominant_language",
            "community_id",
            "position",
        ] {
            assert!(loc.get(key).is_some(), "missing {key}");
        }
        assert_eq!(loc["position"].as_array().unwrap().len(), 3);
        let comm = &value["communities"][0];
        assert!(comm.get("centroid").is_some());
        assert!(comm.get("connections").is_some());
        assert!(comm.get("layout_position").is_none());
        assert_eq!(value["metadata"]["config"]["layout"]["iterations"], 50);
    }
}
