//! Community-level graph derived from a partitioned location graph.
//!
//! Sums engagement totals per community, places each community at the
//! centroid of its members' normalized positions, and accumulates every
//! location edge that crosses two communities into one edge per unordered
//! community pair.

use std::collections::BTreeMap;

use crate::models::{CommunityEdge, CommunityGraph, CommunityNode, LocationGraph, Partition};
use crate::utils::math::{vec3_centroid, Vec3};
use crate::GeoweaveError;

#[derive(Debug, Clone, Copy, Default)]
pub struct CommunityAggregator;

impl CommunityAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        graph: &LocationGraph,
        partition: &Partition,
        positions: &[Vec3],
    ) -> Result<CommunityGraph, GeoweaveError> {
        let n = graph.node_count();
        if partition.len() != n {
            return Err(GeoweaveError::Inconsistent(format!(
                "partition covers {} nodes, graph has {}",
                partition.len(),
                n
            )));
        }
        if positions.len() != n {
            return Err(GeoweaveError::Inconsistent(format!(
                "{} positions for {} nodes",
                positions.len(),
                n
            )));
        }

        let mut nodes: BTreeMap<usize, CommunityNode> = BTreeMap::new();
        for (index, (location, &community_id)) in
            graph.nodes().iter().zip(partition.assignment()).enumerate()
        {
            let node = nodes.entry(community_id).or_insert_with(|| CommunityNode {
                community_id,
                member_count: 0,
                reach_sum: 0.0,
                retweet_sum: 0.0,
                likes_sum: 0.0,
                tweet_sum: 0,
                centroid: [0.0; 3],
                members: Vec::new(),
            });
            node.member_count += 1;
            node.reach_sum += location.reach_sum;
            node.retweet_sum += location.retweet_sum;
            node.likes_sum += location.likes_sum;
            node.tweet_sum += location.tweet_count;
            node.members.push(index);
        }

        for node in nodes.values_mut() {
            node.centroid = vec3_centroid(node.members.iter().map(|&i| &positions[i]));
        }

        let mut crossings: BTreeMap<(usize, usize), (f64, usize)> = BTreeMap::new();
        for edge in graph.edges() {
            let a = partition.assignment()[edge.source];
            let b = partition.assignment()[edge.target];
            if a == b {
                continue;
            }
            let slot = crossings.entry((a.min(b), a.max(b))).or_insert((0.0, 0));
            slot.0 += edge.weight;
            slot.1 += 1;
        }

        let edges = crossings
            .into_iter()
            .map(|((community_a, community_b), (weight_sum, crossing_count))| CommunityEdge {
                community_a,
                community_b,
                weight_sum,
                crossing_count,
            })
            .collect();

        Ok(CommunityGraph {
            nodes: nodes.into_values().collect(),
            edges,
        })
    }
}
