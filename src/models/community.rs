use serde::Serialize;

use crate::utils::math::Vec3;

/// Aggregated node of the community-level graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityNode {
    pub community_id: usize,
    pub member_count: usize,
    pub reach_sum: f64,
    pub retweet_sum: f64,
    pub likes_sum: f64,
    pub tweet_sum: usize,
    /// Mean of the members' normalized positions.
    pub centroid: Vec3,
    /// Member node indices into the location graph, ascending.
    #[serde(skip)]
    pub members: Vec<usize>,
}

/// Accumulated location edges crossing between two communities.
///
/// Stored with `community_a < community_b`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityEdge {
    pub community_a: usize,
    pub community_b: usize,
    pub weight_sum: f64,
    pub crossing_count: usize,
}

/// Community-level graph: one node per community, ordered by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommunityGraph {
    pub nodes: Vec<CommunityNode>,
    pub edges: Vec<CommunityEdge>,
}

impl CommunityGraph {
    /// Communities sharing at least one crossing edge with `community_id`, ascending.
    pub fn connections(&self, community_id: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.community_a == community_id {
                    Some(e.community_b)
                } else if e.community_b == community_id {
                    Some(e.community_a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Position in `nodes` of the given community id.
    pub fn position_of(&self, community_id: usize) -> Option<usize> {
        self.nodes
            .binary_search_by_key(&community_id, |n| n.community_id)
            .ok()
    }

    /// Edge list over node positions (not community ids), weighted by
    /// `weight_sum`, for laying the community graph out on its own.
    pub fn weighted_edges(&self) -> Vec<(usize, usize, f64)> {
        self.edges
            .iter()
            .filter_map(|e| {
                let a = self.position_of(e.community_a)?;
                let b = self.position_of(e.community_b)?;
                Some((a, b, e.weight_sum))
            })
            .collect()
    }
}
