//! Arena-indexed location similarity graph.
//!
//! Nodes live in a `Vec` and are addressed by their index; adjacency lists hold
//! `(neighbor_index, weight)` pairs so the hot loops in community detection and
//! layout never hash location keys.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::location::LocationFeatures;
use crate::utils::math::Vec3;

/// Node positions indexed like `LocationGraph::nodes`.
pub type Positions = Vec<Vec3>;

/// An undirected weighted edge, stored with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    nodes: Vec<LocationFeatures>,
    edges: Vec<SimilarityEdge>,
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl LocationGraph {
    /// Create an edgeless graph over the given locations.
    pub fn new(nodes: Vec<LocationFeatures>) -> Self {
        let adjacency = vec![Vec::new(); nodes.len()];
        Self {
            nodes,
            edges: Vec::new(),
            adjacency,
            edge_index: HashMap::new(),
        }
    }

    /// Insert an undirected edge.
    ///
    /// Self-loops and out-of-range endpoints are ignored. If the unordered
    /// pair already exists the first weight is kept. Returns `true` when a new
    /// edge was stored.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return false;
        }
        let key = (a.min(b), a.max(b));
        if self.edge_index.contains_key(&key) {
            return false;
        }
        self.edge_index.insert(key, self.edges.len());
        self.edges.push(SimilarityEdge {
            source: key.0,
            target: key.1,
            weight,
        });
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[LocationFeatures] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SimilarityEdge] {
        &self.edges
    }

    pub fn neighbors(&self, index: usize) -> &[(usize, f64)] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    /// Weight of the edge between `a` and `b`, if any.
    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.edge_index
            .get(&(a.min(b), a.max(b)))
            .map(|&i| self.edges[i].weight)
    }

    /// Index of the node with the given location key.
    pub fn index_of(&self, location_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.location_id == location_id)
    }

    /// Sum of all edge weights (each undirected edge counted once).
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}
