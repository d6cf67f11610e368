//! 3D force-directed (spring) layout.
//!
//! Every node repels every other with magnitude `ideal³ / d²`; connected nodes
//! additionally pull together with magnitude `w · (d - ideal)`, where
//! `ideal = k / sqrt(n)`. Initial positions are drawn uniformly from the unit
//! cube with a seeded ChaCha8 generator. Each iteration computes all forces from
//! an immutable snapshot, then moves each node along its net force by at most
//! the current temperature, which falls linearly across the run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::LayoutConfig;
use crate::models::{LocationGraph, Positions};
use crate::utils::math::{vec3_norm, vec3_sub, Vec3};
use crate::GeoweaveError;

/// Distances are clamped to this floor before dividing.
const MIN_DISTANCE: f64 = 0.01;

/// Initial temperature as a fraction of the widest axis of the initial placement.
const INITIAL_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct SpatialLayoutEngine {
    k: f64,
    iterations: usize,
    seed: u64,
}

impl SpatialLayoutEngine {
    pub fn new(k: f64, iterations: usize, seed: u64) -> Result<Self, GeoweaveError> {
        if !k.is_finite() || k <= 0.0 {
            return Err(GeoweaveError::Configuration(format!(
                "layout spacing k must be positive, got {}",
                k
            )));
        }
        if iterations == 0 {
            return Err(GeoweaveError::Configuration(
                "layout iteration count must be positive".to_string(),
            ));
        }
        Ok(Self {
            k,
            iterations,
            seed,
        })
    }

    pub fn from_config(config: &LayoutConfig) -> Result<Self, GeoweaveError> {
        if config.dim != 3 {
            return Err(GeoweaveError::Configuration(format!(
                "only 3D layouts are supported, got dim = {}",
                config.dim
            )));
        }
        Self::new(config.k, config.iterations, config.seed)
    }

    /// Equilibrium distance between connected nodes for a graph of `node_count` nodes.
    pub fn ideal_distance(&self, node_count: usize) -> f64 {
        self.k / (node_count.max(1) as f64).sqrt()
    }

    /// Lay out the location graph. Positions are indexed like its nodes.
    pub fn layout(&self, graph: &LocationGraph) -> Positions {
        let edges: Vec<(usize, usize, f64)> = graph
            .edges()
            .iter()
            .map(|e| (e.source, e.target, e.weight))
            .collect();
        self.layout_edges(graph.node_count(), &edges)
    }

    /// Lay out an arbitrary weighted graph given as an edge list over `0..node_count`.
    pub fn layout_edges(&self, node_count: usize, edges: &[(usize, usize, f64)]) -> Positions {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut positions: Positions = (0..node_count)
            .map(|_| [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()])
            .collect();
        if node_count <= 1 {
            return positions;
        }

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(a, b, w) in edges {
            if a == b || a >= node_count || b >= node_count {
                continue;
            }
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }

        let ideal = self.ideal_distance(node_count);
        let extent = widest_extent(&positions);
        let mut temperature = if extent > 0.0 {
            INITIAL_TEMPERATURE * extent
        } else {
            INITIAL_TEMPERATURE
        };
        let cooling = temperature / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let forces = net_forces(&positions, &adjacency, ideal);
            positions = positions
                .iter()
                .zip(&forces)
                .map(|(p, f)| step(p, f, temperature))
                .collect();
            temperature -= cooling;
        }

        positions
    }
}

/// Net force on every node, read from an immutable snapshot of positions.
fn net_forces(positions: &[Vec3], adjacency: &[Vec<(usize, f64)>], ideal: f64) -> Vec<Vec3> {
    let n = positions.len();
    let repulsion_scale = ideal.powi(3);
    let mut forces = vec![[0.0; 3]; n];

    for i in 0..n {
        let mut f = [0.0; 3];
        for j in 0..n {
            if i == j {
                continue;
            }
            let delta = vec3_sub(&positions[i], &positions[j]);
            let raw = vec3_norm(&delta);
            if raw == 0.0 {
                continue;
            }
            let d = raw.max(MIN_DISTANCE);
            let magnitude = repulsion_scale / (d * d);
            for axis in 0..3 {
                f[axis] += delta[axis] / raw * magnitude;
            }
        }
        for &(j, w) in &adjacency[i] {
            let delta = vec3_sub(&positions[j], &positions[i]);
            let raw = vec3_norm(&delta);
            if raw == 0.0 {
                continue;
            }
            let magnitude = w * (raw.max(MIN_DISTANCE) - ideal);
            for axis in 0..3 {
                f[axis] += delta[axis] / raw * magnitude;
            }
        }
        forces[i] = f;
    }
    forces
}

/// Move `p` along `force`, by at most `temperature`.
fn step(p: &Vec3, force: &Vec3, temperature: f64) -> Vec3 {
    let length = vec3_norm(force);
    if length == 0.0 || temperature <= 0.0 {
        return *p;
    }
    let scale = length.min(temperature) / length;
    [
        p[0] + force[0] * scale,
        p[1] + force[1] * scale,
        p[2] + force[2] * scale,
    ]
}

fn widest_extent(positions: &[Vec3]) -> f64 {
    (0..3)
        .map(|axis| {
            let (lo, hi) = positions
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[axis]), hi.max(p[axis]))
                });
            hi - lo
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationFeatures;

    fn loc(id: &str) -> LocationFeatures {
        LocationFeatures {
            location_id: id.to_string(),
            reach_sum: 0.0,
            reach_mean: 0.0,
            reach_std: 0.0,
            retweet_sum: 0.0,
            retweet_mean: 0.0,
            likes_sum: 0.0,
            likes_mean: 0.0,
            tweet_count: 1,
            dominant_language: "en".to_string(),
            dominant_weekday: "Monday".to_string(),
            mean_hour: 12.0,
        }
    }

    fn graph(n: usize, edges: &[(usize, usize, f64)]) -> LocationGraph {
        let mut g = LocationGraph::new((0..n).map(|i| loc(&i.to_string())).collect());
        for &(a, b, w) in edges {
            g.add_edge(a, b, w);
        }
        g
    }

    fn dist(a: &Vec3, b: &Vec3) -> f64 {
        vec3_norm(&vec3_sub(a, b))
    }

    #[test]
    fn test_ideal_distance_scales_with_node_count() {
        let engine = SpatialLayoutEngine::new(0.4, 10, 1).unwrap();
        assert!((engine.ideal_distance(4) - 0.2).abs() < 1e-12);
        assert!((engine.ideal_distance(0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let g = graph(6, &[(0, 1, 0.9), (1, 2, 0.8), (3, 4, 0.7), (4, 5, 0.95)]);
        let engine = SpatialLayoutEngine::new(0.35, 50, 42).unwrap();
        assert_eq!(engine.layout(&g), engine.layout(&g));
    }

    #[test]
    fn test_different_seed_different_layout() {
        let g = graph(4, &[(0, 1, 0.9)]);
        let a = SpatialLayoutEngine::new(0.35, 20, 1).unwrap().layout(&g);
        let b = SpatialLayoutEngine::new(0.35, 20, 2).unwrap().layout(&g);
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_node_position_is_finite() {
        let positions = SpatialLayoutEngine::new(1.0, 5, 3).unwrap().layout(&graph(1, &[]));
        assert_eq!(positions.len(), 1);
        assert!(positions[0].iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_empty_graph() {
        let positions = SpatialLayoutEngine::new(1.0, 5, 3).unwrap().layout(&graph(0, &[]));
        assert!(positions.is_empty());
    }

    #[test]
    fn test_edgeless_graph_uses_repulsion_only() {
        let positions = SpatialLayoutEngine::new(1.0, 30, 9).unwrap().layout(&graph(5, &[]));
        assert_eq!(positions.len(), 5);
        for p in &positions {
            assert!(p.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_connected_pair_closer_than_unconnected() {
        // 0-1 strongly tied; 2 and 3 free-floating
        let g = graph(4, &[(0, 1, 1.0)]);
        let p = SpatialLayoutEngine::new(0.2, 200, 5).unwrap().layout(&g);
        let tied = dist(&p[0], &p[1]);
        let loose = [dist(&p[0], &p[2]), dist(&p[0], &p[3]), dist(&p[1], &p[2]), dist(&p[1], &p[3])];
        let mean_loose = loose.iter().sum::<f64>() / loose.len() as f64;
        assert!(tied < mean_loose, "tied {tied} vs loose {mean_loose}");
    }

    #[test]
    fn test_step_is_capped_by_temperature() {
        let moved = step(&[0.0, 0.0, 0.0], &[10.0, 0.0, 0.0], 0.5);
        assert_eq!(moved, [0.5, 0.0, 0.0]);
        let small = step(&[0.0, 0.0, 0.0], &[0.1, 0.0, 0.0], 0.5);
        assert_eq!(small, [0.1, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(SpatialLayoutEngine::new(0.0, 10, 1).is_err());
        assert!(SpatialLayoutEngine::new(0.3, 0, 1).is_err());
        let mut config = LayoutConfig::default();
        config.dim = 2;
        assert!(SpatialLayoutEngine::from_config(&config).is_err());
    }
}
