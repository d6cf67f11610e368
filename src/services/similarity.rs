//! Sparse k-nearest-neighbour similarity graph over locations.
//!
//! Feature columns are standardized (zero mean, unit population variance),
//! compared pairwise by cosine similarity, and each location proposes edges to
//! its top-K most similar peers whose similarity exceeds the threshold. The
//! graph is the union of all proposals.

use std::cmp::Ordering;

use ndarray::{Array2, Axis};

use crate::config::SimilarityConfig;
use crate::models::{FeatureColumn, LocationFeatures, LocationGraph};
use crate::utils::math::{cosine_similarity, mean, population_std};
use crate::GeoweaveError;

#[derive(Debug, Clone)]
pub struct SimilarityGraphBuilder {
    columns: Vec<FeatureColumn>,
    k_neighbors: usize,
    threshold: f64,
}

impl SimilarityGraphBuilder {
    pub fn new(
        columns: Vec<FeatureColumn>,
        k_neighbors: usize,
        threshold: f64,
    ) -> Result<Self, GeoweaveError> {
        if columns.is_empty() {
            return Err(GeoweaveError::Configuration(
                "at least one feature column is required".to_string(),
            ));
        }
        if k_neighbors == 0 {
            return Err(GeoweaveError::Configuration(
                "neighbour count K must be positive".to_string(),
            ));
        }
        if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
            return Err(GeoweaveError::Configuration(format!(
                "similarity threshold must lie in [0, 1), got {}",
                threshold
            )));
        }
        Ok(Self {
            columns,
            k_neighbors,
            threshold,
        })
    }

    pub fn from_config(config: &SimilarityConfig) -> Result<Self, GeoweaveError> {
        Self::new(
            config.features.clone(),
            config.k_neighbors,
            config.weight_threshold,
        )
    }

    /// K clamped to `n - 1`.
    pub fn effective_k(&self, node_count: usize) -> usize {
        self.k_neighbors.min(node_count.saturating_sub(1))
    }

    /// Build the similarity graph. Zero or one location yields an edgeless graph.
    pub fn build(&self, locations: Vec<LocationFeatures>) -> LocationGraph {
        let mut graph = LocationGraph::new(locations);
        let n = graph.node_count();
        if n <= 1 {
            return graph;
        }

        let k = self.effective_k(n);
        if k < self.k_neighbors {
            tracing::debug!(
                requested = self.k_neighbors,
                effective = k,
                "Clamped neighbour count to location count"
            );
        }

        let matrix = feature_matrix(graph.nodes(), &self.columns);
        let scaled = standardize(&matrix);
        let sim = cosine_similarity_matrix(&scaled);

        for i in 0..n {
            for (j, weight) in neighbor_proposals(&sim, i, k, self.threshold) {
                graph.add_edge(i, j, weight);
            }
        }

        if graph.edge_count() == 0 {
            tracing::warn!(
                locations = n,
                threshold = self.threshold,
                "Similarity graph has no edges above threshold"
            );
        }

        graph
    }
}

/// Row-per-location matrix of the selected columns.
pub fn feature_matrix(locations: &[LocationFeatures], columns: &[FeatureColumn]) -> Array2<f64> {
    Array2::from_shape_fn((locations.len(), columns.len()), |(i, c)| {
        columns[c].value(&locations[i])
    })
}

/// Standardize each column to zero mean and unit population variance.
///
/// Zero-variance columns are only centered (they become all zeros).
pub fn standardize(matrix: &Array2<f64>) -> Array2<f64> {
    let mut out = matrix.clone();
    if matrix.nrows() == 0 {
        return out;
    }
    for (c, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
        let values = column.to_vec();
        let center = mean(&values);
        let std = population_std(&values);
        let scale = if std > 0.0 && std.is_finite() {
            std
        } else {
            tracing::debug!(column = c, "Zero-variance feature column");
            1.0
        };
        column.mapv_inplace(|v| (v - center) / scale);
    }
    out
}

/// Pairwise cosine similarity between rows. Zero-norm rows score 0 against
/// everything, including themselves.
pub fn cosine_similarity_matrix(matrix: &Array2<f64>) -> Array2<f64> {
    let n = matrix.nrows();
    let rows: Vec<Vec<f64>> = matrix.axis_iter(Axis(0)).map(|row| row.to_vec()).collect();
    let mut sim = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let value = cosine_similarity(&rows[i], &rows[j]).clamp(-1.0, 1.0);
            sim[[i, j]] = value;
            sim[[j, i]] = value;
        }
    }
    sim
}

/// Edges node `i` proposes: its top `k` peers by similarity (ties keep index
/// order, self excluded), kept only above `threshold`.
pub fn neighbor_proposals(
    sim: &Array2<f64>,
    i: usize,
    k: usize,
    threshold: f64,
) -> Vec<(usize, f64)> {
    let n = sim.nrows();
    let mut candidates: Vec<usize> = (0..n).filter(|&j| j != i).collect();
    candidates.sort_by(|&a, &b| {
        sim[[i, b]]
            .partial_cmp(&sim[[i, a]])
            .unwrap_or(Ordering::Equal)
    });
    candidates
        .into_iter()
        .take(k)
        .map(|j| (j, sim[[i, j]].min(1.0)))
        .filter(|&(_, w)| w > threshold)
        .collect()
}
