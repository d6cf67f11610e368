//! Louvain community detection over the location similarity graph.
//!
//! Greedy multilevel modularity optimization:
//! 1. **Local moving**: each node moves to the neighbouring community with the
//!    largest positive modularity gain until a full pass changes nothing.
//! 2. **Aggregation**: communities are contracted into super-nodes (internal
//!    weight becomes a self-loop) and local moving repeats on the result.
//!
//! Levels continue while modularity improves by at least `MIN_GAIN`. The seed
//! drives the node visitation order of each pass, so identical graphs and
//! seeds always yield the same partition.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::CommunityConfig;
use crate::models::{LocationGraph, Partition};
use crate::GeoweaveError;

/// Minimum modularity improvement for another pass or level.
pub const MIN_GAIN: f64 = 1e-7;

#[derive(Debug, Clone)]
pub struct CommunityDetector {
    resolution: f64,
    seed: u64,
}

impl CommunityDetector {
    pub fn new(resolution: f64, seed: u64) -> Result<Self, GeoweaveError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GeoweaveError::Configuration(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        Ok(Self { resolution, seed })
    }

    pub fn from_config(config: &CommunityConfig) -> Result<Self, GeoweaveError> {
        Self::new(config.resolution, config.seed)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Partition the graph. Ids are contiguous, numbered by first member index.
    pub fn detect(&self, graph: &LocationGraph) -> Partition {
        let n = graph.node_count();
        let mut level = LevelGraph::from_location_graph(graph);
        if level.total_weight() <= 0.0 {
            tracing::debug!(nodes = n, "Edgeless graph, every node is its own community");
            return Partition::singletons(n);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        // input node -> node of the current level
        let mut assignment: Vec<usize> = (0..n).collect();

        let mut status = Status::new(&level);
        status.local_moving(&level, self.resolution, &mut rng);
        let mut current = status.modularity(self.resolution);
        let (mut mapping, mut count) = renumber(&status.node2com);
        compose(&mut assignment, &mapping);
        let mut levels = 1;

        loop {
            level = level.contract(&mapping, count);
            status = Status::new(&level);
            status.local_moving(&level, self.resolution, &mut rng);
            let next = status.modularity(self.resolution);
            if next - current < MIN_GAIN {
                break;
            }
            (mapping, count) = renumber(&status.node2com);
            compose(&mut assignment, &mapping);
            current = next;
            levels += 1;
        }

        tracing::debug!(levels, modularity = current, "Louvain converged");
        let (ids, _) = renumber(&assignment);
        Partition::new(ids)
    }
}

/// Weighted modularity of `partition` on `graph`:
/// `Q = sum_c [ in_c / m - resolution * (tot_c / 2m)^2 ]`.
///
/// An edgeless graph scores 0.
pub fn modularity(graph: &LocationGraph, partition: &Partition, resolution: f64) -> f64 {
    let m = graph.total_weight();
    if m <= 0.0 {
        return 0.0;
    }
    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut total: BTreeMap<usize, f64> = BTreeMap::new();

    for edge in graph.edges() {
        let (Some(cs), Some(ct)) = (
            partition.community_of(edge.source),
            partition.community_of(edge.target),
        ) else {
            continue;
        };
        if cs == ct {
            *internal.entry(cs).or_default() += edge.weight;
        }
        *total.entry(cs).or_default() += edge.weight;
        *total.entry(ct).or_default() += edge.weight;
    }

    total
        .iter()
        .map(|(c, tot)| {
            let inner = internal.get(c).copied().unwrap_or(0.0);
            inner / m - resolution * (tot / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Map labels to contiguous ids in order of first appearance.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
    let ids = labels
        .iter()
        .map(|label| {
            let next = seen.len();
            *seen.entry(*label).or_insert(next)
        })
        .collect();
    (ids, seen.len())
}

fn compose(assignment: &mut [usize], mapping: &[usize]) {
    for slot in assignment.iter_mut() {
        *slot = mapping[*slot];
    }
}

/// Graph of one Louvain level: adjacency without self entries, self-loop
/// weights kept separately.
#[derive(Debug, Clone)]
struct LevelGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    loops: Vec<f64>,
}

impl LevelGraph {
    fn from_location_graph(graph: &LocationGraph) -> Self {
        let n = graph.node_count();
        Self {
            adjacency: (0..n).map(|i| graph.neighbors(i).to_vec()).collect(),
            loops: vec![0.0; n],
        }
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Weighted degree; a self-loop counts twice.
    fn degree(&self, node: usize) -> f64 {
        self.adjacency[node].iter().map(|(_, w)| w).sum::<f64>() + 2.0 * self.loops[node]
    }

    fn total_weight(&self) -> f64 {
        (0..self.node_count()).map(|i| self.degree(i)).sum::<f64>() / 2.0
    }

    /// Collapse each community into one node.
    fn contract(&self, mapping: &[usize], count: usize) -> LevelGraph {
        let mut loops = vec![0.0; count];
        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for (u, neighbors) in self.adjacency.iter().enumerate() {
            let cu = mapping[u];
            loops[cu] += self.loops[u];
            for &(v, w) in neighbors {
                if u >= v {
                    continue;
                }
                let cv = mapping[v];
                if cu == cv {
                    loops[cu] += w;
                } else {
                    *between.entry((cu.min(cv), cu.max(cv))).or_default() += w;
                }
            }
        }

        let mut adjacency = vec![Vec::new(); count];
        for ((a, b), w) in between {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
        LevelGraph { adjacency, loops }
    }
}

/// Community bookkeeping for one level.
struct Status {
    node2com: Vec<usize>,
    /// Total weighted degree per community.
    degrees: Vec<f64>,
    /// Weighted degree per node.
    gdegrees: Vec<f64>,
    /// Internal edge weight per community, each edge counted once.
    internals: Vec<f64>,
    loops: Vec<f64>,
    total_weight: f64,
}

impl Status {
    fn new(graph: &LevelGraph) -> Self {
        let n = graph.node_count();
        let gdegrees: Vec<f64> = (0..n).map(|i| graph.degree(i)).collect();
        Self {
            node2com: (0..n).collect(),
            degrees: gdegrees.clone(),
            gdegrees,
            internals: graph.loops.clone(),
            loops: graph.loops.clone(),
            total_weight: graph.total_weight(),
        }
    }

    fn modularity(&self, resolution: f64) -> f64 {
        let m = self.total_weight;
        if m <= 0.0 {
            return 0.0;
        }
        self.degrees
            .iter()
            .zip(&self.internals)
            .filter(|(deg, _)| **deg > 0.0)
            .map(|(deg, inner)| inner / m - resolution * (deg / (2.0 * m)).powi(2))
            .sum()
    }

    /// Weights from `node` to each neighbouring community, in first-seen order.
    fn neighbor_communities(&self, graph: &LevelGraph, node: usize) -> Vec<(usize, f64)> {
        let mut out: Vec<(usize, f64)> = Vec::new();
        for &(neighbor, w) in &graph.adjacency[node] {
            let com = self.node2com[neighbor];
            match out.iter_mut().find(|(c, _)| *c == com) {
                Some((_, acc)) => *acc += w,
                None => out.push((com, w)),
            }
        }
        out
    }

    fn remove(&mut self, node: usize, com: usize, weight_to_com: f64) {
        self.degrees[com] -= self.gdegrees[node];
        self.internals[com] -= weight_to_com + self.loops[node];
    }

    fn insert(&mut self, node: usize, com: usize, weight_to_com: f64) {
        self.node2com[node] = com;
        self.degrees[com] += self.gdegrees[node];
        self.internals[com] += weight_to_com + self.loops[node];
    }

    /// Repeat seeded passes until nothing moves or modularity stalls.
    fn local_moving(&mut self, graph: &LevelGraph, resolution: f64, rng: &mut ChaCha8Rng) {
        let two_m = 2.0 * self.total_weight;
        if two_m <= 0.0 {
            return;
        }
        let mut current = self.modularity(resolution);
        let mut order: Vec<usize> = (0..graph.node_count()).collect();

        loop {
            let mut moved = false;
            order.shuffle(rng);

            for &node in &order {
                let com_node = self.node2com[node];
                let degc_totw = self.gdegrees[node] / two_m;
                let neighbors = self.neighbor_communities(graph, node);
                let weight_to = |com: usize| {
                    neighbors
                        .iter()
                        .find(|(c, _)| *c == com)
                        .map_or(0.0, |(_, w)| *w)
                };

                let own_weight = weight_to(com_node);
                let remove_cost = -own_weight
                    + resolution * (self.degrees[com_node] - self.gdegrees[node]) * degc_totw;
                self.remove(node, com_node, own_weight);

                let mut best_com = com_node;
                let mut best_increase = 0.0;
                for &(com, dnc) in &neighbors {
                    let increase =
                        remove_cost + dnc - resolution * self.degrees[com] * degc_totw;
                    if increase > best_increase {
                        best_increase = increase;
                        best_com = com;
                    }
                }

                self.insert(node, best_com, weight_to(best_com));
                if best_com != com_node {
                    moved = true;
                }
            }

            let next = self.modularity(resolution);
            if !moved || next - current < MIN_GAIN {
                break;
            }
            current = next;
        }
    }
}
