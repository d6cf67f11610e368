use serde::Serialize;

/// Community assignment for every node of a location graph.
///
/// `assignment[i]` is the community id of node `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    assignment: Vec<usize>,
}

impl Partition {
    pub fn new(assignment: Vec<usize>) -> Self {
        Self { assignment }
    }

    /// Every node in its own community.
    pub fn singletons(node_count: usize) -> Self {
        Self {
            assignment: (0..node_count).collect(),
        }
    }

    pub fn community_of(&self, node: usize) -> Option<usize> {
        self.assignment.get(node).copied()
    }

    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Distinct community ids in ascending order.
    pub fn community_ids(&self) -> Vec<usize> {
        let mut ids = self.assignment.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn community_count(&self) -> usize {
        self.community_ids().len()
    }
}
