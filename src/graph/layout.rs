/// Hierarchical layout for the milestone tree
///
/// Assigns a position to every node of a derived graph: top-to-bottom
/// ranks, fixed node footprint, leaves spread left to right and parents
/// centered over their children. Coordinates are computed center-anchored
/// and shifted by half the footprint before being returned, so callers
/// get the top-left corner the canvas draws from.
use std::collections::{HashMap, HashSet};

use iced::Point;

use crate::state::tree::MilestoneGraph;

/// Fixed node footprint, shared with the canvas renderer
pub const NODE_WIDTH: f32 = 200.0;
pub const NODE_HEIGHT: f32 = 80.0;

/// Horizontal gap between sibling nodes
const NODE_SEP: f32 = 40.0;
/// Vertical gap between ranks
const RANK_SEP: f32 = 60.0;

/// Compute top-left positions for every node in the graph.
pub fn arrange(graph: &MilestoneGraph) -> HashMap<i64, Point> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut targets: HashSet<i64> = HashSet::new();

    for edge in &graph.edges {
        children.entry(edge.source).or_default().push(edge.target);
        targets.insert(edge.target);
    }

    // Roots are the nodes nothing points at, in node order
    let roots: Vec<i64> = graph
        .nodes
        .iter()
        .map(|n| n.id)
        .filter(|id| !targets.contains(id))
        .collect();

    let mut centers: HashMap<i64, (f32, f32)> = HashMap::new();
    let mut next_slot = 0usize;

    for root in roots {
        place(root, 0, &children, &mut centers, &mut next_slot);
    }

    centers
        .into_iter()
        .map(|(id, (x, y))| {
            // Center anchor to top-left anchor
            (id, Point::new(x - NODE_WIDTH / 2.0, y - NODE_HEIGHT / 2.0))
        })
        .collect()
}

/// Place a subtree and return its root's center x.
///
/// Leaves claim successive horizontal slots; interior nodes sit midway
/// between their first and last child.
fn place(
    id: i64,
    depth: usize,
    children: &HashMap<i64, Vec<i64>>,
    centers: &mut HashMap<i64, (f32, f32)>,
    next_slot: &mut usize,
) -> f32 {
    if let Some(&(x, _)) = centers.get(&id) {
        return x;
    }

    let y = depth as f32 * (NODE_HEIGHT + RANK_SEP) + NODE_HEIGHT / 2.0;

    let x = match children.get(&id) {
        Some(kids) if !kids.is_empty() => {
            let first = place(kids[0], depth + 1, children, centers, next_slot);
            let mut last = first;
            for kid in &kids[1..] {
                last = place(*kid, depth + 1, children, centers, next_slot);
            }
            (first + last) / 2.0
        }
        _ => {
            let x = *next_slot as f32 * (NODE_WIDTH + NODE_SEP) + NODE_WIDTH / 2.0;
            *next_slot += 1;
            x
        }
    };

    centers.insert(id, (x, y));
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tree::{GraphEdge, GraphNode};

    fn node(id: i64) -> GraphNode {
        GraphNode {
            id,
            label: format!("m{} (0%)", id),
            rate: 0.0,
        }
    }

    fn edge(source: i64, target: i64) -> GraphEdge {
        GraphEdge {
            source,
            target,
            rate: 0.0,
            animated: true,
        }
    }

    #[test]
    fn test_single_node_sits_at_origin() {
        let graph = MilestoneGraph {
            nodes: vec![node(1)],
            edges: vec![],
        };

        let positions = arrange(&graph);
        // Center (100, 40) shifted by half the footprint
        assert_eq!(positions[&1], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_children_rank_below_parent() {
        let graph = MilestoneGraph {
            nodes: vec![node(1), node(2), node(3)],
            edges: vec![edge(1, 2), edge(1, 3)],
        };

        let positions = arrange(&graph);
        assert!(positions[&2].y > positions[&1].y);
        assert_eq!(positions[&2].y, positions[&3].y);
        assert_eq!(positions[&2].y - positions[&1].y, NODE_HEIGHT + RANK_SEP);
    }

    #[test]
    fn test_parent_centered_over_children() {
        let graph = MilestoneGraph {
            nodes: vec![node(1), node(2), node(3)],
            edges: vec![edge(1, 2), edge(1, 3)],
        };

        let positions = arrange(&graph);
        let mid = (positions[&2].x + positions[&3].x) / 2.0;
        assert_eq!(positions[&1].x, mid);
        assert_eq!(positions[&3].x - positions[&2].x, NODE_WIDTH + NODE_SEP);
    }

    #[test]
    fn test_sibling_subtrees_do_not_overlap() {
        // Two roots, the first with two leaves of its own
        let graph = MilestoneGraph {
            nodes: vec![node(1), node(2), node(3), node(4)],
            edges: vec![edge(1, 2), edge(1, 3)],
        };

        let positions = arrange(&graph);
        assert!(positions[&4].x >= positions[&3].x + NODE_WIDTH);
        assert_eq!(positions[&4].y, positions[&1].y);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = MilestoneGraph {
            nodes: vec![node(1), node(2), node(3)],
            edges: vec![edge(1, 2), edge(2, 3)],
        };

        assert_eq!(arrange(&graph), arrange(&graph));
    }
}
