/// Milestone graph derivation
///
/// Turns the backend's milestone records (nested, flat, or a mixture)
/// into the node and edge lists the tree canvas renders. Positions are
/// not assigned here; the layout pass in `graph::layout` does that.
use crate::api::Milestone;

/// One rendered milestone
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Milestone ID, also the node's identity on the canvas
    pub id: i64,
    /// "task (rate%)" as shown inside the node
    pub label: String,
    /// Completion percentage driving the border color
    pub rate: f32,
}

/// One parent-to-child relationship
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source: i64,
    pub target: i64,
    /// The target node's completion percentage; drives stroke and
    /// arrow-head color
    pub rate: f32,
    /// Incomplete targets get a dashed ("animated") stroke
    pub animated: bool,
}

/// Node and edge lists for one user's milestone tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl MilestoneGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build the graph for a list of milestone records.
///
/// Roots are records with no parent ID. Some server responses are flat
/// and give every record a parent ID; in that case the whole list is
/// treated as the root set so the tree never silently renders empty.
/// Every record, root or nested, yields exactly one node, and every
/// parent-child relationship one directed edge.
pub fn build_graph(milestones: &[Milestone]) -> MilestoneGraph {
    let mut graph = MilestoneGraph::default();

    if milestones.is_empty() {
        return graph;
    }

    let roots: Vec<&Milestone> = milestones.iter().filter(|m| m.parent_id.is_none()).collect();

    if roots.is_empty() {
        for milestone in milestones {
            traverse(milestone, None, &mut graph);
        }
    } else {
        for root in roots {
            traverse(root, None, &mut graph);
        }
    }

    graph
}

fn traverse(milestone: &Milestone, parent_id: Option<i64>, graph: &mut MilestoneGraph) {
    let rate = milestone.completion_percent();

    graph.nodes.push(GraphNode {
        id: milestone.id,
        label: format!("{} ({}%)", milestone.task, rate.round() as i64),
        rate,
    });

    if let Some(source) = parent_id {
        graph.edges.push(GraphEdge {
            source,
            target: milestone.id,
            rate,
            animated: rate < 100.0,
        });
    }

    for sub in &milestone.sub_milestones {
        traverse(sub, Some(milestone.id), graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(id: i64, task: &str, parent_id: Option<i64>) -> Milestone {
        Milestone {
            id,
            task: task.to_string(),
            completed: false,
            completion_rate: None,
            parent_id,
            sub_milestones: Vec::new(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_one_node_per_record_one_edge_per_relationship() {
        let mut root = milestone(1, "Learn guitar", None);
        let mut chords = milestone(2, "Open chords", Some(1));
        chords.sub_milestones.push(milestone(4, "Barre chords", Some(2)));
        root.sub_milestones.push(chords);
        root.sub_milestones.push(milestone(3, "First song", Some(1)));

        let graph = build_graph(&[root, milestone(5, "Run 10k", None)]);

        // 5 records total, 2 roots
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.iter().any(|e| e.source == 1 && e.target == 2));
        assert!(graph.edges.iter().any(|e| e.source == 2 && e.target == 4));
        assert!(graph.edges.iter().any(|e| e.source == 1 && e.target == 3));
    }

    #[test]
    fn test_all_parented_input_falls_back_to_whole_list_as_roots() {
        let records = vec![
            milestone(10, "A", Some(99)),
            milestone(11, "B", Some(99)),
        ];

        let graph = build_graph(&records);

        // No silent empty render: both records become (root) nodes
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_completed_root_with_partial_child() {
        let mut root = milestone(1, "A", None);
        root.completed = true;
        let mut child = milestone(2, "B", Some(1));
        child.completion_rate = Some(0.25);
        root.sub_milestones.push(child);

        let graph = build_graph(&[root]);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].label, "A (100%)");
        assert_eq!(graph.nodes[1].label, "B (25%)");

        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!((edge.source, edge.target), (1, 2));
        assert!(edge.animated);
        assert_eq!(crate::color::progress_color(edge.rate), [237, 124, 38]);
    }

    #[test]
    fn test_complete_target_edge_is_not_animated() {
        let mut root = milestone(1, "A", None);
        let mut child = milestone(2, "B", Some(1));
        child.completed = true;
        root.sub_milestones.push(child);

        let graph = build_graph(&[root]);
        assert!(!graph.edges[0].animated);
    }
}
