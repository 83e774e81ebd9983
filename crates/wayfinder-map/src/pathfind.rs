//! Fewest-hop route search over the building graph.
//!
//! Edges are unweighted: physical corridor lengths play no part in choosing
//! a route.  Among equally short routes the first one discovered wins, and
//! discovery order is the stored neighbor order of each node, so the same
//! graph always yields the same path.

use std::collections::{HashMap, VecDeque};

use wayfinder_types::NodeId;

use crate::graph::Graph;

/// Breadth-first search from `start` to `destination`.
///
/// Both identifiers must already be normalized.  Returns `None` when either
/// node is absent or `destination` is unreachable; this is an ordinary
/// outcome callers are expected to branch on.
pub fn bfs(graph: &Graph, start: &NodeId, destination: &NodeId) -> Option<Vec<NodeId>> {
    if !graph.contains(start) || !graph.contains(destination) {
        return None;
    }

    // parent[n] = node from which `n` was first discovered.
    let mut parent: HashMap<&NodeId, &NodeId> = HashMap::new();
    let mut queue: VecDeque<&NodeId> = VecDeque::new();
    queue.push_back(start);
    parent.insert(start, start);

    while let Some(current) = queue.pop_front() {
        if current == destination {
            return Some(unwind(&parent, start, current));
        }
        let Some(node) = graph.node(current) else {
            continue;
        };
        for next in &node.neighbors {
            if parent.contains_key(next) {
                continue;
            }
            parent.insert(next, current);
            queue.push_back(next);
        }
    }

    None
}

/// Convenience wrapper that normalizes free-form identifiers first.
pub fn bfs_raw(graph: &Graph, start: &str, destination: &str) -> Option<Vec<NodeId>> {
    bfs(graph, &NodeId::normalize(start), &NodeId::normalize(destination))
}

fn unwind(parent: &HashMap<&NodeId, &NodeId>, start: &NodeId, end: &NodeId) -> Vec<NodeId> {
    let mut path = vec![end.clone()];
    let mut cursor = end;
    while cursor != start {
        match parent.get(cursor) {
            Some(prev) => {
                path.push((*prev).clone());
                cursor = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_C_MAP;

    fn ids(raw: &[&str]) -> Vec<NodeId> {
        raw.iter().map(|s| NodeId::from(*s)).collect()
    }

    fn block_c() -> Graph {
        Graph::from_json(BLOCK_C_MAP).unwrap()
    }

    #[test]
    fn scenario_route_through_right_corridor() {
        let json = r#"{"nodes": {
            "c201": {"type": "room", "neighbors": ["corridor_right"]},
            "corridor_right": {"type": "corridor", "neighbors": ["c201", "c203"]},
            "c203": {"type": "room", "neighbors": ["corridor_right"]}
        }}"#;
        let g = Graph::from_json(json).unwrap();
        assert_eq!(
            bfs_raw(&g, "c201", "c203").unwrap(),
            ids(&["c201", "corridor_right", "c203"])
        );
    }

    #[test]
    fn crosses_all_three_corridors() {
        let g = block_c();
        assert_eq!(
            bfs_raw(&g, "C-201", "C214").unwrap(),
            ids(&["c201", "corridor_right", "corridor_top", "corridor_left", "c214"])
        );
    }

    #[test]
    fn start_equals_destination_is_single_node() {
        let g = block_c();
        assert_eq!(bfs_raw(&g, "c205", "c205").unwrap(), ids(&["c205"]));
    }

    #[test]
    fn absent_or_unreachable_is_none() {
        let g = block_c();
        assert!(bfs_raw(&g, "c201", "c999").is_none());
        assert!(bfs_raw(&g, "c999", "c201").is_none());

        let json = r#"{"nodes": {
            "a": {"type": "room", "neighbors": []},
            "b": {"type": "room", "neighbors": []}
        }}"#;
        let g = Graph::from_json(json).unwrap();
        assert!(bfs_raw(&g, "a", "b").is_none());
    }

    #[test]
    fn repeated_searches_are_identical() {
        let g = block_c();
        let first = bfs_raw(&g, "c209", "c213");
        for _ in 0..10 {
            assert_eq!(bfs_raw(&g, "c209", "c213"), first);
        }
    }

    #[test]
    fn ties_follow_neighbor_order() {
        // Two equal-length routes a → {x, y} → b; x is listed first.
        let json = r#"{"nodes": {
            "a": {"type": "room", "neighbors": ["x", "y"]},
            "x": {"type": "corridor", "neighbors": ["a", "b"]},
            "y": {"type": "corridor", "neighbors": ["a", "b"]},
            "b": {"type": "room", "neighbors": ["y", "x"]}
        }}"#;
        let g = Graph::from_json(json).unwrap();
        assert_eq!(bfs_raw(&g, "a", "b").unwrap(), ids(&["a", "x", "b"]));
        // Reverse direction: b lists y first.
        assert_eq!(bfs_raw(&g, "b", "a").unwrap(), ids(&["b", "y", "a"]));
    }

    /// Length of every simple path between two nodes, by exhaustive DFS.
    fn simple_path_lengths(g: &Graph, at: &NodeId, goal: &NodeId, seen: &mut Vec<NodeId>, out: &mut Vec<usize>) {
        seen.push(at.clone());
        if at == goal {
            out.push(seen.len());
        } else if let Some(node) = g.node(at) {
            for next in &node.neighbors {
                if !seen.contains(next) {
                    simple_path_lengths(g, next, goal, seen, out);
                }
            }
        }
        seen.pop();
    }

    #[test]
    fn bfs_is_no_longer_than_any_simple_path() {
        let json = r#"{"nodes": {
            "a": {"type": "room", "neighbors": ["h1"]},
            "h1": {"type": "corridor", "neighbors": ["a", "h2", "h3"]},
            "h2": {"type": "corridor", "neighbors": ["h1", "h4"]},
            "h3": {"type": "corridor", "neighbors": ["h1", "h4", "b"]},
            "h4": {"type": "corridor", "neighbors": ["h2", "h3", "b"]},
            "b": {"type": "room", "neighbors": ["h3", "h4"]}
        }}"#;
        let g = Graph::from_json(json).unwrap();
        let (a, b) = (NodeId::from("a"), NodeId::from("b"));
        let path = bfs(&g, &a, &b).unwrap();
        let mut lengths = Vec::new();
        simple_path_lengths(&g, &a, &b, &mut Vec::new(), &mut lengths);
        assert!(lengths.len() > 1);
        assert!(lengths.iter().all(|len| path.len() <= *len));
        assert_eq!(path, ids(&["a", "h1", "h3", "b"]));
    }
}
