//! K-shortest loopless path enumeration.
//!
//! Yen's algorithm over the attack multigraph: Dijkstra's search finds the
//! cheapest path, then each prefix of every accepted path spawns a "spur"
//! search with the already-used continuation edges and root nodes banned.
//! Candidates pool in a min-heap keyed by (cost, discovery order), so ties
//! resolve deterministically. Path probability is recovered as `exp(-cost)`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use rampart_graph::AttackGraph;

use crate::types::{AttackPath, PathStep};

/// Default number of paths per target.
pub const DEFAULT_K: usize = 10;

/// A raw path over dense node indices.
#[derive(Debug, Clone, PartialEq)]
struct RawPath {
    /// Node indices along the path.
    node_indices: Vec<usize>,
    /// Edges along the path as (from_node_index, edge_position_in_adjacency_list).
    edges: Vec<(usize, usize)>,
    /// Sum of edge costs.
    cost: f64,
}

/// Enumerate up to `k` loopless paths from `source` to `target`, cheapest
/// (most probable) first.
///
/// A missing source or target, or an unreachable target, yields an empty
/// result rather than an error.
pub fn k_shortest_paths(
    graph: &AttackGraph,
    source: &str,
    target: &str,
    k: usize,
) -> Vec<AttackPath> {
    let (Some(src), Some(tgt)) = (graph.index_of(source), graph.index_of(target)) else {
        return Vec::new();
    };
    if k == 0 {
        return Vec::new();
    }

    let unbanned_nodes = vec![false; graph.node_count()];
    let unbanned_edges = HashSet::new();
    let Some(first) = shortest_path(graph, src, tgt, &unbanned_nodes, &unbanned_edges) else {
        return Vec::new();
    };

    let mut accepted: Vec<RawPath> = vec![first];
    let mut candidates: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut seen: HashSet<Vec<(usize, usize)>> = HashSet::new();
    seen.insert(accepted[0].edges.clone());
    let mut discovery = 0usize;

    while accepted.len() < k {
        let prev = accepted[accepted.len() - 1].clone();

        // Deviate from every prefix of the previous path.
        let mut root_cost = 0.0;
        for i in 0..prev.edges.len() {
            let spur_node = prev.node_indices[i];

            // Ban the continuation edge of every accepted path that shares
            // this root. Roots are compared by edge prefix: with parallel
            // edges, a node prefix alone does not identify the route taken.
            let mut banned_edges: HashSet<(usize, usize)> = HashSet::new();
            for path in &accepted {
                if path.edges.len() > i && path.edges[..i] == prev.edges[..i] {
                    banned_edges.insert(path.edges[i]);
                }
            }

            // Ban root nodes (minus the spur node) so spurs stay loopless.
            let mut banned_nodes = vec![false; graph.node_count()];
            for &n in &prev.node_indices[..i] {
                banned_nodes[n] = true;
            }

            if let Some(spur) = shortest_path(graph, spur_node, tgt, &banned_nodes, &banned_edges)
            {
                let mut node_indices = prev.node_indices[..i].to_vec();
                node_indices.extend_from_slice(&spur.node_indices);
                let mut edges = prev.edges[..i].to_vec();
                edges.extend_from_slice(&spur.edges);
                let candidate = RawPath {
                    node_indices,
                    edges,
                    cost: root_cost + spur.cost,
                };
                if seen.insert(candidate.edges.clone()) {
                    candidates.push(Candidate {
                        cost: candidate.cost,
                        discovery,
                        path: candidate,
                    });
                    discovery += 1;
                }
            }

            let (from, pos) = prev.edges[i];
            root_cost += graph.adjacency[from][pos].cost;
        }

        match candidates.pop() {
            Some(best) => accepted.push(best.path),
            None => break,
        }
    }

    accepted.iter().map(|p| to_attack_path(graph, p)).collect()
}

/// Dijkstra's shortest path on edge costs, honoring banned nodes and edges.
fn shortest_path(
    graph: &AttackGraph,
    source: usize,
    target: usize,
    banned_nodes: &[bool],
    banned_edges: &HashSet<(usize, usize)>,
) -> Option<RawPath> {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; n]; // (parent_node, edge_pos)
    let mut settled = vec![false; n];

    dist[source] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(SearchState {
        cost: 0.0,
        node: source,
    });

    while let Some(SearchState { cost, node }) = heap.pop() {
        if node == target {
            break;
        }

        if settled[node] {
            continue;
        }
        settled[node] = true;

        if cost > dist[node] {
            continue;
        }

        for (pos, edge) in graph.outgoing(node).iter().enumerate() {
            if banned_nodes[edge.target] || banned_edges.contains(&(node, pos)) {
                continue;
            }

            let next = dist[node] + edge.cost;
            if next < dist[edge.target] {
                dist[edge.target] = next;
                prev[edge.target] = Some((node, pos));
                heap.push(SearchState {
                    cost: next,
                    node: edge.target,
                });
            }
        }
    }

    if dist[target].is_infinite() {
        return None;
    }

    // Reconstruct from the predecessor chain.
    let mut node_indices = Vec::new();
    let mut edges = Vec::new();
    let mut current = target;

    while let Some((parent, pos)) = prev[current] {
        node_indices.push(current);
        edges.push((parent, pos));
        current = parent;
    }
    node_indices.push(source);

    node_indices.reverse();
    edges.reverse();

    Some(RawPath {
        node_indices,
        edges,
        cost: dist[target],
    })
}

/// Convert a raw path into its public shape.
fn to_attack_path(graph: &AttackGraph, raw: &RawPath) -> AttackPath {
    let nodes = raw
        .node_indices
        .iter()
        .map(|&i| graph.nodes[i].id.clone())
        .collect();

    let steps = raw
        .edges
        .iter()
        .map(|&(from, pos)| {
            let edge = &graph.adjacency[from][pos];
            let target = &graph.nodes[edge.target];
            PathStep {
                node_id: target.id.clone(),
                label: target.label.clone(),
                probability: edge.probability,
                reason: edge.reason.clone(),
            }
        })
        .collect();

    AttackPath {
        probability: (-raw.cost).exp(),
        nodes,
        steps,
    }
}

/// A pooled Yen candidate. Min-heap by cost, discovery order breaks ties.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    cost: f64,
    discovery: usize,
    path: RawPath,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap (BinaryHeap is a max-heap).
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.discovery.cmp(&self.discovery))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// State for Dijkstra's priority queue (min-heap by cost, then node index).
#[derive(Debug, Clone, PartialEq)]
struct SearchState {
    cost: f64,
    node: usize,
}

impl Eq for SearchState {}

impl Ord for SearchState {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
