//! Definition of the graph module
//!
//! A `Graph` is a store of named nodes joined by directed edges, each edge
//! carrying an arbitrary weight payload. Nodes are kept in insertion order
//! and addressed internally by their arena slot; edges live in a flat table
//! of `(source, target, weight)` records, so no edge ever holds a reference
//! into the node storage.

use crate::util::{NogginError, Result};

use indexmap::IndexMap;

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::hash::Hash;

/// Bookkeeping for a single node. The slot index assigned at `add` time is
/// stable for the life of the graph; nodes are never removed.
#[derive(Clone, Debug, Default)]
struct Node {

    /// Number of incoming edges. Maintained by `connect`, consumed by Kahn's
    /// algorithm
    indegree: usize,

    /// Indices into the edge table, in connection order
    outgoing: Vec<usize>

}

/// A directed edge in the flat edge table
#[derive(Clone, Debug)]
struct Edge<W> {

    /// Arena slot of the source node
    source: usize,

    /// Arena slot of the target node
    target: usize,

    /// The payload carried by this edge
    weight: W

}

/// A directed graph with weighted edges.
///
/// At most one edge exists per ordered `(source, target)` pair; reconnecting
/// the pair overwrites the weight in place. Direction is significant; an
/// edge `a -> b` says nothing about `b -> a`.
#[derive(Clone, Debug)]
pub struct Graph<K, W> {

    /// The node arena, in insertion order. A node's slot is its map index.
    nodes: IndexMap<K, Node>,

    /// Every edge in the graph
    edges: Vec<Edge<W>>

}

impl<K: Hash + Eq, W> Graph<K, W> {

    /// Construct an empty `Graph`
    pub fn new() -> Self {
        Graph { nodes: IndexMap::new(), edges: Vec::new() }
    }


    /// The number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }


    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }


    /// Check if a node with the given key is present
    pub fn contains<Q>(&self, key: &Q) -> bool
        where K: Borrow<Q>, Q: Hash + Eq + ?Sized
    {
        self.nodes.contains_key(key)
    }


    /// Insert a node with no edges and zero in-degree.
    ///
    /// # Returns
    /// `true` if the node was inserted; `false` if the key was already
    /// present, in which case the graph is left unchanged
    pub fn add(&mut self, key: K) -> bool {
        if self.nodes.contains_key(&key) {
            return false;
        }

        self.nodes.insert(key, Node::default());
        true
    }


    /// Create or overwrite the directed edge `source -> target`.
    ///
    /// If the edge already exists only its weight is replaced; the target's
    /// in-degree is counted once per pair, however many times the pair is
    /// reconnected.
    ///
    /// # Returns
    /// `true` on success; `false` if either endpoint is absent, in which case
    /// nothing is mutated
    pub fn connect<Q>(&mut self, source: &Q, target: &Q, weight: W) -> bool
        where K: Borrow<Q>, Q: Hash + Eq + ?Sized
    {
        let (s, t) = match (self.nodes.get_index_of(source), self.nodes.get_index_of(target)) {
            (Some(s), Some(t)) => (s, t),
            _ => return false
        };

        if let Some(edge) = self.edges.iter_mut().find(|e| e.source == s && e.target == t) {
            edge.weight = weight;
            return true;
        }

        let id = self.edges.len();
        self.edges.push(Edge { source: s, target: t, weight });

        self.nodes.get_index_mut(s).expect("source slot lives in the arena").1.outgoing.push(id);
        self.nodes.get_index_mut(t).expect("target slot lives in the arena").1.indegree += 1;

        true
    }


    /// Retrieve the weight of the edge `source -> target`, if the edge
    /// exists. A zero-valued weight is `Some(..)`; only a missing edge is
    /// `None`.
    pub fn weight<Q>(&self, source: &Q, target: &Q) -> Option<&W>
        where K: Borrow<Q>, Q: Hash + Eq + ?Sized
    {
        let s = self.nodes.get_index_of(source)?;
        let t = self.nodes.get_index_of(target)?;

        self.edges.iter().find(|e| e.source == s && e.target == t).map(|e| &e.weight)
    }


    /// Iterate over every outgoing edge of `source` as `(target key, weight)`
    /// pairs, in connection order. An unknown source yields nothing.
    pub fn weights<'a, Q>(&'a self, source: &Q) -> impl Iterator<Item = (&'a K, &'a W)> + 'a
        where K: Borrow<Q>, Q: Hash + Eq + ?Sized
    {
        let outgoing = self.nodes.get(source).map(|n| n.outgoing.as_slice()).unwrap_or(&[]);

        outgoing.iter().map(move |&id| {
            let edge = &self.edges[id];
            let (key, _) = self.nodes.get_index(edge.target).expect("edge target lives in the arena");
            (key, &edge.weight)
        })
    }


    /// The in-degree of the given node, or `None` if the node is absent
    pub fn in_degree<Q>(&self, key: &Q) -> Option<usize>
        where K: Borrow<Q>, Q: Hash + Eq + ?Sized
    {
        self.nodes.get(key).map(|n| n.indegree)
    }


    /// Compute a topological order of the nodes with Kahn's algorithm.
    ///
    /// The frontier is seeded with every zero-in-degree node in insertion
    /// order and drained FIFO, so ties among simultaneously-ready nodes are
    /// broken first-enqueued-first-emitted. Repeated calls on an unmodified
    /// graph return identical sequences.
    ///
    /// # Errors
    /// `NogginError::CyclicGraph` if some nodes never reach zero remaining
    /// in-degree; i.e. the graph contains a cycle and no complete order
    /// exists
    pub fn topological_sort(&self) -> Result<Vec<K>>
        where K: Clone
    {
        let mut indegrees: Vec<usize> = self.nodes.values().map(|n| n.indegree).collect();

        let mut frontier: VecDeque<usize> = indegrees.iter()
                                                     .enumerate()
                                                     .filter(|&(_, &d)| d == 0)
                                                     .map(|(slot, _)| slot)
                                                     .collect();

        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(slot) = frontier.pop_front() {
            order.push(slot);

            for &id in &self.nodes[slot].outgoing {
                let target = self.edges[id].target;
                indegrees[target] -= 1;

                if indegrees[target] == 0 {
                    frontier.push_back(target);
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(NogginError::CyclicGraph);
        }

        Ok(order.into_iter()
                .map(|slot| self.nodes.get_index(slot).expect("emitted slot lives in the arena").0.clone())
                .collect())
    }

}


impl<K: Hash + Eq, W> Default for Graph<K, W> {

    fn default() -> Self {
        Graph::new()
    }

}
