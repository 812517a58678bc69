//! Room adjacency multigraph.
//!
//! Vertices are the present rooms of one episode, numbered densely in room
//! order; `rooms()[v]` maps a vertex back to its room index. Each door pair
//! and the Toilet link add one undirected edge, stored in both endpoints'
//! neighbor lists. Parallel edges are kept: two doors between the same rooms
//! count twice for the block model.

use std::collections::VecDeque;

use crate::doors::DoorPair;
use crate::layout::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Door,
    Toilet,
}

/// An undirected edge between two vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub struct DoorGraph {
    rooms: Vec<usize>,
    vertex_of: Vec<Option<usize>>,
    edges: Vec<Edge>,
    adj: Vec<Vec<usize>>,
}

impl DoorGraph {
    /// Edgeless graph over `present` rooms of a `room_count`-room table.
    pub fn new(room_count: usize, present: &[usize]) -> Self {
        let mut vertex_of = vec![None; room_count];
        for (v, &room) in present.iter().enumerate() {
            vertex_of[room] = Some(v);
        }
        Self {
            rooms: present.to_vec(),
            vertex_of,
            edges: Vec::new(),
            adj: vec![Vec::new(); present.len()],
        }
    }

    /// Graph of one episode: door pairs plus the Toilet link.
    pub fn build(layout: &Layout, pairs: &[DoorPair], toilet: usize, partner: usize) -> Self {
        let mut graph = Self::new(layout.len(), &layout.present_indices());
        for pair in pairs {
            graph.add_edge(pair.entry_room, pair.other_room, EdgeKind::Door);
        }
        graph.add_edge(toilet, partner, EdgeKind::Toilet);
        graph
    }

    /// Connect two rooms. Returns false, adding nothing, if either room is
    /// not a vertex.
    pub fn add_edge(&mut self, room_a: usize, room_b: usize, kind: EdgeKind) -> bool {
        let (Some(a), Some(b)) = (self.vertex(room_a), self.vertex(room_b)) else {
            return false;
        };
        self.edges.push(Edge { a, b, kind });
        self.adj[a].push(b);
        self.adj[b].push(a);
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Room index of each vertex.
    pub fn rooms(&self) -> &[usize] {
        &self.rooms
    }

    pub fn room(&self, vertex: usize) -> usize {
        self.rooms[vertex]
    }

    pub fn vertex(&self, room: usize) -> Option<usize> {
        self.vertex_of.get(room).copied().flatten()
    }

    /// Neighbors of `vertex`, one entry per incident edge.
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.adj[vertex]
    }

    /// Self-loops count twice.
    pub fn degree(&self, vertex: usize) -> usize {
        self.adj[vertex].len()
    }

    /// Whether the subgraph induced by `members` is one connected component.
    /// A single vertex is connected; an empty set is not.
    pub fn is_connected(&self, members: &[usize]) -> bool {
        let Some(&start) = members.first() else {
            return false;
        };
        let mut inside = vec![false; self.vertex_count()];
        for &v in members {
            inside[v] = true;
        }

        let mut visited = vec![false; self.vertex_count()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &next in &self.adj[current] {
                if inside[next] && !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        members.iter().all(|&v| visited[v])
    }
}
