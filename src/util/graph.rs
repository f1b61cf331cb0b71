//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Basic graph data structure stored as vectors of nodes and edges.
//!
//! Source: http://smallcultfollowing.com/babysteps/blog/2015/04/06/modeling-graphs-in-rust-using-vector-indices/

pub type NodeIndex = usize;

type EdgeIndex = usize;

#[derive(Debug, PartialEq)]
struct NodeData<V> {
    node: V,
    first_outgoing_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
struct EdgeData<E> {
    edge: E,
    source: NodeIndex,
    target: NodeIndex,
    next_outgoing_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
pub struct Graph<V, E> {
    vertices: Vec<NodeData<V>>,
    edges: Vec<EdgeData<E>>,
}

#[derive(Debug, PartialEq)]
pub enum EdgeStatus {
    MissingSource,
    MissingTarget,
    SelfLoop,
    AlreadyExists,
    Success,
}

impl<V, E> Graph<V, E> {
    /// Creates an empty `Graph` struct.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a new node to the graph.
    ///
    /// Returns the `NodeIndex` to remember the node.
    pub fn add_node(&mut self, node: V) -> NodeIndex {
        let index = self.vertices.len();
        self.vertices.push(NodeData {
            node: node,
            first_outgoing_edge: None,
        });
        index
    }

    /// Checks if a given `source` node is in the graph.
    pub fn has_node(&self, source: NodeIndex) -> bool {
        source < self.node_count()
    }

    /// Checks if a given `source` node is connected to the given `target` node.
    pub fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.has_node(source) && self.successors(source).any(|n| n == target)
    }

    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Accesses the node data label behind the `node` index.
    pub fn get_node(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.vertices.get(node)?.node)
    }

    /// Adds a new edge to the graph from `source` to `target`.
    ///
    /// Duplicate edges and self-loops are rejected and reported through the
    /// returned `EdgeStatus`.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, cost: E) -> EdgeStatus {
        if self.has_node(source) == false {
            return EdgeStatus::MissingSource;
        }
        if self.has_node(target) == false {
            return EdgeStatus::MissingTarget;
        }
        if source == target {
            return EdgeStatus::SelfLoop;
        }
        if self.has_edge(source, target) == true {
            return EdgeStatus::AlreadyExists;
        }
        let edge_index = self.edges.len();
        let next_outgoing_edge = self.vertices[source].first_outgoing_edge;
        self.edges.push(EdgeData {
            edge: cost,
            source: source,
            target: target,
            next_outgoing_edge: next_outgoing_edge,
        });
        self.vertices[source].first_outgoing_edge = Some(edge_index);
        EdgeStatus::Success
    }

    /// Creates an iterator over the outgoing nodes from the `source` node.
    ///
    /// Nodes are visited from the most recently added edge to the oldest.
    pub fn successors(&self, source: NodeIndex) -> Successors<V, E> {
        Successors {
            graph: self,
            current_edge_index: self.vertices[source].first_outgoing_edge,
        }
    }

    /// Iterates over every node label in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter().map(|n| &n.node)
    }
}

pub struct Successors<'graph, V, E> {
    graph: &'graph Graph<V, E>,
    current_edge_index: Option<EdgeIndex>,
}

impl<'graph, V, E> Iterator for Successors<'graph, V, E> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = &self.graph.edges[self.current_edge_index?];
        self.current_edge_index = edge.next_outgoing_edge;
        Some(edge.target)
    }
}
