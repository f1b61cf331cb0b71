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

use super::graph::{EdgeStatus, Graph, NodeIndex};
use std::collections::HashMap;
use std::hash::Hash;

/// A graph whose nodes are addressed by a unique key and carry a value.
pub struct GraphMap<K: Eq + Hash + Clone, V, E> {
    graph: Graph<K, E>,
    map: HashMap<K, Node<V>>,
}

pub struct Node<V>(V, NodeIndex);

impl<V> Node<V> {
    pub fn index(&self) -> NodeIndex {
        self.1
    }

    pub fn as_ref(&self) -> &V {
        &self.0
    }
}

impl<K: Eq + Hash + Clone, V, E> GraphMap<K, V, E> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            map: HashMap::new(),
        }
    }

    /// Adds a node under `key`, replacing the value if the key is already known.
    pub fn add_node(&mut self, key: K, value: V) -> NodeIndex {
        if let Some(node) = self.map.get_mut(&key) {
            node.0 = value;
            return node.1;
        }
        let index = self.graph.add_node(key.clone());
        self.map.insert(key, Node(value, index));
        index
    }

    pub fn add_edge_by_key(&mut self, source: &K, target: &K, cost: E) -> EdgeStatus {
        let source = match self.map.get(source) {
            Some(n) => n.index(),
            None => return EdgeStatus::MissingSource,
        };
        let target = match self.map.get(target) {
            Some(n) => n.index(),
            None => return EdgeStatus::MissingTarget,
        };
        self.graph.add_edge(source, target, cost)
    }

    pub fn get_node_by_key(&self, key: &K) -> Option<&Node<V>> {
        self.map.get(key)
    }

    pub fn get_node_by_index(&self, index: NodeIndex) -> Option<&Node<V>> {
        self.map.get(self.graph.get_node(index)?)
    }

    /// Collects the values of the nodes `key` points to, oldest edge first.
    pub fn successors_by_key(&self, key: &K) -> Option<Vec<&V>> {
        let index = self.map.get(key)?.index();
        let mut list: Vec<&V> = self
            .graph
            .successors(index)
            .filter_map(|i| Some(self.get_node_by_index(i)?.as_ref()))
            .collect();
        list.reverse();
        Some(list)
    }

    /// Iterates over the keys in the order their nodes were added.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.graph.iter()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn get_graph(&self) -> &Graph<K, E> {
        &self.graph
    }
}
