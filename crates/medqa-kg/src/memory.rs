//! In-memory graph backend, loaded from a JSON fixture.
//!
//! Fixture shape:
//! ```json
//! {
//!   "nodes": [{"name": "感冒", "type": "Disease", "desc": "...", "cure_way": ["多休息"], "cured_prob": "95%"}],
//!   "edges": [{"from": "感冒", "from_type": "Disease", "rel": "has_symptom", "to": "咳嗽", "to_type": "Symptom"}]
//! }
//! ```

use std::path::Path;

use ahash::AHashMap;
use async_trait::async_trait;
use medqa_common::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::neo4j::property_text;
use crate::oracle::GraphOracle;
use crate::relation::{Direction, HopProbe, NodeProperty, Relation};
use crate::{KgError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default)]
    pub desc: Option<Value>,
    #[serde(default)]
    pub cure_way: Option<Value>,
    #[serde(default)]
    pub prevent: Option<Value>,
    #[serde(default)]
    pub cause: Option<Value>,
    #[serde(default)]
    pub easy_get: Option<Value>,
    #[serde(default)]
    pub cure_lasttime: Option<Value>,
    #[serde(default)]
    pub cured_prob: Option<Value>,
}

impl GraphNode {
    /// Node with no properties set.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            desc: None,
            cure_way: None,
            prevent: None,
            cause: None,
            easy_get: None,
            cure_lasttime: None,
            cured_prob: None,
        }
    }

    pub fn with(mut self, property: NodeProperty, value: Value) -> Self {
        *self.slot(property) = Some(value);
        self
    }

    fn slot(&mut self, property: NodeProperty) -> &mut Option<Value> {
        match property {
            NodeProperty::Desc         => &mut self.desc,
            NodeProperty::CureWay      => &mut self.cure_way,
            NodeProperty::Prevent      => &mut self.prevent,
            NodeProperty::Cause        => &mut self.cause,
            NodeProperty::EasyGet      => &mut self.easy_get,
            NodeProperty::CureLasttime => &mut self.cure_lasttime,
            NodeProperty::CuredProb    => &mut self.cured_prob,
        }
    }

    fn property(&self, property: NodeProperty) -> Option<&Value> {
        match property {
            NodeProperty::Desc         => self.desc.as_ref(),
            NodeProperty::CureWay      => self.cure_way.as_ref(),
            NodeProperty::Prevent      => self.prevent.as_ref(),
            NodeProperty::Cause        => self.cause.as_ref(),
            NodeProperty::EasyGet      => self.easy_get.as_ref(),
            NodeProperty::CureLasttime => self.cure_lasttime.as_ref(),
            NodeProperty::CuredProb    => self.cured_prob.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub from_type: Category,
    pub rel: Relation,
    pub to: String,
    pub to_type: Category,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Fixture {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

type NodeKey = (Category, String);

#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: AHashMap<NodeKey, GraphNode>,
    /// Edge indices by source node.
    outgoing: AHashMap<NodeKey, Vec<usize>>,
    /// Edge indices by destination node.
    incoming: AHashMap<NodeKey, Vec<usize>>,
    edges: Vec<GraphEdge>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KgError::FixtureNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let graph = Self::from_json_str(&raw)?;
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Loaded in-memory graph from {:?}",
            path
        );
        Ok(graph)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let fixture: Fixture =
            serde_json::from_str(raw).map_err(|e| KgError::InvalidFixture(e.to_string()))?;
        let mut graph = Self::new();
        for node in fixture.nodes {
            graph.add_node(node);
        }
        for edge in fixture.edges {
            graph.add_edge(edge);
        }
        Ok(graph)
    }

    /// Insert or replace a node.
    pub fn add_node(&mut self, node: GraphNode) -> &mut Self {
        self.nodes.insert((node.category, node.name.clone()), node);
        self
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> &mut Self {
        let id = self.edges.len();
        self.outgoing.entry((edge.from_type, edge.from.clone())).or_default().push(id);
        self.incoming.entry((edge.to_type, edge.to.clone())).or_default().push(id);
        self.edges.push(edge);
        self
    }

    /// Shorthand for tests and fixtures built in code.
    pub fn relate(
        &mut self,
        from: (&str, Category),
        rel: Relation,
        to: (&str, Category),
    ) -> &mut Self {
        self.add_edge(GraphEdge {
            from: from.0.to_string(),
            from_type: from.1,
            rel,
            to: to.0.to_string(),
            to_type: to.1,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl InMemoryGraph {
    /// Names of the nodes one matching hop away from the anchor, in edge order.
    fn hop_neighbours<'a>(
        &'a self,
        name: &str,
        probe: &'a HopProbe,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let index = match probe.direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        index
            .get(&(probe.anchor, name.to_string()))
            .into_iter()
            .flatten()
            .filter_map(move |&id| {
                let edge = &self.edges[id];
                let (other, other_type) = match probe.direction {
                    Direction::Outgoing => (&edge.to, edge.to_type),
                    Direction::Incoming => (&edge.from, edge.from_type),
                };
                (probe.matches_relation(edge.rel) && other_type == probe.target)
                    .then_some(other.as_str())
            })
    }
}

#[async_trait]
impl GraphOracle for InMemoryGraph {
    async fn hop_exists(&self, name: &str, probe: &HopProbe) -> Result<bool> {
        Ok(self.hop_neighbours(name, probe).next().is_some())
    }

    async fn hop_targets(&self, name: &str, probe: &HopProbe, limit: usize) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.hop_neighbours(name, probe).map(str::to_string).collect();
        names.sort();
        names.dedup();
        names.truncate(limit);
        Ok(names)
    }

    async fn node_property(
        &self,
        name: &str,
        category: Category,
        property: NodeProperty,
    ) -> Result<Option<String>> {
        Ok(self
            .nodes
            .get(&(category, name.to_string()))
            .and_then(|n| n.property(property).cloned())
            .and_then(property_text))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
