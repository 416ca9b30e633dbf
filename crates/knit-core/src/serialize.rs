//! Flat serialized form of a knit graph.
//!
//! A graph is written as three lists: yarn ids, loops, and stitch edges. Edges
//! are grouped by child and listed in parent-stack order, so replaying them
//! with `connect_loops` rebuilds every stack exactly. Reading a graph goes back
//! through `add_yarn`, `add_loop` and `connect_loops`, so a document that
//! breaks a graph invariant is rejected rather than loaded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::graph::edge::StitchEdge;
use crate::graph::knit_loop::{Loop, LoopId};
use crate::graph::yarn::Yarn;
use crate::graph::{GraphError, KnitGraph};

/// Serialized form of a [`KnitGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub yarns: Vec<String>,
    pub loops: Vec<LoopRecord>,
    pub edges: Vec<StitchEdge>,
}

/// Serialized form of a [`Loop`], without its adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopRecord {
    pub id: LoopId,
    pub yarn: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub twisted: bool,
}

impl From<&KnitGraph> for GraphRecord {
    fn from(graph: &KnitGraph) -> Self {
        let yarns = graph.yarns().map(|y| y.yarn_id().to_string()).collect();
        let loops = graph
            .loops()
            .map(|lp| LoopRecord {
                id: lp.id,
                yarn: lp.yarn_id().to_string(),
                twisted: lp.is_twisted(),
            })
            .collect();
        let edges = graph
            .loops()
            .flat_map(|lp| {
                lp.parent_loops()
                    .iter()
                    .filter_map(move |parent| graph.edge(*parent, lp.id).copied())
            })
            .collect();
        Self {
            yarns,
            loops,
            edges,
        }
    }
}

impl TryFrom<GraphRecord> for KnitGraph {
    type Error = GraphError;

    fn try_from(mut record: GraphRecord) -> Result<Self, Self::Error> {
        let mut graph = KnitGraph::new();
        for yarn in record.yarns {
            graph.add_yarn(Yarn::new(yarn))?;
        }
        record.loops.sort_by_key(|lp| lp.id);
        for lp in record.loops {
            graph.add_loop(Loop::new(lp.id, lp.yarn, lp.twisted))?;
        }
        for edge in record.edges {
            graph.connect_loops(edge.parent, edge.child, edge.attrs, None)?;
        }
        Ok(graph)
    }
}

impl Serialize for KnitGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KnitGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = GraphRecord::deserialize(deserializer)?;
        KnitGraph::try_from(record).map_err(serde::de::Error::custom)
    }
}
