//! The knit graph: loops, yarns, and the stitch edges between loops.
//!
//! Loops live in an id-keyed slot map, so sparse ids cost nothing. Each slot keeps the loop record
//! plus two ordered adjacency lists: the incoming stitch edges (with their
//! attributes) and the ids of loops pulled through it. Edges always run from a
//! smaller id to a larger one, so the graph is acyclic by construction.

pub mod edge;
pub mod knit_loop;
pub mod yarn;

use std::collections::BTreeMap;
use std::ops::Index;

use thiserror::Error;
use tracing::{debug, trace};

use self::edge::{StitchAttrs, StitchEdge};
use self::knit_loop::{Loop, LoopId};
use self::yarn::Yarn;
use crate::course::{self, Courses};

/// Errors that can occur while building or querying a knit graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("loop not found: {0}")]
    UnknownLoop(LoopId),

    #[error("dangling stitch edge: parent {parent} or child {child} not in graph")]
    DanglingEdgeEndpoint { parent: LoopId, child: LoopId },

    #[error("duplicate loop id: {0}")]
    DuplicateLoop(LoopId),

    #[error("duplicate yarn id: {0}")]
    DuplicateYarn(String),

    #[error("yarn not found: {0}")]
    UnknownYarn(String),

    #[error("loop {loop_id} belongs to yarn {owner}, cannot add it to yarn {yarn}")]
    ForeignYarnLoop {
        loop_id: LoopId,
        owner: String,
        yarn: String,
    },

    #[error("loop {loop_id} cannot follow loop {last} on yarn {yarn}: ids must increase along a yarn")]
    NonMonotonicYarn {
        yarn: String,
        last: LoopId,
        loop_id: LoopId,
    },

    #[error("parent loop {parent} must be created before child loop {child}")]
    ParentNotEarlier { parent: LoopId, child: LoopId },

    #[error("duplicate stitch edge: {parent} -> {child}")]
    DuplicateEdge { parent: LoopId, child: LoopId },

    #[error("loop id mismatch: expected {expected}, found {found}")]
    LoopIdMismatch { expected: LoopId, found: LoopId },

    #[error("loop ids exhausted after {0}")]
    LoopIdsExhausted(LoopId),
}

#[derive(Debug, Clone)]
struct LoopSlot {
    lp: Loop,
    /// Incoming stitch edges in the order they were connected.
    parents: Vec<StitchEdge>,
    /// Loops pulled through this one, in connection order.
    children: Vec<LoopId>,
}

/// A knitted structure: loops pulled through loops, strung along yarns.
///
/// The graph owns the loop id counter. Producers that do not choose ids
/// themselves allocate them through [`KnitGraph::next_loop_id`] or
/// [`KnitGraph::add_loop_to_yarn`].
#[derive(Debug, Clone, Default)]
pub struct KnitGraph {
    slots: BTreeMap<LoopId, LoopSlot>,
    yarns: BTreeMap<String, Yarn>,
    loop_count: usize,
    edge_count: usize,
    last_loop_id: Option<LoopId>,
}

impl KnitGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a yarn. Loops can only be added on registered yarns.
    pub fn add_yarn(&mut self, yarn: Yarn) -> Result<(), GraphError> {
        if self.yarns.contains_key(yarn.yarn_id()) {
            return Err(GraphError::DuplicateYarn(yarn.yarn_id().to_string()));
        }
        debug!(yarn = yarn.yarn_id(), "registered yarn");
        self.yarns.insert(yarn.yarn_id().to_string(), yarn);
        Ok(())
    }

    /// Look up a yarn by id.
    pub fn yarn(&self, yarn_id: &str) -> Option<&Yarn> {
        self.yarns.get(yarn_id)
    }

    /// Mutable access to a yarn, for producers that append loops themselves.
    pub fn yarn_mut(&mut self, yarn_id: &str) -> Option<&mut Yarn> {
        self.yarns.get_mut(yarn_id)
    }

    /// Iterate over all yarns, ordered by id.
    pub fn yarns(&self) -> impl Iterator<Item = &Yarn> {
        self.yarns.values()
    }

    /// The most recently allocated loop id, `None` for an empty graph.
    pub fn last_loop_id(&self) -> Option<LoopId> {
        self.last_loop_id
    }

    /// The id the next new loop should take.
    ///
    /// Fails with [`GraphError::LoopIdsExhausted`] once `u32::MAX` is taken.
    pub fn next_loop_id(&self) -> Result<LoopId, GraphError> {
        match self.last_loop_id {
            None => Ok(LoopId(0)),
            Some(last) => last.next().ok_or(GraphError::LoopIdsExhausted(last)),
        }
    }

    /// Register a loop as a node of the graph.
    ///
    /// If the loop is not yet on its declared yarn it is appended there.
    /// `last_loop_id` advances to the larger of its current value and the
    /// loop's id.
    pub fn add_loop(&mut self, lp: Loop) -> Result<LoopId, GraphError> {
        let id = lp.id;
        if self.contains(id) {
            return Err(GraphError::DuplicateLoop(id));
        }
        let yarn = self
            .yarns
            .get_mut(lp.yarn_id())
            .ok_or_else(|| GraphError::UnknownYarn(lp.yarn_id().to_string()))?;
        let lp = if yarn.contains(id) {
            lp
        } else {
            yarn.add_loop_to_end(id, Some(lp), false)?.1
        };

        self.slots.insert(
            id,
            LoopSlot {
                lp,
                parents: Vec::new(),
                children: Vec::new(),
            },
        );
        self.loop_count += 1;
        self.last_loop_id = Some(self.last_loop_id.map_or(id, |last| last.max(id)));
        trace!(loop_id = %id, "added loop");
        Ok(id)
    }

    /// Make a fresh loop at the end of `yarn_id` with the next free id and
    /// register it.
    pub fn add_loop_to_yarn(
        &mut self,
        yarn_id: &str,
        is_twisted: bool,
    ) -> Result<LoopId, GraphError> {
        let id = self.next_loop_id()?;
        let yarn = self
            .yarns
            .get_mut(yarn_id)
            .ok_or_else(|| GraphError::UnknownYarn(yarn_id.to_string()))?;
        let (_, lp) = yarn.add_loop_to_end(id, None, is_twisted)?;
        self.add_loop(lp)
    }

    /// Pull `child` through `parent`.
    ///
    /// The parent is inserted into the child's parent stack at
    /// `stack_position`, on top when `None`. Both loops must already be
    /// registered and the parent must be the older loop.
    pub fn connect_loops(
        &mut self,
        parent: LoopId,
        child: LoopId,
        attrs: StitchAttrs,
        stack_position: Option<usize>,
    ) -> Result<(), GraphError> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(GraphError::DanglingEdgeEndpoint { parent, child });
        }
        if parent >= child {
            return Err(GraphError::ParentNotEarlier { parent, child });
        }
        if self.edge(parent, child).is_some() {
            return Err(GraphError::DuplicateEdge { parent, child });
        }

        let edge = StitchEdge::new(parent, child, attrs);
        if let Some(slot) = self.slot_mut(child) {
            slot.parents.push(edge);
            slot.lp.add_parent_loop(parent, stack_position);
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
            slot.lp.add_child_loop(child);
        }
        self.edge_count += 1;
        trace!(%edge, "connected loops");
        Ok(())
    }

    /// Partition the loops into courses.
    ///
    /// Recomputed from scratch on every call; see [`course::partition`].
    pub fn get_courses(&self) -> Courses {
        course::partition(self)
    }

    /// The same fabric seen in a mirror held at its front: every edge keeps
    /// its endpoints and stack position, with [`StitchAttrs::mirrored`]
    /// applied to its attributes.
    pub fn mirrored(&self) -> KnitGraph {
        let mut mirror = self.clone();
        for slot in mirror.slots.values_mut() {
            for edge in &mut slot.parents {
                edge.attrs = edge.attrs.mirrored();
            }
        }
        mirror
    }

    /// Whether a loop with this id is registered.
    pub fn contains(&self, id: LoopId) -> bool {
        self.slot(id).is_some()
    }

    pub fn contains_loop(&self, lp: &Loop) -> bool {
        self.contains(lp.id)
    }

    /// Look up a loop by id.
    pub fn get(&self, id: LoopId) -> Option<&Loop> {
        self.slot(id).map(|slot| &slot.lp)
    }

    /// Look up a loop by id, failing with [`GraphError::UnknownLoop`].
    pub fn loop_at(&self, id: LoopId) -> Result<&Loop, GraphError> {
        self.get(id).ok_or(GraphError::UnknownLoop(id))
    }

    /// Incoming stitch edges of a loop, in connection order.
    pub fn parent_edges(&self, id: LoopId) -> &[StitchEdge] {
        self.slot(id).map(|slot| slot.parents.as_slice()).unwrap_or(&[])
    }

    /// Loops pulled through `id`, in connection order.
    pub fn child_ids(&self, id: LoopId) -> &[LoopId] {
        self.slot(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    /// The stitch edge from `parent` to `child`, if any.
    pub fn edge(&self, parent: LoopId, child: LoopId) -> Option<&StitchEdge> {
        self.parent_edges(child).iter().find(|e| e.parent == parent)
    }

    /// Iterate over all loops in increasing id order.
    pub fn loops(&self) -> impl Iterator<Item = &Loop> {
        self.slots.values().map(|slot| &slot.lp)
    }

    /// Iterate over all stitch edges, grouped by child in increasing id order.
    pub fn edges(&self) -> impl Iterator<Item = &StitchEdge> {
        self.slots.values().flat_map(|slot| slot.parents.iter())
    }

    pub fn loop_count(&self) -> usize {
        self.loop_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.loop_count == 0
    }

    fn slot(&self, id: LoopId) -> Option<&LoopSlot> {
        self.slots.get(&id)
    }

    fn slot_mut(&mut self, id: LoopId) -> Option<&mut LoopSlot> {
        self.slots.get_mut(&id)
    }
}

/// Panics when the loop is absent; check [`KnitGraph::contains`] first or use
/// [`KnitGraph::loop_at`].
impl Index<LoopId> for KnitGraph {
    type Output = Loop;

    fn index(&self, id: LoopId) -> &Loop {
        match self.get(id) {
            Some(lp) => lp,
            None => panic!("{}", GraphError::UnknownLoop(id)),
        }
    }
}
