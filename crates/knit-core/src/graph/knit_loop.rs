//! The loop record: one knitted stitch in the graph.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a loop, unique across the whole graph regardless of yarn.
///
/// Ids are allocated in creation order, so comparing two ids compares when the
/// loops were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopId(pub u32);

impl LoopId {
    /// The id as an arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id allocated right after this one, `None` past `u32::MAX`.
    pub fn next(self) -> Option<LoopId> {
        self.0.checked_add(1).map(LoopId)
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LoopId {
    fn from(id: u32) -> Self {
        LoopId(id)
    }
}

/// A single loop of yarn.
///
/// The parent stack lists the loops this loop was pulled through, bottom to
/// top. Stack order only matters for cable layering; course computation looks
/// at membership, not order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop {
    /// Unique id, also the loop's creation rank.
    pub id: LoopId,
    yarn_id: String,
    is_twisted: bool,
    parent_loops: Vec<LoopId>,
    child_loops: BTreeSet<LoopId>,
}

impl Loop {
    /// Create a loop with no parents or children.
    pub fn new(id: LoopId, yarn_id: impl Into<String>, is_twisted: bool) -> Self {
        Self {
            id,
            yarn_id: yarn_id.into(),
            is_twisted,
            parent_loops: Vec::new(),
            child_loops: BTreeSet::new(),
        }
    }

    /// The yarn this loop is made from.
    pub fn yarn_id(&self) -> &str {
        &self.yarn_id
    }

    pub fn is_twisted(&self) -> bool {
        self.is_twisted
    }

    /// Parent loops, bottom of the stack first.
    pub fn parent_loops(&self) -> &[LoopId] {
        &self.parent_loops
    }

    /// Loops pulled through this one.
    pub fn child_loops(&self) -> &BTreeSet<LoopId> {
        &self.child_loops
    }

    /// True unless this loop is a yarn-over.
    pub fn has_parent_loops(&self) -> bool {
        !self.parent_loops.is_empty()
    }

    /// Insert `parent` into the stack at `stack_position`, or on top when no
    /// position is given. A position past the top lands on top.
    pub fn add_parent_loop(&mut self, parent: LoopId, stack_position: Option<usize>) {
        match stack_position {
            Some(pos) if pos < self.parent_loops.len() => self.parent_loops.insert(pos, parent),
            _ => self.parent_loops.push(parent),
        }
    }

    /// Record that `child` was pulled through this loop.
    pub fn add_child_loop(&mut self, child: LoopId) {
        self.child_loops.insert(child);
    }
}

impl fmt::Display for Loop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loop({} on {}", self.id, self.yarn_id)?;
        if self.is_twisted {
            write!(f, ", twisted")?;
        }
        write!(f, ")")
    }
}
