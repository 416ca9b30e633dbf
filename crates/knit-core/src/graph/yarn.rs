//! Yarns: the physical strands loops are made from.

use std::collections::HashMap;

use super::knit_loop::{Loop, LoopId};
use super::GraphError;

/// One continuous strand of yarn.
///
/// Loops are strung along the yarn in the order they were made, so the yarn is
/// a simple path: every loop has at most one predecessor and one successor.
/// New loops can only be added at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Yarn {
    yarn_id: String,
    loop_ids: Vec<LoopId>,
    positions: HashMap<LoopId, usize>,
}

impl Yarn {
    /// Create an empty yarn.
    pub fn new(yarn_id: impl Into<String>) -> Self {
        Self {
            yarn_id: yarn_id.into(),
            loop_ids: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn yarn_id(&self) -> &str {
        &self.yarn_id
    }

    /// Append a loop at the end of the yarn.
    ///
    /// When `lp` is `None` a fresh loop with `loop_id` and `is_twisted` is
    /// made on this yarn. When a loop is given, `loop_id` must be its id and
    /// `is_twisted` is ignored. Callers without an id of their own pass
    /// [`KnitGraph::next_loop_id`](crate::KnitGraph::next_loop_id).
    ///
    /// Only the yarn is updated; the loop still has to be registered with
    /// [`KnitGraph::add_loop`](crate::KnitGraph::add_loop).
    pub fn add_loop_to_end(
        &mut self,
        loop_id: LoopId,
        lp: Option<Loop>,
        is_twisted: bool,
    ) -> Result<(LoopId, Loop), GraphError> {
        let lp = match lp {
            Some(lp) if lp.id != loop_id => {
                return Err(GraphError::LoopIdMismatch {
                    expected: loop_id,
                    found: lp.id,
                })
            }
            Some(lp) => lp,
            None => Loop::new(loop_id, self.yarn_id.clone(), is_twisted),
        };
        if lp.yarn_id() != self.yarn_id {
            return Err(GraphError::ForeignYarnLoop {
                loop_id,
                owner: lp.yarn_id().to_string(),
                yarn: self.yarn_id.clone(),
            });
        }
        if self.positions.contains_key(&loop_id) {
            return Err(GraphError::DuplicateLoop(loop_id));
        }
        if let Some(last) = self.last_loop_id() {
            if loop_id <= last {
                return Err(GraphError::NonMonotonicYarn {
                    yarn: self.yarn_id.clone(),
                    last,
                    loop_id,
                });
            }
        }
        self.positions.insert(loop_id, self.loop_ids.len());
        self.loop_ids.push(loop_id);
        Ok((loop_id, lp))
    }

    /// The loop most recently added, or `None` for an empty yarn.
    pub fn last_loop_id(&self) -> Option<LoopId> {
        self.loop_ids.last().copied()
    }

    /// Whether `loop_id` lies on this yarn.
    pub fn contains(&self, loop_id: LoopId) -> bool {
        self.positions.contains_key(&loop_id)
    }

    pub fn contains_loop(&self, lp: &Loop) -> bool {
        self.contains(lp.id)
    }

    /// Loops in yarn order.
    pub fn loop_ids(&self) -> &[LoopId] {
        &self.loop_ids
    }

    /// The loop just before `loop_id` on the yarn.
    pub fn prev_loop(&self, loop_id: LoopId) -> Option<LoopId> {
        let pos = *self.positions.get(&loop_id)?;
        pos.checked_sub(1).map(|p| self.loop_ids[p])
    }

    /// The loop just after `loop_id` on the yarn.
    pub fn next_loop(&self, loop_id: LoopId) -> Option<LoopId> {
        let pos = *self.positions.get(&loop_id)?;
        self.loop_ids.get(pos + 1).copied()
    }

    /// Consecutive `(prev, next)` pairs along the yarn.
    pub fn yarn_edges(&self) -> impl Iterator<Item = (LoopId, LoopId)> + '_ {
        self.loop_ids.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn len(&self) -> usize {
        self.loop_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loop_ids.is_empty()
    }
}
