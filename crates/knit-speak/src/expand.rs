//! Working one course of stitches into a knit graph.
//!
//! A [`CourseExpander`] walks the loops of the prior course in the order the
//! carriage meets them and turns each stitch or cable template into new loops
//! and stitch edges. Template offsets are lateral and seen from the front of
//! the fabric; on a right-to-left pass they are flipped onto the walk.

use knit_core::{GraphError, KnitGraph, LoopId, StitchAttrs};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cable::CableDefinition;
use crate::error::{KnitSpeakError, Result};
use crate::stitch::StitchDefinition;
use crate::symbol_table::{Symbol, SymbolTable};

/// The lateral direction a course is worked in, seen from the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarriageDirection {
    LeftToRight,
    RightToLeft,
}

impl CarriageDirection {
    pub fn opposite(self) -> CarriageDirection {
        match self {
            CarriageDirection::LeftToRight => CarriageDirection::RightToLeft,
            CarriageDirection::RightToLeft => CarriageDirection::LeftToRight,
        }
    }

    fn sign(self) -> i64 {
        match self {
            CarriageDirection::LeftToRight => 1,
            CarriageDirection::RightToLeft => -1,
        }
    }
}

/// Builds one new course on top of a prior one.
pub struct CourseExpander<'g> {
    graph: &'g mut KnitGraph,
    yarn_id: String,
    direction: CarriageDirection,
    /// Prior course in walk order.
    walk: Vec<LoopId>,
    cursor: usize,
    /// New course in walk order.
    produced: Vec<LoopId>,
}

impl<'g> CourseExpander<'g> {
    /// Start a course on `yarn_id`. `prior_course` is listed left to right as
    /// seen from the front.
    pub fn new(
        graph: &'g mut KnitGraph,
        yarn_id: impl Into<String>,
        prior_course: &[LoopId],
        direction: CarriageDirection,
    ) -> Self {
        let mut walk = prior_course.to_vec();
        if direction == CarriageDirection::RightToLeft {
            walk.reverse();
        }
        Self {
            graph,
            yarn_id: yarn_id.into(),
            direction,
            walk,
            cursor: 0,
            produced: Vec::new(),
        }
    }

    pub fn direction(&self) -> CarriageDirection {
        self.direction
    }

    /// Prior-course loops not yet worked.
    pub fn remaining(&self) -> usize {
        self.walk.len() - self.cursor
    }

    /// Loops of the new course so far, in walk order.
    pub fn produced(&self) -> &[LoopId] {
        &self.produced
    }

    fn resolve(&self, index: i64, offset: i32) -> Result<usize> {
        let len = self.walk.len();
        if index < self.cursor as i64 || index >= len as i64 {
            return Err(KnitSpeakError::MalformedCourseOffset {
                cursor: self.cursor,
                offset,
                len,
            });
        }
        Ok(index as usize)
    }

    /// Fail unless `parent` is a registered loop. Checked before any new loop
    /// is made so a rejected stitch leaves the graph untouched.
    fn check_parent(&self, parent: LoopId) -> Result<()> {
        if self.graph.contains(parent) {
            Ok(())
        } else {
            Err(GraphError::UnknownLoop(parent).into())
        }
    }

    fn connect(
        &mut self,
        parent: LoopId,
        child: LoopId,
        def: &StitchDefinition,
        offset: i32,
    ) -> Result<()> {
        let attrs = StitchAttrs::new(def.pull_direction)
            .with_depth(def.cabling_depth)
            .with_offset(offset);
        self.graph.connect_loops(parent, child, attrs, None)?;
        Ok(())
    }

    /// Work one stitch at the cursor.
    ///
    /// The stitch takes the next `offsets.len()` loops of the prior course,
    /// anchored so the parent it meets first in walk order is the cursor loop.
    /// The offsets must cover that run exactly once each.
    pub fn apply_stitch(&mut self, def: &StitchDefinition) -> Result<Vec<LoopId>> {
        let sign = self.direction.sign();
        let offsets = def.offset_to_parent_loops();
        let deltas: Vec<i64> = offsets.iter().map(|&o| o as i64 * sign).collect();
        let anchor = self.cursor as i64 - deltas.iter().copied().min().unwrap_or(0);
        let run_end = self.cursor + offsets.len();

        let mut taken = vec![false; offsets.len()];
        let mut parents = Vec::with_capacity(offsets.len());
        for (&delta, &offset) in deltas.iter().zip(offsets) {
            let index = self.resolve(anchor + delta, offset)?;
            // a gap or a repeated offset leaves the run partly covered
            if index >= run_end || std::mem::replace(&mut taken[index - self.cursor], true) {
                return Err(KnitSpeakError::MalformedCourseOffset {
                    cursor: self.cursor,
                    offset,
                    len: self.walk.len(),
                });
            }
            self.check_parent(self.walk[index])?;
            parents.push((self.walk[index], offset));
        }

        let mut made = Vec::with_capacity(def.child_loops());
        if def.child_loops() == 0 {
            // slipped loops move to the new course unworked
            made.extend(parents.iter().map(|(parent, _)| *parent));
        } else {
            let child = self.graph.add_loop_to_yarn(&self.yarn_id, false)?;
            for &(parent, offset) in &parents {
                self.connect(parent, child, def, offset)?;
            }
            made.push(child);
        }

        self.cursor = run_end;
        self.produced.extend_from_slice(&made);
        trace!(cursor = self.cursor, made = made.len(), "applied stitch");
        Ok(made)
    }

    /// Work one cable at the cursor.
    ///
    /// Every leg is resolved inside the cable's block before any loop is made.
    pub fn apply_cable(&mut self, cable: &CableDefinition) -> Result<Vec<LoopId>> {
        let sign = self.direction.sign();
        let width = cable.width();
        let mut defs = cable.stitch_definitions();
        if self.direction == CarriageDirection::RightToLeft {
            defs.reverse();
        }

        let block_end = self.cursor + width;
        if block_end > self.walk.len() {
            return Err(KnitSpeakError::MalformedCourseOffset {
                cursor: self.cursor,
                offset: width as i32,
                len: self.walk.len(),
            });
        }

        let mut legs = Vec::with_capacity(width);
        for (j, def) in defs.iter().enumerate() {
            let offset = def.offset_to_parent_loops()[0];
            let index = self.resolve((self.cursor + j) as i64 + sign * offset as i64, offset)?;
            if index >= block_end {
                return Err(KnitSpeakError::MalformedCourseOffset {
                    cursor: self.cursor,
                    offset,
                    len: self.walk.len(),
                });
            }
            self.check_parent(self.walk[index])?;
            legs.push((self.walk[index], def, offset));
        }

        let mut made = Vec::with_capacity(width);
        for (parent, def, offset) in legs {
            let child = self.graph.add_loop_to_yarn(&self.yarn_id, false)?;
            self.connect(parent, child, def, offset)?;
            made.push(child);
        }

        self.cursor = block_end;
        self.produced.extend_from_slice(&made);
        trace!(cable = %cable, cursor = self.cursor, "applied cable");
        Ok(made)
    }

    /// Work a stitch or cable symbol.
    pub fn apply(&mut self, symbol: &Symbol) -> Result<Vec<LoopId>> {
        match symbol {
            Symbol::Stitch(def) => self.apply_stitch(def),
            Symbol::Cable(cable) => self.apply_cable(cable),
            Symbol::Variable(_) => Err(KnitSpeakError::NotAStitch {
                name: symbol.to_string(),
                found: symbol.kind(),
                expected: "stitch or cable",
            }),
        }
    }

    /// Look up `name` in `table` and work it.
    pub fn work(&mut self, table: &SymbolTable, name: &str) -> Result<Vec<LoopId>> {
        match table.get(name)? {
            Symbol::Variable(_) => Err(KnitSpeakError::NotAStitch {
                name: name.to_string(),
                found: "variable",
                expected: "stitch or cable",
            }),
            symbol => self.apply(symbol),
        }
    }

    /// Close the course and return its loops left to right.
    pub fn finish(self) -> Result<Vec<LoopId>> {
        let remaining = self.remaining();
        if remaining > 0 {
            return Err(KnitSpeakError::IncompleteCourse { remaining });
        }
        let mut course = self.produced;
        if self.direction == CarriageDirection::RightToLeft {
            course.reverse();
        }
        debug!(
            yarn = %self.yarn_id,
            direction = ?self.direction,
            loops = course.len(),
            "finished course"
        );
        Ok(course)
    }
}
