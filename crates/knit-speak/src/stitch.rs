//! Stitch templates.
//!
//! A [`StitchDefinition`] says how many loops of the prior course a stitch
//! works and how many new loops it makes. Parent offsets are lateral,
//! measured from the new loop's position and seen from the front of the
//! fabric, and are listed bottom to top of the new loop's parent stack.

use std::fmt;

use knit_core::{CrossingDepth, PullDirection};
use serde::{Deserialize, Serialize};

use crate::error::{KnitSpeakError, Result};

/// Which way a decrease slants on the front of the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StitchLean {
    Left,
    Right,
    Center,
}

impl fmt::Display for StitchLean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitchLean::Left => f.write_str("left"),
            StitchLean::Right => f.write_str("right"),
            StitchLean::Center => f.write_str("center"),
        }
    }
}

/// Template for one stitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StitchDefinition {
    pub pull_direction: PullDirection,
    pub cabling_depth: CrossingDepth,
    child_loops: usize,
    offset_to_parent_loops: Vec<i32>,
}

impl StitchDefinition {
    /// Create a stitch that makes `child_loops` new loops (0 or 1) from the
    /// parents at `offsets`.
    pub fn new(
        pull_direction: PullDirection,
        cabling_depth: CrossingDepth,
        child_loops: usize,
        offsets: Vec<i32>,
    ) -> Result<Self> {
        if child_loops > 1 {
            return Err(KnitSpeakError::InvalidChildCount(child_loops));
        }
        Ok(Self {
            pull_direction,
            cabling_depth,
            child_loops,
            offset_to_parent_loops: offsets,
        })
    }

    fn single(pull_direction: PullDirection, child_loops: usize, offsets: Vec<i32>) -> Self {
        Self {
            pull_direction,
            cabling_depth: CrossingDepth::Flat,
            child_loops,
            offset_to_parent_loops: offsets,
        }
    }

    /// Knit the next loop.
    pub fn knit() -> Self {
        Self::single(PullDirection::KNIT, 1, vec![0])
    }

    /// Purl the next loop.
    pub fn purl() -> Self {
        Self::single(PullDirection::PURL, 1, vec![0])
    }

    /// A new loop with no parents.
    pub fn yarn_over() -> Self {
        Self::single(PullDirection::KNIT, 1, Vec::new())
    }

    /// Pass the next loop to the new course without working it.
    pub fn slip() -> Self {
        Self::single(PullDirection::KNIT, 0, vec![0])
    }

    /// One new loop pulled through every parent at `offsets`.
    pub fn decrease(pull_direction: PullDirection, offsets: Vec<i32>) -> Self {
        Self::single(pull_direction, 1, offsets)
    }

    /// Same template with a cable crossing depth.
    pub fn with_depth(mut self, depth: CrossingDepth) -> Self {
        self.cabling_depth = depth;
        self
    }

    pub fn child_loops(&self) -> usize {
        self.child_loops
    }

    pub fn offset_to_parent_loops(&self) -> &[i32] {
        &self.offset_to_parent_loops
    }

    /// Number of prior-course loops this stitch works.
    pub fn parent_count(&self) -> usize {
        self.offset_to_parent_loops.len()
    }

    pub fn is_decrease(&self) -> bool {
        self.parent_count() > 1
    }

    /// Slant of the stitch, read from the parent that ends on top.
    ///
    /// The top loop lies over the others, so a top loop left of all the
    /// others slants the stitch right, and a top loop right of all of them
    /// slants it left. Anything else is centred.
    pub fn lean(&self) -> StitchLean {
        let Some((top, rest)) = self.offset_to_parent_loops.split_last() else {
            return StitchLean::Center;
        };
        if rest.is_empty() {
            StitchLean::Center
        } else if rest.iter().all(|o| top < o) {
            StitchLean::Right
        } else if rest.iter().all(|o| top > o) {
            StitchLean::Left
        } else {
            StitchLean::Center
        }
    }
}

impl fmt::Display for StitchDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} -> {} loop(s)",
            self.pull_direction, self.offset_to_parent_loops, self.child_loops
        )?;
        if self.cabling_depth != CrossingDepth::Flat {
            write!(f, ", depth {}", self.cabling_depth)?;
        }
        Ok(())
    }
}
