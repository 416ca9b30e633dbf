//! Cable templates.
//!
//! A cable works `left + right` loops of the prior course and makes the same
//! number of new loops, swapping two groups of loops sideways. The new loops
//! on the left, `left` of them, reach `right` positions rightward for their
//! parents; the `right` loops after them reach `left` positions leftward.
//! One group crosses in front of the other:
//!
//! ```text
//!   lc2|1   new loops   a   b   c
//!           parents     y   z   x      prior course: x y z
//!           depth      +1  +1  -1
//!           offset     +1  +1  -2
//! ```

use std::fmt;

use knit_core::{CrossingDepth, PullDirection};
use serde::Serialize;

use crate::error::{KnitSpeakError, Result};
use crate::stitch::{StitchDefinition, StitchLean};

/// Widest leg a cable may have.
pub const MAX_CABLE_LEG: usize = 3;

/// Template for a cable crossing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CableDefinition {
    left_crossing_loops: usize,
    right_crossing_loops: usize,
    left_crossing_pull_direction: PullDirection,
    right_crossing_pull_direction: PullDirection,
    cable_lean: StitchLean,
}

impl CableDefinition {
    pub fn new(
        left_crossing_loops: usize,
        right_crossing_loops: usize,
        left_crossing_pull_direction: PullDirection,
        right_crossing_pull_direction: PullDirection,
        cable_lean: StitchLean,
    ) -> Result<Self> {
        let leg_ok = |n: usize| (1..=MAX_CABLE_LEG).contains(&n);
        if !leg_ok(left_crossing_loops) || !leg_ok(right_crossing_loops) {
            return Err(KnitSpeakError::InvalidCableWidth {
                left: left_crossing_loops,
                right: right_crossing_loops,
            });
        }
        if cable_lean == StitchLean::Center {
            return Err(KnitSpeakError::InvalidCableLean);
        }
        Ok(Self {
            left_crossing_loops,
            right_crossing_loops,
            left_crossing_pull_direction,
            right_crossing_pull_direction,
            cable_lean,
        })
    }

    pub fn left_crossing_loops(&self) -> usize {
        self.left_crossing_loops
    }

    pub fn right_crossing_loops(&self) -> usize {
        self.right_crossing_loops
    }

    pub fn left_crossing_pull_direction(&self) -> PullDirection {
        self.left_crossing_pull_direction
    }

    pub fn right_crossing_pull_direction(&self) -> PullDirection {
        self.right_crossing_pull_direction
    }

    pub fn cable_lean(&self) -> StitchLean {
        self.cable_lean
    }

    /// Total loops worked and made.
    pub fn width(&self) -> usize {
        self.left_crossing_loops + self.right_crossing_loops
    }

    /// Crossing depths of the left and right legs.
    fn leg_depths(&self) -> (CrossingDepth, CrossingDepth) {
        match self.cable_lean {
            StitchLean::Right => (CrossingDepth::Behind, CrossingDepth::Front),
            _ => (CrossingDepth::Front, CrossingDepth::Behind),
        }
    }

    /// One single-parent stitch per new loop, left to right.
    pub fn stitch_definitions(&self) -> Vec<StitchDefinition> {
        let (left_depth, right_depth) = self.leg_depths();
        let left = StitchDefinition::decrease(
            self.left_crossing_pull_direction,
            vec![self.right_crossing_loops as i32],
        )
        .with_depth(left_depth);
        let right = StitchDefinition::decrease(
            self.right_crossing_pull_direction,
            vec![-(self.left_crossing_loops as i32)],
        )
        .with_depth(right_depth);

        std::iter::repeat(left)
            .take(self.left_crossing_loops)
            .chain(std::iter::repeat(right).take(self.right_crossing_loops))
            .collect()
    }

    /// The cable seen in a mirror held at the fabric front.
    ///
    /// Left and right trade places, legs and pull directions included, and the
    /// lean flips. Every loop keeps its crossing depth while its offset
    /// changes sign. Flipping only the lean is [`CableDefinition::crossed_back`].
    pub fn mirrored(&self) -> Self {
        Self {
            left_crossing_loops: self.right_crossing_loops,
            right_crossing_loops: self.left_crossing_loops,
            left_crossing_pull_direction: self.right_crossing_pull_direction,
            right_crossing_pull_direction: self.left_crossing_pull_direction,
            cable_lean: flip(self.cable_lean),
        }
    }

    /// Same legs, opposite lean: every crossing depth is negated.
    pub fn crossed_back(&self) -> Self {
        Self {
            cable_lean: flip(self.cable_lean),
            ..self.clone()
        }
    }

    /// The mnemonic this cable is registered under, e.g. `lc2p|1`.
    pub fn name(&self) -> String {
        let prefix = match self.cable_lean {
            StitchLean::Right => "rc",
            _ => "lc",
        };
        let purl = |pull: PullDirection| if pull == PullDirection::PURL { "p" } else { "" };
        format!(
            "{prefix}{}{}|{}{}",
            self.left_crossing_loops,
            purl(self.left_crossing_pull_direction),
            self.right_crossing_loops,
            purl(self.right_crossing_pull_direction),
        )
    }
}

fn flip(lean: StitchLean) -> StitchLean {
    match lean {
        StitchLean::Left => StitchLean::Right,
        StitchLean::Right => StitchLean::Left,
        StitchLean::Center => StitchLean::Center,
    }
}

impl fmt::Display for CableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cable(left: usize, right: usize, lean: StitchLean) -> CableDefinition {
        CableDefinition::new(left, right, PullDirection::KNIT, PullDirection::PURL, lean).unwrap()
    }

    #[test]
    fn rejects_bad_widths() {
        for (l, r) in [(0, 1), (1, 0), (4, 1), (2, 4)] {
            let err = CableDefinition::new(
                l,
                r,
                PullDirection::KNIT,
                PullDirection::KNIT,
                StitchLean::Left,
            )
            .unwrap_err();
            assert_eq!(err, KnitSpeakError::InvalidCableWidth { left: l, right: r });
        }
    }

    #[test]
    fn rejects_centered_cable() {
        let err = CableDefinition::new(
            1,
            1,
            PullDirection::KNIT,
            PullDirection::KNIT,
            StitchLean::Center,
        )
        .unwrap_err();
        assert_eq!(err, KnitSpeakError::InvalidCableLean);
    }

    #[test]
    fn names() {
        assert_eq!(cable(2, 1, StitchLean::Left).name(), "lc2|1p");
        assert_eq!(cable(3, 3, StitchLean::Right).name(), "rc3|3p");
        let purl_left =
            CableDefinition::new(1, 2, PullDirection::PURL, PullDirection::KNIT, StitchLean::Left)
                .unwrap();
        assert_eq!(purl_left.to_string(), "lc1p|2");
    }

    #[test]
    fn left_cross_puts_left_leg_in_front() {
        let defs = cable(2, 1, StitchLean::Left).stitch_definitions();
        assert_eq!(defs.len(), 3);
        for def in &defs[..2] {
            assert_eq!(def.cabling_depth, CrossingDepth::Front);
            assert_eq!(def.offset_to_parent_loops(), &[1]);
            assert_eq!(def.pull_direction, PullDirection::KNIT);
        }
        assert_eq!(defs[2].cabling_depth, CrossingDepth::Behind);
        assert_eq!(defs[2].offset_to_parent_loops(), &[-2]);
        assert_eq!(defs[2].pull_direction, PullDirection::PURL);
    }

    #[test]
    fn right_cross_puts_right_leg_in_front() {
        let defs = cable(1, 2, StitchLean::Right).stitch_definitions();
        assert_eq!(defs[0].cabling_depth, CrossingDepth::Behind);
        assert_eq!(defs[1].cabling_depth, CrossingDepth::Front);
        assert_eq!(defs[2].cabling_depth, CrossingDepth::Front);
    }

    #[test]
    fn offsets_form_a_permutation() {
        for l in 1..=3 {
            for r in 1..=3 {
                let defs = cable(l, r, StitchLean::Left).stitch_definitions();
                let mut parents: Vec<i32> = defs
                    .iter()
                    .enumerate()
                    .map(|(j, d)| j as i32 + d.offset_to_parent_loops()[0])
                    .collect();
                parents.sort_unstable();
                assert_eq!(parents, (0..(l + r) as i32).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn mirror_swaps_legs_and_lean() {
        let lc = CableDefinition::new(
            2,
            1,
            PullDirection::PURL,
            PullDirection::KNIT,
            StitchLean::Left,
        )
        .unwrap();
        let m = lc.mirrored();
        assert_eq!(m.name(), "rc1|2p");
        assert_eq!(m.mirrored(), lc);

        let defs = lc.stitch_definitions();
        let mirrored: Vec<_> = m.stitch_definitions().into_iter().rev().collect();
        for (a, b) in defs.iter().zip(&mirrored) {
            assert_eq!(a.cabling_depth, b.cabling_depth);
            assert_eq!(a.pull_direction, b.pull_direction);
            assert_eq!(
                a.offset_to_parent_loops()[0],
                -b.offset_to_parent_loops()[0]
            );
        }
    }

    #[test]
    fn crossing_back_negates_depths() {
        let lc = cable(3, 2, StitchLean::Left);
        let back = lc.crossed_back();
        assert_eq!(back.name(), "rc3|2p");
        for (a, b) in lc.stitch_definitions().iter().zip(back.stitch_definitions()) {
            assert_eq!(a.cabling_depth.negated(), b.cabling_depth);
            assert_eq!(a.offset_to_parent_loops(), b.offset_to_parent_loops());
        }
    }
}
