//! Stitch edges: a child loop pulled through a parent loop.
//!
//! Every edge carries how the child was pulled (knit or purl), where it sits in
//! a cable crossing, and how far it travelled sideways from its parent.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::knit_loop::LoopId;

/// The direction a child loop is pulled through its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullDirection {
    /// Purl.
    BackToFront,
    /// Knit.
    FrontToBack,
}

impl PullDirection {
    /// The pull direction of a knit stitch.
    pub const KNIT: PullDirection = PullDirection::FrontToBack;
    /// The pull direction of a purl stitch.
    pub const PURL: PullDirection = PullDirection::BackToFront;

    pub fn opposite(self) -> PullDirection {
        match self {
            PullDirection::BackToFront => PullDirection::FrontToBack,
            PullDirection::FrontToBack => PullDirection::BackToFront,
        }
    }

    /// Short machine-facing label.
    pub fn as_str(self) -> &'static str {
        match self {
            PullDirection::BackToFront => "BtF",
            PullDirection::FrontToBack => "FtB",
        }
    }
}

impl fmt::Display for PullDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crossing order of a loop inside a cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum CrossingDepth {
    /// Crosses behind the other loops of its crossing group.
    Behind,
    /// Not part of a crossing.
    #[default]
    Flat,
    /// Crosses in front of the other loops of its crossing group.
    Front,
}

impl CrossingDepth {
    pub fn value(self) -> i8 {
        match self {
            CrossingDepth::Behind => -1,
            CrossingDepth::Flat => 0,
            CrossingDepth::Front => 1,
        }
    }

    /// Front becomes behind and behind becomes front.
    pub fn negated(self) -> CrossingDepth {
        match self {
            CrossingDepth::Behind => CrossingDepth::Front,
            CrossingDepth::Flat => CrossingDepth::Flat,
            CrossingDepth::Front => CrossingDepth::Behind,
        }
    }
}

impl From<CrossingDepth> for i8 {
    fn from(depth: CrossingDepth) -> Self {
        depth.value()
    }
}

impl TryFrom<i8> for CrossingDepth {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(CrossingDepth::Behind),
            0 => Ok(CrossingDepth::Flat),
            1 => Ok(CrossingDepth::Front),
            other => Err(format!("crossing depth must be -1, 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for CrossingDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Attributes carried by a stitch edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StitchAttrs {
    pub pull_direction: PullDirection,
    pub depth: CrossingDepth,
    /// Lateral distance from the child's course position to the parent's,
    /// measured from the fabric front. Positive is to the right.
    pub parent_offset: i32,
}

impl Default for StitchAttrs {
    fn default() -> Self {
        Self {
            pull_direction: PullDirection::BackToFront,
            depth: CrossingDepth::Flat,
            parent_offset: 0,
        }
    }
}

impl StitchAttrs {
    /// A plain stitch pulled in `pull_direction`.
    pub fn new(pull_direction: PullDirection) -> Self {
        Self {
            pull_direction,
            ..Self::default()
        }
    }

    pub fn knit() -> Self {
        Self::new(PullDirection::KNIT)
    }

    pub fn purl() -> Self {
        Self::new(PullDirection::PURL)
    }

    /// Set the crossing depth.
    pub fn with_depth(mut self, depth: CrossingDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Set the parent offset.
    pub fn with_offset(mut self, parent_offset: i32) -> Self {
        self.parent_offset = parent_offset;
        self
    }

    /// The same stitch seen in a mirror held at the fabric front: depth and
    /// offset change sign, the pull direction stays.
    pub fn mirrored(self) -> Self {
        Self {
            pull_direction: self.pull_direction,
            depth: self.depth.negated(),
            parent_offset: -self.parent_offset,
        }
    }
}

/// A stitch edge with its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StitchEdge {
    pub parent: LoopId,
    pub child: LoopId,
    #[serde(flatten)]
    pub attrs: StitchAttrs,
}

impl StitchEdge {
    pub fn new(parent: LoopId, child: LoopId, attrs: StitchAttrs) -> Self {
        Self {
            parent,
            child,
            attrs,
        }
    }
}

impl fmt::Display for StitchEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stitch({} -> {}, {}, depth {}, offset {})",
            self.parent,
            self.child,
            self.attrs.pull_direction,
            self.attrs.depth,
            self.attrs.parent_offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attrs_are_flat_purl() {
        let attrs = StitchAttrs::default();
        assert_eq!(attrs.pull_direction, PullDirection::BackToFront);
        assert_eq!(attrs.depth, CrossingDepth::Flat);
        assert_eq!(attrs.parent_offset, 0);
    }

    #[test]
    fn pull_direction_opposite() {
        assert_eq!(PullDirection::KNIT.opposite(), PullDirection::PURL);
        assert_eq!(PullDirection::PURL.opposite(), PullDirection::KNIT);
    }

    #[test]
    fn mirrored_flips_depth_and_offset() {
        let attrs = StitchAttrs::knit()
            .with_depth(CrossingDepth::Front)
            .with_offset(-2);
        let mirrored = attrs.mirrored();
        assert_eq!(mirrored.pull_direction, PullDirection::KNIT);
        assert_eq!(mirrored.depth, CrossingDepth::Behind);
        assert_eq!(mirrored.parent_offset, 2);
        assert_eq!(mirrored.mirrored(), attrs);
    }

    #[test]
    fn crossing_depth_rejects_out_of_range() {
        assert_eq!(CrossingDepth::try_from(-1), Ok(CrossingDepth::Behind));
        assert!(CrossingDepth::try_from(-2).is_err());
    }

    #[test]
    fn edge_serializes_flat() {
        let edge = StitchEdge::new(LoopId(1), LoopId(4), StitchAttrs::knit().with_offset(1));
        let json = serde_json::to_value(edge).unwrap();
        assert_eq!(json["parent"], 1);
        assert_eq!(json["child"], 4);
        assert_eq!(json["pull_direction"], "FrontToBack");
        assert_eq!(json["depth"], 0);
        assert_eq!(json["parent_offset"], 1);
    }
}
