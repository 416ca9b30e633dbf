//! Loop/yarn graph IR for knitted fabric.
//!
//! A knitted structure is a directed acyclic graph of loops. Each edge records
//! a child loop pulled through a parent loop; each loop also sits on exactly one
//! yarn, which strings loops together in creation order.
//!
//! ```text
//!   course 1:   5 ── 4 ── 3      yarn: 0 → 1 → 2 → 3 → 4 → 5
//!               │    │    │
//!   course 0:   0 ── 1 ── 2      stitch edges point upward (parent → child)
//! ```
//!
//! The graph is built by a single producer that registers loops in increasing
//! id order and connects each new loop to parents on an earlier course. Once the
//! graph is complete, [`KnitGraph::get_courses`] recovers the rows of fabric.
//!
//! # Example
//!
//! ```rust
//! use knit_core::{KnitGraph, StitchAttrs, Yarn};
//!
//! let mut graph = KnitGraph::new();
//! graph.add_yarn(Yarn::new("yarn")).unwrap();
//!
//! let bottom = graph.add_loop_to_yarn("yarn", false).unwrap();
//! let top = graph.add_loop_to_yarn("yarn", false).unwrap();
//! graph.connect_loops(bottom, top, StitchAttrs::knit(), None).unwrap();
//!
//! let courses = graph.get_courses();
//! assert_eq!(courses.course_of(bottom), Some(0));
//! assert_eq!(courses.course_of(top), Some(1));
//! ```

pub mod course;
pub mod graph;
pub mod serialize;

pub use course::Courses;
pub use graph::edge::{CrossingDepth, PullDirection, StitchAttrs, StitchEdge};
pub use graph::knit_loop::{Loop, LoopId};
pub use graph::yarn::Yarn;
pub use graph::{GraphError, KnitGraph};
