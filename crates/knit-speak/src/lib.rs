//! Stitch vocabulary for building knit graphs.
//!
//! The [`SymbolTable`] maps stitch mnemonics (`k`, `p2tog`, `lc2|1p`, ...) to
//! templates that say which loops of the prior course a stitch works and how
//! many new loops it makes. A [`CourseExpander`] applies those templates along
//! a course and records the resulting loops and edges in a
//! [`knit_core::KnitGraph`].
//!
//! # Example
//!
//! ```rust
//! use knit_core::{KnitGraph, Yarn};
//! use knit_speak::{CarriageDirection, CourseExpander, SymbolTable};
//!
//! let table = SymbolTable::new();
//! let mut graph = KnitGraph::new();
//! graph.add_yarn(Yarn::new("yarn")).unwrap();
//! let cast_on: Vec<_> = (0..4)
//!     .map(|_| graph.add_loop_to_yarn("yarn", false).unwrap())
//!     .collect();
//!
//! let mut row = CourseExpander::new(&mut graph, "yarn", &cast_on, CarriageDirection::RightToLeft);
//! for name in ["k", "lc1|1", "k"] {
//!     row.work(&table, name).unwrap();
//! }
//! let course = row.finish().unwrap();
//! assert_eq!(course.len(), 4);
//! assert_eq!(graph.get_courses().len(), 2);
//! ```

pub mod cable;
pub mod error;
pub mod expand;
pub mod stitch;
pub mod symbol_table;

pub use cable::CableDefinition;
pub use error::{KnitSpeakError, Result};
pub use expand::{CarriageDirection, CourseExpander};
pub use stitch::{StitchDefinition, StitchLean};
pub use symbol_table::{Symbol, SymbolTable};
