//! Course partitioning: recovering rows of fabric from creation order.
//!
//! A knitting machine works across the needle bed in one pass per course, so a
//! loop can never share a course with one of its own parents. Walking the loops
//! in creation order, a new course starts as soon as a loop is pulled through a
//! loop of the current course.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::graph::knit_loop::LoopId;
use crate::graph::KnitGraph;

/// The course structure of a knit graph.
///
/// Every loop belongs to exactly one course. Courses are numbered from 0 and
/// list their loops in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Courses {
    loop_to_course: BTreeMap<LoopId, usize>,
    course_to_loops: Vec<Vec<LoopId>>,
}

impl Courses {
    /// The course a loop sits on.
    pub fn course_of(&self, id: LoopId) -> Option<usize> {
        self.loop_to_course.get(&id).copied()
    }

    /// Loops of one course, in creation order.
    pub fn course(&self, index: usize) -> Option<&[LoopId]> {
        self.course_to_loops.get(index).map(Vec::as_slice)
    }

    /// Loop id to course index, for every loop.
    pub fn loop_to_course(&self) -> &BTreeMap<LoopId, usize> {
        &self.loop_to_course
    }

    /// All courses, bottom course first.
    pub fn course_to_loops(&self) -> &[Vec<LoopId>] {
        &self.course_to_loops
    }

    /// Iterate `(course index, loops)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[LoopId])> {
        self.course_to_loops
            .iter()
            .enumerate()
            .map(|(i, loops)| (i, loops.as_slice()))
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.course_to_loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.course_to_loops.is_empty()
    }

    fn place(&mut self, id: LoopId, course: usize) {
        if course == self.course_to_loops.len() {
            self.course_to_loops.push(Vec::new());
        }
        self.course_to_loops[course].push(id);
        self.loop_to_course.insert(id, course);
    }
}

/// Partition all loops of `graph` into courses in a single pass.
///
/// Loops are visited in increasing id order with one accumulator for the
/// current course. The first loop opens course 0. For every later loop the
/// parent stack is scanned bottom to top; at the first parent that already
/// sits on the current course the course index advances and a fresh
/// accumulator starts before the loop is placed. Otherwise the loop joins the
/// current course. Loops without parents (yarn-overs) join whichever course is
/// current, and all yarns share one course sequence.
///
/// Runs in O(n·m) for n loops and at most m parents per loop.
pub fn partition(graph: &KnitGraph) -> Courses {
    let mut courses = Courses::default();
    let mut current_course = 0;
    let mut current: HashSet<LoopId> = HashSet::new();

    for lp in graph.loops() {
        let starts_new_course = lp.parent_loops().iter().any(|p| current.contains(p));
        if starts_new_course {
            current_course += 1;
            current.clear();
        }
        current.insert(lp.id);
        courses.place(lp.id, current_course);
    }

    debug!(
        loops = graph.loop_count(),
        courses = courses.len(),
        "partitioned knit graph into courses"
    );
    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::StitchAttrs;
    use crate::graph::knit_loop::Loop;
    use crate::graph::yarn::Yarn;

    fn graph_with_yarns(yarns: &[&str]) -> KnitGraph {
        let mut g = KnitGraph::new();
        for y in yarns {
            g.add_yarn(Yarn::new(*y)).unwrap();
        }
        g
    }

    #[test]
    fn empty_graph_has_no_courses() {
        let courses = KnitGraph::new().get_courses();
        assert!(courses.is_empty());
        assert_eq!(courses.course_of(LoopId(0)), None);
    }

    #[test]
    fn loops_without_parents_share_the_first_course() {
        let mut g = graph_with_yarns(&["yarn"]);
        for _ in 0..3 {
            g.add_loop_to_yarn("yarn", false).unwrap();
        }
        let courses = g.get_courses();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses.course(0).unwrap(), &[LoopId(0), LoopId(1), LoopId(2)]);
    }

    #[test]
    fn yarn_over_inherits_current_course() {
        // 0 1 | 2 (k from 1), 3 (yo), 4 (k from 0)
        let mut g = graph_with_yarns(&["yarn"]);
        for _ in 0..5 {
            g.add_loop_to_yarn("yarn", false).unwrap();
        }
        g.connect_loops(LoopId(1), LoopId(2), StitchAttrs::knit(), None)
            .unwrap();
        g.connect_loops(LoopId(0), LoopId(4), StitchAttrs::knit(), None)
            .unwrap();

        let courses = g.get_courses();
        assert_eq!(courses.course(0).unwrap(), &[LoopId(0), LoopId(1)]);
        assert_eq!(courses.course(1).unwrap(), &[LoopId(2), LoopId(3), LoopId(4)]);
        assert_eq!(courses.course_of(LoopId(3)), Some(1));
    }

    #[test]
    fn only_current_course_parents_advance() {
        // 2 is pulled through 0 (course 0) and opens course 1; 3 is pulled
        // through 1, which is not on the current course, so it stays on 1.
        let mut g = graph_with_yarns(&["yarn"]);
        for _ in 0..4 {
            g.add_loop_to_yarn("yarn", false).unwrap();
        }
        g.connect_loops(LoopId(0), LoopId(2), StitchAttrs::knit(), None)
            .unwrap();
        g.connect_loops(LoopId(1), LoopId(3), StitchAttrs::knit(), None)
            .unwrap();
        let courses = g.get_courses();
        assert_eq!(courses.course_of(LoopId(2)), Some(1));
        assert_eq!(courses.course_of(LoopId(3)), Some(1));
    }

    #[test]
    fn interleaved_yarns_share_one_course_sequence() {
        let mut g = graph_with_yarns(&["main", "contrast"]);
        g.add_loop(Loop::new(LoopId(0), "main", false)).unwrap();
        g.add_loop(Loop::new(LoopId(1), "contrast", false)).unwrap();
        g.add_loop(Loop::new(LoopId(2), "main", false)).unwrap();
        g.add_loop(Loop::new(LoopId(3), "contrast", false)).unwrap();
        g.connect_loops(LoopId(1), LoopId(2), StitchAttrs::knit(), None)
            .unwrap();
        g.connect_loops(LoopId(0), LoopId(3), StitchAttrs::knit(), None)
            .unwrap();

        let courses = g.get_courses();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses.course(1).unwrap(), &[LoopId(2), LoopId(3)]);
    }

    #[test]
    fn first_loop_seeds_course_zero_with_sparse_ids() {
        let mut g = graph_with_yarns(&["yarn"]);
        g.add_loop(Loop::new(LoopId(3), "yarn", false)).unwrap();
        g.add_loop(Loop::new(LoopId(7), "yarn", false)).unwrap();
        g.connect_loops(LoopId(3), LoopId(7), StitchAttrs::default(), None)
            .unwrap();
        let courses = g.get_courses();
        assert_eq!(courses.course_of(LoopId(3)), Some(0));
        assert_eq!(courses.course_of(LoopId(7)), Some(1));
    }

    #[test]
    fn courses_export_both_maps() {
        let mut g = graph_with_yarns(&["yarn"]);
        let a = g.add_loop_to_yarn("yarn", false).unwrap();
        let b = g.add_loop_to_yarn("yarn", false).unwrap();
        g.connect_loops(a, b, StitchAttrs::knit(), None).unwrap();

        let value = serde_json::to_value(g.get_courses()).unwrap();
        assert_eq!(value["course_to_loops"], serde_json::json!([[0], [1]]));
        assert_eq!(value["loop_to_course"]["1"], 1);
    }
}
