use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pathviz_core::Point;
use pathviz_grid::{GridModel, Step};

use crate::distance::path_length;
use crate::error::Result;
use crate::wire::{Heuristic, SolveRequest, SolveResponse};
use crate::Solver;

// ---------------------------------------------------------------------------
// Search bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct SearchNode {
    g: f64,
    h: f64,
    parent: usize,
    /// Sequence number of the live heap entry for this node.
    seq: u64,
    open: bool,
    closed: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0.0,
            h: 0.0,
            parent: usize::MAX,
            seq: 0,
            open: false,
            closed: false,
        }
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest `f` first,
/// oldest first among equals.
#[derive(Clone, Copy)]
struct NodeRef {
    idx: usize,
    f: f64,
    seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

struct Search<'a> {
    grid: &'a GridModel,
    width: usize,
    nodes: Vec<SearchNode>,
    open: BinaryHeap<NodeRef>,
    seq: u64,
}

impl<'a> Search<'a> {
    fn new(grid: &'a GridModel) -> Self {
        let width = grid.width().max(0) as usize;
        let len = width * grid.height().max(0) as usize;
        Self {
            grid,
            width,
            nodes: vec![SearchNode::default(); len],
            open: BinaryHeap::new(),
            seq: 0,
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    #[inline]
    fn point(&self, i: usize) -> Point {
        Point::new((i % self.width) as i32, (i / self.width) as i32)
    }

    fn push(&mut self, i: usize) {
        self.seq += 1;
        let node = &mut self.nodes[i];
        node.open = true;
        node.seq = self.seq;
        self.open.push(NodeRef {
            idx: i,
            f: node.g + node.h,
            seq: self.seq,
        });
    }

    /// Pop the best live entry, skipping those superseded by a re-push.
    fn pop(&mut self) -> Option<usize> {
        while let Some(r) = self.open.pop() {
            let node = &self.nodes[r.idx];
            if node.open && node.seq == r.seq {
                return Some(r.idx);
            }
        }
        None
    }

    fn open_points(&self) -> Vec<Point> {
        self.open
            .iter()
            .filter(|r| {
                let node = &self.nodes[r.idx];
                node.open && node.seq == r.seq
            })
            .map(|r| self.point(r.idx))
            .collect()
    }

    fn walkable(&self, p: Point) -> bool {
        self.grid.contains(p) && !self.grid.is_wall(p)
    }

    fn path_to(&self, goal: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut i = goal;
        while i != usize::MAX {
            path.push(self.point(i));
            i = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// A*
// ---------------------------------------------------------------------------

/// A* over the grid's 4-connected non-wall cells with unit move cost.
///
/// With `animate`, one [`Step`] is recorded per expanded node; when the goal
/// is reached the last step is complete and carries the path. Structural
/// flags of `grid` are read; its visualization flags are ignored.
pub fn astar(grid: &GridModel, heuristic: Heuristic, animate: bool) -> SolveResponse {
    let (start, end) = (grid.start(), grid.end());
    let mut search = Search::new(grid);
    let mut explored = Vec::new();
    let mut steps = Vec::new();

    if !grid.contains(start) || !grid.contains(end) {
        return SolveResponse::default();
    }
    let si = search.idx(start);
    search.nodes[si].h = heuristic.estimate(start, end);
    search.push(si);

    while let Some(ci) = search.pop() {
        search.nodes[ci].open = false;
        search.nodes[ci].closed = true;
        let current = search.point(ci);
        explored.push(current);

        if current == end {
            let path = search.path_to(ci);
            if animate {
                steps.push(Step {
                    current_node: current,
                    open_set: search.open_points(),
                    closed_set: explored.clone(),
                    path: Some(path.clone()),
                    is_complete: true,
                });
            }
            log::debug!(
                "A* reached {end} after {} expansions, path of {} cells",
                explored.len(),
                path.len()
            );
            return SolveResponse {
                success: true,
                path_length: path_length(&path),
                nodes_explored: explored.len(),
                steps,
                path,
                explored_nodes: explored,
            };
        }

        if animate {
            steps.push(Step {
                current_node: current,
                open_set: search.open_points(),
                closed_set: explored.clone(),
                path: None,
                is_complete: false,
            });
        }

        let g = search.nodes[ci].g + 1.0;
        for np in current.neighbors_4() {
            if !search.walkable(np) {
                continue;
            }
            let ni = search.idx(np);
            let n = &mut search.nodes[ni];
            if n.closed {
                continue;
            }
            if !n.open {
                n.h = heuristic.estimate(np, end);
            } else if g >= n.g {
                continue;
            }
            n.g = g;
            n.parent = ci;
            search.push(ni);
        }
    }

    log::debug!("A* found no path after {} expansions", explored.len());
    SolveResponse {
        success: false,
        path_length: 0.0,
        nodes_explored: explored.len(),
        steps,
        path: Vec::new(),
        explored_nodes: explored,
    }
}

/// In-process solver running [`astar`] on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocalSolver;

impl LocalSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for LocalSolver {
    fn solve(&self, req: &SolveRequest) -> Result<SolveResponse> {
        req.validate()?;
        log::info!(
            "local A* ({}) on {}x{} grid, {} -> {}",
            req.heuristic,
            req.grid.width(),
            req.grid.height(),
            req.grid.start(),
            req.grid.end()
        );
        Ok(astar(&req.grid, req.heuristic, req.animate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_grid::GridSize;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn grid(n: i32) -> GridModel {
        GridModel::new(GridSize::new(n).unwrap())
    }

    /// Reference shortest path length in moves, by breadth-first search.
    fn bfs_moves(grid: &GridModel) -> Option<usize> {
        let mut dist = std::collections::HashMap::new();
        let mut queue = VecDeque::from([grid.start()]);
        dist.insert(grid.start(), 0);
        while let Some(p) = queue.pop_front() {
            let d = dist[&p];
            if p == grid.end() {
                return Some(d);
            }
            for q in p.neighbors_4() {
                if grid.contains(q) && !grid.is_wall(q) && !dist.contains_key(&q) {
                    dist.insert(q, d + 1);
                    queue.push_back(q);
                }
            }
        }
        None
    }

    fn assert_valid_path(grid: &GridModel, path: &[Point]) {
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        for w in path.windows(2) {
            let d = w[1] - w[0];
            assert_eq!(d.x.abs() + d.y.abs(), 1, "{} -> {}", w[0], w[1]);
        }
        assert!(path.iter().all(|&p| !grid.is_wall(p)));
    }

    #[test]
    fn open_grid() {
        let g = grid(10);
        let resp = astar(&g, Heuristic::Manhattan, false);
        assert!(resp.success);
        assert_eq!(resp.path.len(), 15);
        assert_eq!(resp.path_length, 14.0);
        assert_eq!(resp.nodes_explored, resp.explored_nodes.len());
        assert!(resp.steps.is_empty());
        assert_valid_path(&g, &resp.path);
    }

    #[test]
    fn walled_in_goal() {
        let mut g = grid(10);
        let end = g.end();
        for p in end.neighbors_4() {
            g.toggle_wall(p);
        }
        let resp = astar(&g, Heuristic::Euclidean, true);
        assert!(!resp.success);
        assert!(resp.path.is_empty());
        // everything but the walls, the goal and the cut-off corner (9, 9)
        assert_eq!(resp.nodes_explored, 100 - 4 - 1 - 1);
        assert_eq!(resp.steps.len(), resp.nodes_explored);
        assert!(resp.steps.iter().all(|s| !s.is_complete));
    }

    #[test]
    fn animation_steps() {
        let g = grid(8);
        let resp = astar(&g, Heuristic::Manhattan, true);
        assert_eq!(resp.steps.len(), resp.nodes_explored);
        let (last, rest) = resp.steps.split_last().unwrap();
        assert!(rest.iter().all(|s| !s.is_complete && s.path.is_none()));
        assert!(last.is_complete);
        assert_eq!(last.path.as_deref(), Some(&resp.path[..]));
        assert_eq!(last.current_node, g.end());
        assert_eq!(resp.steps[0].current_node, g.start());
        assert_eq!(resp.steps[0].closed_set, vec![g.start()]);
        assert!(resp.steps[0].open_set.is_empty());
        assert_eq!(resp.steps[1].open_set.len(), 3);
        for (i, s) in resp.steps.iter().enumerate() {
            assert_eq!(s.closed_set.len(), i + 1);
        }
    }

    #[test]
    fn optimal_on_random_mazes() {
        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..40 {
            let mut g = grid(12);
            g.generate_maze(0.3, &mut rng);
            let expected = bfs_moves(&g);
            for h in Heuristic::ALL {
                let resp = astar(&g, h, false);
                assert_eq!(resp.success, expected.is_some(), "round {round} {h}");
                if let Some(moves) = expected {
                    assert_eq!(resp.path.len(), moves + 1, "round {round} {h}");
                    assert_valid_path(&g, &resp.path);
                }
            }
        }
    }

    #[test]
    fn local_solver_validates() {
        let g = grid(6);
        let req = SolveRequest::new(&g, Heuristic::Manhattan, false).unwrap();
        let resp = LocalSolver.solve(&req).unwrap();
        assert!(resp.success);
        assert_eq!(resp.path_length, 6.0);
    }
}
