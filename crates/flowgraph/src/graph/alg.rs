//! Traversal helpers over [`Adjacency`].

use super::Adjacency;
use std::collections::VecDeque;

/// Breadth-first topological order (Kahn). Self-loops are ignored.
///
/// Returns `None` when the graph has a cycle; use [`find_cycle`] to report it.
pub fn topological_order(adj: &Adjacency) -> Option<Vec<usize>> {
    let n = adj.len();
    let mut in_degree: Vec<usize> = (0..n)
        .map(|v| adj.predecessors(v).iter().filter(|&&p| p != v).count())
        .collect();

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        for &w in adj.successors(v) {
            if w == v {
                continue;
            }
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    (order.len() == n).then_some(order)
}

/// Finds one directed cycle and returns its nodes in edge order. Self-loops are ignored.
pub fn find_cycle(adj: &Adjacency) -> Option<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnStack,
        Done,
    }

    let n = adj.len();
    let mut mark = vec![Mark::Unvisited; n];
    // Explicit stack of (node, next successor position); deep chains must not exhaust the
    // call stack.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if mark[start] != Mark::Unvisited {
            continue;
        }
        mark[start] = Mark::OnStack;
        stack.push((start, 0));

        while let Some(top) = stack.last_mut() {
            let (v, pos) = *top;
            let succ = adj.successors(v);
            if pos >= succ.len() {
                mark[v] = Mark::Done;
                stack.pop();
                continue;
            }
            top.1 += 1;

            let w = succ[pos];
            if w == v {
                continue;
            }
            match mark[w] {
                Mark::Unvisited => {
                    mark[w] = Mark::OnStack;
                    stack.push((w, 0));
                }
                Mark::OnStack => {
                    let from = stack.iter().position(|&(u, _)| u == w).unwrap_or(0);
                    return Some(stack[from..].iter().map(|&(u, _)| u).collect());
                }
                Mark::Done => {}
            }
        }
    }
    None
}
