use flowgraph::{Connection, Error, Graph, Node, layout, seed_positions};

fn node(name: &str) -> Node {
    Node::new(name, ["in"], ["out"])
}

fn edge(from: &str, to: &str) -> Connection {
    Connection::new(from, "out", to, "in")
}

fn graph(names: &[&str], edges: &[(&str, &str)]) -> Graph {
    Graph::new(
        names.iter().map(|n| node(n)).collect(),
        edges.iter().map(|(a, b)| edge(a, b)).collect(),
    )
}

/// The sample graph from the debug visualizer: two sources feeding an adder.
fn sample_graph() -> Graph {
    Graph::new(
        vec![
            Node::new("plop", Vec::<String>::new(), ["val"]),
            Node::new("modif", ["vv", "uu", "yy"], ["value"]),
            Node::new("cst", Vec::<String>::new(), ["v"]),
            Node::new("add", ["x", "y"], ["value", "u", "v", "w"]),
            Node::new("final", ["w"], Vec::<String>::new()),
        ],
        vec![
            Connection::new("plop", "val", "modif", "uu"),
            Connection::new("modif", "value", "add", "y"),
            Connection::new("cst", "v", "add", "x"),
            Connection::new("add", "value", "final", "w"),
        ],
    )
}

fn assert_edges_advance(g: &Graph) {
    let result = layout(g).expect("layout");
    for c in &g.connections {
        if c.is_self_loop() {
            continue;
        }
        let a = result.x(&c.out_node).expect("out node");
        let b = result.x(&c.in_node).expect("in node");
        assert!(b >= a + 1.0, "{} ({a}) -> {} ({b})", c.out_node, c.in_node);
    }
}

fn assert_centered(g: &Graph) {
    let result = layout(g).expect("layout");
    let xs: Vec<f64> = result
        .iter()
        .map(|(_, p)| p.x)
        .filter(|x| !x.is_nan())
        .collect();
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    assert!((max + min).abs() < 1e-9, "max={max} min={min}");
}

#[test]
fn layout_centers_a_linear_chain() {
    let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
    assert_eq!(g.roots(), vec!["A"]);
    assert_eq!(g.leaves(), vec!["C"]);

    let result = layout(&g).expect("layout");
    assert_eq!(result.x("A"), Some(-1.0));
    assert_eq!(result.x("B"), Some(0.0));
    assert_eq!(result.x("C"), Some(1.0));
}

#[test]
fn layout_keeps_input_order_and_leaves_y_undefined() {
    let g = graph(&["c", "a", "b"], &[("a", "b"), ("b", "c")]);
    let result = layout(&g).expect("layout");
    let names: Vec<&str> = result.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|(_, p)| p.y.is_nan()));
}

#[test]
fn layout_uses_the_longest_predecessor_chain() {
    let g = graph(&["a", "b", "c"], &[("a", "c"), ("a", "b"), ("b", "c")]);
    let result = layout(&g).expect("layout");
    assert_eq!(result.x("a"), Some(-1.0));
    assert_eq!(result.x("b"), Some(0.0));
    assert_eq!(result.x("c"), Some(1.0));
}

#[test]
fn layout_of_the_sample_graph() {
    let g = sample_graph();
    let result = layout(&g).expect("layout");
    assert_eq!(result.x("plop"), Some(-1.5));
    assert_eq!(result.x("modif"), Some(-0.5));
    assert_eq!(result.x("cst"), Some(-1.5));
    assert_eq!(result.x("add"), Some(0.5));
    assert_eq!(result.x("final"), Some(1.5));
    assert_edges_advance(&g);
    assert_centered(&g);
}

#[test]
fn layout_places_isolated_nodes_at_rank_zero() {
    let g = graph(&["a", "b", "alone"], &[("a", "b")]);
    assert!(g.roots().contains(&"alone"));
    assert!(g.leaves().contains(&"alone"));

    let result = layout(&g).expect("layout");
    assert_eq!(result.x("a"), Some(-0.5));
    assert_eq!(result.x("b"), Some(0.5));
    assert_eq!(result.x("alone"), Some(-0.5));
}

#[test]
fn layout_is_deterministic() {
    let g = graph(
        &["a", "b", "c", "d", "e", "f"],
        &[
            ("a", "b"),
            ("a", "c"),
            ("c", "d"),
            ("b", "d"),
            ("e", "d"),
            ("d", "f"),
        ],
    );
    assert_eq!(layout(&g).expect("first"), layout(&g).expect("second"));
    assert_edges_advance(&g);
    assert_centered(&g);
}

#[test]
fn layout_handles_parallel_connections() {
    let mut g = graph(&["a", "b"], &[("a", "b")]);
    g.nodes[1].inputs.push("in2".to_string());
    g.connections.push(Connection::new("a", "out", "b", "in2"));
    let result = layout(&g).expect("layout");
    assert_eq!(result.x("a"), Some(-0.5));
    assert_eq!(result.x("b"), Some(0.5));
}

#[test]
fn layout_reports_cycles_instead_of_recursing() {
    let g = graph(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")],
    );
    match layout(&g) {
        Err(Error::Cycle { nodes }) => assert_eq!(nodes, vec!["b", "c", "d"]),
        other => panic!("expected a cycle error, got {other:?}"),
    }
}

#[test]
fn layout_handles_long_chains_without_deep_recursion() {
    let names: Vec<String> = (0..5000).map(|i| format!("n{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
    let g = graph(&refs, &edges);

    let result = layout(&g).expect("layout");
    assert_eq!(result.x("n0"), Some(-2499.5));
    assert_eq!(result.x("n4999"), Some(2499.5));
}

#[test]
fn node_with_only_a_self_loop_stays_unplaced() {
    let g = graph(&["a", "b", "loop"], &[("a", "b"), ("loop", "loop")]);
    let result = layout(&g).expect("layout");
    assert!(!result.is_placed("loop"));
    assert!(result.x("loop").is_some_and(f64::is_nan));
    assert_eq!(result.x("a"), Some(-0.5));
    assert_eq!(result.x("b"), Some(0.5));
    assert_centered(&g);
}

#[test]
fn backward_pass_places_leaf_ancestors() {
    // `s` is not a root (its self-loop counts as a predecessor), but it feeds leaf `v`.
    let g = graph(&["r", "s", "v"], &[("s", "s"), ("r", "v"), ("s", "v")]);
    let result = layout(&g).expect("layout");
    assert_eq!(result.x("r"), Some(-0.5));
    assert_eq!(result.x("s"), Some(-0.5));
    assert_eq!(result.x("v"), Some(0.5));
    assert_edges_advance(&g);
}

#[test]
fn layout_centers_on_the_midpoint_when_ancestors_fall_below_zero() {
    // `s` only feeds itself and `t`, so neither is reached from a root. The backward pass pulls
    // them left of `r`: raw ranks r=0, t=0, s=-1, v=1.
    let g = graph(
        &["r", "s", "t", "v"],
        &[("r", "v"), ("s", "s"), ("s", "t"), ("t", "v")],
    );
    let result = layout(&g).expect("layout");
    assert_eq!(result.x("r"), Some(0.0));
    assert_eq!(result.x("s"), Some(-1.0));
    assert_eq!(result.x("t"), Some(0.0));
    assert_eq!(result.x("v"), Some(1.0));
    assert_edges_advance(&g);
    assert_centered(&g);
}

#[test]
fn layout_rejects_connections_to_missing_nodes() {
    let g = graph(&["a"], &[("a", "ghost")]);
    assert!(matches!(
        layout(&g),
        Err(Error::MissingEndpoint { ref node, .. }) if node == "ghost"
    ));
}

#[test]
fn seed_positions_scales_ranks_and_defaults_unplaced_nodes() {
    let g = graph(&["a", "b", "loop"], &[("a", "b"), ("loop", "loop")]);
    let result = layout(&g).expect("layout");
    let mut nodes = g.nodes.clone();
    nodes[0].y = 42.0;
    seed_positions(&mut nodes, &result, 272.0);
    assert_eq!(nodes[0].x, -136.0);
    assert_eq!(nodes[0].y, 0.0);
    assert_eq!(nodes[1].x, 136.0);
    assert_eq!(nodes[2].x, 0.0);
}

#[test]
fn empty_graph_lays_out_to_nothing() {
    let result = layout(&Graph::default()).expect("layout");
    assert!(result.is_empty());
}
