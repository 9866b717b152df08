use flowgraph::{BBox, BBoxCollide, Force, Node, Point, collision_force};

fn square(_: &Node, _: usize, _: &[Node]) -> BBox {
    BBox::new(0.0, 0.0, 100.0, 100.0)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn separated_boxes_produce_no_impulse() {
    let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    let b = a.translate(Point::new(300.0, 0.0));
    assert_eq!(collision_force(&a, &b), (Point::ZERO, Point::ZERO));

    // Overlap on one axis only is not a collision.
    let c = a.translate(Point::new(50.0, 150.0));
    assert_eq!(collision_force(&a, &c), (Point::ZERO, Point::ZERO));
}

#[test]
fn smaller_x_penetration_pushes_along_x_only() {
    let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    let b = a.translate(Point::new(90.0, 60.0));
    let (fa, fb) = collision_force(&a, &b);
    assert_close(fa.x, -0.1);
    assert_close(fb.x, 0.1);
    assert_eq!(fa.y, 0.0);
    assert_eq!(fb.y, 0.0);
}

#[test]
fn smaller_y_penetration_pushes_along_y_only() {
    let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    let b = a.translate(Point::new(-60.0, -80.0));
    let (fa, fb) = collision_force(&a, &b);
    assert_eq!(fa.x, 0.0);
    assert_eq!(fb.x, 0.0);
    // b sits above a: a goes down, b goes up.
    assert_close(fa.y, 0.2);
    assert_close(fb.y, -0.2);
}

#[test]
fn impulse_scales_inversely_with_each_box_extent() {
    let a = BBox::new(0.0, 0.0, 100.0, 400.0);
    let b = BBox::new(90.0, 0.0, 140.0, 400.0);
    let (fa, fb) = collision_force(&a, &b);
    assert!(fa.x < 0.0 && fb.x > 0.0);
    assert_close(fa.x, -10.0 / 100.0);
    assert_close(fb.x, 10.0 / 50.0);
    assert_close(fb.x.abs(), 2.0 * fa.x.abs());
}

#[test]
fn collide_accumulates_over_every_overlapping_pair() {
    let mut nodes = vec![
        Node::new("a", ["i"], ["o"]),
        Node::new("b", ["i"], ["o"]).at(90.0, 0.0),
        Node::new("c", ["i"], ["o"]).at(80.0, 0.0),
    ];
    let mut force = BBoxCollide::new(square);
    force.initialize(&nodes).expect("initialize");
    assert_eq!(force.boxes().len(), 3);

    force.apply(&mut nodes, 1.0);
    // (a, b) overlap by 10, (a, c) by 20, each scaled by strength / width.
    assert_close(nodes[0].vx, -3.0);
    assert_eq!(nodes[0].vy, 0.0);
    // Positions are left to the integrator.
    assert_eq!(nodes[0].position(), Point::ZERO);
}

#[test]
fn collide_ignores_alpha() {
    let make = || {
        vec![
            Node::new("a", ["i"], ["o"]),
            Node::new("b", ["i"], ["o"]).at(90.0, 60.0),
        ]
    };
    let mut force = BBoxCollide::new(square).with_strength(4.0);
    let mut hot = make();
    force.initialize(&hot).expect("initialize");
    force.apply(&mut hot, 1.0);
    let mut cold = make();
    force.apply(&mut cold, 0.0);
    assert_eq!(hot, cold);
    assert_close(hot[0].vx, -0.4);
    assert_close(hot[1].vx, 0.4);
}

#[test]
fn box_function_sees_index_and_siblings() {
    let nodes = vec![
        Node::new("a", ["i"], ["o"]),
        Node::new("b", ["i"], ["o"]),
    ];
    let mut force = BBoxCollide::new(|_: &Node, idx: usize, all: &[Node]| {
        let w = 10.0 * (idx + all.len()) as f64;
        BBox::new(0.0, 0.0, w, 10.0)
    });
    force.initialize(&nodes).expect("initialize");
    assert_eq!(force.boxes()[0].width(), 20.0);
    assert_eq!(force.boxes()[1].width(), 30.0);
}
