mod util;

use surface_nav::algs::builder::build_surface_graph;
use surface_nav::algs::search::{find_path, find_path_to_node, find_path_to_position, search};
use surface_nav::algs::solver::{Goal, GraphSolver};
use surface_nav::geometry::{AffineFrame, Identity};
use surface_nav::mesh_error::MeshGraphError;
use util::{assert_connected_route, grid_graph};

#[test]
fn corner_to_corner_on_2x2_grid() {
    let g = grid_graph(2, 2);
    let path = find_path_to_node(&g, &Identity, 0, 7).unwrap();
    assert_eq!(path.last(), Some(7));
    assert!(path.len() <= g.size());
    assert_eq!(path.indices()[0], 0);

    let route = path.route();
    assert_eq!(route.first(), Some(&0));
    assert_eq!(route.last(), Some(&7));
    assert_connected_route(&g, &route);
    // ties between the two halves of the grid pop in insertion order
    assert_eq!(route, vec![0, 1, 2, 3, 6, 7]);
}

#[test]
fn every_pair_on_a_grid_is_reachable() {
    let g = grid_graph(3, 2);
    for s in 0..g.size() {
        for t in 0..g.size() {
            let path = find_path_to_node(&g, &Identity, s, t).unwrap();
            assert_eq!(path.last(), Some(t));
            assert_connected_route(&g, &path.route());
        }
    }
}

#[test]
fn search_is_deterministic() {
    let g = grid_graph(5, 4);
    let a = find_path_to_node(&g, &Identity, 0, 39).unwrap();
    let b = find_path_to_node(&g, &Identity, 0, 39).unwrap();
    assert_eq!(a, b);
}

#[test]
fn isolated_start_is_unreachable() {
    // two triangles with no shared edge
    let v = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [5.0, 0.0, 0.0],
        [6.0, 0.0, 0.0],
        [5.0, 1.0, 0.0],
    ];
    let g = build_surface_graph(&v, &[0, 1, 2, 3, 4, 5]).unwrap();
    assert_eq!(
        find_path_to_node(&g, &Identity, 0, 1).unwrap_err(),
        MeshGraphError::UnreachableGoal {
            start: 0,
            goal: 1,
            explored: 1
        }
    );
    // a position search just reports what it could reach
    let path = find_path_to_position(&g, &Identity, 0, [5.2, 0.2, 0.0]).unwrap();
    assert_eq!(path.indices(), vec![0]);
}

#[test]
fn position_search_reaches_containing_triangle() {
    let g = grid_graph(2, 2);
    let target = g.center_of_local(3).unwrap();
    let path = find_path_to_position(&g, &Identity, 0, target).unwrap();
    assert_eq!(path.indices(), vec![0, 1, 2, 3]);
    assert_eq!(path.route(), vec![0, 1, 2, 3]);
}

#[test]
fn position_search_restarted_at_landing_stays_put() {
    let g = grid_graph(2, 2);
    for target in [
        g.center_of_local(3).unwrap(),
        g.center_of_local(7).unwrap(),
        [0.9, 1.8, 0.0],
        [3.0, 3.0, 2.0],
    ] {
        let first = find_path_to_position(&g, &Identity, 0, target).unwrap();
        let landed = first.last().unwrap();
        let again = find_path_to_position(&g, &Identity, landed, target).unwrap();
        assert_eq!(again.indices(), vec![landed], "target {target:?}");
    }
}

#[test]
fn position_search_is_idempotent() {
    let g = grid_graph(5, 5);
    for target in [[4.2, 3.1, 0.0], [0.5, 4.5, 0.0], [2.5, 2.5, 1.5]] {
        for start in 0..g.size() {
            let a = find_path_to_position(&g, &Identity, start, target).unwrap();
            let b = find_path_to_position(&g, &Identity, start, target).unwrap();
            assert_eq!(a, b, "start {start} target {target:?}");
        }
    }
}

#[test]
fn closed_records_never_change() {
    let g = grid_graph(4, 4);
    let mut solver = GraphSolver::new(&Identity, &g);
    let path = search(&mut solver, 0, Goal::Node(31)).unwrap();
    for settled in path.nodes() {
        assert_eq!(solver.get_node(settled.index).unwrap(), *settled);
    }

    let mut solver = GraphSolver::new(&Identity, &g);
    let path = search(&mut solver, 5, Goal::Position([3.5, 3.2, 0.0])).unwrap();
    for settled in path.nodes() {
        assert_eq!(solver.get_node(settled.index).unwrap(), *settled);
    }
}

#[test]
fn root_costs_depend_on_goal_kind() {
    let g = grid_graph(2, 2);
    let path = find_path(&g, &Identity, 0, Goal::Node(7)).unwrap();
    let root = path.nodes()[0];
    assert_eq!((root.f, root.g, root.h, root.parent), (0.0, 0.0, 0.0, None));

    let path = find_path(&g, &Identity, 0, Goal::Position([0.2, 0.2, 1.0])).unwrap();
    let root = path.nodes()[0];
    assert_eq!(root.g, 1.0);
    assert!((root.h - 1.0).abs() < 1e-12);
    assert!((root.f - 2.0).abs() < 1e-12);
}

#[test]
fn frame_moves_the_targets() {
    let g = grid_graph(2, 2);
    let shift = AffineFrame::from_translation([10.0, 0.0, 0.0]);
    let target = [10.0 + 5.0 / 3.0, 2.0 / 3.0, 0.0];
    let path = find_path_to_position(&g, &shift, 0, target).unwrap();
    assert_eq!(path.last(), Some(3));
}

#[test]
fn path_length_sums_centroid_hops() {
    let g = grid_graph(2, 2);
    let path = find_path_to_node(&g, &Identity, 0, 1).unwrap();
    let c0 = g.center_of_local(0).unwrap();
    let c1 = g.center_of_local(1).unwrap();
    let d = ((c0[0] - c1[0]).powi(2) + (c0[1] - c1[1]).powi(2)).sqrt();
    assert!((path.length(&g, &Identity).unwrap() - d).abs() < 1e-12);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_batch_matches_serial() {
    use surface_nav::algs::search::find_paths_par;

    let g = grid_graph(6, 6);
    let queries: Vec<(usize, Goal)> = (0..g.size())
        .step_by(7)
        .map(|s| (s, Goal::Node(g.size() - 1 - s)))
        .chain([(3, Goal::Position([5.5, 5.5, 0.0]))])
        .collect();
    let par = find_paths_par(&g, &Identity, &queries);
    for ((s, goal), got) in queries.iter().zip(par) {
        assert_eq!(got.unwrap(), find_path(&g, &Identity, *s, *goal).unwrap());
    }
}
