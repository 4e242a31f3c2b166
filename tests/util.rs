#![allow(dead_code)]
use surface_nav::geometry::Vec3;
use surface_nav::topology::surface_graph::SurfaceGraph;
use surface_nav::algs::builder::build_surface_graph;

/// Flat `nx` x `ny` grid of unit cells in the z = 0 plane, each split along
/// its anti-diagonal. Cell `(i, j)` holds triangles `2c` (lower-left) and
/// `2c + 1` (upper-right) with `c = j * nx + i`.
pub fn grid(nx: usize, ny: usize) -> (Vec<Vec3>, Vec<usize>) {
    let vid = |i: usize, j: usize| j * (nx + 1) + i;
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push([i as f64, j as f64, 0.0]);
        }
    }
    let mut indices = Vec::with_capacity(nx * ny * 6);
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (vid(i, j), vid(i + 1, j), vid(i, j + 1), vid(i + 1, j + 1));
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    (vertices, indices)
}

pub fn grid_graph(nx: usize, ny: usize) -> SurfaceGraph {
    let (v, i) = grid(nx, ny);
    build_surface_graph(&v, &i).unwrap()
}

/// Same triangles as `indices`, but every triangle gets private vertex copies.
pub fn unweld(vertices: &[Vec3], indices: &[usize]) -> (Vec<Vec3>, Vec<usize>) {
    let v: Vec<Vec3> = indices.iter().map(|&i| vertices[i]).collect();
    let i = (0..v.len()).collect();
    (v, i)
}

/// Assert `j in neighbours(i)` iff `i in neighbours(j)`.
pub fn assert_symmetric(g: &SurfaceGraph) {
    for n in g.nodes() {
        for &j in &n.neighbours {
            assert!(
                g.neighbours_of(j).unwrap().contains(&n.index),
                "{} -> {j} has no reverse link",
                n.index
            );
        }
    }
}

/// Assert consecutive entries are graph neighbours.
pub fn assert_connected_route(g: &SurfaceGraph, route: &[usize]) {
    for w in route.windows(2) {
        assert!(
            g.neighbours_of(w[0]).unwrap().contains(&w[1]),
            "route step {} -> {} is not an edge",
            w[0],
            w[1]
        );
    }
}
