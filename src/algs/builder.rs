//! Bake a [`SurfaceGraph`] from an indexed triangle mesh.
//
// Each *triangle* becomes a node; two nodes are adjacent when they share a mesh
// edge after exact-position vertex welding.
//
// 0. weld: every vertex position maps to the first vertex index holding it
// 1. walk triangles in index order (node id = triangle index)
// 2. each of the sides (v0,v1), (v0,v2), (v1,v2) is looked up in the edge map;
//    first sight assigns the next edge id, so edge ids follow encounter order
// 3. joining an edge that already has an owner links both triangles
//
// The result is symmetric and self-free by construction.
//
// Welding is tolerance-free on purpose: meshes that need epsilon merging must
// be welded before baking, since an epsilon would change the topology.

use hashbrown::HashMap as FastMap;

use crate::debug_invariants::DebugInvariants;
use crate::geometry::primitives::{Segment, Triangle};
use crate::geometry::vector::{Vec3, is_finite};
use crate::mesh_error::MeshGraphError;
use crate::topology::surface_graph::{SurfaceGraph, TriangleEdge, TriangleNode};
use crate::topology::validation::{NonManifoldHandling, check_index_buffer, weld_exact};

/// Options for [`build_surface_graph_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// What to do when a third triangle claims an edge.
    pub non_manifold: NonManifoldHandling,
}

/// Counts gathered while baking, for logging and tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub triangles: usize,
    pub edges: usize,
    pub boundary_edges: usize,
    pub unique_vertices: usize,
    pub duplicate_vertices: usize,
    /// Extra owners dropped under [`NonManifoldHandling::Warn`].
    pub non_manifold_owners: usize,
}

/// Bake with default options (non-manifold edges are an error).
///
/// # Errors
/// `MalformedMesh` for a bad index buffer or a non-finite vertex,
/// `NonManifoldEdge` if an edge is shared by more than two triangles.
pub fn build_surface_graph(
    vertices: &[Vec3],
    indices: &[usize],
) -> Result<SurfaceGraph, MeshGraphError> {
    build_surface_graph_with(vertices, indices, BuildOptions::default()).map(|(g, _)| g)
}

/// Bake a surface graph and return it with a [`BuildReport`].
///
/// # Determinism
/// Node ids follow triangle order; edge ids and neighbour order follow the
/// order edges are first encountered. The same buffers always produce the
/// same graph.
///
/// # Complexity
/// **O(T)** expected for `T` triangles (hash lookups per side).
pub fn build_surface_graph_with(
    vertices: &[Vec3],
    indices: &[usize],
    opts: BuildOptions,
) -> Result<(SurfaceGraph, BuildReport), MeshGraphError> {
    check_index_buffer(vertices.len(), indices)?;
    if let Some(&bad) = indices.iter().find(|&&i| !is_finite(vertices[i])) {
        return Err(MeshGraphError::MalformedMesh(format!(
            "vertex {bad} has a non-finite coordinate: {:?}",
            vertices[bad]
        )));
    }

    let (canonical, duplicate_vertices) = weld_exact(vertices);
    log::debug!(
        "vertex welding finished: {duplicate_vertices} duplicates folded, {} unique",
        vertices.len() - duplicate_vertices
    );

    let tri_count = indices.len() / 3;
    let mut triangles = Vec::with_capacity(tri_count);
    let mut node_edges: Vec<[usize; 3]> = Vec::with_capacity(tri_count);
    let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); tri_count];

    let mut edge_id: FastMap<(usize, usize), usize> = FastMap::with_capacity(tri_count * 2);
    let mut edge_lines: Vec<Segment> = Vec::new();
    let mut edge_owners: Vec<Vec<usize>> = Vec::new();
    let mut non_manifold_owners = 0usize;

    for (t, tri) in indices.chunks_exact(3).enumerate() {
        let ids = [canonical[tri[0]], canonical[tri[1]], canonical[tri[2]]];
        let pos = ids.map(|i| vertices[i]);
        triangles.push(Triangle::new(pos[0], pos[1], pos[2]));

        let mut sides = [0usize; 3];
        for (slot, (a, b)) in [(0, 1), (0, 2), (1, 2)].into_iter().enumerate() {
            let key = (ids[a].min(ids[b]), ids[a].max(ids[b]));
            let e = *edge_id.entry(key).or_insert_with(|| {
                edge_lines.push(Segment::new(pos[a], pos[b]));
                edge_owners.push(Vec::with_capacity(2));
                edge_lines.len() - 1
            });
            sides[slot] = e;

            let owners = &mut edge_owners[e];
            if owners.contains(&t) {
                // collapsed triangle reusing one of its own sides
                continue;
            }
            if owners.len() == 2 {
                match opts.non_manifold {
                    NonManifoldHandling::Error => {
                        return Err(MeshGraphError::NonManifoldEdge {
                            a: key.0,
                            b: key.1,
                            triangle: t,
                        });
                    }
                    NonManifoldHandling::Warn => {
                        log::warn!(
                            "Non-manifold edge detected: vertices=({}, {}) owners={:?} extra={t}",
                            key.0,
                            key.1,
                            owners
                        );
                        non_manifold_owners += 1;
                        continue;
                    }
                }
            }
            for &other in owners.iter() {
                connect(&mut neighbours, t, other);
                connect(&mut neighbours, other, t);
            }
            owners.push(t);
        }
        node_edges.push(sides);
    }

    let edges: Vec<TriangleEdge> = edge_lines
        .into_iter()
        .zip(edge_owners)
        .enumerate()
        .map(|(index, (line, owners))| TriangleEdge {
            index,
            line,
            triangle0: owners[0],
            triangle1: owners.get(1).copied(),
        })
        .collect();

    let nodes: Vec<TriangleNode> = neighbours
        .into_iter()
        .zip(node_edges)
        .enumerate()
        .map(|(index, (neighbours, edges))| TriangleNode {
            index,
            neighbours,
            edges,
        })
        .collect();

    let report = BuildReport {
        triangles: tri_count,
        edges: edges.len(),
        boundary_edges: edges.iter().filter(|e| e.is_boundary()).count(),
        unique_vertices: vertices.len() - duplicate_vertices,
        duplicate_vertices,
        non_manifold_owners,
    };
    log::debug!(
        "surface graph baked: {} triangles, {} edges ({} boundary)",
        report.triangles,
        report.edges,
        report.boundary_edges
    );

    let graph = SurfaceGraph::from_parts_unchecked(triangles, nodes, edges);
    graph.debug_assert_invariants();
    Ok((graph, report))
}

fn connect(neighbours: &mut [Vec<usize>], from: usize, to: usize) {
    let list = &mut neighbours[from];
    if !list.contains(&to) {
        list.push(to);
    }
}
