//! Mesh validation helpers.
//!
//! The graph builder assumes a manifold surface: every mesh edge is shared by
//! at most two triangles. [`NonManifoldHandling`] selects what the builder does
//! when that assumption breaks, and [`non_manifold_edges`] lets callers audit a
//! mesh up front.

use hashbrown::HashMap as FastMap;

use crate::geometry::vector::Vec3;
use crate::mesh_error::MeshGraphError;

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Log a warning and keep only the first two owners of the edge; the
    /// extra triangle gets no adjacency across it.
    Warn,
    /// Return an error on the first non-manifold edge.
    #[default]
    Error,
}

/// A mesh edge shared by more than two triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonManifoldEdge {
    /// Canonical (deduplicated) vertex ids of the endpoints, smaller first.
    pub vertices: (usize, usize),
    /// Every triangle using the edge, in index order.
    pub triangles: Vec<usize>,
}

/// Key bits for exact position matching; `-0.0` folds onto `0.0`.
#[inline]
pub(crate) fn position_key(p: Vec3) -> [u64; 3] {
    [(p[0] + 0.0).to_bits(), (p[1] + 0.0).to_bits(), (p[2] + 0.0).to_bits()]
}

/// Canonical vertex id per input vertex: the first index holding the same
/// position. Returns the mapping and the number of duplicates folded away.
pub(crate) fn weld_exact(vertices: &[Vec3]) -> (Vec<usize>, usize) {
    let mut first_seen: FastMap<[u64; 3], usize> = FastMap::with_capacity(vertices.len());
    let mut canonical = Vec::with_capacity(vertices.len());
    let mut duplicates = 0usize;
    for (i, &v) in vertices.iter().enumerate() {
        let id = *first_seen.entry(position_key(v)).or_insert(i);
        if id != i {
            duplicates += 1;
        }
        canonical.push(id);
    }
    (canonical, duplicates)
}

/// Check that the index buffer is a whole number of in-range triangles.
pub(crate) fn check_index_buffer(
    vertex_count: usize,
    indices: &[usize],
) -> Result<(), MeshGraphError> {
    if indices.len() % 3 != 0 {
        return Err(MeshGraphError::MalformedMesh(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some((slot, &idx)) = indices.iter().enumerate().find(|(_, i)| **i >= vertex_count) {
        return Err(MeshGraphError::MalformedMesh(format!(
            "triangle {} references vertex {idx}, but the mesh has {vertex_count} vertices",
            slot / 3
        )));
    }
    Ok(())
}

/// List every edge used by more than two triangles, ordered by first use.
///
/// # Errors
/// `MalformedMesh` if the index buffer is invalid.
pub fn non_manifold_edges(
    vertices: &[Vec3],
    indices: &[usize],
) -> Result<Vec<NonManifoldEdge>, MeshGraphError> {
    check_index_buffer(vertices.len(), indices)?;
    let (canonical, _) = weld_exact(vertices);

    let mut order: Vec<(usize, usize)> = Vec::new();
    let mut owners: FastMap<(usize, usize), Vec<usize>> = FastMap::new();
    for (t, tri) in indices.chunks_exact(3).enumerate() {
        let [a, b, c] = [canonical[tri[0]], canonical[tri[1]], canonical[tri[2]]];
        for (u, v) in [(a, b), (a, c), (b, c)] {
            let key = (u.min(v), u.max(v));
            let list = owners.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            if !list.contains(&t) {
                list.push(t);
            }
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|key| {
            let tris = owners.remove(&key)?;
            (tris.len() > 2).then(|| NonManifoldEdge {
                vertices: key,
                triangles: tris,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weld_folds_exact_duplicates_and_signed_zero() {
        let verts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [-0.0, 0.0, 0.0], [1.0, 0.0, 1e-9]];
        let (canon, dups) = weld_exact(&verts);
        assert_eq!(canon, vec![0, 1, 0, 3]);
        assert_eq!(dups, 1);
    }

    #[test]
    fn index_buffer_checks() {
        assert!(check_index_buffer(3, &[0, 1, 2]).is_ok());
        assert!(matches!(
            check_index_buffer(3, &[0, 1]),
            Err(MeshGraphError::MalformedMesh(_))
        ));
        assert!(matches!(
            check_index_buffer(3, &[0, 1, 3]),
            Err(MeshGraphError::MalformedMesh(_))
        ));
    }

    #[test]
    fn fan_of_three_on_one_edge_is_reported() {
        let verts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let idx = [0, 1, 2, 0, 1, 3, 0, 1, 4];
        let bad = non_manifold_edges(&verts, &idx).unwrap();
        assert_eq!(
            bad,
            vec![NonManifoldEdge {
                vertices: (0, 1),
                triangles: vec![0, 1, 2]
            }]
        );
    }

    #[test]
    fn manifold_mesh_reports_nothing() {
        let verts = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        let idx = [0, 1, 2, 1, 3, 2];
        assert!(non_manifold_edges(&verts, &idx).unwrap().is_empty());
    }
}
