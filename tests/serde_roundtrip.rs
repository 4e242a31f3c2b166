mod util;

use surface_nav::mesh_error::MeshGraphError;
use surface_nav::topology::surface_graph::{SurfaceGraph, SurfaceGraphParts};
use util::grid_graph;

#[test]
fn json_round_trip_preserves_graph() {
    let g = grid_graph(3, 2);
    let text = serde_json::to_string(&g).unwrap();
    let back: SurfaceGraph = serde_json::from_str(&text).unwrap();
    assert_eq!(back, g);
    assert_eq!(back.triangles(), g.triangles());
    assert_eq!(back.nodes(), g.nodes());
    assert_eq!(back.edges(), g.edges());
}

#[test]
fn bincode_round_trip_preserves_graph() {
    let g = grid_graph(4, 4);
    let bytes = bincode::serialize(&g).unwrap();
    let back: SurfaceGraph = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, g);
}

#[test]
fn tampered_json_is_rejected() {
    let g = grid_graph(2, 1);
    let mut value = serde_json::to_value(&g).unwrap();
    value["nodes"][1]["neighbours"] = serde_json::json!([]);
    let err = serde_json::from_value::<SurfaceGraph>(value).unwrap_err();
    assert!(err.to_string().contains("neighbours"), "{err}");
}

#[test]
fn from_parts_rejects_misaligned_parts() {
    let SurfaceGraphParts {
        mut triangles,
        nodes,
        edges,
    } = grid_graph(2, 2).into_parts();
    triangles.pop();
    assert!(matches!(
        SurfaceGraph::from_parts(triangles, nodes, edges),
        Err(MeshGraphError::InvalidGraph(_))
    ));
}

#[test]
fn from_parts_rejects_shuffled_nodes() {
    let SurfaceGraphParts {
        triangles,
        mut nodes,
        edges,
    } = grid_graph(2, 2).into_parts();
    nodes.swap(0, 1);
    assert!(SurfaceGraph::from_parts(triangles, nodes, edges).is_err());
}

#[test]
fn parts_round_trip() {
    let g = grid_graph(2, 3);
    let SurfaceGraphParts {
        triangles,
        nodes,
        edges,
    } = g.clone().into_parts();
    assert_eq!(SurfaceGraph::from_parts(triangles, nodes, edges).unwrap(), g);
}
