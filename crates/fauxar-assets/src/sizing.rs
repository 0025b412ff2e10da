//! Model sizing: position accessor bounds through the node tree.

use crate::AssetError;
use fauxar_scene::bounds::Aabb;
use glam::{Mat4, Vec3};
use gltf::{Gltf, Mesh, Semantic};
use std::collections::HashSet;

/// World-space bounds of a `.gltf` (JSON) or `.glb` (binary) asset.
pub fn bounds_from_bytes(bytes: &[u8]) -> Result<Aabb, AssetError> {
    let gltf = Gltf::from_slice(bytes)?;

    let roots: Vec<gltf::Node> = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => scene.nodes().collect(),
        None => root_nodes(&gltf),
    };

    let mut bounds = Aabb::EMPTY;
    let mut visited = HashSet::new();
    let mut stack: Vec<(gltf::Node, Mat4)> = roots.into_iter().map(|n| (n, Mat4::IDENTITY)).collect();

    while let Some((node, parent)) = stack.pop() {
        if !visited.insert(node.index()) {
            continue;
        }
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            bounds = bounds.union(&mesh_bounds(&mesh)?.transformed(&world));
        }
        stack.extend(node.children().map(|c| (c, world)));
    }

    if bounds.is_empty() {
        return Err(AssetError::NoGeometry);
    }
    Ok(bounds)
}

/// Nodes nobody lists as a child.
fn root_nodes(gltf: &Gltf) -> Vec<gltf::Node<'_>> {
    let children: HashSet<usize> = gltf
        .nodes()
        .flat_map(|n| n.children().map(|c| c.index()))
        .collect();
    gltf.nodes().filter(|n| !children.contains(&n.index())).collect()
}

fn mesh_bounds(mesh: &Mesh) -> Result<Aabb, AssetError> {
    let mut bounds = Aabb::EMPTY;
    for primitive in mesh.primitives() {
        let Some(positions) = primitive.get(&Semantic::Positions) else {
            continue;
        };
        let (Some(min), Some(max)) = (positions.min(), positions.max()) else {
            continue;
        };
        let min: [f32; 3] = serde_json::from_value(min)
            .map_err(|e| AssetError::InvalidGltf(format!("POSITION min: {e}")))?;
        let max: [f32; 3] = serde_json::from_value(max)
            .map_err(|e| AssetError::InvalidGltf(format!("POSITION max: {e}")))?;
        bounds = bounds.union(&Aabb::new(Vec3::from_array(min), Vec3::from_array(max)));
    }
    Ok(bounds)
}
