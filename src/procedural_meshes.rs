//! Procedural mesh generation for overlay geometry
//!
//! Currently only the selection highlight pyramid.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::asset::RenderAssetUsages;

// ============================================================================
// HIGHLIGHT PYRAMID
// ============================================================================

/// Square-based pyramid standing on its base at the origin, apex on +Y.
///
/// Flat shaded: each side face owns its three vertices, the base owns four,
/// 16 vertices and 6 triangles in total. Winding is counter-clockwise seen
/// from outside.
pub fn pyramid_mesh(base_x: f32, height: f32, base_z: f32) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD);

    let hx = base_x / 2.0;
    let hz = base_z / 2.0;
    let apex = Vec3::new(0.0, height, 0.0);
    let base = [
        Vec3::new(-hx, 0.0, hz),  // 0: front-left
        Vec3::new(hx, 0.0, hz),   // 1: front-right
        Vec3::new(hx, 0.0, -hz),  // 2: back-right
        Vec3::new(-hx, 0.0, -hz), // 3: back-left
    ];

    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(16);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(16);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(16);
    let mut indices: Vec<u32> = Vec::with_capacity(18);

    // Sides: front, right, back, left
    for i in 0..4 {
        let a = base[i];
        let b = base[(i + 1) % 4];
        let normal = (b - a).cross(apex - a).normalize();
        let start = vertices.len() as u32;
        for (corner, uv) in [(a, [0.0, 1.0]), (b, [1.0, 1.0]), (apex, [0.5, 0.0])] {
            vertices.push(corner.to_array());
            normals.push(normal.to_array());
            uvs.push(uv);
        }
        indices.extend_from_slice(&[start, start + 1, start + 2]);
    }

    // Base, facing down
    let start = vertices.len() as u32;
    for (corner, uv) in base.iter().zip([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]) {
        vertices.push(corner.to_array());
        normals.push([0.0, -1.0, 0.0]);
        uvs.push(uv);
    }
    indices.extend_from_slice(&[start, start + 3, start + 2, start, start + 2, start + 1]);

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn create_pyramid_mesh(
    meshes: &mut ResMut<Assets<Mesh>>,
    base_x: f32,
    height: f32,
    base_z: f32,
) -> Handle<Mesh> {
    meshes.add(pyramid_mesh(base_x, height, base_z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => {
                values.iter().map(|v| Vec3::from_array(*v)).collect()
            }
            _ => panic!("missing positions"),
        }
    }

    fn normals(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
            Some(VertexAttributeValues::Float32x3(values)) => {
                values.iter().map(|v| Vec3::from_array(*v)).collect()
            }
            _ => panic!("missing normals"),
        }
    }

    #[test]
    fn has_sixteen_vertices_and_six_triangles() {
        let mesh = pyramid_mesh(16.2, 32.4, 32.4);
        assert_eq!(mesh.count_vertices(), 16);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(18));
    }

    #[test]
    fn normals_are_unit_and_face_outward() {
        let mesh = pyramid_mesh(16.2, 32.4, 32.4);
        let positions = positions(&mesh);
        let normals = normals(&mesh);
        let centroid = Vec3::new(0.0, 32.4 / 4.0, 0.0);

        for (position, normal) in positions.iter().zip(&normals) {
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert!(normal.dot(*position - centroid) > 0.0);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let mesh = pyramid_mesh(10.0, 20.0, 10.0);
        let positions = positions(&mesh);
        let normals = normals(&mesh);
        let indices: Vec<usize> = mesh.indices().unwrap().iter().collect();

        for triangle in indices.chunks(3) {
            let [a, b, c] = [
                positions[triangle[0]],
                positions[triangle[1]],
                positions[triangle[2]],
            ];
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(normals[triangle[0]]) > 0.0);
        }
    }

    #[test]
    fn apex_sits_at_height() {
        let mesh = pyramid_mesh(16.2, 32.4, 32.4);
        let top = positions(&mesh).iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(top, 32.4);
    }
}
