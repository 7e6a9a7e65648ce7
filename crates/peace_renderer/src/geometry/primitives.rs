//! Procedurally generated meshes.
//!
//! Every generator returns de-indexed triangle lists with counter-clockwise
//! winding seen from outside, so back-face culling removes interior faces.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::vertex::{TangentVertex, Vertex};

/// Unit cube centred on the origin (±0.5), 36 vertices, flat normals.
pub fn cube() -> Vec<Vertex> {
    // (normal, u axis, v axis); u × v == normal keeps the winding CCW
    #[rustfmt::skip]
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([ 0.0,  0.0,  1.0], [ 1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // front  (z+)
        ([ 0.0,  0.0, -1.0], [-1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // back   (z-)
        ([ 1.0,  0.0,  0.0], [ 0.0, 0.0, -1.0], [0.0, 1.0,  0.0]), // right  (x+)
        ([-1.0,  0.0,  0.0], [ 0.0, 0.0,  1.0], [0.0, 1.0,  0.0]), // left   (x-)
        ([ 0.0,  1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0, -1.0]), // top    (y+)
        ([ 0.0, -1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0,  1.0]), // bottom (y-)
    ];
    const CORNERS: [[f32; 2]; 6] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut out = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let (n, u, v) = (Vec3::from(n), Vec3::from(u), Vec3::from(v));
        for [s, t] in CORNERS {
            let p = n * 0.5 + u * (s - 0.5) + v * (t - 0.5);
            out.push(Vertex { position: p.into(), normal: n.into(), uv: [s, t] });
        }
    }
    out
}

/// Ground quad spanning ±1 on X and Z at y = 0, facing +Y.
pub fn quad() -> Vec<Vertex> {
    let v = |x: f32, z: f32, s: f32, t: f32| Vertex {
        position: [x, 0.0, z],
        normal: [0.0, 1.0, 0.0],
        uv: [s, t],
    };
    #[rustfmt::skip]
    let vertices = vec![
        v(-1.0,  1.0, 0.0, 0.0), v( 1.0,  1.0, 1.0, 0.0), v( 1.0, -1.0, 1.0, 1.0),
        v(-1.0,  1.0, 0.0, 0.0), v( 1.0, -1.0, 1.0, 1.0), v(-1.0, -1.0, 0.0, 1.0),
    ];
    vertices
}

/// UV sphere of `radius` with `sectors` slices around Y and `stacks` rings
/// from pole to pole.
pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> Vec<Vertex> {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);

    let grid = |i: u32, j: u32| {
        let phi = PI / 2.0 - i as f32 * PI / stacks as f32;
        let theta = j as f32 * TAU / sectors as f32;
        let n = Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
        Vertex {
            position: (n * radius).into(),
            normal: n.into(),
            uv: [j as f32 / sectors as f32, i as f32 / stacks as f32],
        }
    };

    let mut out = Vec::with_capacity((sectors * (stacks - 1) * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let (k1, k1n) = (grid(i, j), grid(i, j + 1));
            let (k2, k2n) = (grid(i + 1, j), grid(i + 1, j + 1));
            // the top and bottom rings collapse to a single triangle per sector
            if i != 0 {
                out.extend([k1, k1n, k2]);
            }
            if i != stacks - 1 {
                out.extend([k1n, k2n, k2]);
            }
        }
    }
    out
}

/// Adds a tangent frame computed per triangle from its UV gradients.
///
/// Triangles with degenerate UVs get an arbitrary frame orthogonal to the
/// first vertex normal.
pub fn with_tangents(vertices: &[Vertex]) -> Vec<TangentVertex> {
    let mut out = Vec::with_capacity(vertices.len());
    for tri in vertices.chunks_exact(3) {
        let p = |k: usize| Vec3::from(tri[k].position);
        let uv = |k: usize| Vec2::from(tri[k].uv);
        let (e1, e2) = (p(1) - p(0), p(2) - p(0));
        let (d1, d2) = (uv(1) - uv(0), uv(2) - uv(0));

        let det = d1.x * d2.y - d2.x * d1.y;
        let (tangent, bitangent) = if det.abs() > 1e-8 {
            let f = 1.0 / det;
            (
                ((e1 * d2.y - e2 * d1.y) * f).normalize_or_zero(),
                ((e2 * d1.x - e1 * d2.x) * f).normalize_or_zero(),
            )
        } else {
            let n = Vec3::from(tri[0].normal);
            let t = n.any_orthonormal_vector();
            (t, n.cross(t))
        };

        out.extend(tri.iter().map(|v| TangentVertex {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
            tangent: tangent.into(),
            bitangent: bitangent.into(),
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(tri: &[Vertex]) -> Vec3 {
        let p = |k: usize| Vec3::from(tri[k].position);
        (p(1) - p(0)).cross(p(2) - p(0)).normalize()
    }

    #[test]
    fn cube_has_outward_ccw_faces() {
        let verts = cube();
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks_exact(3) {
            let n = Vec3::from(tri[0].normal);
            assert!(face_normal(tri).abs_diff_eq(n, 1e-6));
        }
        for v in &verts {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn quad_faces_up() {
        let verts = quad();
        assert_eq!(verts.len(), 6);
        for tri in verts.chunks_exact(3) {
            assert!(face_normal(tri).abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let verts = sphere(2.0, 36, 18);
        assert_eq!(verts.len(), 36 * 17 * 6);
        for v in &verts {
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let verts = sphere(1.0, 12, 6);
        for tri in verts.chunks_exact(3) {
            let centroid = (Vec3::from(tri[0].position) + Vec3::from(tri[1].position) + Vec3::from(tri[2].position)) / 3.0;
            assert!(face_normal(tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn tangent_frame_is_orthogonal_to_normal() {
        for v in with_tangents(&cube()) {
            let n = Vec3::from(v.normal);
            assert!(Vec3::from(v.tangent).dot(n).abs() < 1e-5);
            assert!(Vec3::from(v.bitangent).dot(n).abs() < 1e-5);
        }
    }
}
