//! Procedural meshes.
//!
//! All primitives are wound counter-clockwise when seen from the side their
//! normals point to. The cube and the sphere are closed, which the
//! transmission tracer relies on to find an exit.

use std::f32::consts::{PI, TAU};

use glint_math::Vec3;

use crate::mesh::TriangleMesh;

/// A single triangle with area-weighted (flat) normals.
pub fn triangle(p0: Vec3, p1: Vec3, p2: Vec3) -> TriangleMesh {
    TriangleMesh::new(vec![p0, p1, p2], vec![[0, 1, 2]])
}

/// A square floor panel in the XZ plane, centered at the origin, facing +Y.
pub fn quad(size: f32) -> TriangleMesh {
    let h = 0.5 * size;
    let positions = vec![
        Vec3::new(-h, 0.0, h),
        Vec3::new(h, 0.0, h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(-h, 0.0, -h),
    ];
    TriangleMesh::from_parts(positions, vec![Vec3::Y; 4], vec![[0, 1, 2], [0, 2, 3]])
}

/// An axis-aligned cube centered at the origin.
///
/// Every face has its own four vertices so the normals stay flat.
pub fn cube(size: f32) -> TriangleMesh {
    let h = 0.5 * size;
    // (normal, u, v) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(12);

    for (normal, u, v) in faces {
        let base = positions.len() as u32;
        let center = normal * h;
        for (su, sv) in [(-1.0_f32, -1.0_f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(center + (u * su + v * sv) * h);
            normals.push(normal);
        }
        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
    }

    TriangleMesh::from_parts(positions, normals, triangles)
}

/// A latitude/longitude sphere centered at the origin.
///
/// `stacks` is clamped to at least 2 and `slices` to at least 3. Normals are
/// the exact radial directions.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> TriangleMesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);

    let mut positions = Vec::with_capacity((2 + (stacks - 1) * slices) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());

    positions.push(Vec3::Y * radius);
    normals.push(Vec3::Y);

    for ring in 1..stacks {
        let phi = PI * ring as f32 / stacks as f32;
        let (ring_radius, y) = (phi.sin(), phi.cos());
        for slice in 0..slices {
            let theta = TAU * slice as f32 / slices as f32;
            let n = Vec3::new(ring_radius * theta.sin(), y, ring_radius * theta.cos());
            positions.push(n * radius);
            normals.push(n);
        }
    }

    let bottom = positions.len() as u32;
    positions.push(Vec3::NEG_Y * radius);
    normals.push(Vec3::NEG_Y);

    let ring_vertex = |ring: u32, slice: u32| 1 + ring * slices + slice % slices;

    let mut triangles = Vec::with_capacity((2 * slices * (stacks - 1)) as usize);
    for slice in 0..slices {
        triangles.push([0, ring_vertex(0, slice), ring_vertex(0, slice + 1)]);
    }
    for ring in 0..stacks - 2 {
        for slice in 0..slices {
            let a0 = ring_vertex(ring, slice);
            let a1 = ring_vertex(ring, slice + 1);
            let b0 = ring_vertex(ring + 1, slice);
            let b1 = ring_vertex(ring + 1, slice + 1);
            triangles.push([a0, b0, b1]);
            triangles.push([a0, b1, a1]);
        }
    }
    let last = stacks - 2;
    for slice in 0..slices {
        triangles.push([bottom, ring_vertex(last, slice + 1), ring_vertex(last, slice)]);
    }

    TriangleMesh::from_parts(positions, normals, triangles)
}
