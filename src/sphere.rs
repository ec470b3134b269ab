use std::f32::consts::PI;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Number of floats per vertex: `position.xyz`, `normal.xyz`, `uv`.
pub const VERTEX_STRIDE: usize = 8;

/// GPU ready sphere buffers with interleaved vertex data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SphereMesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }
}

/// Tessellates a UV sphere with `segments` rings and sectors.
///
/// Rings run from the north pole (v = 0) to the south pole (v = 1); the
/// seam column is duplicated so the equirectangular texture wraps cleanly.
pub fn tessellate(radius: f32, segments: u32) -> Result<SphereMesh> {
    if radius <= 0.0 {
        return Err(anyhow!("sphere radius must be positive, got {radius}"));
    }
    if segments < 3 {
        return Err(anyhow!("sphere needs at least 3 segments, got {segments}"));
    }

    let rings = segments;
    let sectors = segments;
    let mut vertices = Vec::with_capacity(((rings + 1) * (sectors + 1)) as usize * VERTEX_STRIDE);
    let mut indices = Vec::with_capacity((rings * sectors * 6) as usize);

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for sector in 0..=sectors {
            let theta = 2.0 * PI * sector as f32 / sectors as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            vertices.extend_from_slice(&[
                x * radius,
                y * radius,
                z * radius,
                x,
                y,
                z,
                sector as f32 / sectors as f32,
                ring as f32 / rings as f32,
            ]);
        }
    }

    for ring in 0..rings {
        for sector in 0..sectors {
            let current = ring * (sectors + 1) + sector;
            let next = current + sectors + 1;
            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    Ok(SphereMesh { vertices, indices })
}
