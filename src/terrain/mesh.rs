//! Triangulated terrain surfaces
//!
//! Vertices sit on a regular Rx x Rz lattice; vertex (x, z) has index
//! `z * Rx + x`. Each lattice cell is split into the triangles
//! (bl, tl, br) and (br, tl, tr), which face +Y for a flat surface.

use log::debug;

use crate::errors::{TerrainError, TerrainResult};
use crate::heightmap::normalizer::NormalizedHeightmap;
use crate::terrain::resample::{normalized_coord, resample_grid, OutputGrid};
use crate::terrain::resolution::MeshTier;

/// Axis-aligned bounds of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl MeshBounds {
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Terrain mesh with per-vertex UVs and normals
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub bounds: MeshBounds,
    pub resolution_x: usize,
    pub resolution_z: usize,
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize_or_up(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// Vertex indices are `u32`, so a lattice holds at most 2^32 vertices
fn check_indexable(resolution_x: usize, resolution_z: usize) -> TerrainResult<()> {
    let addressable = resolution_x
        .checked_mul(resolution_z)
        .is_some_and(|count| count as u64 <= u32::MAX as u64 + 1);
    if addressable {
        Ok(())
    } else {
        Err(TerrainError::MeshTooLarge { resolution_x, resolution_z })
    }
}

/// Triangle list over an Rx x Rz vertex lattice
pub fn lattice_indices(resolution_x: usize, resolution_z: usize) -> TerrainResult<Vec<u32>> {
    check_indexable(resolution_x, resolution_z)?;
    if resolution_x < 2 || resolution_z < 2 {
        return Ok(Vec::new());
    }
    let mut indices = Vec::with_capacity((resolution_x - 1) * (resolution_z - 1) * 6);
    for z in 0..resolution_z - 1 {
        for x in 0..resolution_x - 1 {
            let bl = (z * resolution_x + x) as u32;
            let br = bl + 1;
            let tl = ((z + 1) * resolution_x + x) as u32;
            let tr = tl + 1;
            indices.extend_from_slice(&[bl, tl, br, br, tl, tr]);
        }
    }
    Ok(indices)
}

impl OutputMesh {
    /// Builds a mesh from a resampled grid scaled to `size` (x, y, z)
    pub fn from_grid(grid: &OutputGrid, size: [f32; 3]) -> TerrainResult<Self> {
        let rx = grid.resolution_x();
        let rz = grid.resolution_z();
        let indices = lattice_indices(rx, rz)?;
        let mut positions = Vec::with_capacity(rx * rz);
        let mut uvs = Vec::with_capacity(rx * rz);

        for z in 0..rz {
            let v = normalized_coord(z, rz) as f32;
            for x in 0..rx {
                let u = normalized_coord(x, rx) as f32;
                let h = grid.get(x, z).unwrap_or(0.0);
                positions.push([u * size[0], h * size[1], v * size[2]]);
                uvs.push([u, v]);
            }
        }

        let mut mesh = OutputMesh {
            normals: Vec::new(),
            indices,
            positions,
            uvs,
            bounds: MeshBounds { min: [0.0; 3], max: [0.0; 3] },
            resolution_x: rx,
            resolution_z: rz,
        };
        mesh.recalculate_normals();
        mesh.recalculate_bounds();
        Ok(mesh)
    }

    /// Area-weighted vertex normals from the triangle list
    pub fn recalculate_normals(&mut self) {
        let mut accum = vec![[0.0f32; 3]; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = cross(
                sub(self.positions[b], self.positions[a]),
                sub(self.positions[c], self.positions[a]),
            );
            for &i in &[a, b, c] {
                accum[i][0] += face[0];
                accum[i][1] += face[1];
                accum[i][2] += face[2];
            }
        }
        self.normals = accum.into_iter().map(normalize_or_up).collect();
    }

    pub fn recalculate_bounds(&mut self) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        if self.positions.is_empty() {
            min = [0.0; 3];
            max = [0.0; 3];
        }
        self.bounds = MeshBounds { min, max };
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Mesh at a tier of the heightmap's resolution
pub fn build_mesh(map: &NormalizedHeightmap, tier: MeshTier, size: [f32; 3]) -> TerrainResult<OutputMesh> {
    let (rx, rz) = tier.target_dims(map.width() as u32, map.height() as u32);
    debug!("Building {} mesh: {}x{} vertices", tier, rx, rz);
    check_indexable(rx as usize, rz as usize)?;
    let grid = resample_grid(map, rx as usize, rz as usize);
    OutputMesh::from_grid(&grid, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: usize, height: usize, sample: u16) -> NormalizedHeightmap {
        NormalizedHeightmap::new(width, height, vec![sample; width * height], 0.0, 1.0).unwrap()
    }

    #[test]
    fn test_winding_of_single_quad() {
        assert_eq!(lattice_indices(2, 2).unwrap(), vec![0, 2, 1, 1, 2, 3]);
        assert!(lattice_indices(1, 5).unwrap().is_empty());
    }

    #[test]
    fn test_lattice_beyond_u32_indices_rejected() {
        assert!(matches!(
            lattice_indices(70_000, 70_000),
            Err(TerrainError::MeshTooLarge { resolution_x: 70_000, resolution_z: 70_000 })
        ));
        assert!(lattice_indices(usize::MAX, 2).is_err());
        assert!(check_indexable(65_536, 65_536).is_ok());
        assert!(check_indexable(65_536, 65_537).is_err());
    }

    #[test]
    fn test_flat_mesh_normals_point_up() {
        let mesh = build_mesh(&flat(4, 4, 0), MeshTier::Full, [30.0, 10.0, 30.0]).unwrap();
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 18);
        for n in &mesh.normals {
            assert!((n[1] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_positions_uvs_and_bounds() {
        let mesh = build_mesh(&flat(8, 4, u16::MAX), MeshTier::Half, [100.0, 20.0, 50.0]).unwrap();
        assert_eq!((mesh.resolution_x, mesh.resolution_z), (4, 2));
        assert_eq!(mesh.positions[0], [0.0, 20.0, 0.0]);
        assert_eq!(mesh.positions[7], [100.0, 20.0, 50.0]);
        assert_eq!(mesh.uvs[7], [1.0, 1.0]);
        assert_eq!(mesh.bounds.min, [0.0, 20.0, 0.0]);
        assert_eq!(mesh.bounds.size(), [100.0, 0.0, 50.0]);
    }

    #[test]
    fn test_slope_tilts_normals() {
        // Height rises along +X
        let samples = vec![0, u16::MAX, 0, u16::MAX];
        let map = NormalizedHeightmap::new(2, 2, samples, 0.0, 1.0).unwrap();
        let mesh = build_mesh(&map, MeshTier::Full, [1.0, 1.0, 1.0]).unwrap();
        for n in &mesh.normals {
            assert!(n[0] < 0.0);
            assert!(n[1] > 0.0);
        }
    }

    #[test]
    fn test_tiny_source_still_meshes() {
        let mesh = build_mesh(&flat(1, 1, 100), MeshTier::Eighth, [1.0, 1.0, 1.0]).unwrap();
        assert_eq!((mesh.resolution_x, mesh.resolution_z), (2, 2));
        assert_eq!(mesh.triangle_count(), 2);
    }
}
