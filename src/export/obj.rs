//! Wavefront OBJ writer

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::TerrainResult;
use crate::terrain::mesh::OutputMesh;

/// Writes `mesh` as an OBJ object named `name`
///
/// Every vertex carries position, UV and normal under the same index, so
/// faces reference all three with one 1-based number.
pub fn write_obj_to<W: Write>(mesh: &OutputMesh, name: &str, writer: &mut W) -> TerrainResult<()> {
    writeln!(writer, "# {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count())?;
    writeln!(writer, "o {}", name)?;

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for uv in &mesh.uvs {
        writeln!(writer, "vt {} {}", uv[0], uv[1])?;
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    Ok(())
}

/// Writes `mesh` to an OBJ file
pub fn write_obj<P: AsRef<Path>>(mesh: &OutputMesh, name: &str, path: P) -> TerrainResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj_to(mesh, name, &mut writer)?;
    writer.flush()?;
    info!("Wrote mesh {} to {}", name, path.display());
    Ok(())
}
