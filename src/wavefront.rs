//! Minimal Wavefront OBJ reader: `v` and triangular `f` records only.

use std::fs;
use std::path::Path;

use crate::algebra::{Fp, Point3f};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::scene::MaterialId;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<Point3f>,
    /// 0-based vertex indices.
    pub faces: Vec<[usize; 3]>,
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::ObjParse {
        line,
        message: message.into(),
    }
}

fn parse_coordinate(token: Option<&str>, line: usize) -> Result<Fp> {
    let token = token.ok_or_else(|| parse_error(line, "vertex needs three coordinates"))?;
    token
        .parse::<Fp>()
        .map_err(|_| parse_error(line, format!("bad coordinate {:?}", token)))
}

/// Accepts `i`, `i/t`, `i//n` and `i/t/n`; only the vertex index is kept.
/// Negative indices count back from the last vertex read so far.
fn parse_index(token: &str, vertex_count: usize, line: usize) -> Result<usize> {
    let index = token.split('/').next().unwrap_or(token);
    let value = index
        .parse::<i64>()
        .map_err(|_| parse_error(line, format!("bad vertex index {:?}", token)))?;
    let resolved = match value {
        0 => None,
        v if v > 0 => Some(v as usize - 1),
        v => vertex_count.checked_sub(v.unsigned_abs() as usize),
    };
    resolved.ok_or_else(|| parse_error(line, format!("vertex index {} out of range", value)))
}

pub fn parse_obj(content: &str) -> Result<ObjData> {
    let mut obj = ObjData::default();
    for (number, line) in content.lines().enumerate() {
        let number = number + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let x = parse_coordinate(tokens.next(), number)?;
                let y = parse_coordinate(tokens.next(), number)?;
                let z = parse_coordinate(tokens.next(), number)?;
                obj.vertices.push(Point3f::new(x, y, z));
            }
            Some("f") => {
                let indices = tokens
                    .map(|token| parse_index(token, obj.vertices.len(), number))
                    .collect::<Result<Vec<usize>>>()?;
                let face: [usize; 3] = indices.as_slice().try_into().map_err(|_| {
                    parse_error(
                        number,
                        format!("only triangles are supported, got {} vertices", indices.len()),
                    )
                })?;
                obj.faces.push(face);
            }
            // comments, normals, texture coordinates, groups
            _ => {}
        }
    }
    log::debug!(
        "parsed {} vertices and {} faces",
        obj.vertices.len(),
        obj.faces.len()
    );
    Ok(obj)
}

pub fn load_obj(path: &Path) -> Result<ObjData> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&content)
}

/// Loads a file straight into a mesh. Faces pointing past the vertex list
/// are reported as errors, degenerate faces are dropped.
pub fn load_mesh(path: &Path, material: Option<MaterialId>) -> Result<Mesh> {
    let obj = load_obj(path)?;
    let mesh = Mesh::from_indexed(&obj.vertices, &obj.faces, material)?;
    log::info!("loaded {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}
