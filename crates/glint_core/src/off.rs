//! OFF / NOFF mesh file loader.
//!
//! # Supported Syntax
//!
//! - `OFF` header: vertex lines carry `x y z`
//! - `NOFF` header: vertex lines carry `x y z nx ny nz`
//! - counts line `vertices faces edges` (edge count is ignored)
//! - face lines `3 i0 i1 i2`
//! - `#` starts a comment that runs to the end of the line
//!
//! Tokens are whitespace separated, so line breaks inside a record are
//! tolerated. Only triangular faces are accepted.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::mesh::TriangleMesh;

/// Errors that can occur while reading an OFF file.
#[derive(Error, Debug)]
pub enum OffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown header '{0}', expected OFF or NOFF")]
    UnknownHeader(String),

    #[error("Unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Invalid number '{token}' at line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Invalid element counts: {0}")]
    InvalidCounts(String),

    #[error("Face {face} at line {line} has {count} vertices, only triangles are supported")]
    NonTriangularFace {
        face: usize,
        line: usize,
        count: usize,
    },

    #[error("Face {face} references vertex {index}, but the file declares {vertices} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertices: usize,
    },
}

/// Result type for OFF loading.
pub type OffResult<T> = Result<T, OffError>;

/// Whitespace token stream with line numbers and comments stripped.
struct Tokens<'a> {
    tokens: std::vec::IntoIter<(usize, &'a str)>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        let tokens: Vec<_> = content
            .lines()
            .enumerate()
            .flat_map(|(i, line)| {
                let code = line.split('#').next().unwrap_or("");
                code.split_whitespace().map(move |token| (i + 1, token))
            })
            .collect();

        Self {
            tokens: tokens.into_iter(),
        }
    }

    fn next(&mut self, what: &'static str) -> OffResult<(usize, &'a str)> {
        self.tokens.next().ok_or(OffError::UnexpectedEof(what))
    }

    fn parse<T: std::str::FromStr>(&mut self, what: &'static str) -> OffResult<(usize, T)> {
        let (line, token) = self.next(what)?;
        token
            .parse()
            .map(|value| (line, value))
            .map_err(|_| OffError::InvalidNumber {
                line,
                token: token.to_string(),
            })
    }

    fn vec3(&mut self, what: &'static str) -> OffResult<Vec3> {
        let (_, x) = self.parse::<f32>(what)?;
        let (_, y) = self.parse::<f32>(what)?;
        let (_, z) = self.parse::<f32>(what)?;
        Ok(Vec3::new(x, y, z))
    }
}

/// Parse OFF or NOFF content into a triangle mesh.
///
/// Plain OFF files get area-weighted normals; NOFF normals are used as given
/// (normalized).
pub fn parse_off(content: &str) -> OffResult<TriangleMesh> {
    let mut tokens = Tokens::new(content);

    let (_, header) = tokens.next("header")?;
    let with_normals = match header {
        "OFF" => false,
        "NOFF" => true,
        other => return Err(OffError::UnknownHeader(other.to_string())),
    };

    let (_, vertex_count) = tokens.parse::<usize>("vertex count")?;
    let (_, face_count) = tokens.parse::<usize>("face count")?;
    let (_, _edge_count) = tokens.parse::<usize>("edge count")?;

    if vertex_count == 0 && face_count > 0 {
        return Err(OffError::InvalidCounts(format!(
            "{} faces but no vertices",
            face_count
        )));
    }

    // Counts come from the file; every record takes at least a few bytes
    let reserve = |count: usize| count.min(content.len());
    let mut positions = Vec::with_capacity(reserve(vertex_count));
    let mut normals = Vec::with_capacity(if with_normals { reserve(vertex_count) } else { 0 });

    for _ in 0..vertex_count {
        positions.push(tokens.vec3("vertex")?);
        if with_normals {
            normals.push(tokens.vec3("vertex normal")?);
        }
    }

    let mut triangles = Vec::with_capacity(reserve(face_count));
    for face in 0..face_count {
        let (line, count) = tokens.parse::<usize>("face")?;
        if count != 3 {
            return Err(OffError::NonTriangularFace { face, line, count });
        }

        let mut tri = [0u32; 3];
        for slot in &mut tri {
            let (_, index) = tokens.parse::<u32>("face index")?;
            if index as usize >= vertex_count {
                return Err(OffError::IndexOutOfRange {
                    face,
                    index,
                    vertices: vertex_count,
                });
            }
            *slot = index;
        }
        triangles.push(tri);
    }

    let mesh = if with_normals {
        // Counts and indices were checked above, so validation cannot fail
        TriangleMesh::with_normals(positions, normals, triangles)
            .map_err(|e| OffError::InvalidCounts(e.to_string()))?
    } else {
        log::debug!("Computing normals for {} vertices", vertex_count);
        TriangleMesh::new(positions, triangles)
    };

    Ok(mesh)
}

/// Load an OFF or NOFF file from disk.
pub fn load_off<P: AsRef<Path>>(path: P) -> OffResult<TriangleMesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_off(&content)?;

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}
