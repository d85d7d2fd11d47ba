//! Wavefront OBJ reader producing a [`SceneDescription`].
//!
//! Only geometry is read: positions, normals, texture coordinates, faces,
//! object/group boundaries and smoothing groups. Material statements and
//! free-form geometry are skipped. Polygons are fan-triangulated.

use std::path::Path;

use crate::scene::{IndexTriple, SceneDescription, SceneSource, Shape};
use crate::{MeshError, MeshResult};

#[derive(Clone, Copy, Debug, Default)]
pub struct ObjReader;

impl ObjReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse OBJ text. `origin` names the source in diagnostics.
    pub fn parse(&self, origin: &str, source: &str) -> MeshResult<SceneDescription> {
        let mut assembler = SceneAssembler::new(origin);

        for (line_index, raw_line) in source.lines().enumerate() {
            let line = match raw_line.split_once('#') {
                Some((content, _comment)) => content,
                None => raw_line,
            };
            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let arguments: Vec<&str> = tokens.collect();

            assembler
                .apply(keyword, &arguments)
                .map_err(|message| MeshError::parse(origin, line_index + 1, message))?;
        }

        let scene = assembler.finish();
        log::debug!(
            "Parsed {}: {} positions, {} normals, {} texcoords, {} shapes",
            origin,
            scene.positions.len() / 3,
            scene.normals.len() / 3,
            scene.texcoords.len() / 2,
            scene.shapes.len()
        );
        Ok(scene)
    }
}

impl SceneSource for ObjReader {
    fn load(&self, path: &Path) -> MeshResult<SceneDescription> {
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&path.display().to_string(), &source)
    }
}

struct SceneAssembler {
    scene: SceneDescription,
    current: Shape,
    smoothing_group: u32,
}

impl SceneAssembler {
    fn new(origin: &str) -> Self {
        Self {
            scene: SceneDescription {
                origin: origin.to_string(),
                ..Default::default()
            },
            current: Shape::default(),
            smoothing_group: 0,
        }
    }

    fn apply(&mut self, keyword: &str, arguments: &[&str]) -> Result<(), String> {
        match keyword {
            "v" => {
                let numbers = parse_numbers(arguments, 3)?;
                self.scene.positions.extend_from_slice(&numbers[..3]);
            }
            "vn" => {
                let numbers = parse_numbers(arguments, 3)?;
                self.scene.normals.extend_from_slice(&numbers[..3]);
            }
            "vt" => {
                let numbers = parse_numbers(arguments, 1)?;
                let v = numbers.get(1).copied().unwrap_or(0.0);
                self.scene.texcoords.extend_from_slice(&[numbers[0], v]);
            }
            "f" => self.push_face(arguments)?,
            "o" | "g" => self.start_shape(&arguments.join(" ")),
            "s" => self.smoothing_group = parse_smoothing_group(arguments)?,
            "mtllib" | "usemtl" | "l" | "p" | "vp" => {}
            other => log::warn!("Ignoring unsupported OBJ statement '{}'", other),
        }
        Ok(())
    }

    /// A new shape begins only once the current one holds faces; otherwise it is renamed.
    fn start_shape(&mut self, name: &str) {
        if !self.current.indices.is_empty() {
            let finished = std::mem::take(&mut self.current);
            self.scene.shapes.push(finished);
        }
        self.current.name = name.to_string();
    }

    fn push_face(&mut self, arguments: &[&str]) -> Result<(), String> {
        if arguments.len() < 3 {
            return Err(format!("face needs at least 3 corners, found {}", arguments.len()));
        }

        let counts = AttributeCounts {
            positions: self.scene.positions.len() / 3,
            normals: self.scene.normals.len() / 3,
            texcoords: self.scene.texcoords.len() / 2,
        };
        let corners = arguments
            .iter()
            .map(|corner| parse_corner(corner, &counts))
            .collect::<Result<Vec<_>, _>>()?;

        for i in 2..corners.len() {
            self.current
                .indices
                .extend_from_slice(&[corners[0], corners[i - 1], corners[i]]);
            self.current.smoothing_group_ids.push(self.smoothing_group);
        }
        Ok(())
    }

    fn finish(mut self) -> SceneDescription {
        if !self.current.indices.is_empty() {
            self.scene.shapes.push(self.current);
        }
        self.scene
    }
}

struct AttributeCounts {
    positions: usize,
    normals: usize,
    texcoords: usize,
}

fn parse_numbers(arguments: &[&str], required: usize) -> Result<Vec<f32>, String> {
    if arguments.len() < required {
        return Err(format!(
            "expected at least {} numbers, found {}",
            required,
            arguments.len()
        ));
    }
    arguments
        .iter()
        .map(|value| {
            value
                .parse::<f32>()
                .map_err(|_| format!("invalid number '{}'", value))
        })
        .collect()
}

fn parse_smoothing_group(arguments: &[&str]) -> Result<u32, String> {
    match arguments.first() {
        None => Err("smoothing group statement without an id".to_string()),
        Some(&"off") => Ok(0),
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| format!("invalid smoothing group '{}'", value)),
    }
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn parse_corner(corner: &str, counts: &AttributeCounts) -> Result<IndexTriple, String> {
    let mut parts = corner.split('/');
    let position = parse_index(parts.next(), counts.positions)?
        .ok_or_else(|| format!("face corner '{}' has no position index", corner))?;
    let texcoord = parse_index(parts.next(), counts.texcoords)?;
    let normal = parse_index(parts.next(), counts.normals)?;
    if parts.next().is_some() {
        return Err(format!("malformed face corner '{}'", corner));
    }

    Ok(IndexTriple {
        position: Some(position),
        normal,
        texcoord,
    })
}

/// One-based or negative (relative to `count`) index to a zero-based one.
fn parse_index(value: Option<&str>, count: usize) -> Result<Option<u32>, String> {
    let value = match value {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };
    let index: i64 = value
        .parse()
        .map_err(|_| format!("invalid index '{}'", value))?;

    let resolved = match index {
        0 => return Err("index 0 is not valid in OBJ".to_string()),
        i if i > 0 => i - 1,
        i => count as i64 + i,
    };
    if resolved < 0 || resolved > u32::MAX as i64 {
        return Err(format!("index {} is out of range", index));
    }
    Ok(Some(resolved as u32))
}
