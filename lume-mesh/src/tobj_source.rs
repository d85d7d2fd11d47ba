use std::io::Cursor;
use std::path::Path;

use crate::scene::{IndexTriple, SceneDescription, SceneSource, Shape};
use crate::{MeshError, MeshResult};

/// [`SceneSource`] backed by the `tobj` crate.
///
/// `tobj` does not report smoothing groups, so shapes loaded this way use
/// explicit or flat normals only.
#[derive(Clone, Copy, Debug, Default)]
pub struct TobjSource;

impl TobjSource {
    pub fn new() -> Self {
        Self
    }

    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            single_index: false,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// Parse OBJ text held in memory. Material libraries are not resolved.
    pub fn parse(&self, origin: &str, source: &str) -> MeshResult<SceneDescription> {
        let mut reader = Cursor::new(source.as_bytes());
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshError::parse(origin, 0, e.to_string()))?;
        Ok(convert_models(origin, models, &written_attributes(source)))
    }
}

impl SceneSource for TobjSource {
    fn load(&self, path: &Path) -> MeshResult<SceneDescription> {
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&path.display().to_string(), &source)
    }
}

/// Which optional indices a face corner actually wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WrittenAttributes {
    texcoord: bool,
    normal: bool,
}

/// One entry per triangle corner, in the order `tobj` emits them.
///
/// `tobj` fills an omitted normal or texcoord index with `0` as soon as the
/// file has any such attribute, so absence has to be read from the text.
fn written_attributes(source: &str) -> Vec<WrittenAttributes> {
    let mut corners = Vec::new();
    for raw_line in source.lines() {
        let line = match raw_line.split_once('#') {
            Some((content, _comment)) => content,
            None => raw_line,
        };
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("f") {
            continue;
        }

        let face: Vec<WrittenAttributes> = tokens
            .map(|corner| {
                let mut parts = corner.split('/').skip(1);
                WrittenAttributes {
                    texcoord: parts.next().is_some_and(|t| !t.is_empty()),
                    normal: parts.next().is_some_and(|n| !n.is_empty()),
                }
            })
            .collect();
        for i in 2..face.len() {
            corners.extend_from_slice(&[face[0], face[i - 1], face[i]]);
        }
    }
    corners
}

/// Concatenate per-model attribute arrays into one scene, offsetting indices.
fn convert_models(origin: &str, models: Vec<tobj::Model>, written: &[WrittenAttributes]) -> SceneDescription {
    let mut scene = SceneDescription {
        origin: origin.to_string(),
        ..Default::default()
    };

    let total_corners: usize = models.iter().map(|m| m.mesh.indices.len()).sum();
    let written = if written.len() == total_corners {
        written
    } else {
        log::warn!(
            "{}: face layout does not match tobj output ({} vs {} corners), trusting tobj indices",
            origin,
            written.len(),
            total_corners
        );
        &[]
    };
    let mut corner_cursor = 0;

    for model in models {
        let mesh = &model.mesh;
        if mesh.indices.is_empty() {
            log::debug!("Skipping model '{}' without faces", model.name);
            continue;
        }

        let position_offset = (scene.positions.len() / 3) as u32;
        let normal_offset = (scene.normals.len() / 3) as u32;
        let texcoord_offset = (scene.texcoords.len() / 2) as u32;

        scene.positions.extend_from_slice(&mesh.positions);
        scene.normals.extend_from_slice(&mesh.normals);
        scene.texcoords.extend_from_slice(&mesh.texcoords);

        let indices = mesh
            .indices
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let attributes = written.get(corner_cursor + i);
                let has_normal = attributes.map_or(true, |a| a.normal);
                let has_texcoord = attributes.map_or(true, |a| a.texcoord);
                IndexTriple {
                    position: Some(position + position_offset),
                    normal: mesh
                        .normal_indices
                        .get(i)
                        .filter(|_| has_normal)
                        .map(|&n| n + normal_offset),
                    texcoord: mesh
                        .texcoord_indices
                        .get(i)
                        .filter(|_| has_texcoord)
                        .map(|&t| t + texcoord_offset),
                }
            })
            .collect();
        corner_cursor += mesh.indices.len();

        scene.shapes.push(Shape {
            name: model.name.clone(),
            indices,
            smoothing_group_ids: Vec::new(),
        });
    }

    scene
}
