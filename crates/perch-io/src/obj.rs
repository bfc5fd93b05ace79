use perch_base::LoadError;
use perch_geometry::Vec3;
use perch_scene::{LoadedScene, Node, SceneGraph, TriMesh};

use crate::format::AssetFormat;
use crate::registry::AssetLoader;

pub struct ObjLoader;

struct ObjObject {
    name: String,
    faces: Vec<Vec<usize>>,
}

impl AssetLoader for ObjLoader {
    fn formats(&self) -> &[AssetFormat] {
        &[AssetFormat::Obj]
    }

    fn load(&self, data: &[u8]) -> Result<LoadedScene, LoadError> {
        let text = std::str::from_utf8(data)
            .map_err(|err| LoadError::Malformed(format!("OBJ is not UTF-8: {err}")))?;
        let (positions, objects) = parse_obj(text)?;

        let objects: Vec<ObjObject> = objects
            .into_iter()
            .filter(|object| !object.faces.is_empty())
            .collect();
        if objects.is_empty() {
            return Ok(LoadedScene::default());
        }

        let mut graph = SceneGraph::new(Node::group("obj"));
        for object in objects {
            let mesh = compact_mesh(&positions, &object)?;
            graph
                .add_child(graph.root(), Node::mesh(object.name, mesh))
                .map_err(|err| LoadError::Malformed(err.to_string()))?;
        }
        Ok(LoadedScene {
            graph: Some(graph),
            clips: Vec::new(),
        })
    }
}

fn parse_obj(text: &str) -> Result<(Vec<Vec3>, Vec<ObjObject>), LoadError> {
    let mut positions = Vec::new();
    let mut objects = vec![ObjObject {
        name: "default".to_string(),
        faces: Vec::new(),
    }];

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        match keyword {
            "v" => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(|value| value.parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|err| malformed(line_no, &err.to_string()))?;
                if coords.len() != 3 {
                    return Err(malformed(line_no, "vertex needs three coordinates"));
                }
                positions.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let mut face = Vec::new();
                for token in parts {
                    face.push(resolve_index(token, positions.len(), line_no)?);
                }
                if face.len() < 3 {
                    return Err(malformed(line_no, "face needs at least three vertices"));
                }
                if let Some(object) = objects.last_mut() {
                    object.faces.push(face);
                }
            }
            "o" | "g" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let name = if name.is_empty() {
                    format!("object{}", objects.len())
                } else {
                    name
                };
                objects.push(ObjObject {
                    name,
                    faces: Vec::new(),
                });
            }
            _ => {}
        }
    }

    Ok((positions, objects))
}

/// OBJ indices are 1-based; negative values count back from the latest vertex.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<usize, LoadError> {
    let raw = token.split('/').next().unwrap_or("");
    let value: i64 = raw
        .parse()
        .map_err(|_| malformed(line_no, &format!("bad vertex reference {token:?}")))?;
    let index = if value > 0 {
        value - 1
    } else {
        vertex_count as i64 + value
    };
    if value == 0 || index < 0 || index >= vertex_count as i64 {
        return Err(malformed(
            line_no,
            &format!("vertex reference {token:?} out of range"),
        ));
    }
    Ok(index as usize)
}

fn compact_mesh(positions: &[Vec3], object: &ObjObject) -> Result<TriMesh, LoadError> {
    let mut remap = vec![usize::MAX; positions.len()];
    let mut local_positions = Vec::new();
    let mut faces = Vec::with_capacity(object.faces.len());
    for face in &object.faces {
        let mut local_face = Vec::with_capacity(face.len());
        for &index in face {
            if remap[index] == usize::MAX {
                remap[index] = local_positions.len();
                local_positions.push(positions[index]);
            }
            local_face.push(remap[index]);
        }
        faces.push(local_face);
    }
    TriMesh::from_polygons(local_positions, &faces)
        .map_err(|err| LoadError::Malformed(format!("{}: {err}", object.name)))
}

fn malformed(line_no: usize, message: &str) -> LoadError {
    LoadError::Malformed(format!("OBJ line {}: {message}", line_no + 1))
}
