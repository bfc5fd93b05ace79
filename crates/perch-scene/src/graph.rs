use perch_geometry::{Aabb, Mat4, Transform};

use crate::mesh::TriMesh;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioSource {
    pub uri: String,
    pub looping: bool,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(TriMesh),
    Audio(AudioSource),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: TriMesh) -> Self {
        Self::new(name, NodeKind::Mesh(mesh))
    }

    pub fn audio(name: impl Into<String>, source: AudioSource) -> Self {
        Self::new(name, NodeKind::Audio(source))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&TriMesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioSource> {
        match &self.kind {
            NodeKind::Audio(source) => Some(source),
            _ => None,
        }
    }
}

/// Node arena. Nodes are only ever appended under an existing parent, so the
/// tree stays acyclic and every parent id is smaller than its children's.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(Error::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let matrix = match node.parent {
                Some(parent) => world[parent.0] * local,
                None => local,
            };
            world.push(matrix);
        }
        world
    }

    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut matrix = self.nodes.get(id.0)?.transform.matrix();
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            let node = &self.nodes[parent.0];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let world = self.world_matrices();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| {
                let bounds = node.as_mesh()?.bounds?;
                Some(bounds.transformed(&world[idx]))
            })
            .fold(None, |acc, bounds| Aabb::merge(acc, Some(bounds)))
    }
}
