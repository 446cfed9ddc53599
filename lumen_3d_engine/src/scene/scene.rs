/// Scene: an arena of nodes under one root.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Parent and child
/// links are keys into the same arena. A node is created detached, attached
/// with `add`, detached with `remove` and freed, with its subtree, by
/// `destroy`.

use glam::{Mat4, Vec3};
use slotmap::SlotMap;
use crate::error::{Error, Result};
use super::{Light, Node, NodeId, NodeKey, NodeKind};

pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

fn unknown(key: NodeKey) -> Error {
    Error::InvalidResource(format!("Node {:?} not found in scene", key))
}

impl Scene {
    /// Create a scene holding only its root group node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group().with_name("root"));
        Self { nodes, root }
    }

    /// Key of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Identity of the scene (the root node's id)
    pub fn id(&self) -> NodeId {
        self.nodes[self.root].id()
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    // ===== CREATION =====

    /// Insert a detached node
    pub fn create(&mut self, node: Node) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Insert a node and attach it under `parent`
    pub fn spawn(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey> {
        if !self.contains(parent) {
            return Err(unknown(parent));
        }
        let key = self.create(node);
        self.add(parent, key)?;
        Ok(key)
    }

    // ===== HIERARCHY =====

    /// Attach `child` at the end of `parent`'s children
    ///
    /// Re-adding an existing child is a no-op. A child attached elsewhere is
    /// detached from its old parent first.
    ///
    /// # Errors
    ///
    /// `InvalidResource` for unknown keys, or when `parent` is `child` or
    /// one of its descendants.
    pub fn add(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.contains(parent) {
            return Err(unknown(parent));
        }
        let old_parent = self.nodes.get(child).ok_or_else(|| unknown(child))?.parent;

        if old_parent == Some(parent) {
            return Ok(());
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::InvalidResource(format!(
                "Adding {:?} under {:?} would create a cycle",
                child, parent
            )));
        }

        if let Some(old_parent) = old_parent {
            self.remove(old_parent, child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`
    ///
    /// Returns false, and changes nothing, when `child` is not a child of
    /// `parent`.
    pub fn remove(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(index) = parent_node.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent_node.children.remove(index);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        true
    }

    /// Detach `key` and free it together with its whole subtree
    ///
    /// # Errors
    ///
    /// `InvalidResource` for an unknown key or the root.
    pub fn destroy(&mut self, key: NodeKey) -> Result<()> {
        if key == self.root {
            return Err(Error::InvalidResource("The scene root cannot be destroyed".to_string()));
        }
        let parent = self.nodes.get(key).ok_or_else(|| unknown(key))?.parent;
        if let Some(parent) = parent {
            self.remove(parent, key);
        }

        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.nodes.get(key).and_then(|n| n.parent);
        }
        false
    }

    // ===== TRAVERSAL =====

    /// Depth-first pre-order walk starting at `from`
    ///
    /// Parents are visited before their children, children in insertion
    /// order. Unknown keys visit nothing.
    pub fn traverse<'s, F>(&'s self, from: NodeKey, mut visit: F)
    where
        F: FnMut(NodeKey, &'s Node),
    {
        self.walk(from, false, &mut visit);
    }

    /// Same as `traverse`, skipping invisible nodes and their subtrees
    pub fn traverse_visible<'s, F>(&'s self, from: NodeKey, mut visit: F)
    where
        F: FnMut(NodeKey, &'s Node),
    {
        self.walk(from, true, &mut visit);
    }

    fn walk<'s, F>(&'s self, from: NodeKey, visible_only: bool, visit: &mut F)
    where
        F: FnMut(NodeKey, &'s Node),
    {
        let mut stack = vec![from];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if visible_only && !node.visible {
                continue;
            }
            visit(key, node);
            stack.extend(node.children.iter().rev());
        }
    }

    // ===== TRANSFORMS =====

    /// Refresh local and world matrices of `key` and its subtree
    ///
    /// The parent's world matrix is taken as is; ancestors must already be
    /// up to date.
    pub fn update_world_matrix(&mut self, key: NodeKey) -> Result<()> {
        let parent = self.nodes.get(key).ok_or_else(|| unknown(key))?.parent;
        let parent_world = parent.and_then(|p| self.nodes.get(p)).map(|p| *p.transform.world_matrix());

        let mut stack: Vec<(NodeKey, Option<Mat4>)> = vec![(key, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            node.transform.update_world(parent_world.as_ref());
            let world = *node.transform.world_matrix();
            stack.extend(node.children.iter().map(|&c| (c, Some(world))));
        }
        Ok(())
    }

    /// Refresh every world matrix, top-down from the root
    ///
    /// Must run once per frame before anything reads world matrices.
    pub fn update_world_matrices(&mut self) {
        // the root always exists
        let _ = self.update_world_matrix(self.root);
    }

    /// Orient `key` towards `target` then refresh its subtree
    ///
    /// See `Transform::look_at` for the orientation convention and the
    /// degenerate inputs.
    pub fn look_at(&mut self, key: NodeKey, target: Vec3) -> Result<()> {
        self.nodes.get_mut(key).ok_or_else(|| unknown(key))?.transform.look_at(target);
        self.update_world_matrix(key)
    }

    // ===== QUERIES =====

    /// Every light under the root, in traversal order
    ///
    /// Recomputed on each call. Invisible lights are included.
    pub fn lights(&self) -> Vec<(NodeKey, &Light)> {
        let mut lights = Vec::new();
        self.traverse(self.root, |key, node| {
            if let NodeKind::Light(light) = &node.kind {
                lights.push((key, light));
            }
        });
        lights
    }

    /// Keys of every mesh node under the root, in traversal order
    pub fn meshes(&self) -> Vec<NodeKey> {
        let mut meshes = Vec::new();
        self.traverse(self.root, |key, node| {
            if node.as_mesh().is_some() {
                meshes.push(key);
            }
        });
        meshes
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
