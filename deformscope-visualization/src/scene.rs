//! Retained scene tree
//!
//! Renderables are built once and then shared behind [`Rc`]; only the group
//! they are attached to is mutated afterwards. Detaching compares nodes by
//! identity, never by value, so two structurally equal subtrees built from
//! different clouds stay distinct.

use std::collections::BTreeMap;
use std::rc::Rc;

use deformscope_core::{expand_bounds, Drawable, Point3f};

use crate::geometry::PointGeometry;
use crate::shapes::{Shape, ShapeDrawable};

/// Fixed-function rendering modes a state set can override
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Lighting,
}

/// Value of a mode override
///
/// The tree only stores the `protected` flag. It tells the rendering backend
/// not to let state sets further down the tree override this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeValue {
    pub enabled: bool,
    pub protected: bool,
}

impl ModeValue {
    pub const ON: Self = Self { enabled: true, protected: false };
    pub const OFF: Self = Self { enabled: false, protected: false };

    pub const fn protected(self) -> Self {
        Self { protected: true, ..self }
    }
}

/// Render state attached to a group or geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSet {
    modes: BTreeMap<Mode, ModeValue>,
    point_size: Option<f32>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: Mode, value: ModeValue) {
        self.modes.insert(mode, value);
    }

    pub fn mode(&self, mode: Mode) -> Option<ModeValue> {
        self.modes.get(&mode).copied()
    }

    pub fn modes(&self) -> impl Iterator<Item = (Mode, ModeValue)> + '_ {
        self.modes.iter().map(|(&mode, &value)| (mode, value))
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.point_size = Some(size);
    }

    pub fn point_size(&self) -> Option<f32> {
        self.point_size
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty() && self.point_size.is_none()
    }
}

/// Something a leaf node can draw
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Points(PointGeometry),
    Shape(ShapeDrawable),
}

/// Leaf node holding drawables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geode {
    name: String,
    primitives: Vec<Primitive>,
}

impl Geode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: Vec::new(),
        }
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.add_primitive(primitive);
        self
    }

    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// The first point geometry, if any
    pub fn point_geometry(&self) -> Option<&PointGeometry> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Points(geometry) => Some(geometry),
            Primitive::Shape(_) => None,
        })
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeDrawable> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Shape(shape) => Some(shape),
            Primitive::Points(_) => None,
        })
    }
}

/// Interior node with shared children
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    children: Vec<Rc<SceneNode>>,
    state_set: StateSet,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a child and return the shared handle to it
    pub fn add_child(&mut self, child: impl Into<Rc<SceneNode>>) -> Rc<SceneNode> {
        let child = child.into();
        self.children.push(Rc::clone(&child));
        child
    }

    /// Detach `child` by identity, returning whether it was attached
    pub fn remove_child(&mut self, child: &Rc<SceneNode>) -> bool {
        match self.children.iter().position(|c| Rc::ptr_eq(c, child)) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains_child(&self, child: &Rc<SceneNode>) -> bool {
        self.children.iter().any(|c| Rc::ptr_eq(c, child))
    }

    pub fn children(&self) -> &[Rc<SceneNode>] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn child_by_name(&self, name: &str) -> Option<&Rc<SceneNode>> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn state_set(&self) -> &StateSet {
        &self.state_set
    }

    pub fn state_set_mut(&mut self) -> &mut StateSet {
        &mut self.state_set
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.state_set == other.state_set
            && self.children.len() == other.children.len()
            && self.children.iter().zip(&other.children).all(|(a, b)| a == b)
    }
}

/// A node of the scene tree
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group(Group),
    Geode(Geode),
}

impl SceneNode {
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Group(group) => group.name(),
            SceneNode::Geode(geode) => geode.name(),
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            SceneNode::Group(group) => Some(group),
            SceneNode::Geode(_) => None,
        }
    }

    pub fn as_geode(&self) -> Option<&Geode> {
        match self {
            SceneNode::Geode(geode) => Some(geode),
            SceneNode::Group(_) => None,
        }
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SceneNode)) {
        visit(self);
        if let SceneNode::Group(group) = self {
            for child in group.children() {
                child.walk(visit);
            }
        }
    }

    /// Count what this subtree would draw
    pub fn stats(&self) -> SceneStats {
        let mut stats = SceneStats::default();
        self.walk(&mut |node| stats.record(node));
        stats
    }
}

impl From<Group> for SceneNode {
    fn from(group: Group) -> Self {
        SceneNode::Group(group)
    }
}

impl From<Geode> for SceneNode {
    fn from(geode: Geode) -> Self {
        SceneNode::Geode(geode)
    }
}

impl From<Group> for Rc<SceneNode> {
    fn from(group: Group) -> Self {
        Rc::new(SceneNode::Group(group))
    }
}

impl From<Geode> for Rc<SceneNode> {
    fn from(geode: Geode) -> Self {
        Rc::new(SceneNode::Geode(geode))
    }
}

/// Summary of a subtree's contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub groups: usize,
    pub geodes: usize,
    pub vertices: usize,
    pub spheres: usize,
    pub cylinders: usize,
}

impl SceneStats {
    fn record(&mut self, node: &SceneNode) {
        let geode = match node {
            SceneNode::Group(_) => {
                self.groups += 1;
                return;
            }
            SceneNode::Geode(geode) => geode,
        };

        self.geodes += 1;
        for primitive in geode.primitives() {
            match primitive {
                Primitive::Points(geometry) => self.vertices += geometry.vertex_count(),
                Primitive::Shape(drawable) => match drawable.shape {
                    Shape::Sphere(_) => self.spheres += 1,
                    Shape::Cylinder(_) => self.cylinders += 1,
                },
            }
        }
    }
}

fn subtree_bounds(node: &SceneNode) -> Option<(Point3f, Point3f)> {
    let mut bounds = None;
    node.walk(&mut |node| {
        let Some(geode) = node.as_geode() else {
            return;
        };
        for primitive in geode.primitives() {
            match primitive {
                Primitive::Points(geometry) => {
                    for vertex in geometry.vertices() {
                        bounds = Some(expand_bounds(bounds, vertex.position()));
                    }
                }
                Primitive::Shape(drawable) => {
                    let (min, max) = drawable.shape.bounding_box();
                    bounds = Some(expand_bounds(Some(expand_bounds(bounds, min)), max));
                }
            }
        }
    });
    bounds
}

impl Drawable for SceneNode {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        subtree_bounds(self).unwrap_or((Point3f::origin(), Point3f::origin()))
    }
}

impl Drawable for Group {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        self.children
            .iter()
            .filter_map(|child| subtree_bounds(child))
            .fold(None, |bounds, (min, max)| {
                Some(expand_bounds(Some(expand_bounds(bounds, min)), max))
            })
            .unwrap_or((Point3f::origin(), Point3f::origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Sphere;
    use deformscope_core::Point;

    fn sphere_geode(name: &str, x: f32) -> Geode {
        Geode::new(name).with_primitive(Primitive::Shape(ShapeDrawable::new(
            Shape::Sphere(Sphere::new(Point3f::new(x, 0.0, 0.0), 1.0)),
            [1.0; 4],
        )))
    }

    #[test]
    fn test_remove_child_by_identity() {
        let mut root = Group::new("root");
        let first = root.add_child(sphere_geode("a", 0.0));
        let second = root.add_child(sphere_geode("a", 0.0));
        assert_eq!(root.num_children(), 2);
        assert_eq!(first, second);

        assert!(root.remove_child(&first));
        assert_eq!(root.num_children(), 1);
        assert!(root.contains_child(&second));
        assert!(!root.contains_child(&first));
        assert!(!root.remove_child(&first));
    }

    #[test]
    fn test_shared_child_outlives_detach() {
        let mut root = Group::new("root");
        let child = root.add_child(sphere_geode("a", 0.0));
        assert_eq!(Rc::strong_count(&child), 2);
        root.remove_child(&child);
        assert_eq!(Rc::strong_count(&child), 1);
    }

    #[test]
    fn test_mode_override() {
        let mut state = StateSet::new();
        assert!(state.is_empty());
        assert_eq!(state.mode(Mode::Lighting), None);

        state.set_mode(Mode::Lighting, ModeValue::ON);
        state.set_mode(Mode::Lighting, ModeValue::OFF.protected());
        assert_eq!(
            state.mode(Mode::Lighting),
            Some(ModeValue { enabled: false, protected: true })
        );
        assert_eq!(state.modes().count(), 1);
    }

    #[test]
    fn test_stats_and_names() {
        let mut graph = Group::new("graph");
        let mut nodes = Group::new("nodes");
        nodes.add_child(sphere_geode("node", 0.0));
        nodes.add_child(sphere_geode("node", 3.0));
        graph.add_child(nodes);
        graph.add_child(Group::new("edges"));
        let points = Geode::new("cloud").with_primitive(Primitive::Points(PointGeometry::from_points(&[
            Point::at(0.0, 0.0, 0.0),
        ])));
        graph.add_child(points);

        let node = SceneNode::from(graph);
        let stats = node.stats();
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.geodes, 3);
        assert_eq!(stats.spheres, 2);
        assert_eq!(stats.vertices, 1);

        let group = node.as_group().unwrap();
        assert!(group.child_by_name("edges").is_some());
        assert!(group.child_by_name("missing").is_none());
    }

    #[test]
    fn test_bounding_box_covers_shapes() {
        let mut root = Group::new("root");
        root.add_child(sphere_geode("a", 0.0));
        root.add_child(sphere_geode("b", 4.0));
        root.add_child(Group::new("empty"));

        let (min, max) = root.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Point3f::new(5.0, 1.0, 1.0));
    }
}
