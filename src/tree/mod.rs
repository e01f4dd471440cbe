use crate::error::SamplerRipResult;
use crate::generalized::Sample;
use crate::tree::error::{TreeError, TreeResult};
use crate::tree::info::InfoItem;
use crate::tree::names::{make_export_names, make_safe_names};
use log::{debug, warn};

pub mod error;
pub mod export;
pub mod info;
pub mod names;
pub mod path;

/// Decodes the children of a directory node on first access.
pub type Realizer = Box<dyn FnOnce() -> SamplerRipResult<Vec<Element>>>;

/// Anything `ls` can print details for.
pub trait Describe {
    fn describe(&self) -> InfoItem;
}

/// A leaf that can be decoded into format independent audio.
pub trait SampleElement: Describe {
    fn to_generalized(&self) -> SamplerRipResult<Sample>;
}

pub enum Payload {
    Directory(Realizer),
    Sample(Box<dyn SampleElement>),
    Program(Box<dyn Describe>),
}

/// A freshly decoded entity, not yet attached to a tree.
pub struct Element {
    pub name: String,
    pub type_name: String,
    pub payload: Payload,
}

impl Element {
    pub fn directory(
        name: impl Into<String>,
        type_name: impl Into<String>,
        realizer: impl FnOnce() -> SamplerRipResult<Vec<Element>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            payload: Payload::Directory(Box::new(realizer)),
        }
    }

    pub fn sample(
        name: impl Into<String>,
        type_name: impl Into<String>,
        sample: impl SampleElement + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            payload: Payload::Sample(Box::new(sample)),
        }
    }

    pub fn program(
        name: impl Into<String>,
        type_name: impl Into<String>,
        program: impl Describe + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            payload: Payload::Program(Box::new(program)),
        }
    }

    fn is_file(&self) -> bool {
        !matches!(self.payload, Payload::Directory(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Directory,
    SampleLeaf,
    ProgramLeaf,
}

enum ChildCell {
    Pending(Realizer),
    Realized(Vec<NodeId>),
    Failed(String),
}

enum Leaf {
    Sample(Box<dyn SampleElement>),
    Program(Box<dyn Describe>),
}

struct Node {
    name: String,
    type_name: String,
    safe_name: String,
    export_name: String,
    parent: Option<NodeId>,
    children: Option<ChildCell>,
    leaf: Option<Leaf>,
}

/// Image specific behavior applied while walking a tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeOptions {
    /// Normalizes a path token before comparing it with a safe name.
    pub sanitizer: fn(&str) -> String,
    /// Whether `X L`/`X R` sample pairs are merged on export.
    pub combine_stereo: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sanitizer: |token| token.trim().to_string(),
            combine_stereo: true,
        }
    }
}

/// Arena of lazily realized nodes.
pub struct Tree {
    nodes: Vec<Node>,
    options: TreeOptions,
}

impl Tree {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        realizer: impl FnOnce() -> SamplerRipResult<Vec<Element>> + 'static,
        options: TreeOptions,
    ) -> Self {
        let name = name.into();
        let root = Node {
            safe_name: name.clone(),
            export_name: name.clone(),
            name,
            type_name: type_name.into(),
            parent: None,
            children: Some(ChildCell::Pending(Box::new(realizer))),
            leaf: None,
        };
        Self {
            nodes: vec![root],
            options,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn sanitize(&self, token: &str) -> String {
        (self.options.sanitizer)(token)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn safe_name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].safe_name
    }

    pub fn export_name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].export_name
    }

    pub fn type_name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].type_name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn kind(&self, id: NodeId) -> ElementKind {
        match &self.nodes[id.0].leaf {
            None => ElementKind::Directory,
            Some(Leaf::Sample(_)) => ElementKind::SampleLeaf,
            Some(Leaf::Program(_)) => ElementKind::ProgramLeaf,
        }
    }

    pub fn is_traversable(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_some()
    }

    pub fn sample(&self, id: NodeId) -> Option<&dyn SampleElement> {
        match &self.nodes[id.0].leaf {
            Some(Leaf::Sample(sample)) => Some(sample.as_ref()),
            _ => None,
        }
    }

    pub fn describe(&self, id: NodeId) -> Option<InfoItem> {
        match &self.nodes[id.0].leaf {
            Some(Leaf::Sample(sample)) => Some(sample.describe()),
            Some(Leaf::Program(program)) => Some(program.describe()),
            None => None,
        }
    }

    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root() {
                break;
            }
            chain.push(node);
            current = self.parent(node);
        }
        chain.reverse();
        chain
    }

    /// Safe names from below the root down to `id`. The root has an empty path.
    pub fn path(&self, id: NodeId) -> Vec<String> {
        self.ancestors(id)
            .into_iter()
            .map(|node| self.safe_name(node).to_string())
            .collect()
    }

    /// Export names of the directories between the root and `id`, both excluded.
    pub fn export_dir(&self, id: NodeId) -> Vec<String> {
        let mut chain = self.ancestors(id);
        chain.pop();
        chain
            .into_iter()
            .map(|node| self.export_name(node).to_string())
            .collect()
    }

    /// Realizes the children of `id` on first call and returns the memoized list afterwards.
    pub fn children(&mut self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let cell = self.nodes[id.0]
            .children
            .take()
            .ok_or_else(|| TreeError::NotTraversable(self.nodes[id.0].safe_name.clone()))?;

        let (cell, result) = match cell {
            ChildCell::Realized(ids) => (ChildCell::Realized(ids.clone()), Ok(ids)),
            ChildCell::Failed(reason) => {
                let err = TreeError::RealizationFailed {
                    name: self.nodes[id.0].name.clone(),
                    reason: reason.clone(),
                };
                (ChildCell::Failed(reason), Err(err))
            }
            ChildCell::Pending(realizer) => {
                debug!("Realizing children of {}", self.nodes[id.0].name);
                match realizer().map_err(|e| e.to_string()).and_then(|elements| {
                    self.attach(id, elements).map_err(|e| e.to_string())
                }) {
                    Ok(ids) => (ChildCell::Realized(ids.clone()), Ok(ids)),
                    Err(reason) => {
                        warn!("Could not read {}: {}", self.nodes[id.0].name, reason);
                        let err = TreeError::RealizationFailed {
                            name: self.nodes[id.0].name.clone(),
                            reason: reason.clone(),
                        };
                        (ChildCell::Failed(reason), Err(err))
                    }
                }
            }
        };

        self.nodes[id.0].children = Some(cell);
        result
    }

    fn attach(&mut self, parent: NodeId, elements: Vec<Element>) -> TreeResult<Vec<NodeId>> {
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        let safe_names = make_safe_names(&names)?;
        let export_inputs: Vec<(&str, bool)> = elements
            .iter()
            .map(|e| (e.name.as_str(), e.is_file()))
            .collect();
        let export_names = make_export_names(&export_inputs)?;

        let mut ids = Vec::with_capacity(elements.len());
        let named = elements.into_iter().zip(safe_names).zip(export_names);
        for ((element, safe_name), export_name) in named {
            let (children, leaf) = match element.payload {
                Payload::Directory(realizer) => (Some(ChildCell::Pending(realizer)), None),
                Payload::Sample(sample) => (None, Some(Leaf::Sample(sample))),
                Payload::Program(program) => (None, Some(Leaf::Program(program))),
            };
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                name: element.name,
                type_name: element.type_name,
                safe_name,
                export_name,
                parent: Some(parent),
                children,
                leaf,
            });
            ids.push(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::SamplerRipError;
    use std::cell::Cell;
    use std::rc::Rc;

    pub(crate) struct Note(pub &'static str);

    impl Describe for Note {
        fn describe(&self) -> InfoItem {
            InfoItem::map().with("note", self.0)
        }
    }

    pub(crate) fn two_level_tree(calls: Rc<Cell<usize>>) -> Tree {
        Tree::new(
            "image",
            "Image",
            move || {
                calls.set(calls.get() + 1);
                Ok(vec![
                    Element::directory("A:", "Partition", || {
                        Ok(vec![
                            Element::program("PIANO", "Program", Note("piano")),
                            Element::program("PIANO", "Program", Note("second piano")),
                        ])
                    }),
                    Element::directory("B:", "Partition", || {
                        Err(SamplerRipError::Tree(TreeError::NotTraversable("B:".into())))
                    }),
                ])
            },
            TreeOptions::default(),
        )
    }

    #[test]
    fn children_are_realized_once() {
        let calls = Rc::new(Cell::new(0));
        let mut tree = two_level_tree(calls.clone());
        let first = tree.children(tree.root()).unwrap();
        let second = tree.children(tree.root()).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn nodes_know_their_path() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        assert!(tree.path(tree.root()).is_empty());

        let partitions = tree.children(tree.root()).unwrap();
        let programs = tree.children(partitions[0]).unwrap();
        assert_eq!(tree.path(programs[1]), vec!["A:", "PIANO (2)"]);
        assert_eq!(tree.export_dir(programs[1]), vec!["A"]);
        assert_eq!(tree.parent(programs[1]), Some(partitions[0]));
        assert_eq!(tree.kind(programs[0]), ElementKind::ProgramLeaf);
        assert_eq!(
            tree.describe(programs[1]),
            Some(InfoItem::map().with("note", "second piano"))
        );
    }

    #[test]
    fn leaves_are_not_traversable() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        let partitions = tree.children(tree.root()).unwrap();
        let programs = tree.children(partitions[0]).unwrap();
        assert!(!tree.is_traversable(programs[0]));
        assert!(matches!(
            tree.children(programs[0]),
            Err(TreeError::NotTraversable(_))
        ));
    }

    #[test]
    fn failed_realization_is_remembered() {
        let mut tree = two_level_tree(Rc::new(Cell::new(0)));
        let partitions = tree.children(tree.root()).unwrap();
        assert!(matches!(
            tree.children(partitions[1]),
            Err(TreeError::RealizationFailed { .. })
        ));
        assert!(matches!(
            tree.children(partitions[1]),
            Err(TreeError::RealizationFailed { .. })
        ));
    }
}
