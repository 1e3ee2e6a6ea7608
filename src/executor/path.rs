use std::sync::Arc;

/// One segment of a response path: a response key or a list index.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The response path of a datum: an immutable linked list of segments,
/// structurally shared between siblings and flattened only at emission.
#[derive(Clone, Debug, Default)]
pub struct ResponsePath {
    node: Option<Arc<PathNode>>,
}

#[derive(Debug)]
struct PathNode {
    segment: PathSegment,
    parent: ResponsePath,
}

impl ResponsePath {
    /// The empty path, addressing the response root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extends this path with a response key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.append(PathSegment::Key(key.into()))
    }

    /// Extends this path with a list index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.append(PathSegment::Index(index))
    }

    fn append(&self, segment: PathSegment) -> Self {
        Self {
            node: Some(Arc::new(PathNode {
                segment,
                parent: self.clone(),
            })),
        }
    }

    /// Flattens this path into root-first segment order.
    pub fn to_vec(&self) -> Vec<PathSegment> {
        let mut acc = Vec::new();
        self.construct(&mut acc);
        acc
    }

    fn construct(&self, acc: &mut Vec<PathSegment>) {
        if let Some(node) = &self.node {
            node.parent.construct(acc);
            acc.push(node.segment.clone());
        }
    }
}
