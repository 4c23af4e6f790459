use std::collections::BTreeMap;

#[cfg(test)]
mod tests;

/// a path that was inserted into a [`PathTree`]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct PathEntry {
    pub path: String,
    pub is_dir: bool,
}

/// classifies a set of absolute paths by how they nest inside each other, without touching the disk.
///
/// Paths are compared segment by segment, so `/tmp/foobar` is never considered to be under `/tmp/foo`.
/// Every ancestor of an inserted path is part of the tree, but only inserted paths are ever reported
#[derive(Debug, Default, Clone)]
pub struct PathTree {
    root: Node,
}

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<String, Node>,
    /// `Some` if this exact path was inserted, `None` if it only exists as an ancestor
    entry: Option<PathEntry>,
}

impl PathTree {
    pub fn new() -> PathTree {
        PathTree::default()
    }

    /// adds `path` to the tree. Inserting a path that's already there replaces its `is_dir` flag
    pub fn insert(&mut self, path: &str, is_dir: bool) {
        let segments = segments(path);
        let mut node = &mut self.root;
        for segment in &segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.entry = Some(PathEntry {
            path: format!("/{}", segments.join("/")),
            is_dir,
        });
    }

    /// whether `path` itself was inserted
    pub fn contains(&self, path: &str) -> bool {
        let mut node = &self.root;
        for segment in segments(path) {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.entry.is_some()
    }

    /// the inserted paths that aren't under any other inserted path
    pub fn top_level(&self) -> PathTree {
        let mut tree = PathTree::new();
        self.root.visit_top_level(&mut |entry| tree.insert_entry(entry));
        tree
    }

    /// the inserted paths that have no inserted path under them
    pub fn leaves(&self) -> PathTree {
        let mut tree = PathTree::new();
        self.root.visit_leaves(&mut |entry| tree.insert_entry(entry));
        tree
    }

    /// only the inserted paths that aren't directories
    pub fn files(&self) -> PathTree {
        self.filtered(|entry| !entry.is_dir)
    }

    /// only the inserted paths that are directories
    pub fn directories(&self) -> PathTree {
        self.filtered(|entry| entry.is_dir)
    }

    /// the smallest set of paths such that every inserted path is one of them or somewhere under one of them
    pub fn roots(&self) -> Vec<String> {
        self.top_level().paths()
    }

    /// every inserted path, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries().into_iter().map(|it| it.path).collect();
        paths.sort();
        paths
    }

    /// every inserted path along with whether it's a directory, sorted by path
    pub fn entries(&self) -> Vec<PathEntry> {
        let mut entries: Vec<PathEntry> = Vec::new();
        self.root.visit_all(&mut |entry| entries.push(entry.clone()));
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    pub fn len(&self) -> usize {
        let mut count = 0;
        self.root.visit_all(&mut |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, predicate: impl Fn(&PathEntry) -> bool) -> PathTree {
        let mut tree = PathTree::new();
        self.root.visit_all(&mut |entry| {
            if predicate(entry) {
                tree.insert_entry(entry);
            }
        });
        tree
    }

    fn insert_entry(&mut self, entry: &PathEntry) {
        self.insert(&entry.path, entry.is_dir);
    }
}

impl Node {
    fn visit_all(&self, visitor: &mut impl FnMut(&PathEntry)) {
        if let Some(entry) = &self.entry {
            visitor(entry);
        }
        for child in self.children.values() {
            child.visit_all(visitor);
        }
    }

    fn visit_top_level(&self, visitor: &mut impl FnMut(&PathEntry)) {
        if let Some(entry) = &self.entry {
            visitor(entry);
            return;
        }
        for child in self.children.values() {
            child.visit_top_level(visitor);
        }
    }

    /// returns whether anything at or under this node was inserted
    fn visit_leaves(&self, visitor: &mut impl FnMut(&PathEntry)) -> bool {
        let mut found_below = false;
        for child in self.children.values() {
            found_below |= child.visit_leaves(visitor);
        }
        match &self.entry {
            Some(entry) if !found_below => {
                visitor(entry);
                true
            }
            Some(_) => true,
            None => found_below,
        }
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|it| !it.is_empty()).collect()
}
