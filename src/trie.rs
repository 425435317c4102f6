//! Path-matching trie.
//!
//! One node per path segment. A pattern like `/p/:lang/doc` becomes a chain
//! of three nodes sharing prefixes with previously inserted patterns; the
//! final node records the full pattern, which is what distinguishes a
//! registered route from a mere prefix of one.
//!
//! Two segment forms are dynamic:
//!
//! - `:name` matches exactly one concrete segment
//! - `*name` matches the entire remainder of the path, slashes included,
//!   and must be the last segment of its pattern

/// One segment of the routing tree.
#[derive(Debug)]
pub(crate) struct Node {
    /// The segment text this node represents, e.g. `xpy`, `:name`, `*rest`.
    part: String,
    /// The full registration pattern. Set only on terminal nodes.
    pattern: Option<String>,
    /// True iff `part` starts with `:` or `*`.
    is_wild: bool,
    /// Insertion order is significant: it is the order children are tried
    /// when more than one structurally matches a segment.
    children: Vec<Node>,
}

/// Splits a pattern or concrete path into segments.
///
/// Empty segments are dropped, so leading, trailing, and duplicate slashes
/// collapse. Decomposition stops right after a `*` segment — anything
/// following a wildcard is unreachable.
pub(crate) fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/') {
        if item.is_empty() {
            continue;
        }
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new("")
    }

    fn new(part: &str) -> Self {
        Self {
            part: part.to_owned(),
            pattern: None,
            is_wild: part.starts_with(':') || part.starts_with('*'),
            children: Vec::new(),
        }
    }

    /// The pattern registered at this node, if it is a terminal.
    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Inserts `pattern` (already decomposed into `parts`) below this node.
    ///
    /// Descends one segment per level, reusing the first child whose part
    /// matches exactly or is wild, and creating a child when none does.
    /// Once every segment is consumed the current node becomes the
    /// pattern's terminal. Re-inserting an identical pattern changes
    /// nothing about the tree shape.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if height == parts.len() {
            self.pattern = Some(pattern.to_owned());
            return;
        }

        let part = parts[height];
        let matched = self
            .children
            .iter()
            .position(|child| child.part == part || child.is_wild)
            .unwrap_or_else(|| {
                self.children.push(Node::new(part));
                self.children.len() - 1
            });
        self.children[matched].insert(pattern, parts, height + 1);
    }

    /// Finds the terminal node matching the decomposed request path.
    ///
    /// Terminates when every request segment is consumed or this node is a
    /// `*` wildcard (which swallows the remainder at any depth); either way
    /// the node only matches if a pattern was registered on it.
    ///
    /// Otherwise every structurally matching child — exact part equality or
    /// wild — is tried depth-first in insertion order, and the first one
    /// leading to a registered terminal wins. All candidates must be
    /// explored because a literal child and a wildcard sibling can both
    /// match the same segment, and only deeper levels can tell which of
    /// them reaches an actual route.
    pub(crate) fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if height == parts.len() || self.part.starts_with('*') {
            return self.pattern.is_some().then_some(self);
        }

        let part = parts[height];
        self.children
            .iter()
            .filter(|child| child.part == part || child.is_wild)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Pre-order collection of every terminal node under this one.
    pub(crate) fn travel<'n>(&'n self, list: &mut Vec<&'n Node>) {
        if self.pattern.is_some() {
            list.push(self);
        }
        for child in &self.children {
            child.travel(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(patterns: &[&str]) -> Node {
        let mut root = Node::root();
        for pattern in patterns {
            let parts = parse_pattern(pattern);
            root.insert(pattern, &parts, 0);
        }
        root
    }

    fn find<'n>(root: &'n Node, path: &str) -> Option<&'n str> {
        let parts = parse_pattern(path);
        root.search(&parts, 0).and_then(Node::pattern)
    }

    #[test]
    fn parse_pattern_splits_on_slashes() {
        assert_eq!(parse_pattern("/dhy/xpy/:name"), vec!["dhy", "xpy", ":name"]);
        assert_eq!(parse_pattern("/hello"), vec!["hello"]);
        assert_eq!(parse_pattern("/"), Vec::<&str>::new());
        assert_eq!(parse_pattern(""), Vec::<&str>::new());
    }

    #[test]
    fn parse_pattern_collapses_extra_slashes() {
        assert_eq!(parse_pattern("//dhy///xpy/"), vec!["dhy", "xpy"]);
    }

    #[test]
    fn parse_pattern_truncates_after_wildcard() {
        assert_eq!(parse_pattern("/dhy/*xpy/hhh"), vec!["dhy", "*xpy"]);
        assert_eq!(parse_pattern("/*"), vec!["*"]);
    }

    #[test]
    fn literal_and_param_routes_resolve() {
        let root = build(&["/", "/hello/:name", "/hello/world/doc"]);

        assert_eq!(find(&root, "/"), Some("/"));
        assert_eq!(find(&root, "/hello/alice"), Some("/hello/:name"));
        assert_eq!(find(&root, "/hello/world/doc"), Some("/hello/world/doc"));
    }

    #[test]
    fn prefix_without_registration_is_not_found() {
        let root = build(&["/a/b/c"]);

        assert_eq!(find(&root, "/a/b"), None);
        assert_eq!(find(&root, "/a/b/c/d"), None);
        assert_eq!(find(&root, "/a/b/c"), Some("/a/b/c"));
    }

    #[test]
    fn wildcard_consumes_remaining_segments() {
        let root = build(&["/assets/*filepath"]);

        assert_eq!(find(&root, "/assets/css/a.css"), Some("/assets/*filepath"));
        assert_eq!(find(&root, "/assets/x"), Some("/assets/*filepath"));
        // the wildcard needs at least one segment to consume
        assert_eq!(find(&root, "/assets"), None);
    }

    #[test]
    fn all_matching_children_are_explored() {
        // "/a/b" matches both the literal `b` child and the `:x` child; only
        // the deeper recursion can tell that the route lives under `:x`.
        let root = build(&["/a/b", "/a/:x/c"]);

        assert_eq!(find(&root, "/a/b"), Some("/a/b"));
        assert_eq!(find(&root, "/a/b/c"), Some("/a/:x/c"));
        assert_eq!(find(&root, "/a/z/c"), Some("/a/:x/c"));
    }

    #[test]
    fn reinsert_keeps_tree_shape() {
        let mut root = build(&["/hello/:name"]);
        let parts = parse_pattern("/hello/:name");
        root.insert("/hello/:name", &parts, 0);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(find(&root, "/hello/x"), Some("/hello/:name"));
    }

    #[test]
    fn travel_lists_every_terminal() {
        let root = build(&["/", "/hello/:name", "/assets/*filepath"]);

        let mut list = Vec::new();
        root.travel(&mut list);
        let mut patterns: Vec<_> = list.iter().filter_map(|n| n.pattern()).collect();
        patterns.sort_unstable();

        assert_eq!(patterns, vec!["/", "/assets/*filepath", "/hello/:name"]);
    }
}
