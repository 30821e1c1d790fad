// Suite tree - arena of scopes (suites) and the tests they contain

use std::path::PathBuf;

use serde::Serialize;

use crate::state::TestRecord;

/// Index of a test in a [`SuiteTree`]. Only valid for the tree that issued it;
/// looking it up in another tree may panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TestId(pub(crate) usize);

/// Index of a scope in a [`SuiteTree`]. Only valid for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub(crate) usize);

/// A suite (describe block, file, fixture group...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    pub title: String,
    pub parent: Option<ScopeId>,
    pub file: Option<PathBuf>,
    pub scopes: Vec<ScopeId>,
    pub tests: Vec<TestId>,
}

/// Scopes and tests of one run. The root scope has an empty title.
///
/// Lookups index directly by id and panic on an id issued by a different tree.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteTree {
    scopes: Vec<Scope>,
    tests: Vec<TestRecord>,
}

impl Default for SuiteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                title: String::new(),
                parent: None,
                file: None,
                scopes: Vec::new(),
                tests: Vec::new(),
            }],
            tests: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn is_root(&self, scope: ScopeId) -> bool {
        scope.0 == 0
    }

    /// Add a child scope under `parent`
    pub fn add_scope(&mut self, parent: ScopeId, title: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let file = self.scopes[parent.0].file.clone();
        self.scopes.push(Scope {
            title: title.into(),
            parent: Some(parent),
            file,
            scopes: Vec::new(),
            tests: Vec::new(),
        });
        self.scopes[parent.0].scopes.push(id);
        id
    }

    /// Add a test to `scope`. The test inherits the scope's file.
    pub fn add_test(&mut self, scope: ScopeId, title: impl Into<String>) -> TestId {
        let id = TestId(self.tests.len());
        let mut record = TestRecord::new(id, scope, title);
        record.file = self.scopes[scope.0].file.clone();
        self.tests.push(record);
        self.scopes[scope.0].tests.push(id);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn test(&self, id: TestId) -> &TestRecord {
        &self.tests[id.0]
    }

    pub fn test_mut(&mut self, id: TestId) -> &mut TestRecord {
        &mut self.tests[id.0]
    }

    pub fn tests(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests.iter()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Titles from the outermost non-root scope down to `scope`, joined by spaces
    pub fn scope_full_title(&self, scope: ScopeId) -> String {
        let mut titles = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id.0];
            if !s.title.is_empty() {
                titles.push(s.title.as_str());
            }
            current = s.parent;
        }
        titles.reverse();
        titles.join(" ")
    }

    /// Scope full title followed by the test's own title
    pub fn full_title(&self, test: TestId) -> String {
        let record = &self.tests[test.0];
        let parent = self.scope_full_title(record.scope);
        if parent.is_empty() {
            record.title.clone()
        } else {
            format!("{} {}", parent, record.title)
        }
    }

    /// Every test nested in `scope`: the scope's own tests first, then each child scope in order
    pub fn each_test(&self, scope: ScopeId) -> Vec<TestId> {
        let mut out = Vec::new();
        self.collect_tests(scope, &mut out);
        out
    }

    fn collect_tests(&self, scope: ScopeId, out: &mut Vec<TestId>) {
        let s = &self.scopes[scope.0];
        out.extend(s.tests.iter().copied());
        for child in &s.scopes {
            self.collect_tests(*child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SuiteTree, ScopeId, ScopeId, TestId, TestId, TestId) {
        let mut tree = SuiteTree::new();
        let outer = tree.add_scope(tree.root(), "Suite X");
        let inner = tree.add_scope(outer, "nested");
        let t_inner = tree.add_test(inner, "deep");
        let t1 = tree.add_test(outer, "T1");
        let t2 = tree.add_test(outer, "T2");
        (tree, outer, inner, t1, t2, t_inner)
    }

    #[test]
    fn test_full_title_skips_root() {
        let (tree, outer, inner, t1, _, t_inner) = sample();
        assert_eq!(tree.scope_full_title(tree.root()), "");
        assert_eq!(tree.scope_full_title(outer), "Suite X");
        assert_eq!(tree.scope_full_title(inner), "Suite X nested");
        assert_eq!(tree.full_title(t1), "Suite X T1");
        assert_eq!(tree.full_title(t_inner), "Suite X nested deep");
    }

    #[test]
    fn test_each_test_visits_own_tests_before_children() {
        let (tree, outer, _, t1, t2, t_inner) = sample();
        assert_eq!(tree.each_test(outer), vec![t1, t2, t_inner]);
        assert_eq!(tree.each_test(tree.root()), vec![t1, t2, t_inner]);
    }

    #[test]
    fn test_root_level_test_title() {
        let mut tree = SuiteTree::new();
        let t = tree.add_test(tree.root(), "lonely");
        assert_eq!(tree.full_title(t), "lonely");
    }

    #[test]
    fn test_file_is_inherited() {
        let mut tree = SuiteTree::new();
        let file_scope = tree.add_scope(tree.root(), "math");
        tree.scope_mut(file_scope).file = Some(PathBuf::from("test/math.spec.js"));
        let nested = tree.add_scope(file_scope, "add");
        let t = tree.add_test(nested, "works");
        assert_eq!(
            tree.test(t).file.as_deref(),
            Some(std::path::Path::new("test/math.spec.js"))
        );
    }

    #[test]
    #[should_panic]
    fn test_id_from_another_tree_panics() {
        let mut other = SuiteTree::new();
        other.add_test(other.root(), "first");
        let foreign = other.add_test(other.root(), "second");

        let tree = SuiteTree::new();
        let _ = tree.test(foreign);
    }
}
