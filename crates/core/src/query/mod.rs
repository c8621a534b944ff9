//! Boolean query algebra over tag membership
//!
//! A [`Query`] is an immutable expression tree built from four node kinds:
//!
//! - `Tag(name)`: matches iff the record's tags contain `name`
//! - `Not(q)`: matches iff `q` does not
//! - `And(a, b)`: matches iff both match
//! - `Or(a, b)`: matches iff either matches
//!
//! # Identity
//!
//! Equality and hashing are defined over the canonical rendered text, which
//! is computed once at construction. Two trees built independently that
//! render identically are the same key in any map, which is what lets a
//! shortcut learned by one query object be reused by another built later.
//!
//! # Implication sets
//!
//! Each query carries two sound, deliberately incomplete sets:
//!
//! - `true_if_true`: queries that must match whenever this one matches.
//!   `And` collects them from both conjuncts; every other node is just itself.
//! - `false_if_false`: queries that must fail whenever this one fails.
//!   `Or` collects them from both disjuncts; every other node is just itself.
//!
//! # Example
//!
//! ```
//! use skipscan_core::{and, not, tag_set, Query};
//!
//! let q = and("a", not("b"));
//! assert_eq!(q.to_string(), r#"("a" AND (!"b"))"#);
//! assert!(q.matches(&tag_set(["a"])));
//! assert!(!q.matches(&tag_set(["a", "b"])));
//!
//! let parsed: Query = "a & !b".parse().unwrap();
//! assert_eq!(parsed, q);
//! ```

mod parse;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::{FxHashSet, FxHasher};

use crate::traits::ShortcutLookup;
use crate::types::{Position, Tag, TagSet};

pub use parse::QueryParser;

// ============================================================================
// Query
// ============================================================================

/// Structure of a query node
#[derive(Debug, Clone)]
pub enum QueryNode {
    /// Tag membership
    Tag(Tag),
    /// Negation
    Not(Query),
    /// Conjunction
    And(Query, Query),
    /// Disjunction
    Or(Query, Query),
}

/// Immutable boolean query with cached canonical text
///
/// Cloning is cheap: the tree is shared behind an `Arc`.
#[derive(Clone)]
pub struct Query(Arc<QueryInner>);

struct QueryInner {
    node: QueryNode,
    text: Box<str>,
    hash: u64,
    /// `true_if_true` minus the query itself
    implied_true: FxHashSet<Query>,
    /// `false_if_false` minus the query itself
    implied_false: FxHashSet<Query>,
}

impl Query {
    /// Build a query from a node, computing its text and implication sets
    pub fn new(node: QueryNode) -> Self {
        let mut text = String::new();
        render(&node, &mut text);

        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        let hash = hasher.finish();

        let mut implied_true = FxHashSet::default();
        let mut implied_false = FxHashSet::default();
        match &node {
            QueryNode::And(a, b) => {
                implied_true.extend(a.true_if_true().iter().cloned());
                implied_true.extend(b.true_if_true().iter().cloned());
            }
            QueryNode::Or(a, b) => {
                implied_false.extend(a.false_if_false().iter().cloned());
                implied_false.extend(b.false_if_false().iter().cloned());
            }
            QueryNode::Tag(_) | QueryNode::Not(_) => {}
        }

        Query(Arc::new(QueryInner {
            node,
            text: text.into_boxed_str(),
            hash,
            implied_true,
            implied_false,
        }))
    }

    /// `Tag(name)`
    pub fn tag(name: impl Into<Tag>) -> Self {
        Query::new(QueryNode::Tag(name.into()))
    }

    /// `Not(self)`
    pub fn negate(self) -> Self {
        Query::new(QueryNode::Not(self))
    }

    /// `And(self, other)`
    pub fn and(self, other: impl Into<Query>) -> Self {
        Query::new(QueryNode::And(self, other.into()))
    }

    /// `Or(self, other)`
    pub fn or(self, other: impl Into<Query>) -> Self {
        Query::new(QueryNode::Or(self, other.into()))
    }

    /// The node this query is built from
    pub fn node(&self) -> &QueryNode {
        &self.0.node
    }

    /// Canonical rendered text
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    /// Does this query match a record with these tags?
    pub fn matches(&self, tags: &TagSet) -> bool {
        match &self.0.node {
            QueryNode::Tag(name) => tags.contains(name.as_str()),
            QueryNode::Not(q) => !q.matches(tags),
            QueryNode::And(a, b) => a.matches(tags) && b.matches(tags),
            QueryNode::Or(a, b) => a.matches(tags) || b.matches(tags),
        }
    }

    /// Queries guaranteed to match whenever this one does (includes `self`)
    pub fn true_if_true(&self) -> ImplicationSet<'_> {
        ImplicationSet {
            head: self,
            rest: &self.0.implied_true,
        }
    }

    /// Queries guaranteed to fail whenever this one does (includes `self`)
    pub fn false_if_false(&self) -> ImplicationSet<'_> {
        ImplicationSet {
            head: self,
            rest: &self.0.implied_false,
        }
    }

    /// Find the furthest position it is sound to skip to from a record
    ///
    /// A direct entry for this query always wins. Otherwise `And` takes the
    /// larger of its conjuncts' targets (either being false is enough) and
    /// `Or` takes the smaller of its disjuncts' targets, and only when both
    /// resolve (it is known false only while both are). `Tag` and `Not` do
    /// not look inside their operands.
    pub fn find_shortcut<L>(&self, table: &mut L) -> Option<Shortcut>
    where
        L: ShortcutLookup + ?Sized,
    {
        if let Some(target) = table.lookup(self) {
            return Some(Shortcut {
                query: self.clone(),
                target,
            });
        }

        match &self.0.node {
            QueryNode::Tag(_) | QueryNode::Not(_) => None,
            QueryNode::And(a, b) => match (a.find_shortcut(table), b.find_shortcut(table)) {
                (Some(sa), Some(sb)) => Some(if sa.target > sb.target { sa } else { sb }),
                (sa, sb) => sa.or(sb),
            },
            QueryNode::Or(a, b) => {
                let sa = a.find_shortcut(table)?;
                let sb = b.find_shortcut(table)?;
                Some(if sa.target < sb.target { sa } else { sb })
            }
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match &self.0.node {
            QueryNode::Tag(_) => 1,
            QueryNode::Not(q) => 1 + q.size(),
            QueryNode::And(a, b) | QueryNode::Or(a, b) => 1 + a.size() + b.size(),
        }
    }
}

fn render(node: &QueryNode, out: &mut String) {
    match node {
        QueryNode::Tag(name) => {
            out.push('"');
            for ch in name.chars() {
                if ch == '"' || ch == '\\' {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push('"');
        }
        QueryNode::Not(q) => {
            out.push_str("(!");
            out.push_str(q.as_str());
            out.push(')');
        }
        QueryNode::And(a, b) => {
            out.push('(');
            out.push_str(a.as_str());
            out.push_str(" AND ");
            out.push_str(b.as_str());
            out.push(')');
        }
        QueryNode::Or(a, b) => {
            out.push('(');
            out.push_str(a.as_str());
            out.push_str(" OR ");
            out.push_str(b.as_str());
            out.push(')');
        }
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || (self.0.hash == other.0.hash && self.0.text == other.0.text)
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.text)
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&&*self.0.text).finish()
    }
}

impl From<&str> for Query {
    fn from(name: &str) -> Self {
        Query::tag(name)
    }
}

impl From<String> for Query {
    fn from(name: String) -> Self {
        Query::tag(name)
    }
}

impl From<&Query> for Query {
    fn from(q: &Query) -> Self {
        q.clone()
    }
}

impl std::ops::Not for Query {
    type Output = Query;

    fn not(self) -> Query {
        self.negate()
    }
}

impl<Q: Into<Query>> std::ops::BitAnd<Q> for Query {
    type Output = Query;

    fn bitand(self, rhs: Q) -> Query {
        self.and(rhs)
    }
}

impl<Q: Into<Query>> std::ops::BitOr<Q> for Query {
    type Output = Query;

    fn bitor(self, rhs: Q) -> Query {
        self.or(rhs)
    }
}

// ============================================================================
// Builders
// ============================================================================

/// `Tag(name)`
pub fn tag(name: impl Into<Tag>) -> Query {
    Query::tag(name)
}

/// `Not(q)`; accepts a raw tag name
pub fn not(q: impl Into<Query>) -> Query {
    q.into().negate()
}

/// `And(a, b)`; accepts raw tag names
pub fn and(a: impl Into<Query>, b: impl Into<Query>) -> Query {
    a.into().and(b)
}

/// `Or(a, b)`; accepts raw tag names
pub fn or(a: impl Into<Query>, b: impl Into<Query>) -> Query {
    a.into().or(b)
}

// ============================================================================
// ImplicationSet / Shortcut
// ============================================================================

/// A query together with the queries it implies
///
/// Borrowed from the query; nothing is computed on access.
#[derive(Clone, Copy)]
pub struct ImplicationSet<'a> {
    head: &'a Query,
    rest: &'a FxHashSet<Query>,
}

impl<'a> ImplicationSet<'a> {
    /// O(1) membership test
    #[inline]
    pub fn contains(&self, query: &Query) -> bool {
        self.head == query || self.rest.contains(query)
    }

    /// Every member, starting with the owning query
    pub fn iter(&self) -> impl Iterator<Item = &'a Query> + 'a {
        std::iter::once(self.head).chain(self.rest.iter())
    }

    /// Number of members
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always false; the owning query is a member
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for ImplicationSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A usable shortcut: skip to `target` because `query` is false until there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// The query whose falsity the skip relies on
    pub query: Query,
    /// Position to continue scanning from
    pub target: Position,
}
