//! Declaration attributes.
//!
//! Attributes attached to a declaration split into two representations:
//!
//! - **Common boolean attributes** (`@transparent`, `@override`, ...) are
//!   one bit each in [`AttrFlags`], stored inline in [`DeclAttributes`]
//!   together with the multi-valued [`Resilience`] field and the
//!   `@mutating`/`@!mutating` tristate.
//! - **Rare attributes with a payload** (`@asmname("...")`) are
//!   arena-allocated [`DeclAttribute`] nodes on a singly-linked chain
//!   hanging off the set.
//!
//! Do not collapse the two into one container: the canonical print order
//! (see [`crate::printer`]) visits flags and chain in two separately
//! ordered passes.
//!
//! Sets and nodes live in the [`AstArena`](crate::arena::AstArena) and
//! are torn down in bulk with the compilation unit.

use serde::{Deserialize, Serialize};

use crate::arena::AstArena;

bitflags::bitflags! {
    /// Simple boolean declaration attributes, one bit each.
    ///
    /// Adding a flag here requires adding its token to the canonical
    /// printer in [`crate::printer`], in the fixed emission order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttrFlags: u16 {
        /// `@assignment`
        const ASSIGNMENT = 1 << 0;
        /// `@conversion`
        const CONVERSION = 1 << 1;
        /// `@transparent`
        const TRANSPARENT = 1 << 2;
        /// `@infix`
        const INFIX = 1 << 3;
        /// `@noreturn`
        const NO_RETURN = 1 << 4;
        /// `@postfix`
        const POSTFIX = 1 << 5;
        /// `@foreign_linkage`
        const FOREIGN_LINKAGE = 1 << 6;
        /// `@requires_stored_property_inits`
        const REQUIRES_STORED_PROPERTY_INITS = 1 << 7;
        /// `@IBOutlet`
        const IB_OUTLET = 1 << 8;
        /// `@IBAction`
        const IB_ACTION = 1 << 9;
        /// `@class_protocol`
        const CLASS_PROTOCOL = 1 << 10;
        /// `@exported`
        const EXPORTED = 1 << 11;
        /// `@optional`
        const OPTIONAL = 1 << 12;
        /// `@required`
        const REQUIRED = 1 << 13;
        /// `@override`
        const OVERRIDE = 1 << 14;
    }
}

impl Default for AttrFlags {
    fn default() -> Self {
        AttrFlags::empty()
    }
}

/// Resilience of a declaration across module boundaries.
///
/// Mutually exclusive; `Default` carries no attribute token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resilience {
    /// No resilience attribute specified.
    #[default]
    Default,
    /// `@fragile`
    Fragile,
    /// `@born_fragile`
    InherentlyFragile,
    /// `@resilient`
    Resilient,
}

/// The kind of an out-of-line attribute, with its payload.
///
/// This is a closed set: every variant has exactly one print arm in
/// [`DeclAttribute::print`](crate::printer), and the exhaustive `match`
/// there keeps the two from drifting apart at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind<'a> {
    /// `@asmname("...")` — overrides the symbol name used at link time.
    Asmname(&'a str),
}

/// One out-of-line attribute instance.
///
/// Nodes are arena-allocated and immutable once linked into a chain;
/// `next` is set exactly once, by [`DeclAttributes::append`]. They are
/// never destroyed individually.
#[derive(Debug)]
pub struct DeclAttribute<'a> {
    kind: AttrKind<'a>,
    next: Option<&'a DeclAttribute<'a>>,
}

impl<'a> DeclAttribute<'a> {
    /// Allocate a linkage-name override node from the arena.
    ///
    /// The payload string is interned in the same arena. The node is
    /// unlinked (`next` is `None`) until appended to a set.
    pub fn asmname(arena: &'a AstArena, name: &str) -> &'a mut DeclAttribute<'a> {
        arena.alloc(DeclAttribute {
            kind: AttrKind::Asmname(arena.alloc_str(name)),
            next: None,
        })
    }

    /// The kind discriminant, fixed at construction.
    pub fn kind(&self) -> AttrKind<'a> {
        self.kind
    }

    /// The next node in the chain, if any.
    pub fn next(&self) -> Option<&'a DeclAttribute<'a>> {
        self.next
    }
}

/// The attributes attached to one declaration.
///
/// Cheap by default: declarations share [`DeclAttributes::empty`] until
/// the first mutation (see [`Decl::attrs_mut`](crate::decl::Decl::attrs_mut)),
/// so the overwhelmingly common attribute-free declaration costs nothing.
///
/// `num_attrs` counts every piece of content (set flags, a non-default
/// resilience, a present mutating tristate, chain nodes), so
/// `is_empty()` is a single integer compare and a set with
/// `num_attrs == 0` holds exactly the content of the shared empty set.
#[derive(Debug)]
pub struct DeclAttributes<'a> {
    flags: AttrFlags,
    resilience: Resilience,
    mutating: Option<bool>,
    chain: Option<&'a DeclAttribute<'a>>,
    num_attrs: u32,
}

/// The canonical empty attribute set, shared read-only by every
/// declaration that has never been mutated.
static EMPTY_ATTRS: DeclAttributes<'static> = DeclAttributes {
    flags: AttrFlags::empty(),
    resilience: Resilience::Default,
    mutating: None,
    chain: None,
    num_attrs: 0,
};

impl<'a> DeclAttributes<'a> {
    /// The canonical shared empty set. A single read-only instance for
    /// the whole process; mutation goes through per-declaration private
    /// storage instead (see [`Decl::attrs_mut`](crate::decl::Decl::attrs_mut)).
    pub fn empty() -> &'static DeclAttributes<'static> {
        &EMPTY_ATTRS
    }

    /// Create a new empty set.
    pub fn new() -> DeclAttributes<'a> {
        DeclAttributes {
            flags: AttrFlags::empty(),
            resilience: Resilience::Default,
            mutating: None,
            chain: None,
            num_attrs: 0,
        }
    }

    /// Whether no attribute of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.num_attrs == 0
    }

    /// Whether every bit in `flag` is set.
    pub fn has(&self, flag: AttrFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Set the given flag bits. Already-set bits are not counted twice.
    pub fn set(&mut self, flag: AttrFlags) {
        let added = flag.difference(self.flags);
        self.flags.insert(flag);
        self.num_attrs += added.bits().count_ones();
    }

    /// Clear the given flag bits. Unset bits are ignored.
    pub fn clear(&mut self, flag: AttrFlags) {
        let removed = flag.intersection(self.flags);
        self.flags.remove(flag);
        self.num_attrs -= removed.bits().count_ones();
    }

    /// The resilience attribute, `Resilience::Default` if unspecified.
    pub fn resilience(&self) -> Resilience {
        self.resilience
    }

    /// Set the resilience attribute.
    pub fn set_resilience(&mut self, resilience: Resilience) {
        match (self.resilience, resilience) {
            (Resilience::Default, Resilience::Default) => {}
            (Resilience::Default, _) => self.num_attrs += 1,
            (_, Resilience::Default) => self.num_attrs -= 1,
            (_, _) => {}
        }
        self.resilience = resilience;
    }

    /// The mutating tristate: `None` when unspecified, otherwise the
    /// explicit positive or negative declaration.
    pub fn mutating(&self) -> Option<bool> {
        self.mutating
    }

    /// Set or clear the mutating tristate.
    pub fn set_mutating(&mut self, mutating: Option<bool>) {
        match (self.mutating, mutating) {
            (None, Some(_)) => self.num_attrs += 1,
            (Some(_), None) => self.num_attrs -= 1,
            _ => {}
        }
        self.mutating = mutating;
    }

    /// Link a freshly built node into the chain.
    ///
    /// Insertion is at the head: the chain runs most-recent-first, and
    /// [`iter`](Self::iter) restores declaration order. The node must be
    /// unlinked (as built by [`DeclAttribute::asmname`]).
    pub fn append(&mut self, node: &'a mut DeclAttribute<'a>) {
        debug_assert!(node.next.is_none());
        node.next = self.chain;
        self.chain = Some(node);
        self.num_attrs += 1;
    }

    /// Iterate over the out-of-line nodes in declaration order.
    ///
    /// Each call walks the chain once and yields a fresh traversal;
    /// simple flags are not included.
    pub fn iter(&self) -> AttrIter<'a> {
        let mut nodes = Vec::new();
        let mut cursor = self.chain;
        while let Some(node) = cursor {
            nodes.push(node);
            cursor = node.next();
        }
        // The physical chain is most-recent-first; callers see the order
        // the attributes were declared in.
        nodes.reverse();
        AttrIter {
            nodes: nodes.into_iter(),
        }
    }
}

impl Default for DeclAttributes<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a set's out-of-line attribute nodes, declaration order.
pub struct AttrIter<'a> {
    nodes: std::vec::IntoIter<&'a DeclAttribute<'a>>,
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = &'a DeclAttribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl ExactSizeIterator for AttrIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let attrs = DeclAttributes::new();
        assert!(attrs.is_empty());
        assert!(!attrs.has(AttrFlags::TRANSPARENT));
        assert_eq!(attrs.resilience(), Resilience::Default);
        assert_eq!(attrs.mutating(), None);
        assert_eq!(attrs.iter().count(), 0);
    }

    #[test]
    fn test_set_has_clear() {
        let mut attrs = DeclAttributes::new();

        attrs.set(AttrFlags::INFIX);
        assert!(attrs.has(AttrFlags::INFIX));
        assert!(!attrs.is_empty());

        attrs.clear(AttrFlags::INFIX);
        assert!(!attrs.has(AttrFlags::INFIX));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_flag_independence() {
        let mut attrs = DeclAttributes::new();

        attrs.set(AttrFlags::OVERRIDE);
        attrs.set(AttrFlags::EXPORTED);
        attrs.clear(AttrFlags::OVERRIDE);

        assert!(!attrs.has(AttrFlags::OVERRIDE));
        assert!(attrs.has(AttrFlags::EXPORTED));
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_set_is_idempotent_for_count() {
        let mut attrs = DeclAttributes::new();

        attrs.set(AttrFlags::INFIX);
        attrs.set(AttrFlags::INFIX);
        attrs.clear(AttrFlags::INFIX);

        assert!(attrs.is_empty());
    }

    #[test]
    fn test_clear_unset_flag_is_noop() {
        let mut attrs = DeclAttributes::new();
        attrs.clear(AttrFlags::POSTFIX);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_resilience_counts_toward_emptiness() {
        let mut attrs = DeclAttributes::new();

        attrs.set_resilience(Resilience::Fragile);
        assert!(!attrs.is_empty());
        assert_eq!(attrs.resilience(), Resilience::Fragile);

        // Switching between non-default modes keeps the count stable.
        attrs.set_resilience(Resilience::Resilient);
        assert!(!attrs.is_empty());

        attrs.set_resilience(Resilience::Default);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_mutating_tristate() {
        let mut attrs = DeclAttributes::new();
        assert_eq!(attrs.mutating(), None);

        attrs.set_mutating(Some(true));
        assert_eq!(attrs.mutating(), Some(true));
        assert!(!attrs.is_empty());

        attrs.set_mutating(Some(false));
        assert_eq!(attrs.mutating(), Some(false));
        assert!(!attrs.is_empty());

        attrs.set_mutating(None);
        assert_eq!(attrs.mutating(), None);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_append_preserves_declaration_order() {
        let arena = AstArena::new();
        let mut attrs = DeclAttributes::new();

        attrs.append(DeclAttribute::asmname(&arena, "foo"));
        attrs.append(DeclAttribute::asmname(&arena, "bar"));

        let names: Vec<&str> = attrs
            .iter()
            .map(|attr| match attr.kind() {
                AttrKind::Asmname(name) => name,
            })
            .collect();
        assert_eq!(names, ["foo", "bar"]);
    }

    #[test]
    fn test_iter_is_restartable() {
        let arena = AstArena::new();
        let mut attrs = DeclAttributes::new();
        attrs.append(DeclAttribute::asmname(&arena, "foo"));

        assert_eq!(attrs.iter().count(), 1);
        assert_eq!(attrs.iter().count(), 1);
    }

    #[test]
    fn test_chain_counts_toward_emptiness() {
        let arena = AstArena::new();
        let mut attrs = DeclAttributes::new();

        attrs.append(DeclAttribute::asmname(&arena, "sym"));
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_asmname_payload_is_interned() {
        let arena = AstArena::new();
        let a = DeclAttribute::asmname(&arena, "shared");
        let b = DeclAttribute::asmname(&arena, "shared");

        let (AttrKind::Asmname(na), AttrKind::Asmname(nb)) = (a.kind(), b.kind());
        assert!(std::ptr::eq(na.as_ptr(), nb.as_ptr()));
    }

    #[test]
    fn test_shared_empty_matches_fresh_set() {
        let fresh = DeclAttributes::new();
        let empty = DeclAttributes::empty();

        assert!(empty.is_empty());
        assert_eq!(fresh.flags, empty.flags);
        assert_eq!(fresh.resilience, empty.resilience);
        assert_eq!(fresh.mutating, empty.mutating);
        assert!(fresh.chain.is_none() && empty.chain.is_none());
    }
}
