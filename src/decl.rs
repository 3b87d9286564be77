//! Declarations and their attribute storage.
//!
//! A declaration starts out referencing the shared canonical empty
//! attribute set. The first call to [`Decl::attrs_mut`] allocates
//! private storage from the arena, which then serves every subsequent
//! mutation of that declaration. Mutating the shared empty set is
//! impossible: it is only ever reachable through a shared reference.

use serde::{Deserialize, Serialize};

use crate::arena::AstArena;
use crate::attr::DeclAttributes;

/// The kind of a declaration attributes can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    /// A function declaration.
    Fn,
    /// A struct declaration.
    Struct,
    /// A variable binding.
    Var,
    /// A protocol declaration.
    Proto,
}

/// A declaration in the Quill AST.
///
/// Only the attribute boundary is modeled here; the concrete payload of
/// each kind lives with the rest of the front end.
#[derive(Debug)]
pub struct Decl<'a> {
    name: &'a str,
    kind: DeclKind,
    /// Private attribute storage, absent until the first mutation.
    attrs: Option<&'a mut DeclAttributes<'a>>,
}

impl<'a> Decl<'a> {
    /// Create a declaration with no attributes.
    pub fn new(arena: &'a AstArena, name: &str, kind: DeclKind) -> Decl<'a> {
        Decl {
            name: arena.alloc_str(name),
            kind,
            attrs: None,
        }
    }

    /// The declaration's name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The declaration's kind.
    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    /// The declaration's attributes, read-only.
    ///
    /// Returns the shared empty set until the declaration has been
    /// mutated through [`attrs_mut`](Self::attrs_mut).
    pub fn attrs(&self) -> &DeclAttributes<'a> {
        match self.attrs {
            Some(ref attrs) => attrs,
            None => DeclAttributes::empty(),
        }
    }

    /// The declaration's attributes, for mutation.
    ///
    /// The first call copies on write: it allocates private storage from
    /// the arena. Every later call returns that same storage, so there
    /// is no double allocation.
    pub fn attrs_mut(&mut self, arena: &'a AstArena) -> &mut DeclAttributes<'a> {
        self.attrs
            .get_or_insert_with(|| arena.alloc(DeclAttributes::new()))
    }
}
