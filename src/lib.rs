//! # Quill Compiler — Declaration Attributes
//!
//! The declaration-attribute subsystem of the Quill compiler front end:
//! the representation of modifiers attached to declarations (visibility
//! hints, calling-convention markers, linkage-name overrides) and their
//! canonical textual rendering.
//!
//! ## Design
//!
//! Attributes use a dual representation chosen for the common case of a
//! declaration carrying no attributes at all:
//!
//! - Common boolean attributes are packed into a [`AttrFlags`] bitset
//!   inside [`DeclAttributes`], alongside a small number of multi-valued
//!   fields ([`Resilience`], the mutating tristate).
//! - Rare attributes that carry a payload ([`AttrKind::Asmname`]) are
//!   allocated out-of-line from the [`AstArena`] and linked into a
//!   singly-chained list hanging off the set.
//! - Declarations share a single canonical empty set until the first
//!   mutation, at which point [`Decl::attrs_mut`] allocates private
//!   storage from the arena.
//!
//! All attribute storage lives in an [`AstArena`] and is torn down in
//! bulk with the compilation unit; nothing is freed individually.
//!
//! ## Printing
//!
//! [`DeclAttributes::print`] renders a set into a deterministic
//! whitespace-separated form used by diagnostics and AST dumps:
//!
//! ```
//! use quillc::{AstArena, AttrFlags, Decl, DeclKind};
//!
//! let arena = AstArena::new();
//! let mut decl = Decl::new(&arena, "main", DeclKind::Fn);
//! decl.attrs_mut(&arena).set(AttrFlags::TRANSPARENT);
//! assert_eq!(decl.attrs().to_string(), "@transparent ");
//! ```
//!
//! ## Module Overview
//!
//! - [`arena`] - Arena allocation scoped to a compilation unit
//! - [`attr`] - Attribute flags, out-of-line nodes, and per-declaration sets
//! - [`decl`] - Declaration boundary with copy-on-first-write storage
//! - [`printer`] - Output sinks and the canonical attribute printer

pub mod arena;
pub mod attr;
pub mod decl;
pub mod printer;

// Re-export commonly used types
pub use arena::AstArena;
pub use attr::{AttrFlags, AttrKind, DeclAttribute, DeclAttributes, Resilience};
pub use decl::{Decl, DeclKind};
pub use printer::{FmtPrinter, Printer, StreamPrinter};
