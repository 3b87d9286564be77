//! Canonical attribute printing.
//!
//! Renders a [`DeclAttributes`] set into the deterministic textual form
//! consumed by diagnostics, AST dumps, and serialization. Output is
//! stable across runs: simple flags always print in one fixed order, and
//! out-of-line nodes follow in declaration order, one token with a
//! single trailing space each. An empty set prints nothing at all.
//!
//! The [`Printer`] trait is the output-sink boundary; the contract holds
//! verbatim against both the byte-stream target ([`StreamPrinter`]) and
//! the formatting target ([`FmtPrinter`]).

use std::fmt;
use std::io;

use crate::attr::{AttrFlags, AttrKind, DeclAttribute, DeclAttributes, Resilience};

/// An ordered text-emission target for attribute tokens.
pub trait Printer {
    /// Write a run of text to the sink.
    fn write_str(&mut self, text: &str) -> fmt::Result;
}

/// A printer backed by any [`fmt::Write`] target.
pub struct FmtPrinter<'w, W: fmt::Write> {
    out: &'w mut W,
}

impl<'w, W: fmt::Write> FmtPrinter<'w, W> {
    /// Create a printer writing into `out`.
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }
}

impl<W: fmt::Write> Printer for FmtPrinter<'_, W> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.out.write_str(text)
    }
}

/// A printer backed by a plain byte stream.
pub struct StreamPrinter<W: io::Write> {
    out: W,
}

impl<W: io::Write> StreamPrinter<W> {
    /// Create a printer writing into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Printer for StreamPrinter<W> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.out.write_all(text.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl DeclAttributes<'_> {
    /// Print the set in canonical form.
    ///
    /// Emits one `@<token> ` per attribute: flags in the fixed order
    /// below, then chain nodes in declaration order. Empty sets emit
    /// zero bytes. Never mutates the set.
    pub fn print<P: Printer>(&self, printer: &mut P) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        if self.has(AttrFlags::ASSIGNMENT) {
            printer.write_str("@assignment ")?;
        }
        if self.has(AttrFlags::CONVERSION) {
            printer.write_str("@conversion ")?;
        }
        if self.has(AttrFlags::TRANSPARENT) {
            printer.write_str("@transparent ")?;
        }
        if self.has(AttrFlags::INFIX) {
            printer.write_str("@infix ")?;
        }
        match self.resilience() {
            Resilience::Default => {}
            Resilience::Fragile => printer.write_str("@fragile ")?,
            Resilience::InherentlyFragile => printer.write_str("@born_fragile ")?,
            Resilience::Resilient => printer.write_str("@resilient ")?,
        }
        if self.has(AttrFlags::NO_RETURN) {
            printer.write_str("@noreturn ")?;
        }
        if self.has(AttrFlags::POSTFIX) {
            printer.write_str("@postfix ")?;
        }
        if self.has(AttrFlags::FOREIGN_LINKAGE) {
            printer.write_str("@foreign_linkage ")?;
        }
        if self.has(AttrFlags::REQUIRES_STORED_PROPERTY_INITS) {
            printer.write_str("@requires_stored_property_inits ")?;
        }
        if self.has(AttrFlags::IB_OUTLET) {
            printer.write_str("@IBOutlet ")?;
        }
        if self.has(AttrFlags::IB_ACTION) {
            printer.write_str("@IBAction ")?;
        }
        if self.has(AttrFlags::CLASS_PROTOCOL) {
            printer.write_str("@class_protocol ")?;
        }
        if self.has(AttrFlags::EXPORTED) {
            printer.write_str("@exported ")?;
        }
        if self.has(AttrFlags::OPTIONAL) {
            printer.write_str("@optional ")?;
        }
        match self.mutating() {
            Some(true) => printer.write_str("@mutating ")?,
            Some(false) => printer.write_str("@!mutating ")?,
            None => {}
        }
        if self.has(AttrFlags::REQUIRED) {
            printer.write_str("@required ")?;
        }
        if self.has(AttrFlags::OVERRIDE) {
            printer.write_str("@override ")?;
        }

        for attr in self.iter() {
            attr.print(printer)?;
        }
        Ok(())
    }
}

impl DeclAttribute<'_> {
    /// Print this node's canonical token, with its trailing space.
    ///
    /// The `match` is exhaustive over [`AttrKind`]: a new kind without a
    /// print arm is a compile error, not a run-time fault.
    pub fn print<P: Printer>(&self, printer: &mut P) -> fmt::Result {
        match self.kind() {
            AttrKind::Asmname(name) => {
                printer.write_str("@asmname(\"")?;
                printer.write_str(name)?;
                printer.write_str("\")")?;
            }
        }
        printer.write_str(" ")
    }
}

impl fmt::Display for DeclAttributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = FmtPrinter::new(f);
        self.print(&mut printer)
    }
}

impl fmt::Display for DeclAttribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = FmtPrinter::new(f);
        self.print(&mut printer)
    }
}
