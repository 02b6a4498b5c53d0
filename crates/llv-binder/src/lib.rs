//! Symbol table model.
//!
//! Classes, methods, variables and blocks are stored in arenas inside
//! [`SymbolTable`] and linked to each other by id, never by reference, so
//! back links (a block's enclosing method, a method's owning class) cannot
//! form ownership cycles.

use llv_syntax::Modifier;

pub mod symbols;
pub use symbols::{BlockData, MethodData, SymbolData, SymbolState, TypeRef, VariableData};

pub mod table;
pub use table::{Declared, DuplicateScope, SymbolTable};

pub mod builtins;

/// Id of a class or interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Id of a method or constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

/// Id of a field, parameter or local variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

/// Id of a lexical block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A body: the executable scope of a method or one of its nested blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyId {
    Method(MethodId),
    Block(BlockId),
}

/// Any scope that can enclose a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    Symbol(SymbolId),
    Method(MethodId),
    Block(BlockId),
}

impl From<BodyId> for ScopeRef {
    fn from(body: BodyId) -> Self {
        match body {
            BodyId::Method(id) => ScopeRef::Method(id),
            BodyId::Block(id) => ScopeRef::Block(id),
        }
    }
}

/// Modifier bit flags stored on symbols, methods and variables.
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const PUBLIC: u32 = 1 << 0;
    pub const PROTECTED: u32 = 1 << 1;
    pub const PRIVATE: u32 = 1 << 2;
    pub const STATIC: u32 = 1 << 3;
    pub const FINAL: u32 = 1 << 4;
    pub const ABSTRACT: u32 = 1 << 5;
    pub const NATIVE: u32 = 1 << 6;
    pub const SYNCHRONIZED: u32 = 1 << 7;
    pub const TRANSIENT: u32 = 1 << 8;
    pub const VOLATILE: u32 = 1 << 9;
    pub const STRICTFP: u32 = 1 << 10;
}

/// Fold written modifiers into `modifier_flags` bits.
pub fn modifier_bits(modifiers: &[Modifier]) -> u32 {
    modifiers.iter().fold(modifier_flags::NONE, |bits, m| {
        bits | match m {
            Modifier::Public => modifier_flags::PUBLIC,
            Modifier::Protected => modifier_flags::PROTECTED,
            Modifier::Private => modifier_flags::PRIVATE,
            Modifier::Static => modifier_flags::STATIC,
            Modifier::Final => modifier_flags::FINAL,
            Modifier::Abstract => modifier_flags::ABSTRACT,
            Modifier::Native => modifier_flags::NATIVE,
            Modifier::Synchronized => modifier_flags::SYNCHRONIZED,
            Modifier::Transient => modifier_flags::TRANSIENT,
            Modifier::Volatile => modifier_flags::VOLATILE,
            Modifier::Strictfp => modifier_flags::STRICTFP,
        }
    })
}

#[cfg(test)]
#[path = "tests/symbol_table_tests.rs"]
mod symbol_table_tests;
#[cfg(test)]
#[path = "tests/scopes_tests.rs"]
mod scopes_tests;
