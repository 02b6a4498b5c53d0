//! Symbol table entities.

use crate::{BlockId, MethodId, ScopeRef, SymbolId, VariableId, modifier_flags};

/// A type as written in the source plus the class it resolved to, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub resolved: Option<SymbolId>,
}

impl TypeRef {
    pub fn unresolved(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            resolved: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Lifecycle of a `SymbolData`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolState {
    /// Referenced before its declaration was seen; members are empty.
    Placeholder,
    /// Its declaration is being visited.
    Visiting,
    /// Fully visited.
    Complete,
}

/// A class or interface.
#[derive(Clone, Debug)]
pub struct SymbolData {
    /// Fully qualified name, e.g. `p.Outer$1`.
    pub name: String,
    pub package: String,
    pub modifiers: u32,
    pub is_interface: bool,
    pub is_primitive: bool,
    pub state: SymbolState,
    pub type_params: Vec<String>,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<MethodId>,
    pub fields: Vec<VariableId>,
    /// Instance initializer blocks written directly in the class body.
    pub initializers: Vec<BlockId>,
    pub inner_classes: Vec<SymbolId>,
    /// Enclosing scope of inner, local and anonymous classes.
    pub outer: Option<ScopeRef>,
    local_class_num: u32,
}

impl SymbolData {
    pub fn placeholder(name: impl Into<String>) -> Self {
        let name = name.into();
        let package = match name.rfind('.') {
            Some(dot) => name[..dot].to_string(),
            None => String::new(),
        };
        SymbolData {
            name,
            package,
            modifiers: modifier_flags::NONE,
            is_interface: false,
            is_primitive: false,
            state: SymbolState::Placeholder,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            initializers: Vec::new(),
            inner_classes: Vec::new(),
            outer: None,
            local_class_num: 0,
        }
    }

    /// Not yet fully visited (a forward reference target).
    pub fn is_continuation(&self) -> bool {
        self.state != SymbolState::Complete
    }

    /// Name without its package prefix.
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(dot) => &self.name[dot + 1..],
            None => &self.name,
        }
    }

    pub fn has_modifier(&self, flag: u32) -> bool {
        self.modifiers & flag != 0
    }

    /// Number the next local or anonymous class declared inside this one.
    pub fn preincrement_local_class_num(&mut self) -> u32 {
        self.local_class_num += 1;
        self.local_class_num
    }
}

/// A method or constructor.
#[derive(Clone, Debug)]
pub struct MethodData {
    pub name: String,
    pub modifiers: u32,
    pub type_params: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub params: Vec<VariableId>,
    pub thrown: Vec<TypeRef>,
    pub owner: SymbolId,
    pub outer: ScopeRef,
    pub is_constructor: bool,
    /// Parameters followed by locals declared directly in the body.
    pub vars: Vec<VariableId>,
    pub blocks: Vec<BlockId>,
}

impl MethodData {
    pub fn new(name: impl Into<String>, owner: SymbolId) -> Self {
        MethodData {
            name: name.into(),
            modifiers: modifier_flags::NONE,
            type_params: Vec::new(),
            return_type: None,
            params: Vec::new(),
            thrown: Vec::new(),
            owner,
            outer: ScopeRef::Symbol(owner),
            is_constructor: false,
            vars: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn has_modifier(&self, flag: u32) -> bool {
        self.modifiers & flag != 0
    }
}

/// A field, parameter or local variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableData {
    pub name: String,
    pub modifiers: u32,
    pub ty: TypeRef,
    pub has_initializer: bool,
    pub enclosing: ScopeRef,
    is_final: bool,
}

impl VariableData {
    pub fn new(
        name: impl Into<String>,
        modifiers: u32,
        ty: TypeRef,
        has_initializer: bool,
        enclosing: ScopeRef,
    ) -> Self {
        VariableData {
            name: name.into(),
            modifiers,
            ty,
            has_initializer,
            enclosing,
            is_final: modifiers & modifier_flags::FINAL != 0,
        }
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Finality is sticky: there is no way to clear it.
    pub fn set_final(&mut self) {
        self.is_final = true;
    }
}

/// A lexical block nested in a method, another block, or a class body.
#[derive(Clone, Debug)]
pub struct BlockData {
    pub outer: ScopeRef,
    pub vars: Vec<VariableId>,
    pub blocks: Vec<BlockId>,
}

impl BlockData {
    pub fn new(outer: ScopeRef) -> Self {
        BlockData {
            outer,
            vars: Vec::new(),
            blocks: Vec::new(),
        }
    }
}
