//! The symbol table: arenas of entities plus the qualified-name index.

use crate::builtins;
use crate::symbols::{BlockData, MethodData, SymbolData, SymbolState, VariableData};
use crate::{BlockId, BodyId, MethodId, ScopeRef, SymbolId, VariableId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

/// Which scopes a new local variable's name is checked against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateScope {
    /// Only the block or method body the variable is declared in.
    #[default]
    Immediate,
    /// Every enclosing block up to and including the method body.
    EnclosingBodies,
}

/// Ids of newly declared variables plus the names that collided.
#[derive(Clone, Debug, Default)]
pub struct Declared {
    pub ids: Vec<VariableId>,
    /// Each colliding name once, in declaration order.
    pub duplicates: SmallVec<[String; 1]>,
}

impl Declared {
    pub fn all_fresh(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Symbol table shared by every walker of one analysis run.
///
/// Ids handed out by a table index into it directly; passing an id from
/// another table is a logic error and panics.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<SymbolData>,
    methods: Vec<MethodData>,
    variables: Vec<VariableData>,
    blocks: Vec<BlockData>,
    names: IndexMap<String, SymbolId, FxBuildHasher>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table pre-seeded with primitive types and the implicit `java.lang` classes.
    pub fn new() -> Self {
        let mut table = Self::empty();
        builtins::seed(&mut table);
        table
    }

    pub fn empty() -> Self {
        SymbolTable {
            symbols: Vec::new(),
            methods: Vec::new(),
            variables: Vec::new(),
            blocks: Vec::new(),
            names: IndexMap::default(),
        }
    }

    // ===== Symbols =====

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<SymbolId> {
        self.names.get(qualified_name).copied()
    }

    /// Look up a symbol whose declaration has been fully visited.
    pub fn lookup_complete(&self, qualified_name: &str) -> Option<SymbolId> {
        self.lookup(qualified_name)
            .filter(|&id| !self.symbol(id).is_continuation())
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut SymbolData {
        &mut self.symbols[id.0 as usize]
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &SymbolData)> {
        self.names
            .values()
            .map(move |&id| (id, &self.symbols[id.0 as usize]))
    }

    fn insert_symbol(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.names.insert(data.name.clone(), id);
        self.symbols.push(data);
        id
    }

    /// Return the symbol named `qualified_name`, creating a placeholder if it
    /// has not been seen yet.
    pub fn get_or_add_placeholder(&mut self, qualified_name: &str) -> SymbolId {
        if let Some(id) = self.lookup(qualified_name) {
            return id;
        }
        trace!(name = qualified_name, "adding placeholder symbol");
        self.insert_symbol(SymbolData::placeholder(qualified_name))
    }

    /// Start visiting the declaration of `qualified_name`.
    ///
    /// Reuses a placeholder created by an earlier forward reference. Returns
    /// `Err` with the existing id when the name was already declared.
    pub fn begin_definition(&mut self, qualified_name: &str) -> Result<SymbolId, SymbolId> {
        let id = self.get_or_add_placeholder(qualified_name);
        let symbol = self.symbol_mut(id);
        if symbol.state != SymbolState::Placeholder {
            return Err(id);
        }
        symbol.state = SymbolState::Visiting;
        Ok(id)
    }

    /// Mark a symbol as fully visited.
    pub fn finish_definition(&mut self, id: SymbolId) {
        self.symbol_mut(id).state = SymbolState::Complete;
    }

    /// Register a complete symbol that has no declaration in the batch.
    pub fn add_builtin(&mut self, qualified_name: &str, is_primitive: bool) -> SymbolId {
        let mut data = SymbolData::placeholder(qualified_name);
        data.state = SymbolState::Complete;
        data.is_primitive = is_primitive;
        self.insert_symbol(data)
    }

    pub fn preincrement_local_class_num(&mut self, id: SymbolId) -> u32 {
        self.symbol_mut(id).preincrement_local_class_num()
    }

    // ===== Methods =====

    pub fn method(&self, id: MethodId) -> &MethodData {
        &self.methods[id.0 as usize]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodData {
        &mut self.methods[id.0 as usize]
    }

    /// Add a method and list it among its owner's members.
    pub fn add_method(&mut self, data: MethodData) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        let owner = data.owner;
        self.methods.push(data);
        self.symbol_mut(owner).methods.push(id);
        id
    }

    /// Declare parameters of `method`. Parameters are also the first
    /// entries of the method body's variables.
    pub fn add_params(&mut self, method: MethodId, params: Vec<VariableData>) -> Declared {
        let existing = FxHashSet::default();
        let declared = self.declare(existing, params);
        let data = self.method_mut(method);
        data.params.extend(&declared.ids);
        data.vars.extend(&declared.ids);
        declared
    }

    // ===== Variables =====

    pub fn variable(&self, id: VariableId) -> &VariableData {
        &self.variables[id.0 as usize]
    }

    pub fn variable_mut(&mut self, id: VariableId) -> &mut VariableData {
        &mut self.variables[id.0 as usize]
    }

    pub fn add_variable(&mut self, data: VariableData) -> VariableId {
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(data);
        id
    }

    /// Add locals to `body`. Every variable is registered, including ones
    /// whose name collides with a variable already visible under `policy`.
    pub fn add_vars(
        &mut self,
        body: BodyId,
        vars: Vec<VariableData>,
        policy: DuplicateScope,
    ) -> Declared {
        let existing = self.names_for_duplicate_check(body, policy);
        let declared = self.declare(existing, vars);
        match body {
            BodyId::Method(id) => self.method_mut(id).vars.extend(&declared.ids),
            BodyId::Block(id) => self.block_mut(id).vars.extend(&declared.ids),
        }
        declared
    }

    /// Add fields to a class; names are checked against its other fields.
    pub fn add_fields(&mut self, symbol: SymbolId, vars: Vec<VariableData>) -> Declared {
        let existing = self
            .symbol(symbol)
            .fields
            .iter()
            .map(|&v| self.variable(v).name.clone())
            .collect();
        let declared = self.declare(existing, vars);
        self.symbol_mut(symbol).fields.extend(&declared.ids);
        declared
    }

    fn declare(&mut self, mut seen: FxHashSet<String>, vars: Vec<VariableData>) -> Declared {
        let mut declared = Declared::default();
        for var in vars {
            if !seen.insert(var.name.clone()) && !declared.duplicates.contains(&var.name) {
                declared.duplicates.push(var.name.clone());
            }
            declared.ids.push(self.add_variable(var));
        }
        declared
    }

    fn names_for_duplicate_check(&self, body: BodyId, policy: DuplicateScope) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        let mut scope = Some(ScopeRef::from(body));
        while let Some(current) = scope {
            let vars = match current {
                ScopeRef::Method(id) => &self.method(id).vars,
                ScopeRef::Block(id) => &self.block(id).vars,
                ScopeRef::Symbol(_) => break,
            };
            names.extend(vars.iter().map(|&v| self.variable(v).name.clone()));
            if policy == DuplicateScope::Immediate || matches!(current, ScopeRef::Method(_)) {
                break;
            }
            scope = self.outer_of(current);
        }
        names
    }

    /// Variables declared directly in `body`.
    pub fn body_vars(&self, body: BodyId) -> &[VariableId] {
        match body {
            BodyId::Method(id) => &self.method(id).vars,
            BodyId::Block(id) => &self.block(id).vars,
        }
    }

    /// Resolve a variable name from `scope` outward through blocks, the
    /// method, class fields and enclosing classes.
    pub fn lookup_var(&self, scope: ScopeRef, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(scope) = current {
            let vars = match scope {
                ScopeRef::Method(id) => &self.method(id).vars,
                ScopeRef::Block(id) => &self.block(id).vars,
                ScopeRef::Symbol(id) => &self.symbol(id).fields,
            };
            if let Some(&found) = vars.iter().find(|&&v| self.variable(v).name == name) {
                return Some(found);
            }
            current = self.outer_of(scope);
        }
        None
    }

    // ===== Blocks =====

    pub fn block(&self, id: BlockId) -> &BlockData {
        &self.blocks[id.0 as usize]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BlockData {
        &mut self.blocks[id.0 as usize]
    }

    /// Create a block owned by `outer` and register it in the parent's
    /// child list.
    pub fn add_block(&mut self, outer: ScopeRef) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BlockData::new(outer));
        match outer {
            ScopeRef::Method(parent) => self.method_mut(parent).blocks.push(id),
            ScopeRef::Block(parent) => self.block_mut(parent).blocks.push(id),
            ScopeRef::Symbol(parent) => self.symbol_mut(parent).initializers.push(id),
        }
        id
    }

    // ===== Scope chain =====

    pub fn outer_of(&self, scope: ScopeRef) -> Option<ScopeRef> {
        match scope {
            ScopeRef::Symbol(id) => self.symbol(id).outer,
            ScopeRef::Method(id) => Some(self.method(id).outer),
            ScopeRef::Block(id) => Some(self.block(id).outer),
        }
    }

    /// The method whose body contains `scope`, stopping at class boundaries.
    pub fn enclosing_method(&self, scope: ScopeRef) -> Option<MethodId> {
        let mut current = scope;
        loop {
            match current {
                ScopeRef::Method(id) => return Some(id),
                ScopeRef::Block(id) => current = self.block(id).outer,
                ScopeRef::Symbol(_) => return None,
            }
        }
    }

    /// The innermost class containing `scope`.
    pub fn enclosing_symbol(&self, scope: ScopeRef) -> SymbolId {
        let mut current = scope;
        loop {
            match current {
                ScopeRef::Symbol(id) => return id,
                ScopeRef::Method(id) => return self.method(id).owner,
                ScopeRef::Block(id) => current = self.block(id).outer,
            }
        }
    }

    /// Whether `body` is (inside) the body of a constructor.
    pub fn is_constructor(&self, body: BodyId) -> bool {
        self.enclosing_method(body.into())
            .is_some_and(|id| self.method(id).is_constructor)
    }
}
