use crate::diagnostic::Position;
use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A symbol table shared between the frames and closures that can see it.
pub type SharedTable = Rc<RefCell<SymbolTable>>;

/// Name of the outermost evaluation frame.
pub const PROGRAM_CONTEXT: &str = "<program>";

/// One level of lexical scope. Lookups fall through to the parent table;
/// writes always land in this table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    bindings: IndexMap<String, Value>,
    parent: Option<SharedTable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> SharedTable {
        Rc::new(RefCell::new(Self::new()))
    }

    /// A fresh, empty scope nested inside `parent`.
    pub fn child_of(parent: &SharedTable) -> SharedTable {
        Rc::new(RefCell::new(Self {
            bindings: IndexMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Get a variable, searching this table first and then each parent.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }

        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => None,
        }
    }

    /// Bind `name` in this table, overwriting an existing local binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Drops every local binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// An evaluation frame. The chain of parents is what a traceback prints;
/// name resolution goes through `symbol_table` instead.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry_position: Option<Position>,
    pub symbol_table: SharedTable,
}

impl Context {
    pub fn root(symbol_table: SharedTable) -> Self {
        Self {
            display_name: PROGRAM_CONTEXT.to_string(),
            parent: None,
            parent_entry_position: None,
            symbol_table,
        }
    }

    pub fn child(
        display_name: impl Into<String>,
        parent: &Rc<Context>,
        entry: Position,
        symbol_table: SharedTable,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            parent_entry_position: Some(entry),
            symbol_table,
        }
    }

    /// This frame, resolving names through `symbol_table` instead.
    pub fn with_scope(&self, symbol_table: SharedTable) -> Self {
        Self {
            display_name: self.display_name.clone(),
            parent: self.parent.clone(),
            parent_entry_position: self.parent_entry_position,
            symbol_table,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.symbol_table.borrow().get(name)
    }

    pub fn bind(&self, name: impl Into<String>, value: Value) {
        self.symbol_table.borrow_mut().set(name, value);
    }

    /// Number of frames from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }
}
