//! Symbol table for float-context inference.
//!
//! This module tracks variable declarations per scope, user function
//! overloads and user struct types, and merges them with the builtin
//! catalog for lookup.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use crate::{builtins::Catalog, types::GlslType};

/// Shader variables every stage can use without declaring them.
const BUILTIN_VARIABLES: &[(&str, &str)] = &[
    ("gl_Position", "vec4"),
    ("gl_PointSize", "float"),
    ("gl_FragCoord", "vec4"),
    ("gl_FrontFacing", "bool"),
    ("gl_FragColor", "vec4"),
    ("gl_PointCoord", "vec2"),
    ("gl_FragDepth", "float"),
];

/// Function signature information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function name
    pub name: String,
    /// Parameter types in order
    pub params: Vec<GlslType>,
    pub return_type: GlslType,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, return_type: GlslType, params: Vec<GlslType>) -> Self {
        FunctionSignature {
            name: name.into(),
            params,
            return_type,
        }
    }
}

/// Variable information in a scope.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Declared type; for arrays, the element type
    pub ty: GlslType,
    pub is_array: bool,
}

/// Scope for variable declarations.
#[derive(Debug, Clone, Default)]
struct Scope {
    /// Variables declared in this scope
    variables: BTreeMap<String, Variable>,
}

impl Scope {
    /// Declare a variable in this scope, replacing any earlier binding of
    /// the same name.
    fn declare(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    fn lookup(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }
}

/// Symbol table for tracking functions, structs and variables.
///
/// The outermost scope is the global scope. It is created with the table,
/// holds the builtin `gl_*` variables and is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable<'c> {
    catalog: &'c Catalog,
    /// User function overloads in declaration order, indexed by name
    functions: BTreeMap<String, Vec<FunctionSignature>>,
    /// User struct and block types
    structs: BTreeMap<String, GlslType>,
    /// Stack of scopes for variable lookup
    scopes: Vec<Scope>,
}

impl<'c> SymbolTable<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        let mut table = Self {
            catalog,
            functions: BTreeMap::new(),
            structs: BTreeMap::new(),
            scopes: alloc::vec![Scope::default()],
        };
        for (name, ty) in BUILTIN_VARIABLES {
            if let Some(ty) = catalog.lookup_type(ty) {
                table.declare_variable(name.to_string(), ty.clone());
            }
        }
        if let Some(vec4) = catalog.lookup_type("vec4") {
            table.declare(Variable {
                name: "gl_FragData".to_string(),
                ty: vec4.clone(),
                is_array: true,
            });
        }
        table
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Register a user function overload.
    pub fn declare_function(&mut self, sig: FunctionSignature) {
        self.functions.entry(sig.name.clone()).or_default().push(sig);
    }

    /// All overloads visible under `name`: user overloads first, then
    /// builtins.
    pub fn lookup_function(&self, name: &str) -> Vec<&FunctionSignature> {
        let user = self.functions.get(name).into_iter().flatten();
        user.chain(self.catalog.overloads(name)).collect()
    }

    /// Register a user struct or block type, together with its constructor.
    ///
    /// Anonymous structs (empty name) are not registered.
    pub fn declare_struct(&mut self, ty: GlslType) {
        let name = ty.name().to_string();
        if name.is_empty() {
            return;
        }
        if let GlslType::Struct(st) = &ty {
            let params = st.field_types().cloned().collect();
            self.declare_function(FunctionSignature::new(name.clone(), ty.clone(), params));
        }
        self.structs.insert(name, ty);
    }

    /// Resolve a type name against builtin types, then user structs.
    pub fn lookup_type(&self, name: &str) -> Option<GlslType> {
        self.catalog
            .lookup_type(name)
            .or_else(|| self.structs.get(name))
            .cloned()
    }

    /// Push a new scope onto the scope stack.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare a variable in the current scope.
    pub fn declare(&mut self, variable: Variable) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.declare(variable);
        }
    }

    /// Declare a non-array variable in the current scope.
    pub fn declare_variable(&mut self, name: String, ty: GlslType) {
        self.declare(Variable {
            name,
            ty,
            is_array: false,
        });
    }

    /// Look up a variable, searching from the current scope outward.
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    /// Get the number of active scopes, including the global scope.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}
