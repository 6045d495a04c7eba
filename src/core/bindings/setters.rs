//! Setter binding resolution.
//!
//! Identifies every local identifier that behaves as a setter of a specific
//! state and binds it to that state's id. Two modes: direct-only (hook
//! factories at variable declarations) and wrapper-aware, which follows
//! custom hooks that return setters of inner hooks - directly, as tuples,
//! or packed into object literals.
//!
//! Bindings are recorded under both the canonical symbol key of the declared
//! identifier and a file-scoped `file|name` fallback; lookups consult both.
//! The fallback carries the load for identifiers declared inside component
//! bodies, which the module-level resolver cannot see.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use swc_ecma_ast::{
    CallExpr, Callee, Expr, ObjectLit, ObjectPat, ObjectPatProp, Pat, Prop, PropOrSpread,
    VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::facade::functions::collect_scope_var_declarators;
use crate::core::facade::patterns::binding_idents;
use crate::core::facade::{FnLike, Resolver, SymbolKey, name_key, prop_name, unwrap_expr};
use crate::core::index::SymbolIndex;
use crate::core::parsers::Project;
use crate::core::stores;

/// Whether a binding sets a new value or resets to the default.
/// Affects the via tag of the write events it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterFlavor {
    Set,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterBinding {
    pub state_id: String,
    pub flavor: SetterFlavor,
}

/// The setter binding map: canonical symbol keys and file-scoped fallbacks,
/// both always written where possible, both consulted on lookup.
#[derive(Debug, Clone, Default)]
pub struct SetterBindings {
    by_key: BTreeMap<String, SetterBinding>,
    by_name: BTreeMap<String, SetterBinding>,
}

impl SetterBindings {
    pub fn insert(
        &mut self,
        key: Option<SymbolKey>,
        file: &str,
        name: &str,
        binding: SetterBinding,
    ) {
        if let Some(key) = key {
            self.by_key.insert(key.text(), binding.clone());
        }
        self.by_name.insert(name_key(file, name), binding);
    }

    /// Look up the binding for an identifier referenced in `file`.
    pub fn lookup(&self, resolver: &Resolver, file: &str, name: &str) -> Option<&SetterBinding> {
        if let Some(resolution) = resolver.resolve(file, name)
            && let Some(binding) = self.by_key.get(&resolution.key.text())
        {
            return Some(binding);
        }
        self.by_name.get(&name_key(file, name))
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_key.is_empty()
    }
}

/// What a resolved call produces, from a binding point of view.
#[derive(Debug, Clone)]
enum BindingShape {
    /// A single setter/resetter value.
    Setter(SetterBinding),
    /// A `[value, setter]` tuple.
    Tuple { state_id: String },
    /// An object literal whose named properties are known setters.
    Object { props: BTreeMap<String, SetterBinding> },
}

/// Resolve setter bindings for the whole project.
///
/// With `wrappers` off only direct hook-factory declarations bind; with it
/// on, calls to user functions are analyzed recursively (memoized and
/// cycle-guarded) for returned setters.
pub fn resolve_setter_bindings(
    project: &Project,
    resolver: &Resolver,
    index: &SymbolIndex,
    wrappers: bool,
) -> SetterBindings {
    let analyzer = WrapperAnalyzer {
        resolver,
        index,
        cache: RefCell::new(BTreeMap::new()),
        in_flight: RefCell::new(BTreeSet::new()),
    };
    let mut bindings = SetterBindings::default();
    for file in project.files() {
        let mut collector = SetterCollector {
            file: &file.file_path,
            analyzer: &analyzer,
            wrappers,
            out: &mut bindings,
        };
        file.module.visit_with(&mut collector);
    }
    bindings
}

struct SetterCollector<'a> {
    file: &'a str,
    analyzer: &'a WrapperAnalyzer<'a>,
    wrappers: bool,
    out: &'a mut SetterBindings,
}

impl Visit for SetterCollector<'_> {
    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        if let Some(init) = &declarator.init
            && let Expr::Call(call) = unwrap_expr(init)
        {
            let shape = if self.wrappers {
                self.analyzer.call_shape(self.file, call)
            } else {
                factory_shape(self.analyzer.resolver, self.analyzer.index, self.file, call)
            };
            if let Some(shape) = shape {
                bind_declarator(self.out, self.file, &declarator.name, &shape);
            }
        }
        declarator.visit_children_with(self);
    }
}

/// Bind a declarator pattern against the shape of its initializer call.
fn bind_declarator(out: &mut SetterBindings, file: &str, pat: &Pat, shape: &BindingShape) {
    match (pat, shape) {
        (Pat::Ident(ident), BindingShape::Setter(binding)) => {
            let name = ident.id.sym.to_string();
            out.insert(
                Some(SymbolKey::new(file, ident.id.span.lo.0, &name)),
                file,
                &name,
                binding.clone(),
            );
        }
        (Pat::Array(array), BindingShape::Tuple { state_id }) => {
            if let Some(Some(element)) = array.elems.get(1) {
                for (name, pos) in binding_idents(element) {
                    out.insert(
                        Some(SymbolKey::new(file, pos, &name)),
                        file,
                        &name,
                        SetterBinding {
                            state_id: state_id.clone(),
                            flavor: SetterFlavor::Set,
                        },
                    );
                }
            }
        }
        (Pat::Object(object), BindingShape::Object { props }) => {
            for (name, pos, binding) in object_pattern_bindings(object, props) {
                out.insert(Some(SymbolKey::new(file, pos, &name)), file, &name, binding);
            }
        }
        _ => {}
    }
}

/// Destructured names of an object pattern that match known object-shape
/// properties, with their positions.
fn object_pattern_bindings(
    object: &ObjectPat,
    props: &BTreeMap<String, SetterBinding>,
) -> Vec<(String, u32, SetterBinding)> {
    let mut out = Vec::new();
    for prop in &object.props {
        match prop {
            ObjectPatProp::Assign(assign) => {
                let name = assign.key.sym.to_string();
                if let Some(binding) = props.get(&name) {
                    out.push((name, assign.key.span.lo.0, binding.clone()));
                }
            }
            ObjectPatProp::KeyValue(kv) => {
                let Some(key) = prop_name(&kv.key) else {
                    continue;
                };
                if let Some(binding) = props.get(&key) {
                    for (name, pos) in binding_idents(&kv.value) {
                        out.push((name, pos, binding.clone()));
                    }
                }
            }
            ObjectPatProp::Rest(_) => {}
        }
    }
    out
}

/// Shape of a call to a known hook factory, or `None` for anything else.
fn factory_shape(
    resolver: &Resolver,
    index: &SymbolIndex,
    file: &str,
    call: &CallExpr,
) -> Option<BindingShape> {
    let (module, original) = resolver.callee_import(file, &call.callee)?;
    if let Some(flavor) = stores::setter_factory(&module, &original) {
        let state_id = state_arg(resolver, index, file, call)?;
        return Some(BindingShape::Setter(SetterBinding { state_id, flavor }));
    }
    if stores::is_tuple_factory(&module, &original) {
        let state_id = state_arg(resolver, index, file, call)?;
        return Some(BindingShape::Tuple { state_id });
    }
    None
}

fn state_arg(
    resolver: &Resolver,
    index: &SymbolIndex,
    file: &str,
    call: &CallExpr,
) -> Option<String> {
    let first = call.args.first()?;
    if first.spread.is_some() {
        return None;
    }
    index
        .resolve_state_expr(resolver, file, &first.expr)
        .map(|state| state.id.clone())
}

/// Memoized, cycle-guarded wrapper-hook analysis.
///
/// The cache records negative results too, so a function analyzed once is
/// never walked again. A cycle yields "no binding" for that path.
struct WrapperAnalyzer<'a> {
    resolver: &'a Resolver<'a>,
    index: &'a SymbolIndex,
    cache: RefCell<BTreeMap<String, Option<BindingShape>>>,
    in_flight: RefCell<BTreeSet<String>>,
}

impl WrapperAnalyzer<'_> {
    /// Shape of an arbitrary call: a known factory, or a user function
    /// analyzed as a wrapper.
    fn call_shape(&self, file: &str, call: &CallExpr) -> Option<BindingShape> {
        if let Some(shape) = factory_shape(self.resolver, self.index, file, call) {
            return Some(shape);
        }
        if let Some((module, _)) = self.resolver.callee_import(file, &call.callee)
            && stores::is_library_module(&module)
        {
            return None;
        }
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        let Expr::Ident(ident) = unwrap_expr(callee) else {
            return None;
        };
        for (decl_file, fn_like) in self.resolver.fn_likes(file, ident.sym.as_str()) {
            if let Some(shape) = self.analyze(&decl_file, fn_like) {
                return Some(shape);
            }
        }
        None
    }

    fn analyze(&self, file: &str, fn_like: FnLike) -> Option<BindingShape> {
        let key = format!("{}#{}", file, fn_like.span_lo());
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }
        if !self.in_flight.borrow_mut().insert(key.clone()) {
            return None;
        }
        let shape = self.analyze_body(file, fn_like);
        self.in_flight.borrow_mut().remove(&key);
        self.cache.borrow_mut().insert(key, shape.clone());
        shape
    }

    fn analyze_body(&self, file: &str, fn_like: FnLike) -> Option<BindingShape> {
        let mut value_bindings: BTreeMap<String, BindingShape> = BTreeMap::new();
        let mut local_setters: BTreeMap<String, SetterBinding> = BTreeMap::new();

        let mut declarators = Vec::new();
        if let Some(stmts) = fn_like.body_stmts() {
            collect_scope_var_declarators(stmts, &mut declarators);
        }
        for declarator in declarators {
            let Some(init) = &declarator.init else {
                continue;
            };
            let Expr::Call(call) = unwrap_expr(init) else {
                continue;
            };
            let Some(shape) = self.call_shape(file, call) else {
                continue;
            };
            register_local(&declarator.name, &shape, &mut value_bindings, &mut local_setters);
        }

        for ret in fn_like.return_exprs() {
            let shape = match unwrap_expr(ret) {
                Expr::Call(call) => self.call_shape(file, call),
                Expr::Ident(ident) => value_bindings.get(ident.sym.as_str()).cloned(),
                Expr::Object(object) => object_shape(object, &local_setters),
                _ => None,
            };
            if shape.is_some() {
                return shape;
            }
        }
        None
    }
}

/// Record what an inner declaration binds inside a wrapper body.
fn register_local(
    pat: &Pat,
    shape: &BindingShape,
    value_bindings: &mut BTreeMap<String, BindingShape>,
    local_setters: &mut BTreeMap<String, SetterBinding>,
) {
    match (pat, shape) {
        (Pat::Ident(ident), _) => {
            let name = ident.id.sym.to_string();
            if let BindingShape::Setter(binding) = shape {
                local_setters.insert(name.clone(), binding.clone());
            }
            value_bindings.insert(name, shape.clone());
        }
        (Pat::Array(array), BindingShape::Tuple { state_id }) => {
            if let Some(Some(element)) = array.elems.get(1) {
                for (name, _) in binding_idents(element) {
                    local_setters.insert(
                        name,
                        SetterBinding {
                            state_id: state_id.clone(),
                            flavor: SetterFlavor::Set,
                        },
                    );
                }
            }
        }
        (Pat::Object(object), BindingShape::Object { props }) => {
            for (name, _, binding) in object_pattern_bindings(object, props) {
                local_setters.insert(name, binding);
            }
        }
        _ => {}
    }
}

/// An object-literal return: a property is included only when its value is a
/// bare identifier (or shorthand) naming a known local setter.
fn object_shape(
    object: &ObjectLit,
    local_setters: &BTreeMap<String, SetterBinding>,
) -> Option<BindingShape> {
    let mut props = BTreeMap::new();
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        match prop.as_ref() {
            Prop::Shorthand(ident) => {
                if let Some(binding) = local_setters.get(ident.sym.as_str()) {
                    props.insert(ident.sym.to_string(), binding.clone());
                }
            }
            Prop::KeyValue(kv) => {
                let Some(key) = prop_name(&kv.key) else {
                    continue;
                };
                if let Expr::Ident(value) = unwrap_expr(&kv.value)
                    && let Some(binding) = local_setters.get(value.sym.as_str())
                {
                    props.insert(key, binding.clone());
                }
            }
            _ => {}
        }
    }
    Some(BindingShape::Object { props })
}
