//! Symbol index - one pass over the project collecting every state symbol.
//!
//! The index answers three questions for the rest of the pipeline:
//! which states exist (and of what kind), "is this identifier a state
//! symbol?" (through the declaration-site lookup plus the file-scoped name
//! fallback), and "what call expression created this state?" (for the
//! dependency extractor, which re-walks selector compute functions).

use std::collections::BTreeMap;

use swc_ecma_ast::{CallExpr, Decl, Expr, ModuleDecl, ModuleItem, Pat, Prop, PropOrSpread, Stmt};

use crate::core::data::{SourceLocation, StateKind, StateSymbol, Store, state_id};
use crate::core::facade::{FnLike, Resolver, SymbolKey, name_key, prop_name, unwrap_expr};
use crate::core::parsers::{ParsedSource, Project};
use crate::core::stores;

pub struct SymbolIndex {
    states: Vec<StateSymbol>,
    by_id: BTreeMap<String, usize>,
    by_decl_key: BTreeMap<String, usize>,
    by_file_name: BTreeMap<String, usize>,
    /// Owned clones of each state's factory call, for re-walking compute
    /// functions later. Spans stay valid against the owning file's map.
    init_calls: BTreeMap<String, CallExpr>,
}

impl SymbolIndex {
    pub fn build(project: &Project, resolver: &Resolver) -> Self {
        let mut collected: Vec<(StateSymbol, String, CallExpr)> = Vec::new();
        for file in project.files() {
            collect_file(file, resolver, &mut collected);
        }

        // Stable iteration order for everything downstream.
        collected.sort_by(|(a, _, _), (b, _, _)| {
            (&a.location.file_path, a.location.line, &a.name).cmp(&(
                &b.location.file_path,
                b.location.line,
                &b.name,
            ))
        });

        let mut index = Self {
            states: Vec::with_capacity(collected.len()),
            by_id: BTreeMap::new(),
            by_decl_key: BTreeMap::new(),
            by_file_name: BTreeMap::new(),
            init_calls: BTreeMap::new(),
        };
        for (i, (state, decl_key, init_call)) in collected.into_iter().enumerate() {
            index.by_id.insert(state.id.clone(), i);
            index.by_decl_key.insert(decl_key, i);
            index
                .by_file_name
                .insert(name_key(&state.location.file_path, &state.name), i);
            index.init_calls.insert(state.id.clone(), init_call);
            index.states.push(state);
        }

        let plain_flags = index.compute_plain_flags(resolver);
        for (i, plain) in plain_flags {
            index.states[i].plain_recoil_atom = plain;
        }

        index
    }

    /// Second pass: a Recoil atom is "plain" unless its `default` is a
    /// selector/selectorFamily call or a reference resolving to one.
    fn compute_plain_flags(&self, resolver: &Resolver) -> Vec<(usize, bool)> {
        let mut flags = Vec::new();
        for (i, state) in self.states.iter().enumerate() {
            if state.store != Store::Recoil || state.kind != StateKind::Atom {
                continue;
            }
            flags.push((i, self.atom_default_is_plain(resolver, state)));
        }
        flags
    }

    fn atom_default_is_plain(&self, resolver: &Resolver, state: &StateSymbol) -> bool {
        let file = state.location.file_path.as_str();
        let Some(call) = self.init_calls.get(&state.id) else {
            return true;
        };
        let Some(default_expr) = atom_default_expr(call) else {
            return true;
        };
        match unwrap_expr(default_expr) {
            Expr::Call(default_call) => {
                if let Some((module, original)) =
                    resolver.callee_import(file, &default_call.callee)
                    && stores::is_recoil_selector_factory(&module, &original)
                {
                    return false;
                }
                // A selectorFamily instance: `default: itemQuery(1)`.
                if let Some(target) = self.resolve_state_expr(resolver, file, default_expr) {
                    return !is_recoil_selector_state(target);
                }
                true
            }
            Expr::Ident(_) => match self.resolve_state_expr(resolver, file, default_expr) {
                Some(target) => !is_recoil_selector_state(target),
                None => true,
            },
            _ => true,
        }
    }

    pub fn states(&self) -> &[StateSymbol] {
        &self.states
    }

    pub fn get(&self, id: &str) -> Option<&StateSymbol> {
        self.by_id.get(id).map(|&i| &self.states[i])
    }

    pub fn init_call(&self, id: &str) -> Option<&CallExpr> {
        self.init_calls.get(id)
    }

    pub fn by_declaration_key(&self, key_text: &str) -> Option<&StateSymbol> {
        self.by_decl_key.get(key_text).map(|&i| &self.states[i])
    }

    /// Resolve an expression used where a state is expected: a bare
    /// identifier, or a family instance call (`itemFamily(id)`). Consults the
    /// declaration-site lookup first and the file-scoped name fallback second.
    pub fn resolve_state_expr(
        &self,
        resolver: &Resolver,
        file: &str,
        expr: &Expr,
    ) -> Option<&StateSymbol> {
        match unwrap_expr(expr) {
            Expr::Ident(ident) => self.resolve_state_name(resolver, file, ident.sym.as_str()),
            Expr::Call(call) => {
                let swc_ecma_ast::Callee::Expr(callee) = &call.callee else {
                    return None;
                };
                let Expr::Ident(ident) = unwrap_expr(callee) else {
                    return None;
                };
                self.resolve_state_name(resolver, file, ident.sym.as_str())
                    .filter(|state| {
                        matches!(state.kind, StateKind::AtomFamily | StateKind::SelectorFamily)
                    })
            }
            _ => None,
        }
    }

    pub fn resolve_state_name(
        &self,
        resolver: &Resolver,
        file: &str,
        name: &str,
    ) -> Option<&StateSymbol> {
        if let Some(resolution) = resolver.resolve(file, name)
            && let Some(&i) = self.by_decl_key.get(&resolution.key.text())
        {
            return Some(&self.states[i]);
        }
        self.by_file_name
            .get(&name_key(file, name))
            .map(|&i| &self.states[i])
    }

    /// The state whose factory call covers `pos` in `file`, if any.
    /// Used to tell dependency-scope reads apart from runtime reads.
    pub fn covering_init_state(&self, file: &str, pos: u32) -> Option<&StateSymbol> {
        for (id, call) in &self.init_calls {
            let Some(state) = self.get(id) else { continue };
            if state.location.file_path == file
                && call.span.lo.0 <= pos
                && pos < call.span.hi.0
            {
                return Some(state);
            }
        }
        None
    }
}

fn collect_file(
    file: &ParsedSource,
    resolver: &Resolver,
    out: &mut Vec<(StateSymbol, String, CallExpr)>,
) {
    for item in &file.module.body {
        let decl = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
            _ => continue,
        };
        let Decl::Var(var) = decl else { continue };
        for declarator in &var.decls {
            let Pat::Ident(ident) = &declarator.name else {
                continue;
            };
            let Some(init) = &declarator.init else {
                continue;
            };
            let Expr::Call(call) = unwrap_expr(init) else {
                continue;
            };
            let Some((store, kind)) = classify_factory_call(resolver, &file.file_path, call)
            else {
                continue;
            };

            let name = ident.id.sym.to_string();
            let id = state_id(&file.file_path, &name);
            let location =
                SourceLocation::from_pos(&file.file_path, &file.source_map, ident.id.span.lo);
            let decl_key = SymbolKey::new(&file.file_path, ident.id.span.lo.0, &name).text();

            out.push((
                StateSymbol {
                    id,
                    name: name.clone(),
                    store,
                    kind,
                    location,
                    exported: resolver.is_exported(&file.file_path, &name),
                    plain_recoil_atom: false,
                },
                decl_key,
                call.clone(),
            ));
        }
    }
}

fn is_recoil_selector_state(state: &StateSymbol) -> bool {
    state.store == Store::Recoil
        && matches!(state.kind, StateKind::Selector | StateKind::SelectorFamily)
}

/// The initializer of the `default` property of an atom's options object.
fn atom_default_expr(call: &CallExpr) -> Option<&Expr> {
    let first = call.args.first()?;
    let Expr::Object(options) = unwrap_expr(&first.expr) else {
        return None;
    };
    for prop in &options.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        if let Prop::KeyValue(kv) = prop.as_ref()
            && prop_name(&kv.key).as_deref() == Some("default")
        {
            return Some(&kv.value);
        }
    }
    None
}

/// Decide store and kind from the factory call's imported identity.
fn classify_factory_call(
    resolver: &Resolver,
    file: &str,
    call: &CallExpr,
) -> Option<(Store, StateKind)> {
    let (module, original) = resolver.callee_import(file, &call.callee)?;
    match (module.as_str(), original.as_str()) {
        (stores::RECOIL, "atom") => Some((Store::Recoil, StateKind::Atom)),
        (stores::RECOIL, "selector") => Some((Store::Recoil, StateKind::Selector)),
        (stores::RECOIL, "atomFamily") => Some((Store::Recoil, StateKind::AtomFamily)),
        (stores::RECOIL, "selectorFamily") => Some((Store::Recoil, StateKind::SelectorFamily)),
        (stores::JOTAI, "atom") => {
            let derived = call
                .args
                .first()
                .and_then(|arg| FnLike::from_expr(&arg.expr))
                .is_some();
            if derived {
                Some((Store::Jotai, StateKind::DerivedAtom))
            } else {
                Some((Store::Jotai, StateKind::Atom))
            }
        }
        (stores::JOTAI_UTILS, "atomFamily") => Some((Store::Jotai, StateKind::AtomFamily)),
        (stores::JOTAI_UTILS, "atomWithDefault") => {
            Some((Store::Jotai, StateKind::AtomWithDefault))
        }
        _ => None,
    }
}
