//! State→state dependency edges from compute functions.
//!
//! Four owner shapes produce edges: Recoil selectors/selector families,
//! Recoil atoms whose default is a selector, Jotai derived atoms /
//! atoms-with-default, and Jotai atom families whose factory returns derived
//! atoms. Every edge is paired with a dependency-phase read event at the
//! same location with the same via.

use std::collections::BTreeSet;
use std::sync::Arc;

use swc_common::SourceMap;
use swc_ecma_ast::{
    CallExpr, Callee, Expr, MemberProp, ObjectPatProp, Pat, Prop, PropOrSpread,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::data::{
    Actor, DependencyEdge, EventType, Phase, SourceLocation, StateKind, StateSymbol, Store,
    UsageEvent,
};
use crate::core::extract::{Extractor, ExtractorOutput, PipelineContext, via};
use crate::core::facade::functions::collect_fn_decls;
use crate::core::facade::patterns::binding_names;
use crate::core::facade::{FnLike, prop_name, unwrap_expr};
use crate::core::stores;

pub struct Dependencies;

impl Extractor for Dependencies {
    fn name(&self) -> &'static str {
        "dependencies"
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        for state in ctx.index.states() {
            extract_for_state(ctx, state, &mut output);
        }
        output
    }
}

fn extract_for_state(ctx: &PipelineContext, owner: &StateSymbol, out: &mut ExtractorOutput) {
    let Some(call) = ctx.index.init_call(&owner.id) else {
        return;
    };
    let file = owner.location.file_path.clone();
    let Some(source_map) = ctx.project.get(&file).map(|f| f.source_map.clone()) else {
        return;
    };

    match (owner.store, owner.kind) {
        (Store::Recoil, StateKind::Selector) | (Store::Recoil, StateKind::SelectorFamily) => {
            scan_recoil_options(ctx, owner, call, &file, &source_map, out);
        }
        (Store::Recoil, StateKind::Atom) => {
            scan_recoil_atom_default(ctx, owner, call, &file, &source_map, out);
        }
        (Store::Jotai, StateKind::DerivedAtom) | (Store::Jotai, StateKind::AtomWithDefault) => {
            if let Some(first) = call.args.first()
                && let Some(read_fn) = FnLike::from_expr(&first.expr)
            {
                scan_jotai_read_fn(ctx, owner, read_fn, &file, &source_map, out);
            }
        }
        (Store::Jotai, StateKind::AtomFamily) => {
            scan_jotai_family(ctx, owner, call, &file, &source_map, out);
        }
        _ => {}
    }
}

/// Case: Recoil atom whose `default` is a selector - the atom owns the
/// selector's reads. Covers both an inline selector call and a reference to
/// a selector declared elsewhere.
fn scan_recoil_atom_default(
    ctx: &PipelineContext,
    owner: &StateSymbol,
    call: &CallExpr,
    file: &str,
    source_map: &Arc<SourceMap>,
    out: &mut ExtractorOutput,
) {
    let Some(options) = call.args.first().map(|a| unwrap_expr(&a.expr)) else {
        return;
    };
    let Expr::Object(options) = options else {
        return;
    };
    let Some(default_expr) = options.props.iter().find_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match prop.as_ref() {
            Prop::KeyValue(kv) if prop_name(&kv.key).as_deref() == Some("default") => {
                Some(&kv.value)
            }
            _ => None,
        }
    }) else {
        return;
    };

    match unwrap_expr(default_expr) {
        Expr::Call(default_call) => {
            if let Some((module, original)) = ctx.resolver.callee_import(file, &default_call.callee)
                && stores::is_recoil_selector_factory(&module, &original)
            {
                scan_recoil_options(ctx, owner, default_call, file, source_map, out);
            }
        }
        Expr::Ident(_) => {
            let Some(target) = ctx
                .index
                .resolve_state_expr(ctx.resolver, file, default_expr)
            else {
                return;
            };
            if target.store != Store::Recoil
                || !matches!(target.kind, StateKind::Selector | StateKind::SelectorFamily)
            {
                return;
            }
            let target_file = target.location.file_path.clone();
            let Some(target_map) = ctx.project.get(&target_file).map(|f| f.source_map.clone())
            else {
                return;
            };
            if let Some(target_call) = ctx.index.init_call(&target.id) {
                scan_recoil_options(ctx, owner, target_call, &target_file, &target_map, out);
            }
        }
        _ => {}
    }
}

/// Case: Recoil selector options object. The `get` property (method
/// shorthand or function-valued property) is the root read scope; a curried
/// family `get` contributes its returned function, and nested function
/// declarations contribute their own scopes for inner helpers.
fn scan_recoil_options(
    ctx: &PipelineContext,
    owner: &StateSymbol,
    call: &CallExpr,
    file: &str,
    source_map: &Arc<SourceMap>,
    out: &mut ExtractorOutput,
) {
    let Some(options) = call.args.first().map(|a| unwrap_expr(&a.expr)) else {
        return;
    };
    let Expr::Object(options) = options else {
        return;
    };

    let mut root: Option<FnLike> = None;
    for prop in &options.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        match prop.as_ref() {
            Prop::Method(method) if prop_name(&method.key).as_deref() == Some("get") => {
                root = Some(FnLike::Fn(&method.function));
            }
            Prop::KeyValue(kv) if prop_name(&kv.key).as_deref() == Some("get") => {
                root = FnLike::from_expr(&kv.value);
            }
            _ => {}
        }
    }
    let Some(root) = root else {
        return;
    };

    let mut scopes = vec![root];
    for ret in root.return_exprs() {
        if let Some(inner) = FnLike::from_expr(ret) {
            scopes.push(inner);
        }
    }
    let mut fn_decls = Vec::new();
    if let Some(stmts) = root.body_stmts() {
        collect_fn_decls(stmts, &mut fn_decls);
    }
    scopes.extend(fn_decls.iter().map(|decl| FnLike::Fn(&decl.function)));

    for scope in scopes {
        let names = ReadScopeNames::from_param(scope.param(0));
        let mut scanner = RecoilDepScanner {
            ctx,
            owner,
            file,
            source_map,
            names,
            out,
        };
        scope.visit_body_with(&mut scanner);
    }
}

/// Case: Jotai atom family whose factory returns derived atoms.
fn scan_jotai_family(
    ctx: &PipelineContext,
    owner: &StateSymbol,
    call: &CallExpr,
    file: &str,
    source_map: &Arc<SourceMap>,
    out: &mut ExtractorOutput,
) {
    let Some(first) = call.args.first() else {
        return;
    };
    let Some(factory) = FnLike::from_expr(&first.expr) else {
        return;
    };
    for ret in factory.return_exprs() {
        let Expr::Call(returned) = unwrap_expr(ret) else {
            continue;
        };
        let Some((module, original)) = ctx.resolver.callee_import(file, &returned.callee) else {
            continue;
        };
        let is_derived_factory = (module == stores::JOTAI && original == "atom")
            || (module == stores::JOTAI_UTILS && original == "atomWithDefault");
        if !is_derived_factory {
            continue;
        }
        if let Some(inner_first) = returned.args.first()
            && let Some(read_fn) = FnLike::from_expr(&inner_first.expr)
        {
            scan_jotai_read_fn(ctx, owner, read_fn, file, source_map, out);
        }
    }
}

/// Case: Jotai read function - first parameter is the `get` name
/// (defaulting to `"get"` when destructured away or absent).
fn scan_jotai_read_fn(
    ctx: &PipelineContext,
    owner: &StateSymbol,
    read_fn: FnLike,
    file: &str,
    source_map: &Arc<SourceMap>,
    out: &mut ExtractorOutput,
) {
    let get_name = match read_fn.param(0) {
        Some(Pat::Ident(ident)) => ident.id.sym.to_string(),
        _ => "get".to_string(),
    };
    let mut scanner = JotaiDepScanner {
        ctx,
        owner,
        file,
        source_map,
        get_name,
        out,
    };
    read_fn.visit_body_with(&mut scanner);
}

/// Names a Recoil read scope binds from its first parameter: either a
/// context identifier or destructured `get` locals.
struct ReadScopeNames {
    context_name: Option<String>,
    get_names: BTreeSet<String>,
}

impl ReadScopeNames {
    fn from_param(param: Option<&Pat>) -> Self {
        let mut names = Self {
            context_name: None,
            get_names: BTreeSet::new(),
        };
        match param {
            Some(Pat::Ident(ident)) => {
                names.context_name = Some(ident.id.sym.to_string());
            }
            Some(Pat::Object(object)) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::Assign(assign) => {
                            if assign.key.sym.as_str() == "get" {
                                names.get_names.insert("get".to_string());
                            }
                        }
                        ObjectPatProp::KeyValue(kv) => {
                            if prop_name(&kv.key).as_deref() == Some("get") {
                                names.get_names.extend(binding_names(&kv.value));
                            }
                        }
                        ObjectPatProp::Rest(_) => {}
                    }
                }
            }
            _ => {}
        }
        names
    }
}

struct RecoilDepScanner<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    owner: &'a StateSymbol,
    file: &'a str,
    source_map: &'a Arc<SourceMap>,
    names: ReadScopeNames,
    out: &'a mut ExtractorOutput,
}

impl Visit for RecoilDepScanner<'_, '_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Callee::Expr(callee) = &call.callee {
            match unwrap_expr(callee) {
                Expr::Ident(ident) => {
                    if self.names.get_names.contains(ident.sym.as_str()) {
                        emit_dependency(
                            self.ctx,
                            self.owner,
                            call,
                            self.file,
                            self.source_map,
                            via::RECOIL_GET,
                            self.out,
                        );
                    }
                }
                Expr::Member(member) => {
                    if let MemberProp::Ident(prop) = &member.prop
                        && prop.sym.as_str() == "get"
                        && let Expr::Ident(object) = unwrap_expr(&member.obj)
                    {
                        let object_name = object.sym.as_str();
                        if self.names.context_name.as_deref() == Some(object_name) {
                            emit_dependency(
                                self.ctx,
                                self.owner,
                                call,
                                self.file,
                                self.source_map,
                                via::RECOIL_GET,
                                self.out,
                            );
                        } else if self.ctx.handles.contains(self.ctx.resolver, self.file, object_name)
                        {
                            // Cross-store read through an imperative handle.
                            emit_dependency(
                                self.ctx,
                                self.owner,
                                call,
                                self.file,
                                self.source_map,
                                via::JOTAI_STORE_GET,
                                self.out,
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        call.visit_children_with(self);
    }
}

struct JotaiDepScanner<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    owner: &'a StateSymbol,
    file: &'a str,
    source_map: &'a Arc<SourceMap>,
    get_name: String,
    out: &'a mut ExtractorOutput,
}

impl Visit for JotaiDepScanner<'_, '_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Callee::Expr(callee) = &call.callee
            && let Expr::Ident(ident) = unwrap_expr(callee)
            && ident.sym.as_str() == self.get_name
        {
            emit_dependency(
                self.ctx,
                self.owner,
                call,
                self.file,
                self.source_map,
                via::JOTAI_GET,
                self.out,
            );
        }
        call.visit_children_with(self);
    }
}

/// Record one dependency: the edge and its paired dependency-phase read
/// event, both at the call site.
fn emit_dependency(
    ctx: &PipelineContext,
    owner: &StateSymbol,
    call: &CallExpr,
    file: &str,
    source_map: &Arc<SourceMap>,
    via: &str,
    out: &mut ExtractorOutput,
) {
    let Some(first) = call.args.first() else {
        return;
    };
    let Some(target) = ctx.index.resolve_state_expr(ctx.resolver, file, &first.expr) else {
        return;
    };
    let location = SourceLocation::from_pos(file, source_map, call.span.lo);
    out.edges.push(DependencyEdge {
        from_state_id: owner.id.clone(),
        to_state_id: target.id.clone(),
        location: location.clone(),
        via: via.to_string(),
    });
    out.events.push(UsageEvent {
        event_type: EventType::Read,
        phase: Phase::Dependency,
        state_id: target.id.clone(),
        actor: Actor::state(&owner.name, &owner.id),
        location,
        via: via.to_string(),
    });
}
