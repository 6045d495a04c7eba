//! Callback-factory analysis: `useRecoilCallback` and `useAtomCallback`.
//!
//! The factory's function argument (optionally behind one generic
//! `useCallback` memo-wrap) gets its context parameter destructured, and the
//! body is walked for reads and writes through the bound names. Recognition
//! of `get`/`set`/`reset`/`snapshot.<method>` is string-based because the
//! frameworks' contracts are string-based; scoping to the names bound from
//! the first parameter keeps coincidental collisions out.

use std::collections::{BTreeMap, BTreeSet};

use swc_ecma_ast::{CallExpr, Callee, Expr, MemberProp, ObjectPatProp, Pat};
use swc_ecma_visit::VisitWith;

use crate::core::data::{Actor, EventType, Phase, SourceLocation, UsageEvent};
use crate::core::extract::{
    Extractor, ExtractorOutput, PipelineContext, SiteHandler, SourceWalker, WalkContext, via,
};
use crate::core::facade::patterns::binding_names;
use crate::core::facade::{FnLike, prop_name, unwrap_expr};
use crate::core::parsers::ParsedSource;
use crate::core::pipeline::CapabilityProfile;
use crate::core::stores;

pub struct Callbacks;

impl Extractor for Callbacks {
    fn name(&self) -> &'static str {
        "callbacks"
    }

    fn enabled(&self, profile: &CapabilityProfile) -> bool {
        profile.callbacks
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        for file in ctx.project.files() {
            let mut handler = CallbackSiteHandler {
                ctx,
                file,
                events: &mut output.events,
            };
            let mut walker = SourceWalker::new(&mut handler);
            file.module.visit_with(&mut walker);
        }
        output
    }
}

struct CallbackSiteHandler<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    events: &'a mut Vec<UsageEvent>,
}

impl CallbackSiteHandler<'_, '_> {
    /// The factory's function argument, unwrapping one optional
    /// `useCallback(fn, deps)` indirection.
    fn callback_fn<'b>(&self, call: &'b CallExpr) -> Option<FnLike<'b>> {
        let first = call.args.first()?;
        if first.spread.is_some() {
            return None;
        }
        let expr = unwrap_expr(&first.expr);
        if let Expr::Call(inner) = expr
            && let Some((module, original)) = self
                .ctx
                .resolver
                .callee_import(&self.file.file_path, &inner.callee)
            && stores::is_memo_wrap(&module, &original)
        {
            let inner_first = inner.args.first()?;
            return FnLike::from_expr(&inner_first.expr);
        }
        FnLike::from_expr(expr)
    }

    fn recoil_callback(&mut self, call: &CallExpr, cx: &WalkContext) {
        let Some(fn_like) = self.callback_fn(call) else {
            return;
        };
        let binding = RecoilContextBinding::from_param(fn_like.param(0));
        let mut scanner = RecoilBodyScanner {
            ctx: self.ctx,
            file: self.file,
            actor: cx.actor.clone(),
            binding,
            events: &mut *self.events,
        };
        let mut walker = SourceWalker::with_init(&mut scanner, cx.in_init);
        fn_like.visit_body_with(&mut walker);
    }

    fn jotai_callback(&mut self, call: &CallExpr, cx: &WalkContext) {
        let Some(fn_like) = self.callback_fn(call) else {
            return;
        };
        let param_name = |index: usize, fallback: &str| -> String {
            match fn_like.param(index) {
                Some(Pat::Ident(ident)) => ident.id.sym.to_string(),
                _ => fallback.to_string(),
            }
        };
        let mut scanner = JotaiBodyScanner {
            ctx: self.ctx,
            file: self.file,
            actor: cx.actor.clone(),
            get_name: param_name(0, "get"),
            set_name: param_name(1, "set"),
            events: &mut *self.events,
        };
        let mut walker = SourceWalker::with_init(&mut scanner, cx.in_init);
        fn_like.visit_body_with(&mut walker);
    }
}

impl SiteHandler for CallbackSiteHandler<'_, '_> {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext) {
        let Some((module, original)) = self
            .ctx
            .resolver
            .callee_import(&self.file.file_path, &call.callee)
        else {
            return;
        };
        if stores::is_recoil_callback_factory(&module, &original) {
            self.recoil_callback(call, cx);
        } else if stores::is_jotai_callback_factory(&module, &original) {
            self.jotai_callback(call, cx);
        }
    }
}

/// Names bound from a Recoil callback's context parameter.
#[derive(Default)]
struct RecoilContextBinding {
    /// Plain context parameter: `useRecoilCallback((ctx) => ...)`.
    context_name: Option<String>,
    set_names: BTreeSet<String>,
    reset_names: BTreeSet<String>,
    snapshot_names: BTreeSet<String>,
    /// Snapshot read methods destructured to locals: local → method name.
    snapshot_methods: BTreeMap<String, String>,
}

impl RecoilContextBinding {
    fn from_param(param: Option<&Pat>) -> Self {
        let mut binding = Self::default();
        match param {
            Some(Pat::Ident(ident)) => {
                binding.context_name = Some(ident.id.sym.to_string());
            }
            Some(Pat::Object(object)) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::Assign(assign) => {
                            let name = assign.key.sym.to_string();
                            match name.as_str() {
                                "set" => {
                                    binding.set_names.insert(name);
                                }
                                "reset" => {
                                    binding.reset_names.insert(name);
                                }
                                "snapshot" => {
                                    binding.snapshot_names.insert(name);
                                }
                                _ => {}
                            }
                        }
                        ObjectPatProp::KeyValue(kv) => {
                            let Some(key) = prop_name(&kv.key) else {
                                continue;
                            };
                            match key.as_str() {
                                "set" => binding.set_names.extend(binding_names(&kv.value)),
                                "reset" => binding.reset_names.extend(binding_names(&kv.value)),
                                "snapshot" => binding.bind_snapshot(&kv.value),
                                _ => {}
                            }
                        }
                        ObjectPatProp::Rest(_) => {}
                    }
                }
            }
            _ => {}
        }
        binding
    }

    fn bind_snapshot(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(ident) => {
                self.snapshot_names.insert(ident.id.sym.to_string());
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::Assign(assign) => {
                            let name = assign.key.sym.to_string();
                            if stores::SNAPSHOT_READ_METHODS.contains(&name.as_str()) {
                                self.snapshot_methods.insert(name.clone(), name);
                            }
                        }
                        ObjectPatProp::KeyValue(kv) => {
                            let Some(method) = prop_name(&kv.key) else {
                                continue;
                            };
                            if stores::SNAPSHOT_READ_METHODS.contains(&method.as_str()) {
                                for local in binding_names(&kv.value) {
                                    self.snapshot_methods.insert(local, method.clone());
                                }
                            }
                        }
                        ObjectPatProp::Rest(_) => {}
                    }
                }
            }
            _ => {}
        }
    }
}

struct RecoilBodyScanner<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    /// The component/hook the callback belongs to, captured at the factory
    /// call site; the callback body itself is anonymous.
    actor: Actor,
    binding: RecoilContextBinding,
    events: &'a mut Vec<UsageEvent>,
}

impl RecoilBodyScanner<'_, '_> {
    fn state_arg(&self, call: &CallExpr) -> Option<String> {
        let first = call.args.first()?;
        self.ctx
            .index
            .resolve_state_expr(self.ctx.resolver, &self.file.file_path, &first.expr)
            .map(|state| state.id.clone())
    }

    fn push_read(&mut self, call: &CallExpr, via: String) {
        let Some(state_id) = self.state_arg(call) else {
            return;
        };
        self.events.push(UsageEvent {
            event_type: EventType::Read,
            phase: Phase::Runtime,
            state_id,
            actor: self.actor.clone(),
            location: SourceLocation::from_pos(
                &self.file.file_path,
                &self.file.source_map,
                call.span.lo,
            ),
            via,
        });
    }

    fn push_write(&mut self, call: &CallExpr, tag: &str, cx: &WalkContext) {
        let Some(state_id) = self.state_arg(call) else {
            return;
        };
        self.events.push(UsageEvent {
            event_type: if cx.in_init {
                EventType::InitWrite
            } else {
                EventType::RuntimeWrite
            },
            phase: Phase::Runtime,
            state_id,
            actor: self.actor.clone(),
            location: SourceLocation::from_pos(
                &self.file.file_path,
                &self.file.source_map,
                call.span.lo,
            ),
            via: via::init_decorated(tag, cx.in_init),
        });
    }
}

impl SiteHandler for RecoilBodyScanner<'_, '_> {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext) {
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        match unwrap_expr(callee) {
            Expr::Ident(ident) => {
                let name = ident.sym.as_str();
                if let Some(method) = self.binding.snapshot_methods.get(name) {
                    let via = via::snapshot(method);
                    self.push_read(call, via);
                } else if self.binding.set_names.contains(name) {
                    self.push_write(call, via::CALLBACK_SET, cx);
                } else if self.binding.reset_names.contains(name) {
                    self.push_write(call, via::CALLBACK_RESET, cx);
                }
            }
            Expr::Member(member) => {
                let MemberProp::Ident(prop) = &member.prop else {
                    return;
                };
                let method = prop.sym.as_str();
                match unwrap_expr(&member.obj) {
                    // `snapshot.getPromise(state)`
                    Expr::Ident(object) => {
                        let object_name = object.sym.as_str();
                        if self.binding.snapshot_names.contains(object_name)
                            && stores::SNAPSHOT_READ_METHODS.contains(&method)
                        {
                            self.push_read(call, via::snapshot(method));
                        } else if self.binding.context_name.as_deref() == Some(object_name) {
                            match method {
                                "set" => self.push_write(call, via::CALLBACK_SET, cx),
                                "reset" => self.push_write(call, via::CALLBACK_RESET, cx),
                                _ => {}
                            }
                        }
                    }
                    // `ctx.snapshot.getPromise(state)`
                    Expr::Member(inner) => {
                        if let MemberProp::Ident(inner_prop) = &inner.prop
                            && inner_prop.sym.as_str() == "snapshot"
                            && let Expr::Ident(root) = unwrap_expr(&inner.obj)
                            && self.binding.context_name.as_deref() == Some(root.sym.as_str())
                            && stores::SNAPSHOT_READ_METHODS.contains(&method)
                        {
                            self.push_read(call, via::snapshot(method));
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

struct JotaiBodyScanner<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    actor: Actor,
    get_name: String,
    set_name: String,
    events: &'a mut Vec<UsageEvent>,
}

impl SiteHandler for JotaiBodyScanner<'_, '_> {
    fn call(&mut self, call: &CallExpr, _cx: &WalkContext) {
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        let Expr::Ident(ident) = unwrap_expr(callee) else {
            return;
        };
        let name = ident.sym.as_str();
        let is_get = name == self.get_name;
        let is_set = name == self.set_name;
        if !is_get && !is_set {
            return;
        }
        let Some(first) = call.args.first() else {
            return;
        };
        let Some(state) = self.ctx.index.resolve_state_expr(
            self.ctx.resolver,
            &self.file.file_path,
            &first.expr,
        ) else {
            return;
        };
        let location =
            SourceLocation::from_pos(&self.file.file_path, &self.file.source_map, call.span.lo);
        if is_get {
            self.events.push(UsageEvent {
                event_type: EventType::Read,
                phase: Phase::Runtime,
                state_id: state.id.clone(),
                actor: self.actor.clone(),
                location,
                via: via::CALLBACK_GET.to_string(),
            });
        } else {
            // Jotai callback writes are runtime by definition; the init
            // surface never reaches this hook.
            self.events.push(UsageEvent {
                event_type: EventType::RuntimeWrite,
                phase: Phase::Runtime,
                state_id: state.id.clone(),
                actor: self.actor.clone(),
                location,
                via: via::CALLBACK_SET.to_string(),
            });
        }
    }
}
