//! Write events from setter-call sites, setter references in JSX event
//! attributes, and direct `set`/`reset` mutation calls.
//!
//! The direct-mutation shape is deliberately permissive: any call whose
//! callee is literally `set` or `reset` with a first argument resolving to a
//! known state counts, whether or not a binding analysis reached it. This is
//! what catches `({ set }) => initializeCounter(set)`-style initialization
//! helpers without callback analysis.

use swc_ecma_ast::{CallExpr, Callee, Expr, JSXAttr, MemberProp};
use swc_ecma_visit::VisitWith;

use crate::core::bindings::SetterFlavor;
use crate::core::data::{EventType, Phase, SourceLocation, UsageEvent};
use crate::core::extract::{
    Extractor, ExtractorOutput, PipelineContext, SiteHandler, SourceWalker, WalkContext, via,
};
use crate::core::facade::{jsx, unwrap_expr};
use crate::core::parsers::ParsedSource;

pub struct SetterCalls;

impl Extractor for SetterCalls {
    fn name(&self) -> &'static str {
        "setter-calls"
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        for file in ctx.project.files() {
            let mut handler = SetterCallHandler {
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

struct SetterCallHandler<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    events: &'a mut Vec<UsageEvent>,
}

impl SetterCallHandler<'_, '_> {
    fn push_write(&mut self, state_id: String, tag: &str, pos: swc_common::BytePos, cx: &WalkContext) {
        self.events.push(UsageEvent {
            event_type: if cx.in_init {
                EventType::InitWrite
            } else {
                EventType::RuntimeWrite
            },
            phase: Phase::Runtime,
            state_id,
            actor: cx.actor.clone(),
            location: SourceLocation::from_pos(
                &self.file.file_path,
                &self.file.source_map,
                pos,
            ),
            via: via::init_decorated(tag, cx.in_init),
        });
    }

    /// A call whose callee is literally `set`/`reset`.
    fn mutation_call(&mut self, call: &CallExpr, name: &str, cx: &WalkContext) {
        let Some(first) = call.args.first() else {
            return;
        };
        if first.spread.is_some() {
            return;
        }
        let Some(state) = self.ctx.index.resolve_state_expr(
            self.ctx.resolver,
            &self.file.file_path,
            &first.expr,
        ) else {
            return;
        };
        let tag = if name == "reset" { via::RESET } else { via::SET };
        self.push_write(state.id.clone(), tag, call.span.lo, cx);
    }
}

impl SiteHandler for SetterCallHandler<'_, '_> {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext) {
        let file = &self.file.file_path;
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        match unwrap_expr(callee) {
            Expr::Ident(ident) => {
                let name = ident.sym.as_str();
                if let Some(binding) = self.ctx.setters.lookup(self.ctx.resolver, file, name) {
                    let tag = match binding.flavor {
                        SetterFlavor::Set => via::SETTER_CALL,
                        SetterFlavor::Reset => via::RESET_CALL,
                    };
                    let state_id = binding.state_id.clone();
                    self.push_write(state_id, tag, call.span.lo, cx);
                } else if name == "set" || name == "reset" {
                    self.mutation_call(call, name, cx);
                }
            }
            Expr::Member(member) => {
                let MemberProp::Ident(prop) = &member.prop else {
                    return;
                };
                let name = prop.sym.as_str();
                if name != "set" && name != "reset" {
                    return;
                }
                // Handle writes belong to the imperative-handle extractor.
                let is_handle = matches!(
                    unwrap_expr(&member.obj),
                    Expr::Ident(base)
                        if self.ctx.handles.contains(self.ctx.resolver, file, base.sym.as_str())
                );
                if !is_handle {
                    self.mutation_call(call, name, cx);
                }
            }
            _ => {}
        }
    }

    fn jsx_attr(&mut self, attr: &JSXAttr, cx: &WalkContext) {
        if !jsx::attr_name(attr).starts_with("on") {
            return;
        }
        let Some(ident) = jsx::attr_sole_ident(attr) else {
            return;
        };
        let Some(binding) =
            self.ctx
                .setters
                .lookup(self.ctx.resolver, &self.file.file_path, ident.sym.as_str())
        else {
            return;
        };
        let state_id = binding.state_id.clone();
        self.push_write(state_id, via::SETTER_REFERENCE, ident.span.lo, cx);
    }
}
