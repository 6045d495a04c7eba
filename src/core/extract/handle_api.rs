//! Imperative Jotai store-handle usage: `store.set(...)` writes and
//! `store.get(...)` reads.
//!
//! `store.get` inside a state's own factory call is a dependency read and
//! belongs to the dependency extractor; only calls outside every factory
//! span are runtime reads here.

use swc_ecma_ast::{CallExpr, Callee, Expr, MemberProp};
use swc_ecma_visit::VisitWith;

use crate::core::data::{EventType, Phase, SourceLocation, UsageEvent};
use crate::core::extract::{
    Extractor, ExtractorOutput, PipelineContext, SiteHandler, SourceWalker, WalkContext, via,
};
use crate::core::facade::unwrap_expr;
use crate::core::parsers::ParsedSource;
use crate::core::pipeline::CapabilityProfile;

pub struct HandleApi;

impl Extractor for HandleApi {
    fn name(&self) -> &'static str {
        "handle-api"
    }

    fn enabled(&self, profile: &CapabilityProfile) -> bool {
        profile.handle_api
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        for file in ctx.project.files() {
            let mut handler = HandleCallHandler {
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

struct HandleCallHandler<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    events: &'a mut Vec<UsageEvent>,
}

impl SiteHandler for HandleCallHandler<'_, '_> {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext) {
        let file = &self.file.file_path;
        let Callee::Expr(callee) = &call.callee else {
            return;
        };
        let Expr::Member(member) = unwrap_expr(callee) else {
            return;
        };
        let MemberProp::Ident(prop) = &member.prop else {
            return;
        };
        let Expr::Ident(base) = unwrap_expr(&member.obj) else {
            return;
        };
        if !self
            .ctx
            .handles
            .contains(self.ctx.resolver, file, base.sym.as_str())
        {
            return;
        }
        let Some(first) = call.args.first() else {
            return;
        };
        let Some(state) = self
            .ctx
            .index
            .resolve_state_expr(self.ctx.resolver, file, &first.expr)
        else {
            return;
        };
        let state_id = state.id.clone();
        let location = SourceLocation::from_pos(file, &self.file.source_map, call.span.lo);
        match prop.sym.as_str() {
            "set" => {
                self.events.push(UsageEvent {
                    event_type: if cx.in_init {
                        EventType::InitWrite
                    } else {
                        EventType::RuntimeWrite
                    },
                    phase: Phase::Runtime,
                    state_id,
                    actor: cx.actor.clone(),
                    location,
                    via: via::init_decorated(via::JOTAI_STORE_SET, cx.in_init),
                });
            }
            "get" => {
                // Inside a factory call this read is a dependency read.
                if self
                    .ctx
                    .index
                    .covering_init_state(file, call.span.lo.0)
                    .is_some()
                {
                    return;
                }
                self.events.push(UsageEvent {
                    event_type: EventType::Read,
                    phase: Phase::Runtime,
                    state_id,
                    actor: cx.actor.clone(),
                    location,
                    via: via::JOTAI_STORE_GET.to_string(),
                });
            }
            _ => {}
        }
    }
}
