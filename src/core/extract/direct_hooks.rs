//! Reads through the libraries' direct read hooks
//! (`useRecoilValue`, `useAtom`, and friends).

use swc_ecma_ast::CallExpr;
use swc_ecma_visit::VisitWith;

use crate::core::data::{EventType, Phase, SourceLocation, UsageEvent};
use crate::core::extract::{
    Extractor, ExtractorOutput, PipelineContext, SiteHandler, SourceWalker, WalkContext,
};
use crate::core::parsers::ParsedSource;
use crate::core::stores;

pub struct DirectHooks;

impl Extractor for DirectHooks {
    fn name(&self) -> &'static str {
        "direct-hooks"
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        for file in ctx.project.files() {
            let mut handler = HookReadHandler {
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

struct HookReadHandler<'a, 'p> {
    ctx: &'a PipelineContext<'p>,
    file: &'a ParsedSource,
    events: &'a mut Vec<UsageEvent>,
}

impl SiteHandler for HookReadHandler<'_, '_> {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext) {
        let file = &self.file.file_path;
        let Some((module, original)) = self.ctx.resolver.callee_import(file, &call.callee) else {
            return;
        };
        let Some(tag) = stores::read_hook_via(&module, &original) else {
            return;
        };
        let Some(first) = call.args.first() else {
            return;
        };
        if first.spread.is_some() {
            return;
        }
        // Skip silently when the argument is not a known state.
        let Some(state) = self
            .ctx
            .index
            .resolve_state_expr(self.ctx.resolver, file, &first.expr)
        else {
            return;
        };
        self.events.push(UsageEvent {
            event_type: EventType::Read,
            phase: Phase::Runtime,
            state_id: state.id.clone(),
            actor: cx.actor.clone(),
            location: SourceLocation::from_pos(file, &self.file.source_map, call.span.lo),
            via: tag.to_string(),
        });
    }
}
