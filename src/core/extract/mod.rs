//! Usage-event extractors.
//!
//! Extractors all share one shape: given the pipeline context (project,
//! index, bindings, handles, profile), return `{events, edges}`. Variants
//! compose by concatenation and gating is a list filter in the pipeline.
//!
//! ## Module Structure
//!
//! - `direct_hooks`: reads through the libraries' read hooks
//! - `setter_calls`: setter calls, JSX setter references, direct `set`/`reset`
//! - `callbacks`: Recoil and Jotai callback-factory bodies
//! - `handle_api`: imperative `store.get`/`store.set` on Jotai handles
//! - `dependencies`: state→state edges from compute functions

pub mod callbacks;
pub mod dependencies;
pub mod direct_hooks;
pub mod handle_api;
pub mod setter_calls;

use swc_ecma_ast::{
    CallExpr, FnDecl, FnExpr, JSXAttr, KeyValueProp, MethodProp, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::bindings::{HandleSet, SetterBindings};
use crate::core::data::{Actor, DependencyEdge, UsageEvent};
use crate::core::facade::{FnLike, Resolver, jsx, prop_name};
use crate::core::index::SymbolIndex;
use crate::core::parsers::Project;
use crate::core::pipeline::CapabilityProfile;

/// Everything an extractor may consult. Built once per pipeline run.
pub struct PipelineContext<'a> {
    pub project: &'a Project,
    pub resolver: &'a Resolver<'a>,
    pub index: &'a SymbolIndex,
    pub setters: &'a SetterBindings,
    pub handles: &'a HandleSet,
    pub profile: CapabilityProfile,
}

#[derive(Default)]
pub struct ExtractorOutput {
    pub events: Vec<UsageEvent>,
    pub edges: Vec<DependencyEdge>,
}

pub trait Extractor {
    fn name(&self) -> &'static str;

    fn enabled(&self, _profile: &CapabilityProfile) -> bool {
        true
    }

    fn run(&self, ctx: &PipelineContext) -> ExtractorOutput;
}

/// Via tags shared by the extractors.
pub mod via {
    pub const SETTER_CALL: &str = "setter-call";
    pub const RESET_CALL: &str = "reset-call";
    pub const SETTER_REFERENCE: &str = "setter-reference";
    pub const SET: &str = "set";
    pub const RESET: &str = "reset";
    pub const RECOIL_GET: &str = "recoil:get";
    pub const JOTAI_GET: &str = "jotai:get";
    pub const JOTAI_STORE_GET: &str = "jotai:store.get";
    pub const JOTAI_STORE_SET: &str = "jotai:store.set";
    pub const CALLBACK_GET: &str = "callback:get";
    pub const CALLBACK_SET: &str = "callback:set";
    pub const CALLBACK_RESET: &str = "callback:reset";

    /// Writes detected inside an init context carry an `init:` prefix.
    pub fn init_decorated(tag: &str, in_init: bool) -> String {
        if in_init {
            format!("init:{}", tag)
        } else {
            tag.to_string()
        }
    }

    pub fn snapshot(method: &str) -> String {
        format!("callback:snapshot.{}", method)
    }
}

/// Context handed to a [`SiteHandler`] at every site.
pub struct WalkContext {
    pub actor: Actor,
    pub in_init: bool,
}

/// What an extractor reacts to while the walker tracks scope state.
pub trait SiteHandler {
    fn call(&mut self, call: &CallExpr, cx: &WalkContext);

    fn jsx_attr(&mut self, attr: &JSXAttr, cx: &WalkContext) {
        let _ = (attr, cx);
    }
}

/// Shared traversal scaffolding: tracks the current actor (nearest named
/// enclosing function-like) and whether the walk is inside an init context.
///
/// An init context is entered through a JSX attribute named
/// `initializeState`, an object property of that name, or any function-like
/// whose own identifiable name starts with `initialize`.
pub struct SourceWalker<'h, H: SiteHandler> {
    handler: &'h mut H,
    actors: Vec<String>,
    init_depth: usize,
}

const INIT_ATTR: &str = "initializeState";
const INIT_FN_PREFIX: &str = "initialize";

impl<'h, H: SiteHandler> SourceWalker<'h, H> {
    pub fn new(handler: &'h mut H) -> Self {
        Self::with_init(handler, false)
    }

    /// Start with the init flag already raised - used when walking callback
    /// bodies whose call site was itself inside an init context.
    pub fn with_init(handler: &'h mut H, in_init: bool) -> Self {
        Self {
            handler,
            actors: Vec::new(),
            init_depth: usize::from(in_init),
        }
    }

    fn context(&self) -> WalkContext {
        WalkContext {
            actor: match self.actors.last() {
                Some(name) => Actor::function(name),
                None => Actor::unknown(),
            },
            in_init: self.init_depth > 0,
        }
    }

    fn enter_fn(&mut self, name: Option<&str>) -> (bool, bool) {
        let mut entered = (false, false);
        if let Some(name) = name {
            self.actors.push(name.to_string());
            entered.0 = true;
            if name.starts_with(INIT_FN_PREFIX) {
                self.init_depth += 1;
                entered.1 = true;
            }
        }
        entered
    }

    fn exit_fn(&mut self, entered: (bool, bool)) {
        if entered.0 {
            self.actors.pop();
        }
        if entered.1 {
            self.init_depth -= 1;
        }
    }
}

impl<H: SiteHandler> Visit for SourceWalker<'_, H> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        let cx = self.context();
        self.handler.call(call, &cx);
        call.visit_children_with(self);
    }

    fn visit_jsx_attr(&mut self, attr: &JSXAttr) {
        let is_init_attr = jsx::attr_name(attr) == INIT_ATTR;
        if is_init_attr {
            self.init_depth += 1;
        }
        let cx = self.context();
        self.handler.jsx_attr(attr, &cx);
        attr.visit_children_with(self);
        if is_init_attr {
            self.init_depth -= 1;
        }
    }

    fn visit_key_value_prop(&mut self, prop: &KeyValueProp) {
        let is_init_prop = prop_name(&prop.key).as_deref() == Some(INIT_ATTR);
        if is_init_prop {
            self.init_depth += 1;
        }
        prop.visit_children_with(self);
        if is_init_prop {
            self.init_depth -= 1;
        }
    }

    fn visit_method_prop(&mut self, prop: &MethodProp) {
        let is_init_prop = prop_name(&prop.key).as_deref() == Some(INIT_ATTR);
        if is_init_prop {
            self.init_depth += 1;
        }
        prop.visit_children_with(self);
        if is_init_prop {
            self.init_depth -= 1;
        }
    }

    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        let name = decl.ident.sym.to_string();
        let entered = self.enter_fn(Some(&name));
        decl.visit_children_with(self);
        self.exit_fn(entered);
    }

    fn visit_fn_expr(&mut self, expr: &FnExpr) {
        let name = expr.ident.as_ref().map(|i| i.sym.to_string());
        let entered = self.enter_fn(name.as_deref());
        expr.visit_children_with(self);
        self.exit_fn(entered);
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        let name = match (&declarator.name, declarator.init.as_deref()) {
            (swc_ecma_ast::Pat::Ident(ident), Some(init)) if FnLike::from_expr(init).is_some() => {
                Some(ident.id.sym.to_string())
            }
            _ => None,
        };
        let entered = self.enter_fn(name.as_deref());
        declarator.visit_children_with(self);
        self.exit_fn(entered);
    }
}
