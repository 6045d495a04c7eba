//! One-hop forwarding of setter bindings.
//!
//! Extends the direct binding map by a single call step: a bound identifier
//! passed as a positional argument to a resolvable function, or as a JSX
//! prop to a resolvable component, binds the corresponding parameter /
//! destructured prop in the target.
//!
//! Forwarding is not transitive: only direct bindings are used as sources,
//! so a setter handed from A to B never reaches C through forwarding alone.

use swc_ecma_ast::{
    CallExpr, Callee, Expr, JSXOpeningElement, ObjectPat, ObjectPatProp, Pat, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::bindings::{SetterBinding, SetterBindings};
use crate::core::facade::functions::collect_scope_var_declarators;
use crate::core::facade::patterns::binding_idents;
use crate::core::facade::{FnLike, Resolver, SymbolKey, jsx, prop_name, unwrap_expr};
use crate::core::parsers::Project;

/// Produce the extended binding map: the direct bindings plus one forwarding
/// hop through function arguments and JSX props.
pub fn forward_bindings(
    project: &Project,
    resolver: &Resolver,
    direct: &SetterBindings,
) -> SetterBindings {
    let mut extended = direct.clone();
    for file in project.files() {
        let mut collector = ForwardCollector {
            file: &file.file_path,
            resolver,
            direct,
            out: &mut extended,
        };
        file.module.visit_with(&mut collector);
    }
    extended
}

struct ForwardCollector<'a> {
    file: &'a str,
    resolver: &'a Resolver<'a>,
    direct: &'a SetterBindings,
    out: &'a mut SetterBindings,
}

impl ForwardCollector<'_> {
    fn forward_into(
        &mut self,
        target_file: &str,
        names: impl IntoIterator<Item = (String, u32)>,
        binding: &SetterBinding,
    ) {
        for (name, pos) in names {
            self.out.insert(
                Some(SymbolKey::new(target_file, pos, &name)),
                target_file,
                &name,
                binding.clone(),
            );
        }
    }
}

impl Visit for ForwardCollector<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Callee::Expr(callee) = &call.callee
            && let Expr::Ident(callee_ident) = unwrap_expr(callee)
        {
            let mut bound_args: Vec<(usize, SetterBinding)> = Vec::new();
            for (i, arg) in call.args.iter().enumerate() {
                if arg.spread.is_some() {
                    continue;
                }
                if let Expr::Ident(ident) = unwrap_expr(&arg.expr)
                    && let Some(binding) =
                        self.direct.lookup(self.resolver, self.file, ident.sym.as_str())
                {
                    bound_args.push((i, binding.clone()));
                }
            }
            if !bound_args.is_empty() {
                let targets = self
                    .resolver
                    .fn_likes(self.file, callee_ident.sym.as_str());
                for (target_file, fn_like) in &targets {
                    for (i, binding) in &bound_args {
                        if let Some(pat) = fn_like.param(*i) {
                            self.forward_into(target_file, binding_idents(pat), binding);
                        }
                    }
                }
            }
        }
        call.visit_children_with(self);
    }

    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement) {
        let Some(tag) = jsx::element_tag_ident(element) else {
            element.visit_children_with(self);
            return;
        };

        let mut bound_props: Vec<(String, SetterBinding)> = Vec::new();
        for attr in &element.attrs {
            let swc_ecma_ast::JSXAttrOrSpread::JSXAttr(attr) = attr else {
                continue;
            };
            if let Some(ident) = jsx::attr_sole_ident(attr)
                && let Some(binding) =
                    self.direct.lookup(self.resolver, self.file, ident.sym.as_str())
            {
                bound_props.push((jsx::attr_name(attr), binding.clone()));
            }
        }

        if !bound_props.is_empty() {
            let targets = self.resolver.fn_likes(self.file, tag.sym.as_str());
            for (target_file, fn_like) in &targets {
                for (prop, binding) in &bound_props {
                    match fn_like.param(0) {
                        Some(Pat::Object(object)) => {
                            self.forward_into(
                                target_file,
                                matching_prop_idents(object, prop),
                                binding,
                            );
                        }
                        Some(Pat::Ident(props_ident)) => {
                            // `function Child(props) { const { onChecked } = props; ... }`
                            let props_name = props_ident.id.sym.to_string();
                            for declarator in props_destructures(*fn_like, &props_name) {
                                if let Pat::Object(object) = &declarator.name {
                                    self.forward_into(
                                        target_file,
                                        matching_prop_idents(object, prop),
                                        binding,
                                    );
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        element.visit_children_with(self);
    }
}

/// Identifiers bound by the object-pattern element whose property name
/// matches `prop`.
fn matching_prop_idents(object: &ObjectPat, prop: &str) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    for element in &object.props {
        match element {
            ObjectPatProp::Assign(assign) => {
                if assign.key.sym.as_str() == prop {
                    out.push((assign.key.sym.to_string(), assign.key.span.lo.0));
                }
            }
            ObjectPatProp::KeyValue(kv) => {
                if prop_name(&kv.key).as_deref() == Some(prop) {
                    out.extend(binding_idents(&kv.value));
                }
            }
            ObjectPatProp::Rest(_) => {}
        }
    }
    out
}

/// Variable declarations in a function's own scope that destructure the
/// named props identifier.
fn props_destructures<'a>(fn_like: FnLike<'a>, props_name: &str) -> Vec<&'a VarDeclarator> {
    let mut declarators = Vec::new();
    if let Some(stmts) = fn_like.body_stmts() {
        collect_scope_var_declarators(stmts, &mut declarators);
    }
    declarators
        .into_iter()
        .filter(|declarator| {
            declarator
                .init
                .as_deref()
                .is_some_and(|init| match unwrap_expr(init) {
                    Expr::Ident(ident) => ident.sym.as_str() == props_name,
                    _ => false,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bindings::resolve_setter_bindings;
    use crate::core::index::SymbolIndex;

    const TOGGLE: &str = r#"
        import { atom } from "recoil";
        export const toggleState = atom({ key: "toggle", default: false });
    "#;

    fn forwarded_for(sources: &[(&str, &str)]) -> (Project, SetterBindings) {
        let project = Project::from_sources(sources).unwrap();
        let extended = {
            let resolver = Resolver::build(&project);
            let index = SymbolIndex::build(&project, &resolver);
            let direct = resolve_setter_bindings(&project, &resolver, &index, true);
            forward_bindings(&project, &resolver, &direct)
        };
        (project, extended)
    }

    fn lookup(
        project: &Project,
        bindings: &SetterBindings,
        file: &str,
        name: &str,
    ) -> Option<SetterBinding> {
        let resolver = Resolver::build(project);
        bindings.lookup(&resolver, file, name).cloned()
    }

    #[test]
    fn test_function_argument_forwarding() {
        let app = r#"
            import { useSetRecoilState } from "recoil";
            import { toggleState } from "./state";
            function applyToggle(update) {
                update(true);
            }
            function Controls() {
                const setToggle = useSetRecoilState(toggleState);
                applyToggle(setToggle);
            }
        "#;
        let (project, bindings) = forwarded_for(&[("src/state.ts", TOGGLE), ("src/App.tsx", app)]);
        let update = lookup(&project, &bindings, "src/App.tsx", "update").unwrap();
        assert_eq!(update.state_id, "src/state.ts::toggleState");
    }

    #[test]
    fn test_jsx_prop_forwarding_into_object_pattern() {
        let app = r#"
            import { useRecoilState } from "recoil";
            import { toggleState } from "./state";
            function Parent() {
                const [enabled, setEnabled] = useRecoilState(toggleState);
                return <Switch onChecked={setEnabled} />;
            }
            function Switch({ onChecked }) {
                onChecked(true);
                return null;
            }
        "#;
        let (project, bindings) = forwarded_for(&[("src/state.ts", TOGGLE), ("src/App.tsx", app)]);
        let forwarded = lookup(&project, &bindings, "src/App.tsx", "onChecked").unwrap();
        assert_eq!(forwarded.state_id, "src/state.ts::toggleState");
    }

    #[test]
    fn test_jsx_prop_forwarding_into_props_identifier() {
        let switch_code = r#"
            export function Switch(props) {
                const { onChecked } = props;
                onChecked(true);
                return null;
            }
        "#;
        let app = r#"
            import { useRecoilState } from "recoil";
            import { toggleState } from "./state";
            import { Switch } from "./Switch";
            function Parent() {
                const [enabled, setEnabled] = useRecoilState(toggleState);
                return <Switch onChecked={setEnabled} />;
            }
        "#;
        let (project, bindings) = forwarded_for(&[
            ("src/state.ts", TOGGLE),
            ("src/Switch.tsx", switch_code),
            ("src/App.tsx", app),
        ]);
        let forwarded = lookup(&project, &bindings, "src/Switch.tsx", "onChecked").unwrap();
        assert_eq!(forwarded.state_id, "src/state.ts::toggleState");
    }

    #[test]
    fn test_forwarding_is_one_hop_only() {
        let app = r#"
            import { useSetRecoilState } from "recoil";
            import { toggleState } from "./state";
            function second(innerUpdate) {
                innerUpdate(false);
            }
            function first(update) {
                second(update);
            }
            function Controls() {
                const setToggle = useSetRecoilState(toggleState);
                first(setToggle);
            }
        "#;
        let (project, bindings) = forwarded_for(&[("src/state.ts", TOGGLE), ("src/App.tsx", app)]);
        assert!(lookup(&project, &bindings, "src/App.tsx", "update").is_some());
        // `update` is itself only a forwarded binding, so it must not flow on.
        assert!(lookup(&project, &bindings, "src/App.tsx", "innerUpdate").is_none());
    }
}
