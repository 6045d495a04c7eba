//! Jotai imperative store handle detection.
//!
//! A handle is any variable initialized with `createStore()`. Later,
//! `handle.get(...)` / `handle.set(...)` are recognized exactly when the
//! base identifier matches a recorded handle under either its canonical
//! symbol key or the file-scoped name fallback.

use std::collections::BTreeSet;

use swc_ecma_ast::{Expr, Pat, VarDeclarator};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::facade::{Resolver, SymbolKey, name_key, unwrap_expr};
use crate::core::parsers::Project;
use crate::core::stores;

#[derive(Debug, Default)]
pub struct HandleSet {
    keys: BTreeSet<String>,
    names: BTreeSet<String>,
}

impl HandleSet {
    pub fn detect(project: &Project, resolver: &Resolver) -> Self {
        let mut handles = HandleSet::default();
        for file in project.files() {
            let mut collector = HandleCollector {
                file: &file.file_path,
                resolver,
                out: &mut handles,
            };
            file.module.visit_with(&mut collector);
        }
        handles
    }

    /// Whether an identifier referenced in `file` names a store handle.
    pub fn contains(&self, resolver: &Resolver, file: &str, name: &str) -> bool {
        if let Some(resolution) = resolver.resolve(file, name)
            && self.keys.contains(&resolution.key.text())
        {
            return true;
        }
        self.names.contains(&name_key(file, name))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.names.is_empty()
    }
}

struct HandleCollector<'a> {
    file: &'a str,
    resolver: &'a Resolver<'a>,
    out: &'a mut HandleSet,
}

impl Visit for HandleCollector<'_> {
    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        if let Some(init) = &declarator.init
            && let Expr::Call(call) = unwrap_expr(init)
            && let Some((module, original)) = self.resolver.callee_import(self.file, &call.callee)
            && stores::is_store_factory(&module, &original)
            && let Pat::Ident(ident) = &declarator.name
        {
            let name = ident.id.sym.to_string();
            self.out
                .keys
                .insert(SymbolKey::new(self.file, ident.id.span.lo.0, &name).text());
            self.out.names.insert(name_key(self.file, &name));
        }
        declarator.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_create_store_handles() {
        let code = r#"
            import { createStore } from "jotai";
            export const appStore = createStore();
            const other = somethingElse();
        "#;
        let project = Project::from_sources(&[("src/store.ts", code)]).unwrap();
        let resolver = Resolver::build(&project);
        let handles = HandleSet::detect(&project, &resolver);
        assert!(handles.contains(&resolver, "src/store.ts", "appStore"));
        assert!(!handles.contains(&resolver, "src/store.ts", "other"));
    }

    #[test]
    fn test_handle_visible_through_import() {
        let store = r#"
            import { createStore } from "jotai";
            export const appStore = createStore();
        "#;
        let app = r#"
            import { appStore } from "./store";
        "#;
        let project =
            Project::from_sources(&[("src/store.ts", store), ("src/App.tsx", app)]).unwrap();
        let resolver = Resolver::build(&project);
        let handles = HandleSet::detect(&project, &resolver);
        assert!(handles.contains(&resolver, "src/App.tsx", "appStore"));
    }
}
