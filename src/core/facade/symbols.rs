//! Module surfaces and cross-file reference resolution.
//!
//! The analyzer deliberately models a *module-level* symbol table: for each
//! file it records module-level declarations, the import map, and the export
//! surface. `resolve` follows import aliases and re-export chains to the
//! ultimate declaration and produces a canonical symbol key
//! (declaration file + declaration byte offset + name).
//!
//! Identifiers bound in inner scopes do not resolve here; callers fall back
//! to file-scoped name keys, which is sound for typical component code.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use swc_ecma_ast::{
    Callee, Decl, Expr, FnDecl, ImportSpecifier, MemberProp, Module, ModuleDecl, ModuleExportName,
    ModuleItem, Pat, Stmt, VarDeclarator,
};

use crate::core::facade::{FnLike, unwrap_expr};
use crate::core::parsers::Project;
use crate::utils::normalize_path;

/// Canonical identity of a declaration site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SymbolKey {
    pub file: String,
    pub pos: u32,
    pub name: String,
}

impl SymbolKey {
    pub fn new(file: impl Into<String>, pos: u32, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pos,
            name: name.into(),
        }
    }

    /// Stable string form used as a map key.
    pub fn text(&self) -> String {
        format!("{}#{}#{}", self.file, self.pos, self.name)
    }
}

/// File-scoped fallback key for when symbol resolution fails.
pub fn name_key(file: &str, name: &str) -> String {
    format!("{}|{}", file, name)
}

/// How a local name was imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    /// `import { original as local } from "mod"` (original == local when not
    /// aliased).
    Named(String),
    /// `import local from "mod"`.
    Default,
    /// `import * as local from "mod"`.
    Namespace,
}

#[derive(Debug, Clone)]
pub struct ImportTarget {
    pub module_path: String,
    pub imported: Imported,
}

/// Per-file import map: locally-bound name → import target.
pub type ImportMap = BTreeMap<String, ImportTarget>;

/// Where an exported name points.
enum ExportTarget {
    /// `export { local as name }` without a source.
    Local(String),
    /// `export { orig as name } from "./other"`.
    Reexport { module_path: String, name: String },
}

/// The module-level symbol surface of one file.
#[derive(Default)]
pub struct ModuleSurface {
    /// Module-level declarations: name → byte position of the declaring ident.
    decls: BTreeMap<String, u32>,
    /// Names whose declaring statement is exported (directly or via a
    /// source-less named export).
    exported: BTreeSet<String>,
    imports: ImportMap,
    export_aliases: BTreeMap<String, ExportTarget>,
    /// Local name behind `export default`, when it has one.
    default_export: Option<String>,
}

impl ModuleSurface {
    fn build(module: &Module) -> Self {
        let mut surface = Self::default();
        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    if import.type_only {
                        continue;
                    }
                    let Some(module_path) = import.src.value.as_str() else {
                        continue;
                    };
                    for specifier in &import.specifiers {
                        match specifier {
                            ImportSpecifier::Named(named) => {
                                if named.is_type_only {
                                    continue;
                                }
                                let imported = named
                                    .imported
                                    .as_ref()
                                    .and_then(export_name)
                                    .unwrap_or_else(|| named.local.sym.to_string());
                                surface.imports.insert(
                                    named.local.sym.to_string(),
                                    ImportTarget {
                                        module_path: module_path.to_string(),
                                        imported: Imported::Named(imported),
                                    },
                                );
                            }
                            ImportSpecifier::Default(default) => {
                                surface.imports.insert(
                                    default.local.sym.to_string(),
                                    ImportTarget {
                                        module_path: module_path.to_string(),
                                        imported: Imported::Default,
                                    },
                                );
                            }
                            ImportSpecifier::Namespace(ns) => {
                                surface.imports.insert(
                                    ns.local.sym.to_string(),
                                    ImportTarget {
                                        module_path: module_path.to_string(),
                                        imported: Imported::Namespace,
                                    },
                                );
                            }
                        }
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    surface.register_decl(&export.decl, true);
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
                    let src = named
                        .src
                        .as_ref()
                        .and_then(|s| s.value.as_str())
                        .map(|s| s.to_string());
                    for specifier in &named.specifiers {
                        let swc_ecma_ast::ExportSpecifier::Named(spec) = specifier else {
                            continue;
                        };
                        if spec.is_type_only {
                            continue;
                        }
                        let Some(orig) = export_name(&spec.orig) else {
                            continue;
                        };
                        let exported_as = spec
                            .exported
                            .as_ref()
                            .and_then(export_name)
                            .unwrap_or_else(|| orig.clone());
                        match &src {
                            Some(module_path) => {
                                surface.export_aliases.insert(
                                    exported_as,
                                    ExportTarget::Reexport {
                                        module_path: module_path.clone(),
                                        name: orig,
                                    },
                                );
                            }
                            None => {
                                surface.exported.insert(orig.clone());
                                surface
                                    .export_aliases
                                    .insert(exported_as, ExportTarget::Local(orig));
                            }
                        }
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default)) => {
                    if let swc_ecma_ast::DefaultDecl::Fn(fn_expr) = &default.decl
                        && let Some(ident) = &fn_expr.ident
                    {
                        surface
                            .decls
                            .insert(ident.sym.to_string(), ident.span.lo.0);
                        surface.exported.insert(ident.sym.to_string());
                        surface.default_export = Some(ident.sym.to_string());
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(default)) => {
                    if let Expr::Ident(ident) = unwrap_expr(&default.expr) {
                        surface.default_export = Some(ident.sym.to_string());
                        surface.exported.insert(ident.sym.to_string());
                    }
                }
                ModuleItem::Stmt(Stmt::Decl(decl)) => {
                    surface.register_decl(decl, false);
                }
                _ => {}
            }
        }
        surface
    }

    fn register_decl(&mut self, decl: &Decl, exported: bool) {
        match decl {
            Decl::Var(var) => {
                for declarator in &var.decls {
                    if let Pat::Ident(ident) = &declarator.name {
                        let name = ident.id.sym.to_string();
                        self.decls.insert(name.clone(), ident.id.span.lo.0);
                        if exported {
                            self.exported.insert(name);
                        }
                    }
                }
            }
            Decl::Fn(fn_decl) => {
                let name = fn_decl.ident.sym.to_string();
                self.decls.insert(name.clone(), fn_decl.ident.span.lo.0);
                if exported {
                    self.exported.insert(name);
                }
            }
            _ => {}
        }
    }

    pub fn imports(&self) -> &ImportMap {
        &self.imports
    }
}

fn export_name(name: &ModuleExportName) -> Option<String> {
    match name {
        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
        ModuleExportName::Str(s) => s.value.as_str().map(|v| v.to_string()),
    }
}

/// A resolved declaration site.
pub enum DeclNode<'p> {
    Var(&'p VarDeclarator),
    Fn(&'p FnDecl),
    /// `export default function name() {}` — a named function expression
    /// without a separate declaration statement.
    DefaultFn(&'p swc_ecma_ast::FnExpr),
}

pub struct Resolution<'p> {
    pub key: SymbolKey,
    pub node: DeclNode<'p>,
}

/// Cross-file symbol resolver over the project's module surfaces.
///
/// Built once per analysis and discarded with it; there is no cache that
/// outlives a run.
pub struct Resolver<'p> {
    project: &'p Project,
    surfaces: BTreeMap<String, ModuleSurface>,
}

impl<'p> Resolver<'p> {
    pub fn build(project: &'p Project) -> Self {
        let surfaces = project
            .files()
            .iter()
            .map(|file| (file.file_path.clone(), ModuleSurface::build(&file.module)))
            .collect();
        Self { project, surfaces }
    }

    pub fn import_map(&self, file: &str) -> Option<&ImportMap> {
        self.surfaces.get(file).map(|s| &s.imports)
    }

    /// Whether a module-level name is part of the file's public surface.
    pub fn is_exported(&self, file: &str, name: &str) -> bool {
        self.surfaces
            .get(file)
            .is_some_and(|s| s.exported.contains(name))
    }

    /// Resolve a name referenced at module scope (or imported) in `file` to
    /// its ultimate declaration, following import aliases and re-exports.
    pub fn resolve(&self, file: &str, name: &str) -> Option<Resolution<'p>> {
        let mut visited = BTreeSet::new();
        self.resolve_local(file, name, &mut visited)
    }

    fn resolve_local(
        &self,
        file: &str,
        name: &str,
        visited: &mut BTreeSet<String>,
    ) -> Option<Resolution<'p>> {
        let surface = self.surfaces.get(file)?;
        if surface.decls.contains_key(name) {
            return self.find_decl_node(file, name);
        }
        let import = surface.imports.get(name)?;
        let target = self.resolve_module_path(file, &import.module_path)?;
        match &import.imported {
            Imported::Named(original) => self.resolve_export(&target, original, visited),
            Imported::Default => self.resolve_export(&target, "default", visited),
            Imported::Namespace => None,
        }
    }

    fn resolve_export(
        &self,
        file: &str,
        export: &str,
        visited: &mut BTreeSet<String>,
    ) -> Option<Resolution<'p>> {
        if !visited.insert(format!("{}::{}", file, export)) {
            return None;
        }
        let surface = self.surfaces.get(file)?;
        if export == "default" {
            let local = surface.default_export.clone()?;
            return self.resolve_local(file, &local, visited);
        }
        if surface.decls.contains_key(export) {
            return self.find_decl_node(file, export);
        }
        match surface.export_aliases.get(export)? {
            ExportTarget::Local(local) => {
                let local = local.clone();
                self.resolve_local(file, &local, visited)
            }
            ExportTarget::Reexport { module_path, name } => {
                let target = self.resolve_module_path(file, module_path)?;
                let name = name.clone();
                self.resolve_export(&target, &name, visited)
            }
        }
    }

    fn find_decl_node(&self, file: &str, name: &str) -> Option<Resolution<'p>> {
        let parsed = self.project.get(file)?;
        for item in &parsed.module.body {
            let decl = match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
                ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default)) => {
                    if let swc_ecma_ast::DefaultDecl::Fn(fn_expr) = &default.decl
                        && let Some(ident) = &fn_expr.ident
                        && ident.sym.as_str() == name
                    {
                        return Some(Resolution {
                            key: SymbolKey::new(file, ident.span.lo.0, name),
                            node: DeclNode::DefaultFn(fn_expr),
                        });
                    }
                    continue;
                }
                _ => continue,
            };
            match decl {
                Decl::Var(var) => {
                    for declarator in &var.decls {
                        if let Pat::Ident(ident) = &declarator.name
                            && ident.id.sym.as_str() == name
                        {
                            return Some(Resolution {
                                key: SymbolKey::new(file, ident.id.span.lo.0, name),
                                node: DeclNode::Var(declarator),
                            });
                        }
                    }
                }
                Decl::Fn(fn_decl) => {
                    if fn_decl.ident.sym.as_str() == name {
                        return Some(Resolution {
                            key: SymbolKey::new(file, fn_decl.ident.span.lo.0, name),
                            node: DeclNode::Fn(fn_decl),
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Resolve a relative import specifier against the in-memory project.
    /// Tries `spec.{ts,tsx,js,jsx}`, then `spec/index.{ts,tsx,js,jsx}`,
    /// then the specifier verbatim. Bare (package) specifiers return `None`.
    pub fn resolve_module_path(&self, from_file: &str, spec: &str) -> Option<String> {
        if !spec.starts_with('.') {
            return None;
        }
        let base_dir = Path::new(from_file).parent()?;
        let joined = normalize_path(&base_dir.join(spec));
        for ext in ["ts", "tsx", "js", "jsx"] {
            let candidate = format!("{}.{}", joined, ext);
            if self.project.contains(&candidate) {
                return Some(candidate);
            }
        }
        for ext in ["ts", "tsx", "js", "jsx"] {
            let candidate = format!("{}/index.{}", joined, ext);
            if self.project.contains(&candidate) {
                return Some(candidate);
            }
        }
        if self.project.contains(&joined) {
            return Some(joined);
        }
        None
    }

    /// For a call, the `(module, original name)` of its callee when the
    /// callee is an imported identifier or a namespace member
    /// (`Recoil.atom(...)`), after unwrapping import aliases.
    pub fn callee_import(&self, file: &str, callee: &Callee) -> Option<(String, String)> {
        let Callee::Expr(expr) = callee else {
            return None;
        };
        match unwrap_expr(expr) {
            Expr::Ident(ident) => {
                let import = self.import_map(file)?.get(ident.sym.as_str())?;
                match &import.imported {
                    Imported::Named(original) => {
                        Some((import.module_path.clone(), original.clone()))
                    }
                    Imported::Default => Some((import.module_path.clone(), "default".to_string())),
                    Imported::Namespace => None,
                }
            }
            Expr::Member(member) => {
                let Expr::Ident(object) = unwrap_expr(&member.obj) else {
                    return None;
                };
                let import = self.import_map(file)?.get(object.sym.as_str())?;
                if !matches!(import.imported, Imported::Namespace) {
                    return None;
                }
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                Some((import.module_path.clone(), prop.sym.to_string()))
            }
            _ => None,
        }
    }

    /// Resolve a name to the function-like declaration bodies it refers to:
    /// a declared function, or a variable initialized to an arrow/function
    /// expression. Returns the declaring file alongside each body.
    pub fn fn_likes(&self, file: &str, name: &str) -> Vec<(String, FnLike<'p>)> {
        let Some(resolution) = self.resolve(file, name) else {
            return Vec::new();
        };
        let declaring_file = resolution.key.file.clone();
        match resolution.node {
            DeclNode::Fn(fn_decl) => vec![(declaring_file, FnLike::Fn(&fn_decl.function))],
            DeclNode::DefaultFn(fn_expr) => vec![(declaring_file, FnLike::Fn(&fn_expr.function))],
            DeclNode::Var(declarator) => declarator
                .init
                .as_ref()
                .and_then(|init| FnLike::from_expr(init))
                .map(|fn_like| vec![(declaring_file, fn_like)])
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::Project;

    fn resolver_for(sources: &[(&str, &str)]) -> Project {
        Project::from_sources(sources).unwrap()
    }

    #[test]
    fn test_resolve_local_const() {
        let project = resolver_for(&[("src/state.ts", "export const countState = 1;")]);
        let resolver = Resolver::build(&project);
        let resolution = resolver.resolve("src/state.ts", "countState").unwrap();
        assert_eq!(resolution.key.file, "src/state.ts");
        assert_eq!(resolution.key.name, "countState");
        assert!(resolver.is_exported("src/state.ts", "countState"));
    }

    #[test]
    fn test_resolve_through_import_alias() {
        let project = resolver_for(&[
            ("src/state.ts", "export const countState = 1;"),
            (
                "src/App.tsx",
                r#"import { countState as count } from "./state";"#,
            ),
        ]);
        let resolver = Resolver::build(&project);
        let resolution = resolver.resolve("src/App.tsx", "count").unwrap();
        assert_eq!(resolution.key.file, "src/state.ts");
        assert_eq!(resolution.key.name, "countState");
    }

    #[test]
    fn test_resolve_through_reexport_chain() {
        let project = resolver_for(&[
            ("src/atoms/count.ts", "export const countState = 1;"),
            (
                "src/atoms/index.ts",
                r#"export { countState as count } from "./count";"#,
            ),
            (
                "src/App.tsx",
                r#"import { count } from "./atoms";"#,
            ),
        ]);
        let resolver = Resolver::build(&project);
        let resolution = resolver.resolve("src/App.tsx", "count").unwrap();
        assert_eq!(resolution.key.file, "src/atoms/count.ts");
        assert_eq!(resolution.key.name, "countState");
    }

    #[test]
    fn test_resolve_default_import() {
        let project = resolver_for(&[
            (
                "src/Switch.tsx",
                "function Switch() { return null; }\nexport default Switch;",
            ),
            ("src/App.tsx", r#"import Toggle from "./Switch";"#),
        ]);
        let resolver = Resolver::build(&project);
        let resolution = resolver.resolve("src/App.tsx", "Toggle").unwrap();
        assert_eq!(resolution.key.name, "Switch");
        assert_eq!(resolver.fn_likes("src/App.tsx", "Toggle").len(), 1);
    }

    #[test]
    fn test_unresolvable_names_fail_soft() {
        let project = resolver_for(&[(
            "src/App.tsx",
            r#"import { thing } from "some-package";"#,
        )]);
        let resolver = Resolver::build(&project);
        assert!(resolver.resolve("src/App.tsx", "thing").is_none());
        assert!(resolver.resolve("src/App.tsx", "missing").is_none());
        assert!(resolver.fn_likes("src/App.tsx", "thing").is_empty());
    }

    #[test]
    fn test_reexport_cycle_is_guarded() {
        let project = resolver_for(&[
            ("src/a.ts", r#"export { x } from "./b";"#),
            ("src/b.ts", r#"export { x } from "./a";"#),
            ("src/App.tsx", r#"import { x } from "./a";"#),
        ]);
        let resolver = Resolver::build(&project);
        assert!(resolver.resolve("src/App.tsx", "x").is_none());
    }

    #[test]
    fn test_callee_import_through_namespace() {
        let project = resolver_for(&[(
            "src/state.ts",
            r#"
                import * as Recoil from "recoil";
                const a = Recoil.atom({ key: "a", default: 0 });
            "#,
        )]);
        let resolver = Resolver::build(&project);
        let module = &project.files()[0].module;
        let swc_ecma_ast::ModuleItem::Stmt(swc_ecma_ast::Stmt::Decl(swc_ecma_ast::Decl::Var(
            var,
        ))) = &module.body[1]
        else {
            panic!("expected var decl");
        };
        let Some(init) = &var.decls[0].init else {
            panic!("expected init");
        };
        let swc_ecma_ast::Expr::Call(call) = unwrap_expr(init) else {
            panic!("expected call");
        };
        let (module_path, name) = resolver.callee_import("src/state.ts", &call.callee).unwrap();
        assert_eq!(module_path, "recoil");
        assert_eq!(name, "atom");
    }
}
