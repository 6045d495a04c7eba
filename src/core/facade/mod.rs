//! AST facade - syntactic and symbol queries over swc.
//!
//! The rest of the analyzer never touches swc nodes for symbol questions
//! directly; it goes through this module. All queries fail soft: an
//! unresolvable symbol returns `None`/empty and callers fall back to
//! file-scoped name keys.
//!
//! ## Module Structure
//!
//! - `symbols`: module surfaces, import maps, cross-file reference resolution
//! - `functions`: function-like resolution, return enumeration, scope walkers
//! - `patterns`: binding-name collection from (nested) binding patterns
//! - `jsx`: JSX attribute and tag-name helpers

pub mod functions;
pub mod jsx;
pub mod patterns;
pub mod symbols;

pub use functions::FnLike;
pub use symbols::{ImportMap, ImportTarget, Imported, Resolver, SymbolKey, name_key};

use swc_ecma_ast::{Expr, PropName};

/// Strip wrappers that do not change what an expression refers to:
/// parentheses, TypeScript assertions, `await`.
pub fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(e) => unwrap_expr(&e.expr),
        Expr::TsAs(e) => unwrap_expr(&e.expr),
        Expr::TsConstAssertion(e) => unwrap_expr(&e.expr),
        Expr::TsNonNull(e) => unwrap_expr(&e.expr),
        Expr::TsSatisfies(e) => unwrap_expr(&e.expr),
        Expr::TsTypeAssertion(e) => unwrap_expr(&e.expr),
        Expr::Await(e) => unwrap_expr(&e.arg),
        _ => expr,
    }
}

/// Static name of an object property key, if it has one.
pub fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|v| v.to_string()),
        _ => None,
    }
}
