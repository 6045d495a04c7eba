//! JSX attribute and tag helpers.

use swc_ecma_ast::{
    Expr, Ident, JSXAttr, JSXAttrName, JSXAttrValue, JSXExpr, JSXOpeningElement,
};

use crate::core::facade::unwrap_expr;

/// Attribute name as written (namespaced names join with `-`).
pub fn attr_name(attr: &JSXAttr) -> String {
    match &attr.name {
        JSXAttrName::Ident(ident) => ident.sym.to_string(),
        JSXAttrName::JSXNamespacedName(ns) => format!("{}-{}", ns.ns.sym, ns.name.sym),
    }
}

/// The sole identifier of an attribute value expression container
/// (`prop={someIdent}`), if that is the attribute's entire value.
pub fn attr_sole_ident(attr: &JSXAttr) -> Option<&Ident> {
    let JSXAttrValue::JSXExprContainer(container) = attr.value.as_ref()? else {
        return None;
    };
    let JSXExpr::Expr(expr) = &container.expr else {
        return None;
    };
    match unwrap_expr(expr) {
        Expr::Ident(ident) => Some(ident),
        _ => None,
    }
}

/// Tag-name identifier of an opening (or self-closing) element.
/// Member tags (`<UI.Button/>`) have no single identifier and return `None`.
pub fn element_tag_ident(element: &JSXOpeningElement) -> Option<&Ident> {
    match &element.name {
        swc_ecma_ast::JSXElementName::Ident(ident) => Some(ident),
        _ => None,
    }
}
