//! Binding-pattern helpers.

use swc_ecma_ast::{ObjectPatProp, Pat};

/// Extract all identifier names bound by a pattern (handles destructuring).
/// Supports: simple ident, object destructuring, array destructuring,
/// default values, rest patterns, and renamed destructuring.
pub fn binding_names(pat: &Pat) -> Vec<String> {
    binding_idents(pat).into_iter().map(|(name, _)| name).collect()
}

/// Like [`binding_names`], but also returns each identifier's byte position
/// so callers can build canonical symbol keys for the bound names.
pub fn binding_idents(pat: &Pat) -> Vec<(String, u32)> {
    match pat {
        Pat::Ident(ident) => vec![(ident.id.sym.to_string(), ident.id.span.lo.0)],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => binding_idents(&kv.value),
                ObjectPatProp::Assign(assign) => {
                    vec![(assign.key.sym.to_string(), assign.key.span.lo.0)]
                }
                ObjectPatProp::Rest(rest) => binding_idents(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(binding_idents)
            .collect(),
        Pat::Assign(assign) => binding_idents(&assign.left),
        Pat::Rest(rest) => binding_idents(&rest.arg),
        _ => vec![],
    }
}
