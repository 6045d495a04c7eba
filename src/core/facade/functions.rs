//! Function-like values and scope walkers.
//!
//! A "function-like" is anything with parameters and a body: a declared
//! function, a function expression, or an arrow. Wrapper resolution,
//! one-hop forwarding, and dependency extraction all operate on this shape
//! without caring which syntax produced it.

use swc_ecma_ast::{
    BlockStmtOrExpr, Expr, FnDecl, Pat, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::facade::unwrap_expr;

/// A borrowed function-like body: arrow or ordinary function.
#[derive(Clone, Copy)]
pub enum FnLike<'a> {
    Arrow(&'a swc_ecma_ast::ArrowExpr),
    Fn(&'a swc_ecma_ast::Function),
}

impl<'a> FnLike<'a> {
    /// View an expression as a function-like, unwrapping assertions and
    /// parentheses first.
    pub fn from_expr(expr: &'a Expr) -> Option<FnLike<'a>> {
        match unwrap_expr(expr) {
            Expr::Arrow(arrow) => Some(FnLike::Arrow(arrow)),
            Expr::Fn(fn_expr) => Some(FnLike::Fn(&fn_expr.function)),
            _ => None,
        }
    }

    /// Byte position of the function node, used as a memoization key
    /// together with the file path.
    pub fn span_lo(&self) -> u32 {
        match self {
            FnLike::Arrow(arrow) => arrow.span.lo.0,
            FnLike::Fn(function) => function.span.lo.0,
        }
    }

    pub fn param(&self, index: usize) -> Option<&'a Pat> {
        match self {
            FnLike::Arrow(arrow) => arrow.params.get(index),
            FnLike::Fn(function) => function.params.get(index).map(|p| &p.pat),
        }
    }

    /// The statements of a block body; `None` for expression-bodied arrows.
    pub fn body_stmts(&self) -> Option<&'a [Stmt]> {
        match self {
            FnLike::Arrow(arrow) => match arrow.body.as_ref() {
                BlockStmtOrExpr::BlockStmt(block) => Some(&block.stmts),
                BlockStmtOrExpr::Expr(_) => None,
            },
            FnLike::Fn(function) => function.body.as_ref().map(|b| b.stmts.as_slice()),
        }
    }

    /// Every expression this function can return: the expression body of an
    /// arrow, or the arguments of `return` statements in the function's own
    /// scope (nested functions are not entered).
    pub fn return_exprs(&self) -> Vec<&'a Expr> {
        if let FnLike::Arrow(arrow) = self
            && let BlockStmtOrExpr::Expr(expr) = arrow.body.as_ref()
        {
            return vec![&**expr];
        }
        let mut out = Vec::new();
        if let Some(stmts) = self.body_stmts() {
            collect_return_exprs(stmts, &mut out);
        }
        out
    }

    /// Visit the function body (block or expression) with a visitor.
    pub fn visit_body_with<V: Visit>(&self, visitor: &mut V) {
        match self {
            FnLike::Arrow(arrow) => arrow.body.visit_with(visitor),
            FnLike::Fn(function) => {
                if let Some(body) = &function.body {
                    body.visit_with(visitor);
                }
            }
        }
    }
}

/// Collect `return` expressions in a statement list without entering nested
/// function bodies.
pub fn collect_return_exprs<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Expr>) {
    for stmt in stmts {
        match stmt {
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    out.push(&**arg);
                }
            }
            other => walk_nested_stmts(other, &mut |nested| collect_return_exprs(nested, out)),
        }
    }
}

/// Collect variable declarators belonging to a function's own scope:
/// nested control-flow blocks are walked, nested function bodies are not.
pub fn collect_scope_var_declarators<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a VarDeclarator>) {
    for stmt in stmts {
        if let Stmt::Decl(swc_ecma_ast::Decl::Var(var)) = stmt {
            out.extend(var.decls.iter());
        }
        walk_nested_stmts(stmt, &mut |nested| {
            collect_scope_var_declarators(nested, out)
        });
    }
}

/// Collect every function declaration under a statement list, including
/// those inside other function declarations.
pub fn collect_fn_decls<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a FnDecl>) {
    for stmt in stmts {
        if let Stmt::Decl(swc_ecma_ast::Decl::Fn(fn_decl)) = stmt {
            out.push(fn_decl);
            if let Some(body) = &fn_decl.function.body {
                collect_fn_decls(&body.stmts, out);
            }
        }
        walk_nested_stmts(stmt, &mut |nested| collect_fn_decls(nested, out));
    }
}

/// Apply `f` to every statement list nested in control flow under `stmt`.
/// Single-statement bodies (e.g. `if (x) return y;`) are handed over as
/// one-element slices.
fn walk_nested_stmts<'a>(stmt: &'a Stmt, f: &mut impl FnMut(&'a [Stmt])) {
    match stmt {
        Stmt::Block(block) => f(&block.stmts),
        Stmt::If(if_stmt) => {
            f(std::slice::from_ref(&if_stmt.cons));
            if let Some(alt) = &if_stmt.alt {
                f(std::slice::from_ref(alt));
            }
        }
        Stmt::Switch(switch) => {
            for case in &switch.cases {
                f(&case.cons);
            }
        }
        Stmt::Try(try_stmt) => {
            f(&try_stmt.block.stmts);
            if let Some(handler) = &try_stmt.handler {
                f(&handler.body.stmts);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                f(&finalizer.stmts);
            }
        }
        Stmt::For(for_stmt) => f(std::slice::from_ref(&for_stmt.body)),
        Stmt::ForIn(for_in) => f(std::slice::from_ref(&for_in.body)),
        Stmt::ForOf(for_of) => f(std::slice::from_ref(&for_of.body)),
        Stmt::While(while_stmt) => f(std::slice::from_ref(&while_stmt.body)),
        Stmt::DoWhile(do_while) => f(std::slice::from_ref(&do_while.body)),
        Stmt::Labeled(labeled) => f(std::slice::from_ref(&labeled.body)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::{Decl, ModuleItem, Stmt};

    use super::*;
    use crate::core::parsers::Project;

    fn with_first_fn_like(code: &str, check: impl FnOnce(FnLike<'_>)) {
        let project = Project::from_sources(&[("test.ts", code)]).unwrap();
        let module = &project.files()[0].module;
        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &module.body[0] else {
            panic!("expected a variable declaration");
        };
        let init = var.decls[0].init.as_ref().unwrap();
        check(FnLike::from_expr(init).expect("expected a function-like"));
    }

    #[test]
    fn test_expression_body_arrow_returns_itself() {
        with_first_fn_like("const f = () => useSetRecoilState(countState);", |f| {
            assert_eq!(f.return_exprs().len(), 1);
        });
    }

    #[test]
    fn test_returns_collected_through_control_flow() {
        let code = r#"
            const f = (flag) => {
                if (flag) {
                    return a;
                }
                const inner = () => {
                    return skipped;
                };
                return b;
            };
        "#;
        with_first_fn_like(code, |f| {
            // The nested arrow's return must not leak into the outer scope.
            assert_eq!(f.return_exprs().len(), 2);
        });
    }

    #[test]
    fn test_scope_declarators_skip_nested_functions() {
        let code = r#"
            const f = () => {
                const a = one();
                {
                    const b = two();
                }
                function helper() {
                    const c = three();
                }
            };
        "#;
        with_first_fn_like(code, |f| {
            let mut decls = Vec::new();
            collect_scope_var_declarators(f.body_stmts().unwrap(), &mut decls);
            assert_eq!(decls.len(), 2);
        });
    }
}
