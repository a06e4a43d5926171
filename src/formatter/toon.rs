//! @dose
//! purpose: Renders one Module into TOON digest lines. Classes become CLS headers with
//!     their direct methods indented underneath, functions become FUNC/MTHD lines with a
//!     reconstructed signature, and typed module globals become VAR lines.
//!
//! when-editing:
//!     - !The walk is deliberately shallow: module statements, then direct children of a class
//!     - !Method vs function is decided by RenderContext depth alone, never by a node flag
//!     - Parameter tokens are joined with "," and no spaces; bases with ", "
//!
//! invariants:
//!     - items_found counts exactly the lines that were emitted
//!     - Output order is source order; a class's methods follow its header immediately
//!     - A failed type render becomes UNRENDERED_TYPE, a failed default is dropped
//!
//! do-not:
//!     - Never recurse into function bodies or nested classes
//!     - Never emit class attributes or annotated assignments below module level
//!
//! flows:
//!     - format_module: for each statement -> class | function | variable -> push line + count

use crate::formatter::compress::compress_doc;
use crate::types::{
    AnnotatedAssignment, ClassDecl, Digest, Expr, FunctionDecl, Module, Parameter, ParameterList,
    Statement,
};

/// Placeholder for a type expression that exists but cannot be rendered
pub const UNRENDERED_TYPE: &str = "Any";

/// Placeholder for a leading or keyword-only parameter with no annotation
pub const MISSING_ANNOTATION: &str = "?";

const INDENT: &str = "  ";

/// Where in the tree a declaration is being rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub depth: usize,
}

impl RenderContext {
    pub fn module() -> Self {
        Self::default()
    }

    /// Context for the direct children of a class body
    pub fn class_body(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }

    pub fn is_method_scope(&self) -> bool {
        self.depth > 0
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }
}

/// Render a whole module
pub fn format_module(module: &Module) -> Digest {
    let mut digest = Digest::default();
    let ctx = RenderContext::module();

    for statement in &module.body {
        match statement {
            Statement::Class(class) => format_class(class, ctx, &mut digest),
            Statement::Function(func) => {
                digest.lines.push(format_function(func, ctx));
                digest.items_found += 1;
            }
            Statement::AnnotatedAssignment(assign) => {
                if let Some(line) = format_variable(assign, ctx) {
                    digest.lines.push(line);
                    digest.items_found += 1;
                }
            }
            Statement::Other => {}
        }
    }

    digest
}

fn format_class(class: &ClassDecl, ctx: RenderContext, digest: &mut Digest) {
    let bases = if class.bases.is_empty() {
        String::new()
    } else {
        let rendered: Vec<&str> = class.bases.iter().map(render_type).collect();
        format!("({})", rendered.join(", "))
    };

    digest
        .lines
        .push(format!("{}CLS {}{}:", ctx.indent(), class.name, bases));
    digest.items_found += 1;

    let member_ctx = ctx.class_body();
    for child in &class.body {
        if let Statement::Function(method) = child {
            digest.lines.push(format_function(method, member_ctx));
            digest.items_found += 1;
        }
    }
}

/// Render a function or method line. The tag depends on `ctx`, not on the declaration.
pub fn format_function(func: &FunctionDecl, ctx: RenderContext) -> String {
    let tag = match (func.is_async, ctx.is_method_scope()) {
        (false, false) => "FUNC",
        (true, false) => "ASYNC_FUNC",
        (false, true) => "MTHD",
        (true, true) => "ASYNC_MTHD",
    };

    let ret = match &func.return_type {
        Some(ret) => format!(" -> {}", render_type(ret)),
        None => String::new(),
    };

    let doc = func
        .docstring
        .as_deref()
        .and_then(compress_doc)
        .map(|d| format!(" \"{}\"", d))
        .unwrap_or_default();

    format!(
        "{}{} {}({}){}:{}",
        ctx.indent(),
        tag,
        func.name,
        format_params(&func.params),
        ret,
        doc
    )
}

fn format_variable(assign: &AnnotatedAssignment, ctx: RenderContext) -> Option<String> {
    if ctx.depth != 0 || !assign.target_is_simple_name {
        return None;
    }
    let name = assign.target_name.as_deref()?;
    let ty = assign.type_expr.render_source().ok()?;
    Some(format!("VAR {}: {}", name, ty))
}

/// Reconstruct the argument list: `a:int,/,b:?=1,*args,c:?,**kw`
pub fn format_params(params: &ParameterList) -> String {
    let mut tokens: Vec<String> = Vec::new();

    let leading = params.leading_len();
    let offset = leading.saturating_sub(params.defaults.len());
    let skipped = params.defaults.len().saturating_sub(leading);
    let last_posonly = params.posonly.len().checked_sub(1);

    for (i, param) in params.leading_params().enumerate() {
        let default = if i >= offset {
            params.defaults.get(skipped + i - offset)
        } else {
            None
        };
        tokens.push(format_param(param, default));

        if Some(i) == last_posonly {
            tokens.push("/".to_string());
        }
    }

    if let Some(vararg) = &params.vararg {
        tokens.push(format_splat("*", vararg));
    }

    for (param, default) in &params.kwonly {
        tokens.push(format_param(param, default.as_ref()));
    }

    if let Some(kwarg) = &params.kwarg {
        tokens.push(format_splat("**", kwarg));
    }

    tokens.join(",")
}

fn format_param(param: &Parameter, default: Option<&Expr>) -> String {
    let annotation = param
        .annotation
        .as_ref()
        .map(render_type)
        .unwrap_or(MISSING_ANNOTATION);

    let mut token = format!("{}:{}", param.name, annotation);
    if let Some(Ok(value)) = default.map(Expr::render_source) {
        token.push('=');
        token.push_str(value);
    }
    token
}

fn format_splat(stars: &str, param: &Parameter) -> String {
    match &param.annotation {
        Some(annotation) => format!("{}{}:{}", stars, param.name, render_type(annotation)),
        None => format!("{}{}", stars, param.name),
    }
}

fn render_type(expr: &Expr) -> &str {
    expr.render_source().unwrap_or(UNRENDERED_TYPE)
}
