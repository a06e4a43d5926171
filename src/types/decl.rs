//! @dose
//! purpose: The owned declaration tree handed from the frontend to the formatter. It keeps
//!     only what a TOON digest can show: classes, functions, and annotated assignments,
//!     with every expression already reduced to its rendered source text (or the reason
//!     it could not be rendered).
//!
//! when-editing:
//!     - !Expr stores the render outcome, not a syntax node, so trees outlive the parser
//!     - Statement::Other stands in for every statement kind the digest ignores
//!
//! invariants:
//!     - Trees are immutable once lowered; nothing in the formatter mutates them
//!     - ParameterList.defaults always covers a tail of leading_params()
//!     - kwonly entries pair each parameter with its own optional default
//!
//! gotchas:
//!     - A FunctionDecl body is kept for completeness but never rendered

use thiserror::Error;

/// Why an expression could not be turned back into source text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("expression contains a syntax error")]
    Malformed,
    #[error("string literal spans multiple lines")]
    MultilineLiteral,
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// An expression sub-tree, reduced to its source rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    rendered: Result<String, RenderError>,
}

impl Expr {
    /// Expression whose source text is known
    pub fn source(text: impl Into<String>) -> Self {
        Self {
            rendered: Ok(text.into()),
        }
    }

    /// Expression the frontend could not reconstruct
    pub fn unrenderable(error: RenderError) -> Self {
        Self {
            rendered: Err(error),
        }
    }

    pub fn render_source(&self) -> Result<&str, RenderError> {
        match &self.rendered {
            Ok(text) => Ok(text),
            Err(e) => Err(e.clone()),
        }
    }
}

/// One parsed source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Class(ClassDecl),
    Function(FunctionDecl),
    AnnotatedAssignment(AnnotatedAssignment),
    /// Anything outside the digest vocabulary (imports, loops, plain assignments, ...)
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<Expr>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub is_async: bool,
    pub params: ParameterList,
    pub return_type: Option<Expr>,
    pub docstring: Option<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedAssignment {
    pub target_is_simple_name: bool,
    pub target_name: Option<String>,
    pub type_expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<Expr>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            annotation,
        }
    }

    /// Parameter without an annotation
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Parameters of a function, grouped the way the call syntax groups them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    pub posonly: Vec<Parameter>,
    pub positional: Vec<Parameter>,
    pub vararg: Option<Parameter>,
    pub kwonly: Vec<(Parameter, Option<Expr>)>,
    pub kwarg: Option<Parameter>,
    /// Defaults for the trailing entries of `posonly ++ positional`
    pub defaults: Vec<Expr>,
}

impl ParameterList {
    /// Positional-only parameters followed by regular positional ones
    pub fn leading_params(&self) -> impl Iterator<Item = &Parameter> {
        self.posonly.iter().chain(self.positional.iter())
    }

    pub fn leading_len(&self) -> usize {
        self.posonly.len() + self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leading_len() == 0
            && self.vararg.is_none()
            && self.kwonly.is_empty()
            && self.kwarg.is_none()
    }
}
