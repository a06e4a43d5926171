mod decl;
mod digest;

pub use decl::{
    AnnotatedAssignment, ClassDecl, Expr, FunctionDecl, Module, Parameter, ParameterList,
    RenderError, Statement,
};
pub use digest::{Digest, FileOutcome, RunResult};
