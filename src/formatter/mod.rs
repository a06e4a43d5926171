pub mod compress;
mod toon;

pub use compress::{compress_doc, MAX_DOC_CHARS};
pub use toon::{
    format_function, format_module, format_params, RenderContext, MISSING_ANNOTATION,
    UNRENDERED_TYPE,
};
