//! Semantic analysis
//!
//! Resolves names, lays out structs and frames, and type checks every
//! function body, writing the results into the AST's annotation slots.

pub mod checker;
pub mod errors;
pub mod frame;
pub mod layout;
pub mod symbols;

use crate::ast::Module;
use etc_common::{CompilerError, SourceLocation, SourceSpan};
use log::info;

pub use checker::TypeChecker;
pub use errors::SemanticError;

/// Check `module` in place.
///
/// With `require_main`, a module without a `main` function is rejected and
/// the error points at the start of `main_file`. On error the module may be
/// partially annotated and must not be handed to later phases.
pub fn check_module(module: &mut Module, main_file: &str, require_main: bool) -> Result<(), CompilerError> {
    let mut checker = TypeChecker::new();
    checker.check_module(module);

    if require_main && module.function("main").is_none() {
        checker.error(SemanticError::MissingMain {
            span: SourceSpan::from_location(SourceLocation::new(main_file, 1, 1)),
        });
    }

    let result = checker.finish();
    if result.is_ok() {
        info!("semantic analysis succeeded");
    }
    result
}
