//! Statement checking

use super::TypeChecker;
use crate::ast::*;
use crate::semantic::errors::SemanticError;
use crate::types::Type;

impl TypeChecker {
    pub fn check_statement(&mut self, statement: &mut Statement) {
        match &mut statement.kind {
            StatementKind::Expression(expr) => {
                self.check_expr(expr);
            }
            StatementKind::VarDecl(decl) => self.check_var_decl(decl),
            StatementKind::Assignment { target, value } => self.check_assignment(target, value),
            StatementKind::Return(value) => {
                let found = match value {
                    Some(expr) => self.check_expr(expr),
                    None => Some(Type::UNIT),
                };
                if let (Some(found), Some(expected)) = (found, self.return_type.clone()) {
                    if found != expected {
                        self.error(SemanticError::ReturnTypeMismatch {
                            expected,
                            found,
                            span: statement.span.clone(),
                        });
                    }
                }
            }
        }
    }

    /// The initializer is checked before the name comes into scope, so
    /// `var x = x;` reads an outer `x`.
    fn check_var_decl(&mut self, decl: &mut VarDecl) {
        let value_type = self.check_expr(&mut decl.value);
        let annotated = decl.annotation.as_ref().map(|written| self.resolve_type(written));

        let var_type = match (annotated, value_type) {
            (Some(Some(annotated)), Some(value_type)) => {
                if annotated != value_type {
                    self.error(SemanticError::TypeMismatch {
                        expected: annotated.clone(),
                        found: value_type,
                        span: decl.value.span.clone(),
                    });
                }
                annotated
            }
            (Some(Some(annotated)), None) => annotated,
            // A bad annotation was already reported; fall back to the
            // initializer's type so later uses still check
            (None, Some(value_type)) | (Some(None), Some(value_type)) => value_type,
            (_, None) => {
                self.poison_local(&decl.name);
                return;
            }
        };

        self.declare_local(&decl.name, var_type, &mut decl.address);
    }

    fn check_assignment(&mut self, target: &mut Expression, value: &mut Expression) {
        let target_type = self.check_expr(target);
        let value_type = self.check_expr(value);

        if !target.is_lvalue() {
            self.error(SemanticError::NotAnLvalue {
                span: target.span.clone(),
            });
            return;
        }

        if let (Some(target_type), Some(value_type)) = (target_type, value_type) {
            if target_type != value_type {
                self.error(SemanticError::TypeMismatch {
                    expected: target_type,
                    found: value_type,
                    span: value.span.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn errors_of(source: &str) -> Vec<SemanticError> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut module = Parser::new(tokens).parse_module().unwrap();
        let mut checker = TypeChecker::new();
        checker.check_module(&mut module);
        checker.errors().to_vec()
    }

    #[test]
    fn test_var_annotation_must_match() {
        assert!(errors_of("fun f() { var x: int = 1; var y = x; }").is_empty());
        assert!(matches!(
            errors_of("fun f() { var x: bool = 1; }").as_slice(),
            [SemanticError::TypeMismatch { .. }]
        ));
    }

    #[test]
    fn test_undefined_annotation() {
        assert!(matches!(
            errors_of("fun f() { var x: Nope = 1; }").as_slice(),
            [SemanticError::UndefinedType { .. }]
        ));
    }

    #[test]
    fn test_bad_annotation_is_reported_once() {
        assert!(matches!(
            errors_of("fun f() -> int { var x: Nope = 1; x + 1 }").as_slice(),
            [SemanticError::UndefinedType { .. }]
        ));
        // the initializer's type stands in for the annotation
        assert!(matches!(
            errors_of("fun f() -> bool { var x: Nope = 1; x }").as_slice(),
            [SemanticError::UndefinedType { .. }, SemanticError::ReturnTypeMismatch { .. }]
        ));
    }

    #[test]
    fn test_failed_initializer_is_reported_once() {
        assert!(matches!(
            errors_of("fun f() -> int { var x = missing; var y: Nope = missing; x + y }").as_slice(),
            [
                SemanticError::UndefinedVariable { .. },
                SemanticError::UndefinedVariable { .. },
                SemanticError::UndefinedType { .. }
            ]
        ));
    }

    #[test]
    fn test_initializer_sees_outer_binding() {
        assert!(errors_of("fun f(x: int) { var x: bool = x == 1; }").is_empty());
        assert!(matches!(
            errors_of("fun f() { var x = x; }").as_slice(),
            [SemanticError::UndefinedVariable { .. }]
        ));
    }

    #[test]
    fn test_same_scope_redeclaration() {
        assert!(matches!(
            errors_of("fun f() { var x = 1; var x = 2; }").as_slice(),
            [SemanticError::Redefinition { .. }]
        ));
    }

    #[test]
    fn test_assignment_rules() {
        assert!(errors_of("struct P { x: int } fun f(p: *P) { var q = P:{1}; q.x = 2; (*p).x = q.x; *p = q; }").is_empty());

        assert!(matches!(
            errors_of("fun f(x: int) { x = true; }").as_slice(),
            [SemanticError::TypeMismatch { .. }]
        ));
        assert!(matches!(
            errors_of("fun f(x: int) { x + 1 = 2; }").as_slice(),
            [SemanticError::NotAnLvalue { .. }]
        ));
    }

    #[test]
    fn test_return_statements() {
        assert!(errors_of("fun f(c: bool) -> int { if c { return 1; } 2 }").is_empty());
        assert!(matches!(
            errors_of("fun f() -> int { return; }").as_slice(),
            [SemanticError::ReturnTypeMismatch { .. }]
        ));
        assert!(matches!(
            errors_of("fun f() { return 1; }").as_slice(),
            [SemanticError::ReturnTypeMismatch { .. }]
        ));
    }
}
