//! Typing rules for expressions
//!
//! Children are always checked before their parent's type is computed.

use super::TypeChecker;
use crate::ast::*;
use crate::semantic::errors::SemanticError;
use crate::types::{Type, INT_MIN_MAGNITUDE};
use crate::visitor::ExpressionVisitorMut;
use etc_common::{internal_fault, SourceSpan};

impl TypeChecker {
    fn expect_type(&mut self, expected: &Type, found: &Type, span: &SourceSpan) -> bool {
        if expected == found {
            return true;
        }
        self.error(SemanticError::TypeMismatch {
            expected: expected.clone(),
            found: found.clone(),
            span: span.clone(),
        });
        false
    }

    fn invalid_operand(&mut self, operation: impl ToString, operand_type: Type, span: &SourceSpan) -> Option<Type> {
        self.error(SemanticError::InvalidOperand {
            operation: operation.to_string(),
            operand_type,
            span: span.clone(),
        });
        None
    }
}

impl ExpressionVisitorMut for TypeChecker {
    type Output = Option<Type>;

    fn visit_comparison(&mut self, expr: &mut ComparisonExpr, span: &SourceSpan) -> Option<Type> {
        let left = self.check_expr(&mut expr.left);
        let right = self.check_expr(&mut expr.right);
        let (left, right) = (left?, right?);

        let Some(op) = ComparisonOp::from_token(&expr.operator.token_type) else {
            internal_fault(format!("comparison node built from '{}'", expr.operator.token_type));
        };

        if !self.expect_type(&left, &right, &expr.right.span) {
            return None;
        }
        if op.is_ordering() && !left.is_int() {
            return self.invalid_operand(op, left, span);
        }

        Some(Type::BOOL)
    }

    fn visit_binary(&mut self, expr: &mut BinaryExpr, span: &SourceSpan) -> Option<Type> {
        let left = self.check_expr(&mut expr.left);
        let right = self.check_expr(&mut expr.right);
        let (left, right) = (left?, right?);

        let Some(op) = BinaryOp::from_token(&expr.operator.token_type) else {
            internal_fault(format!("binary node built from '{}'", expr.operator.token_type));
        };

        let operand_type = if op.is_logical() { Type::BOOL } else { Type::INT };
        for found in [left, right] {
            if found != operand_type {
                return self.invalid_operand(op, found, span);
            }
        }

        Some(operand_type)
    }

    fn visit_unary(&mut self, expr: &mut UnaryExpr, span: &SourceSpan) -> Option<Type> {
        let Some(op) = UnaryOp::from_token(&expr.operator.token_type) else {
            internal_fault(format!("unary node built from '{}'", expr.operator.token_type));
        };

        // The magnitude of the minimum int is only in range once negated
        if op == UnaryOp::Neg {
            if let ExpressionKind::Literal(literal) = &expr.operand.kind {
                if literal.value() == Some(LiteralValue::Int(INT_MIN_MAGNITUDE)) {
                    expr.operand.expr_type.set(Type::INT);
                    return Some(Type::INT);
                }
            }
        }

        let operand = self.check_expr(&mut expr.operand)?;

        let accepted = match op {
            UnaryOp::Neg => operand.is_int(),
            UnaryOp::Not => operand.is_bool(),
        };
        if !accepted {
            return self.invalid_operand(op, operand, span);
        }

        Some(operand)
    }

    fn visit_deref(&mut self, expr: &mut DerefExpr, span: &SourceSpan) -> Option<Type> {
        let pointer = self.check_expr(&mut expr.operand)?;
        match pointer.pointee() {
            Some(target) => Some(target.clone()),
            None => self.invalid_operand("dereference", pointer, span),
        }
    }

    fn visit_address_of(&mut self, expr: &mut AddressOfExpr, span: &SourceSpan) -> Option<Type> {
        let operand = self.check_expr(&mut expr.operand)?;

        if !expr.operand.is_lvalue() {
            self.error(SemanticError::NotAnLvalue {
                span: expr.operand.span.clone(),
            });
            return None;
        }
        if !expr.operand.is_direct() {
            self.error(SemanticError::NotAddressable { span: span.clone() });
            return None;
        }

        Some(Type::pointer_to(operand))
    }

    fn visit_fn_call(&mut self, expr: &mut FnCallExpr, span: &SourceSpan) -> Option<Type> {
        let arguments: Vec<Option<Type>> = expr.arguments.iter_mut().map(|arg| self.check_expr(arg)).collect();

        let name = expr.callee();
        let Some(function) = self.scopes.lookup_function(&name).cloned() else {
            self.error(SemanticError::UndefinedFunction {
                name,
                span: expr.name.span.clone(),
            });
            return None;
        };
        expr.is_native = function.is_native;
        let parameters = function.parameters();

        if arguments.len() != parameters.len() {
            self.error(SemanticError::ArgumentCountMismatch {
                function: name,
                expected: parameters.len(),
                found: arguments.len(),
                span: span.clone(),
            });
        } else {
            for ((argument, found), expected) in expr.arguments.iter().zip(&arguments).zip(parameters) {
                if let Some(found) = found {
                    self.expect_type(expected, found, &argument.span);
                }
            }
        }

        // The result type is known from the signature even if an argument
        // was wrong, so callers are not dragged into the error.
        Some(function.return_type().clone())
    }

    fn visit_struct_construction(&mut self, expr: &mut StructConstructionExpr, span: &SourceSpan) -> Option<Type> {
        let values: Vec<Option<Type>> = expr.values.iter_mut().map(|value| self.check_expr(value)).collect();

        let name = expr.struct_name.lexeme();
        let Some(struct_type) = self.structs.get(&name).cloned() else {
            self.error(SemanticError::UndefinedType {
                name,
                span: expr.struct_name.span.clone(),
            });
            return None;
        };
        let Type::Struct { fields, .. } = &struct_type else {
            internal_fault(format!("struct table holds non-struct {struct_type}"));
        };

        if values.len() != fields.len() {
            self.error(SemanticError::FieldCountMismatch {
                struct_name: name,
                expected: fields.len(),
                found: values.len(),
                span: span.clone(),
            });
        } else {
            for ((value, found), field) in expr.values.iter().zip(&values).zip(fields) {
                if let Some(found) = found {
                    self.expect_type(&field.field_type, found, &value.span);
                }
            }
        }

        Some(struct_type)
    }

    fn visit_field_access(&mut self, expr: &mut FieldAccessExpr, _span: &SourceSpan) -> Option<Type> {
        let operand = self.check_expr(&mut expr.operand)?;

        if !expr.operand.is_lvalue() {
            self.error(SemanticError::NotAnLvalue {
                span: expr.operand.span.clone(),
            });
            return None;
        }

        let Type::Struct { name: struct_name, .. } = &operand else {
            self.error(SemanticError::NotAStruct {
                found: operand.clone(),
                span: expr.field.span.clone(),
            });
            return None;
        };
        let Some(layout) = self.layouts.get(struct_name) else {
            internal_fault(format!("struct {struct_name} has a type but no layout"));
        };

        let field_name = expr.field.lexeme();
        let Some(field) = layout.find_field(&field_name).cloned() else {
            self.error(SemanticError::UnknownField {
                struct_name: struct_name.clone(),
                field: field_name,
                span: expr.field.span.clone(),
            });
            return None;
        };

        let operand_location = if expr.operand.is_direct() {
            Location::Direct(expr.operand.address())
        } else {
            Location::Indirect
        };
        expr.location.set(operand_location.project(field.offset));

        Some(field.field_type)
    }

    fn visit_block(&mut self, expr: &mut BlockExpr, _span: &SourceSpan) -> Option<Type> {
        self.scopes.push_scope();

        for statement in &mut expr.statements {
            self.check_statement(statement);
        }
        let ty = match &mut expr.tail {
            Some(tail) => self.check_expr(tail),
            None => Some(Type::UNIT),
        };

        self.scopes.pop_scope();
        ty
    }

    fn visit_if(&mut self, expr: &mut IfExpr, span: &SourceSpan) -> Option<Type> {
        let condition = self.check_expr(&mut expr.condition);
        let then_type = self.check_expr(&mut expr.then_branch);
        let else_type = self.check_expr(&mut expr.else_branch);

        if let Some(condition) = &condition {
            self.expect_type(&Type::BOOL, condition, &expr.condition.span);
        }

        let (then_type, else_type) = (then_type?, else_type?);
        if then_type != else_type {
            self.error(SemanticError::BranchTypeMismatch {
                then_type,
                else_type,
                span: span.clone(),
            });
            return None;
        }

        Some(then_type)
    }

    fn visit_literal(&mut self, expr: &mut LiteralExpr, span: &SourceSpan) -> Option<Type> {
        match expr.value() {
            Some(LiteralValue::Int(value)) if value >= INT_MIN_MAGNITUDE => {
                self.error(SemanticError::IntegerOutOfRange {
                    value,
                    span: span.clone(),
                });
                None
            }
            Some(LiteralValue::Int(_)) => Some(Type::INT),
            Some(LiteralValue::Bool(_)) => Some(Type::BOOL),
            None => internal_fault(format!("literal node built from '{}'", expr.token.token_type)),
        }
    }

    fn visit_var_access(&mut self, expr: &mut VarAccessExpr, _span: &SourceSpan) -> Option<Type> {
        let name = expr.name.lexeme();
        let Some(variable) = self.scopes.lookup_variable(&name) else {
            if self.scopes.is_poisoned(&name) {
                return None;
            }
            self.error(SemanticError::UndefinedVariable {
                name,
                span: expr.name.span.clone(),
            });
            return None;
        };

        let var_type = variable.var_type.clone();
        expr.location.set(Location::Direct(variable.address));
        Some(var_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::types::WORD_SIZE;

    fn check(source: &str) -> (Module, Vec<SemanticError>) {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut module = Parser::new(tokens).parse_module().unwrap();
        let mut checker = TypeChecker::new();
        checker.check_module(&mut module);
        let errors = checker.errors().to_vec();
        (module, errors)
    }

    fn tail_of(module: &Module, function: &str) -> Expression {
        let f = module.function(function).unwrap();
        match &f.body.kind {
            ExpressionKind::Block(block) => block.tail.as_deref().cloned().unwrap(),
            _ => panic!("function body is not a block"),
        }
    }

    #[test]
    fn test_arithmetic_and_logic() {
        let (module, errors) = check("fun f(a: int, b: bool) -> bool { -a + 2 * a > 3 && !b }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(tail_of(&module, "f").get_type(), &Type::BOOL);
    }

    #[test]
    fn test_arithmetic_on_bool_is_rejected() {
        let (_, errors) = check("fun f(b: bool) -> int { b + 1 }");
        assert!(matches!(errors.as_slice(), [SemanticError::InvalidOperand { .. }]));
    }

    #[test]
    fn test_ordering_needs_ints() {
        let (_, errors) = check("fun f(a: bool, b: bool) -> bool { a < b }");
        assert!(matches!(errors.as_slice(), [SemanticError::InvalidOperand { .. }]));

        let (_, errors) = check("fun f(a: bool, b: bool) -> bool { a == b }");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_comparison_operands_must_agree() {
        let (_, errors) = check("fun f(a: int, b: bool) -> bool { a == b }");
        assert!(matches!(errors.as_slice(), [SemanticError::TypeMismatch { .. }]));
    }

    #[test]
    fn test_failed_operand_does_not_cascade() {
        let (_, errors) = check("fun f() -> int { (missing + 1) * 2 }");
        assert!(matches!(errors.as_slice(), [SemanticError::UndefinedVariable { .. }]));
    }

    #[test]
    fn test_extern_call_is_native() {
        let (module, errors) = check("extern fun print(n: int); fun f() { print(1) }");
        assert!(errors.is_empty(), "{errors:?}");
        match tail_of(&module, "f").kind {
            ExpressionKind::FnCall(call) => assert!(call.is_native),
            _ => panic!("expected a call"),
        }
    }

    #[test]
    fn test_call_checks_arity_and_arguments() {
        let (_, errors) = check("fun g(a: int) -> int { a } fun f() -> int { g(1, 2) + g(true) }");
        assert!(matches!(
            errors.as_slice(),
            [SemanticError::ArgumentCountMismatch { expected: 1, found: 2, .. }, SemanticError::TypeMismatch { .. }]
        ));
    }

    #[test]
    fn test_struct_construction() {
        let (module, errors) = check("struct P { x: int, y: bool } fun f() -> P { P:{1, true} }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(tail_of(&module, "f").get_type().is_struct());

        let (_, errors) = check("struct P { x: int, y: bool } fun f() -> P { P:{1} }");
        assert!(matches!(errors.as_slice(), [SemanticError::FieldCountMismatch { .. }]));

        let (_, errors) = check("struct P { x: int, y: bool } fun f() -> P { P:{1, 2} }");
        assert!(matches!(errors.as_slice(), [SemanticError::TypeMismatch { .. }]));
    }

    #[test]
    fn test_field_access_on_local_is_direct() {
        let (module, errors) = check(
            "struct P { x: int, y: int }\n\
             fun f(n: int) -> int { var p: P = P:{1, 2}; p.y }",
        );
        assert!(errors.is_empty(), "{errors:?}");

        let access = tail_of(&module, "f");
        assert!(access.is_direct());
        // n takes the first word, p starts right after it
        assert_eq!(access.address(), Address(WORD_SIZE + WORD_SIZE));
    }

    #[test]
    fn test_field_access_through_pointer_is_indirect() {
        let (module, errors) = check("struct P { x: int, y: int } fun f(p: *P) -> int { (*p).y }");
        assert!(errors.is_empty(), "{errors:?}");

        let access = tail_of(&module, "f");
        assert!(!access.is_direct());
        match &access.kind {
            ExpressionKind::FieldAccess(field) => assert_eq!(field.location.get(), &Location::Indirect),
            _ => panic!("expected a field access"),
        }
    }

    #[test]
    fn test_unknown_field_and_non_struct() {
        let (_, errors) = check("struct P { x: int } fun f(p: P, n: int) -> int { p.z + n.x }");
        assert!(matches!(
            errors.as_slice(),
            [SemanticError::UnknownField { .. }, SemanticError::NotAStruct { .. }]
        ));
    }

    #[test]
    fn test_field_access_on_call_result() {
        let (_, errors) = check("struct P { x: int } fun g() -> P { P:{1} } fun f() -> int { g().x }");
        assert!(matches!(errors.as_slice(), [SemanticError::NotAnLvalue { .. }]));
    }

    #[test]
    fn test_address_of_rules() {
        let (module, errors) = check("fun f(x: int) -> *int { &x }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(tail_of(&module, "f").get_type(), &Type::pointer_to(Type::INT));

        let (_, errors) = check("fun f(p: *int) -> *int { &*p }");
        assert!(matches!(errors.as_slice(), [SemanticError::NotAddressable { .. }]));

        let (_, errors) = check("fun f() -> *int { &1 }");
        assert!(matches!(errors.as_slice(), [SemanticError::NotAnLvalue { .. }]));
    }

    #[test]
    fn test_local_named_like_function_does_not_hide_it() {
        let (_, errors) = check("fun g() -> int { 1 } fun f() -> int { var g = 2; g() + g }");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_int_literal_range() {
        let (module, errors) = check("fun f() -> int { -9223372036854775808 }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(tail_of(&module, "f").get_type(), &Type::INT);

        let (_, errors) = check("fun f() -> int { 9223372036854775807 }");
        assert!(errors.is_empty(), "{errors:?}");

        let (_, errors) = check("fun f() -> int { 9223372036854775808 }");
        assert!(matches!(
            errors.as_slice(),
            [SemanticError::IntegerOutOfRange { value: INT_MIN_MAGNITUDE, .. }]
        ));
    }

    #[test]
    fn test_deref_of_non_pointer() {
        let (_, errors) = check("fun f(x: int) -> int { *x }");
        assert!(matches!(errors.as_slice(), [SemanticError::InvalidOperand { .. }]));
    }

    #[test]
    fn test_if_branches() {
        let (_, errors) = check("fun f(c: bool) -> int { if c { 1 } else { 2 } }");
        assert!(errors.is_empty(), "{errors:?}");

        let (_, errors) = check("fun f(c: bool) -> int { if c { 1 } else { true } }");
        assert!(matches!(errors.as_slice(), [SemanticError::BranchTypeMismatch { .. }]));

        let (_, errors) = check("fun f(c: int) { if c { } }");
        assert!(matches!(errors.as_slice(), [SemanticError::TypeMismatch { .. }]));
    }

    #[test]
    fn test_if_without_else_must_be_unit() {
        let (_, errors) = check("fun f(c: bool) { if c { } }");
        assert!(errors.is_empty(), "{errors:?}");

        let (_, errors) = check("fun f(c: bool) -> int { if c { 1 } }");
        assert!(matches!(errors.as_slice(), [SemanticError::BranchTypeMismatch { .. }]));
    }
}
