//! A one-armed `if` must be indistinguishable from one with an empty `else`

use etc_common::SourceSpan;
use etc_frontend::ast::*;
use etc_frontend::lexer::{Token, TokenType};
use etc_frontend::semantic::TypeChecker;
use etc_frontend::types::Type;
use etc_frontend::AstPrinter;
use pretty_assertions::assert_eq;

fn build(with_explicit_else: bool, then_value: Option<u64>) -> Expression {
    let mut ast = AstBuilder::new();
    let condition = ast.literal(Token::synthetic(TokenType::True));
    let tail = then_value.map(|n| ast.literal(Token::synthetic(TokenType::IntLiteral(n))));
    let then_branch = ast.block(Vec::new(), tail, SourceSpan::dummy());

    let else_branch = if with_explicit_else {
        let end = SourceSpan::from_location(then_branch.span.end.clone());
        Some(ast.block(Vec::new(), None, end))
    } else {
        None
    };
    ast.if_expr(condition, then_branch, else_branch)
}

#[test]
fn test_trees_are_identical() {
    assert_eq!(build(false, None), build(true, None));
    assert_eq!(build(false, Some(1)), build(true, Some(1)));
}

#[test]
fn test_printer_sees_no_difference() {
    let mut printer = AstPrinter::new();
    let implicit = printer.print_expression(&build(false, Some(1)));
    let explicit = printer.print_expression(&build(true, Some(1)));
    assert_eq!(implicit, explicit);
    assert_eq!(implicit, "if true { 1 } else { }");
}

#[test]
fn test_checker_sees_no_difference() {
    for then_value in [None, Some(7)] {
        let mut implicit = build(false, then_value);
        let mut explicit = build(true, then_value);

        let mut checker = TypeChecker::new();
        let implicit_type = checker.check_expr(&mut implicit);
        let implicit_errors = checker.errors().len();

        let mut checker = TypeChecker::new();
        let explicit_type = checker.check_expr(&mut explicit);
        let explicit_errors = checker.errors().len();

        assert_eq!(implicit_type, explicit_type);
        assert_eq!(implicit_errors, explicit_errors);
        assert_eq!(implicit, explicit);
    }
}

#[test]
fn test_unit_then_branch_is_accepted() {
    let mut expr = build(false, None);
    let mut checker = TypeChecker::new();
    assert_eq!(checker.check_expr(&mut expr), Some(Type::UNIT));
    assert!(checker.errors().is_empty());
    assert_eq!(expr.get_type(), &Type::UNIT);
}
