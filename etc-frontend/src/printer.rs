//! Source-like rendering of the AST
//!
//! Output is single-line per item and re-parses to the same tree. Nested
//! binary operands are parenthesised instead of relying on precedence.

use crate::ast::*;
use crate::visitor::ExpressionVisitor;
use etc_common::SourceSpan;

#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_expression(&mut self, expr: &Expression) -> String {
        expr.accept(self)
    }

    /// Operand of an operator; wrapped when it would otherwise bind wrongly
    fn operand(&mut self, expr: &Expression) -> String {
        let text = expr.accept(self);
        match expr.kind {
            ExpressionKind::Binary(_) | ExpressionKind::Comparison(_) | ExpressionKind::If(_) => format!("({text})"),
            _ => text,
        }
    }

    fn list(&mut self, exprs: &[Expression]) -> String {
        exprs.iter().map(|e| e.accept(self)).collect::<Vec<_>>().join(", ")
    }

    pub fn print_statement(&mut self, statement: &Statement) -> String {
        match &statement.kind {
            StatementKind::Expression(expr) => format!("{};", expr.accept(self)),
            StatementKind::VarDecl(decl) => {
                let annotation = decl
                    .annotation
                    .as_ref()
                    .map(|ty| format!(": {ty}"))
                    .unwrap_or_default();
                format!("var {}{} = {};", decl.name.lexeme(), annotation, decl.value.accept(self))
            }
            StatementKind::Assignment { target, value } => {
                format!("{} = {};", target.accept(self), value.accept(self))
            }
            StatementKind::Return(Some(value)) => format!("return {};", value.accept(self)),
            StatementKind::Return(None) => "return;".to_string(),
        }
    }

    fn print_signature(&mut self, signature: &Signature) -> String {
        let parameters = signature
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name.lexeme(), p.param_type))
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = signature
            .return_type
            .as_ref()
            .map(|ty| format!(" -> {ty}"))
            .unwrap_or_default();
        format!("fun {}({}){}", signature.name.lexeme(), parameters, return_type)
    }

    pub fn print_item(&mut self, item: &Item) -> String {
        match item {
            Item::Struct(decl) => {
                let fields = decl
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name.lexeme(), f.field_type))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("struct {} {{ {} }}", decl.name.lexeme(), fields)
            }
            Item::Function(decl) => {
                format!("{} {}", self.print_signature(&decl.signature), decl.body.accept(self))
            }
            Item::Extern(decl) => format!("extern {};", self.print_signature(&decl.signature)),
        }
    }

    pub fn print_module(&mut self, module: &Module) -> String {
        module
            .items
            .iter()
            .map(|item| self.print_item(item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ExpressionVisitor for AstPrinter {
    type Output = String;

    fn visit_comparison(&mut self, expr: &ComparisonExpr, _: &SourceSpan) -> String {
        format!("{} {} {}", self.operand(&expr.left), expr.operator.token_type, self.operand(&expr.right))
    }

    fn visit_binary(&mut self, expr: &BinaryExpr, _: &SourceSpan) -> String {
        format!("{} {} {}", self.operand(&expr.left), expr.operator.token_type, self.operand(&expr.right))
    }

    fn visit_unary(&mut self, expr: &UnaryExpr, _: &SourceSpan) -> String {
        format!("{}{}", expr.operator.token_type, self.operand(&expr.operand))
    }

    fn visit_deref(&mut self, expr: &DerefExpr, _: &SourceSpan) -> String {
        format!("*{}", self.operand(&expr.operand))
    }

    fn visit_address_of(&mut self, expr: &AddressOfExpr, _: &SourceSpan) -> String {
        format!("&{}", self.operand(&expr.operand))
    }

    fn visit_fn_call(&mut self, expr: &FnCallExpr, _: &SourceSpan) -> String {
        format!("{}({})", expr.callee(), self.list(&expr.arguments))
    }

    fn visit_struct_construction(&mut self, expr: &StructConstructionExpr, _: &SourceSpan) -> String {
        format!("{}:{{{}}}", expr.struct_name.lexeme(), self.list(&expr.values))
    }

    fn visit_field_access(&mut self, expr: &FieldAccessExpr, _: &SourceSpan) -> String {
        let operand = expr.operand.accept(self);
        match expr.operand.kind {
            ExpressionKind::FieldAccess(_)
            | ExpressionKind::VarAccess(_)
            | ExpressionKind::FnCall(_)
            | ExpressionKind::StructConstruction(_) => format!("{}.{}", operand, expr.field.lexeme()),
            _ => format!("({}).{}", operand, expr.field.lexeme()),
        }
    }

    fn visit_block(&mut self, expr: &BlockExpr, _: &SourceSpan) -> String {
        if expr.is_empty() {
            return "{ }".to_string();
        }

        let mut parts: Vec<String> = expr.statements.iter().map(|s| self.print_statement(s)).collect();
        if let Some(tail) = &expr.tail {
            parts.push(tail.accept(self));
        }
        format!("{{ {} }}", parts.join(" "))
    }

    fn visit_if(&mut self, expr: &IfExpr, _: &SourceSpan) -> String {
        format!(
            "if {} {} else {}",
            expr.condition.accept(self),
            expr.then_branch.accept(self),
            expr.else_branch.accept(self)
        )
    }

    fn visit_literal(&mut self, expr: &LiteralExpr, _: &SourceSpan) -> String {
        expr.token.lexeme()
    }

    fn visit_var_access(&mut self, expr: &VarAccessExpr, _: &SourceSpan) -> String {
        expr.name.lexeme()
    }
}
