//! Type checker
//!
//! Walks the module in three passes: struct declarations, function
//! signatures, function bodies. Every independent error is recorded and
//! checking carries on; a sub-expression that failed yields `None`, which
//! stops the enclosing expressions from piling more errors on top of it.
//! Annotation slots are only written for expressions that checked cleanly.

mod expressions;
mod statements;

use crate::ast::*;
use crate::lexer::Token;
use crate::semantic::errors::SemanticError;
use crate::semantic::frame::FrameAllocator;
use crate::semantic::layout::{calculate_struct_layout, StructLayout};
use crate::semantic::symbols::{FunctionInfo, Scopes, VariableInfo};
use crate::types::{PrimitiveKind, StructField, Type};
use etc_common::{internal_fault, CompilerError, SourceSpan};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Signature types as resolved during the signature pass
#[derive(Debug, Clone)]
struct ResolvedSignature {
    parameters: Vec<Option<Type>>,
    return_type: Option<Type>,
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    scopes: Scopes,
    structs: HashMap<String, Type>,
    layouts: HashMap<String, StructLayout>,
    signatures: HashMap<NodeId, ResolvedSignature>,
    /// Storage of the function currently being checked
    frame: FrameAllocator,
    /// Return type of the function currently being checked
    return_type: Option<Type>,
    errors: Vec<SemanticError>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn error(&mut self, error: SemanticError) {
        trace!("semantic error: {error}");
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    /// Ok if nothing was recorded, otherwise every recorded error
    pub fn finish(self) -> Result<(), CompilerError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        Err(CompilerError::Aggregate {
            errors: self.errors.into_iter().map(CompilerError::from).collect(),
        })
    }

    /// Check a whole module, filling every annotation slot in it
    pub fn check_module(&mut self, module: &mut Module) {
        for item in &mut module.items {
            if let Item::Struct(decl) = item {
                self.register_struct(decl);
            }
        }

        for item in &module.items {
            match item {
                Item::Function(decl) => self.register_signature(decl.node_id, &decl.signature, false, &decl.span),
                Item::Extern(decl) => self.register_signature(decl.node_id, &decl.signature, true, &decl.span),
                Item::Struct(_) => {}
            }
        }

        for item in &mut module.items {
            if let Item::Function(decl) = item {
                self.check_function(decl);
            }
        }

        debug!("type checking finished with {} error(s)", self.errors.len());
    }

    /// Resolve a written type. Records `UndefinedType` on failure.
    pub fn resolve_type(&mut self, type_expr: &TypeExpr) -> Option<Type> {
        match &type_expr.kind {
            TypeExprKind::Named(name) => {
                if let Some(kind) = PrimitiveKind::from_name(name) {
                    return Some(Type::Primitive(kind));
                }
                match self.structs.get(name) {
                    Some(ty) => Some(ty.clone()),
                    None => {
                        self.error(SemanticError::UndefinedType {
                            name: name.clone(),
                            span: type_expr.span.clone(),
                        });
                        None
                    }
                }
            }
            TypeExprKind::Pointer(inner) => self.resolve_type(inner).map(Type::pointer_to),
        }
    }

    /// Fields may only name structs declared earlier in the module
    fn register_struct(&mut self, decl: &mut StructDecl) {
        let name = decl.name.lexeme();
        if self.structs.contains_key(&name) || PrimitiveKind::from_name(&name).is_some() {
            self.error(SemanticError::Redefinition {
                name,
                span: decl.name.span.clone(),
            });
            return;
        }

        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut seen = HashSet::new();
        let mut complete = true;
        for field in &decl.fields {
            let field_name = field.name.lexeme();
            if !seen.insert(field_name.clone()) {
                self.error(SemanticError::Redefinition {
                    name: format!("{name}.{field_name}"),
                    span: field.name.span.clone(),
                });
                complete = false;
                continue;
            }
            match self.resolve_type(&field.field_type) {
                Some(ty) => fields.push(StructField::new(&field_name, ty)),
                None => complete = false,
            }
        }
        if !complete {
            return;
        }

        let ty = Type::Struct {
            name: name.clone(),
            fields,
        };
        let layout = match calculate_struct_layout(&ty, &decl.span) {
            Ok(layout) => layout,
            Err(err) => {
                self.error(err);
                return;
            }
        };

        trace!("registered {ty} ({} bytes)", layout.total_size);
        decl.resolved.set(ty.clone());
        self.structs.insert(name.clone(), ty);
        self.layouts.insert(name, layout);
    }

    fn register_signature(&mut self, node_id: NodeId, signature: &Signature, is_native: bool, span: &SourceSpan) {
        let parameters: Vec<Option<Type>> = signature
            .parameters
            .iter()
            .map(|param| self.resolve_type(&param.param_type))
            .collect();
        let return_type = match &signature.return_type {
            Some(written) => self.resolve_type(written),
            None => Some(Type::UNIT),
        };

        let complete_parameters: Option<Vec<Type>> = parameters.iter().cloned().collect();
        if let (Some(parameter_types), Some(return_ty)) = (complete_parameters, return_type.clone()) {
            let info = FunctionInfo::new(parameter_types, return_ty, is_native);
            if let Err(err) = self.scopes.declare_function(&signature.name.lexeme(), info, span) {
                self.error(err);
            }
        }

        self.signatures.insert(node_id, ResolvedSignature { parameters, return_type });
    }

    fn check_function(&mut self, decl: &mut FunctionDecl) {
        let name = decl.signature.name.lexeme();
        debug!("checking function {name}");

        let Some(signature) = self.signatures.get(&decl.node_id).cloned() else {
            internal_fault(format!("function {name} was never registered"));
        };

        self.frame = FrameAllocator::new();
        self.return_type = signature.return_type.clone();
        self.scopes.push_scope();

        for (param, param_type) in decl.signature.parameters.iter_mut().zip(signature.parameters) {
            match param_type {
                Some(param_type) => self.declare_local(&param.name, param_type, &mut param.address),
                None => self.poison_local(&param.name),
            }
        }

        let body_type = self.check_expr(&mut decl.body);

        if let (Some(body_type), Some(return_type)) = (body_type, &signature.return_type) {
            if body_type != *return_type && !always_returns(&decl.body) {
                self.error(SemanticError::ReturnTypeMismatch {
                    expected: return_type.clone(),
                    found: body_type,
                    span: decl.body.span.clone(),
                });
            }
        }

        self.scopes.pop_scope();
        self.return_type = None;
        decl.frame_size.set(self.frame.frame_size());
    }

    /// Give a parameter or local its frame slot and bring it into scope
    pub(crate) fn declare_local(&mut self, name: &Token, var_type: Type, address_slot: &mut Slot<Address>) {
        let Some(address) = self.frame.allocate(&var_type) else {
            self.error(SemanticError::IncompleteType {
                type_name: var_type.to_string(),
                span: name.span.clone(),
            });
            self.poison_local(name);
            return;
        };

        address_slot.set(address);
        let info = VariableInfo { var_type, address };
        if let Err(err) = self.scopes.declare_variable(&name.lexeme(), info, &name.span) {
            self.error(err);
        }
    }

    /// Bring a name into scope whose type is unknown after an earlier error,
    /// so its uses are not reported a second time
    pub(crate) fn poison_local(&mut self, name: &Token) {
        trace!("poisoning {}", name.lexeme());
        if let Err(err) = self.scopes.declare_poisoned(&name.lexeme(), &name.span) {
            self.error(err);
        }
    }

    /// Check an expression and record its type in the node
    pub fn check_expr(&mut self, expr: &mut Expression) -> Option<Type> {
        let ty = expr.accept_mut(self)?;
        expr.expr_type.set(ty.clone());
        Some(ty)
    }
}

/// Does every path through `expr` end in a `return` statement?
///
/// A body for which this holds needs no tail of the declared return type.
fn always_returns(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Block(block) => match &block.tail {
            Some(tail) => always_returns(tail),
            None => match block.statements.last().map(|s| &s.kind) {
                Some(StatementKind::Return(_)) => true,
                Some(StatementKind::Expression(last)) => always_returns(last),
                _ => false,
            },
        },
        ExpressionKind::If(if_expr) => always_returns(&if_expr.then_branch) && always_returns(&if_expr.else_branch),
        _ => false,
    }
}
