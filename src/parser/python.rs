//! @dose
//! purpose: Python frontend. Parses source with tree-sitter and lowers the concrete syntax
//!     tree into the owned declaration Module: classes, (async) functions with their full
//!     parameter lists and docstrings, and annotated assignments. Everything else becomes
//!     Statement::Other.
//!
//! when-editing:
//!     - !tree-sitter never fails outright; syntax errors are found by scanning for ERROR and
//!       MISSING nodes before lowering starts
//!     - !Decorated definitions lower to the definition they wrap
//!     - Every expression is rendered during lowering so the Module owns no tree-sitter data
//!
//! invariants:
//!     - Leading-parameter defaults always form a contiguous tail, or the file is rejected
//!     - A `/` moves all earlier leading parameters into the positional-only group
//!     - A bare `*` or `*args` makes every following named parameter keyword-only
//!
//! do-not:
//!     - Never treat keyword arguments in a class header (metaclass=...) as bases
//!
//! gotchas:
//!     - Comments are named nodes in tree-sitter and show up among block children
//!     - Python 2 print/exec statements parse cleanly in tree-sitter-python but are syntax
//!       errors for a Python 3 interpreter, so they are rejected explicitly. `print >> f`
//!       is a valid shift expression in Python 3 and is let through
//!     - tree-sitter accepts arbitrarily deep nesting; the interpreter's bracket and
//!       indentation limits are enforced here so later walks stay shallow
//!
//! flows:
//!     - Parse: create parser -> parse -> find_syntax_problem -> Lowering::statements(root)

use crate::parser::literal::{expand_tabs, string_value};
use crate::parser::render::render_expr;
use crate::parser::{LanguageParser, ParseError};
use crate::types::{
    AnnotatedAssignment, ClassDecl, Expr, FunctionDecl, Module, Parameter, ParameterList,
    Statement,
};
use std::path::Path;
use tree_sitter::{Node, Parser, TreeCursor};

/// Parser for Python files
#[derive(Clone)]
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::Setup(e.to_string()))?;
        Ok(parser)
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for PythonParser {
    fn language_name(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["py"]
    }

    fn parse_module(&self, source: &str, _file_path: &Path) -> Result<Module, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Setup("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        let mut cursor = root.walk();
        if let Some(problem) = find_syntax_problem(&mut cursor) {
            return Err(problem);
        }

        let body = Lowering { source }.statements(root)?;
        Ok(Module { body })
    }
}

/// Bracket nesting the interpreter accepts before giving up
const MAX_BRACKET_NESTING: usize = 200;

/// Indented blocks the interpreter accepts inside one another
const MAX_INDENT_LEVELS: usize = 99;

/// Pre-order walk for the first node a Python 3 interpreter would refuse. Iterative, so
/// the depth of the tree never touches the call stack.
fn find_syntax_problem(cursor: &mut TreeCursor) -> Option<ParseError> {
    let mut brackets = 0usize;
    let mut blocks = 0usize;

    loop {
        let node = cursor.node();
        let line = node.start_position().row + 1;

        if node.is_error() || node.is_missing() {
            return Some(ParseError::Syntax {
                line,
                column: node.start_position().column + 1,
            });
        }

        match node.kind() {
            "(" | "[" | "{" => {
                brackets += 1;
                if brackets > MAX_BRACKET_NESTING {
                    return Some(ParseError::Rejected {
                        message: "too many nested parentheses".to_string(),
                        line,
                    });
                }
            }
            ")" | "]" | "}" => brackets = brackets.saturating_sub(1),
            "block" => {
                blocks += 1;
                if blocks > MAX_INDENT_LEVELS {
                    return Some(ParseError::Rejected {
                        message: "too many levels of indentation".to_string(),
                        line,
                    });
                }
            }
            "print_statement" if !has_child_kind(node, "chevron") => {
                return Some(missing_parentheses("print", line));
            }
            "exec_statement" => return Some(missing_parentheses("exec", line)),
            _ => {}
        }

        if cursor.goto_first_child() {
            continue;
        }

        // Leave finished nodes until one has a next sibling
        loop {
            if cursor.node().kind() == "block" {
                blocks = blocks.saturating_sub(1);
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

fn missing_parentheses(keyword: &str, line: usize) -> ParseError {
    ParseError::Rejected {
        message: format!("Missing parentheses in call to '{}'", keyword),
        line,
    }
}

/// Lowers tree-sitter nodes of one source file into declaration types
struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    fn node_text(&self, node: Node) -> String {
        self.source[node.start_byte()..node.end_byte()].to_string()
    }

    fn field_text(&self, node: Node, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.node_text(n))
            .unwrap_or_default()
    }

    fn statements(&self, block: Node) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            statements.push(self.statement(child)?);
        }
        Ok(statements)
    }

    fn statement(&self, node: Node) -> Result<Statement, ParseError> {
        match node.kind() {
            "class_definition" => self.class(node).map(Statement::Class),
            "function_definition" => self.function(node).map(Statement::Function),
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(definition) => self.statement(definition),
                None => Ok(Statement::Other),
            },
            "expression_statement" => Ok(self
                .annotated_assignment(node)
                .map(Statement::AnnotatedAssignment)
                .unwrap_or(Statement::Other)),
            _ => Ok(Statement::Other),
        }
    }

    fn class(&self, node: Node) -> Result<ClassDecl, ParseError> {
        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| self.bases(args))
            .unwrap_or_default();

        let body = match node.child_by_field_name("body") {
            Some(block) => self.statements(block)?,
            None => Vec::new(),
        };

        Ok(ClassDecl {
            name: self.field_text(node, "name"),
            bases,
            body,
        })
    }

    fn bases(&self, args: Node) -> Vec<Expr> {
        let mut cursor = args.walk();
        args.named_children(&mut cursor)
            .filter(|arg| {
                !matches!(
                    arg.kind(),
                    "keyword_argument" | "dictionary_splat" | "comment"
                )
            })
            .map(|arg| render_expr(arg, self.source))
            .collect()
    }

    fn function(&self, node: Node) -> Result<FunctionDecl, ParseError> {
        let is_async = {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .take_while(|c| c.kind() != "def")
                .any(|c| c.kind() == "async");
            found
        };

        let params = match node.child_by_field_name("parameters") {
            Some(params) => self.parameters(params)?,
            None => ParameterList::default(),
        };

        let return_type = node
            .child_by_field_name("return_type")
            .map(|ret| render_expr(ret, self.source));

        let block = node.child_by_field_name("body");
        let docstring = block.and_then(|b| self.docstring(b));
        let body = match block {
            Some(b) => self.statements(b)?,
            None => Vec::new(),
        };

        Ok(FunctionDecl {
            name: self.field_text(node, "name"),
            is_async,
            params,
            return_type,
            docstring,
            body,
        })
    }

    fn docstring(&self, block: Node) -> Option<String> {
        let first = {
            let mut cursor = block.walk();
            let first = block
                .named_children(&mut cursor)
                .find(|c| c.kind() != "comment");
            first
        }?;

        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return None;
        }

        let mut expr = first.named_child(0)?;
        while expr.kind() == "parenthesized_expression" {
            expr = expr.named_child(0)?;
        }

        let value = expand_tabs(&string_value(expr, self.source)?);
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn annotated_assignment(&self, stmt: Node) -> Option<AnnotatedAssignment> {
        let assign = stmt.named_child(0)?;
        if assign.kind() != "assignment" {
            return None;
        }

        let type_node = assign.child_by_field_name("type")?;
        let target = assign.child_by_field_name("left")?;
        let is_simple = target.kind() == "identifier";

        Some(AnnotatedAssignment {
            target_is_simple_name: is_simple,
            target_name: is_simple.then(|| self.node_text(target)),
            type_expr: render_expr(type_node, self.source),
        })
    }

    fn splat_name(&self, splat: Node) -> String {
        splat
            .named_child(0)
            .map(|n| self.node_text(n))
            .unwrap_or_default()
    }

    fn parameters(&self, node: Node) -> Result<ParameterList, ParseError> {
        let mut list = ParameterList::default();
        let mut leading: Vec<(Parameter, Option<Expr>)> = Vec::new();
        let mut posonly_count = 0;
        let mut keyword_only = false;

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let entry = match child.kind() {
                "identifier" => Some((Parameter::bare(self.node_text(child)), None)),
                "typed_parameter" => {
                    let annotation = child
                        .child_by_field_name("type")
                        .map(|t| render_expr(t, self.source));
                    match child.named_child(0) {
                        Some(target) if target.kind() == "identifier" => {
                            Some((Parameter::new(self.node_text(target), annotation), None))
                        }
                        Some(target) if target.kind() == "list_splat_pattern" => {
                            list.vararg = Some(Parameter::new(self.splat_name(target), annotation));
                            keyword_only = true;
                            None
                        }
                        Some(target) if target.kind() == "dictionary_splat_pattern" => {
                            list.kwarg = Some(Parameter::new(self.splat_name(target), annotation));
                            None
                        }
                        _ => None,
                    }
                }
                "default_parameter" | "typed_default_parameter" => child
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|name| {
                        let annotation = child
                            .child_by_field_name("type")
                            .map(|t| render_expr(t, self.source));
                        let default = child
                            .child_by_field_name("value")
                            .map(|v| render_expr(v, self.source));
                        (Parameter::new(self.node_text(name), annotation), default)
                    }),
                "list_splat_pattern" => {
                    list.vararg = Some(Parameter::bare(self.splat_name(child)));
                    keyword_only = true;
                    None
                }
                "dictionary_splat_pattern" => {
                    list.kwarg = Some(Parameter::bare(self.splat_name(child)));
                    None
                }
                "keyword_separator" => {
                    keyword_only = true;
                    None
                }
                "positional_separator" => {
                    posonly_count = leading.len();
                    None
                }
                _ => None,
            };

            if let Some(entry) = entry {
                if keyword_only {
                    list.kwonly.push(entry);
                } else {
                    leading.push(entry);
                }
            }
        }

        let first_default = leading.iter().position(|(_, d)| d.is_some());
        if let Some(start) = first_default {
            if leading[start..].iter().any(|(_, d)| d.is_none()) {
                return Err(ParseError::Rejected {
                    message: "parameter without a default follows parameter with a default"
                        .to_string(),
                    line: node.start_position().row + 1,
                });
            }
        }

        for (i, (param, default)) in leading.into_iter().enumerate() {
            if let Some(default) = default {
                list.defaults.push(default);
            }
            if i < posonly_count {
                list.posonly.push(param);
            } else {
                list.positional.push(param);
            }
        }

        Ok(list)
    }
}
