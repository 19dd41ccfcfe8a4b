//! Python language analyzer using tree-sitter.

mod docstring;
mod extract;

use tree_sitter::{Language, Node, Parser};

use crate::analysis::{AnalysisError, LanguageAnalyzer, Outline, ParsedFile};
use crate::config::AnalyzerConfig;

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// First syntax problem in document order, as a Python-style diagnostic.
///
/// The grammar is error-tolerant, so besides ERROR and MISSING nodes this
/// also rejects constructs it accepts but Python 3 does not: empty suites,
/// inconsistent indentation, parameters without a default after defaulted
/// ones, bare `yield` outside a statement or assignment, and the legacy
/// `print`/`exec` statements.
fn syntax_diagnostic(root: Node, source: &str, path: &str) -> Option<String> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if let Some((msg, line)) = problem_at(node, source) {
            return Some(format!("{} ({}, line {})", msg, path, line));
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Message and 1-based line of the problem at `node`, if any.
fn problem_at(node: Node, source: &str) -> Option<(String, usize)> {
    let line = node.start_position().row + 1;
    if node.is_missing() {
        return Some((format!("expected '{}'", node.kind()), line));
    }
    if node.is_error() {
        return Some(("invalid syntax".to_string(), line));
    }
    match node.kind() {
        "module" => indentation_problem(node, Some(0)),
        "block" => {
            let mut cursor = node.walk();
            let has_statement = node
                .named_children(&mut cursor)
                .any(|child| child.kind() != "comment");
            if !has_statement {
                let line = node.end_position().row + 1;
                return Some(("expected an indented block".to_string(), line));
            }
            indentation_problem(node, None)
        }
        "parameters" | "lambda_parameters" => default_order_problem(node),
        "yield" => {
            let allowed = node.parent().is_some_and(|parent| {
                matches!(
                    parent.kind(),
                    "expression_statement"
                        | "assignment"
                        | "augmented_assignment"
                        | "parenthesized_expression"
                )
            });
            (!allowed).then(|| ("invalid syntax".to_string(), line))
        }
        "lambda" => node
            .child_by_field_name("body")
            .filter(|body| body.kind() == "yield" || is_yield_keyword(*body, source))
            .map(|_| ("invalid syntax".to_string(), line)),
        "print_statement" => Some(("Missing parentheses in call to 'print'".to_string(), line)),
        "exec_statement" => Some(("Missing parentheses in call to 'exec'".to_string(), line)),
        _ => None,
    }
}

fn is_yield_keyword(node: Node, source: &str) -> bool {
    let text = node.utf8_text(source.as_bytes()).unwrap_or("");
    text.strip_prefix("yield")
        .is_some_and(|rest| !rest.starts_with(|c: char| c == '_' || c.is_alphanumeric()))
}

/// Statements of a suite that begin a line must share one indentation
/// column; module statements must start at column 0.
fn indentation_problem(container: Node, fixed: Option<usize>) -> Option<(String, usize)> {
    let mut expected = fixed;
    let mut prev_end_row: Option<usize> = None;

    let mut cursor = container.walk();
    for stmt in container.named_children(&mut cursor) {
        if stmt.kind() == "comment" {
            continue;
        }
        let start = stmt.start_position();
        let starts_line = prev_end_row.map_or(true, |row| start.row > row);
        prev_end_row = Some(stmt.end_position().row);
        if !starts_line {
            continue;
        }
        match expected {
            None => expected = Some(start.column),
            Some(col) if start.column > col => {
                return Some(("unexpected indent".to_string(), start.row + 1));
            }
            Some(col) if start.column < col => {
                return Some((
                    "unindent does not match any outer indentation level".to_string(),
                    start.row + 1,
                ));
            }
            Some(_) => {}
        }
    }
    None
}

/// Positional parameters after a defaulted one must have a default too.
fn default_order_problem(list: Node) -> Option<(String, usize)> {
    let mut seen_default = false;

    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        let plain = match param.kind() {
            "default_parameter" | "typed_default_parameter" => {
                seen_default = true;
                false
            }
            "identifier" => true,
            "typed_parameter" => match param.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => true,
                _ => break,
            },
            "positional_separator" | "comment" => false,
            // everything after `*`, `*args` or `**kwargs` is keyword-only
            _ => break,
        };
        if plain && seen_default {
            return Some((
                "parameter without a default follows parameter with a default".to_string(),
                param.start_position().row + 1,
            ));
        }
    }
    None
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn parse(&self, path: &str, source: &str) -> Result<ParsedFile, AnalysisError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            AnalysisError::analysis(format!("failed to parse Python source: {}", path))
        })?;

        if let Some(diagnostic) = syntax_diagnostic(tree.root_node(), source, path) {
            tracing::debug!(path, %diagnostic, "rejecting malformed source");
            return Err(AnalysisError::Syntax(diagnostic));
        }

        Ok(ParsedFile {
            tree,
            source: source.to_string(),
            path: path.to_string(),
        })
    }

    fn docstring(&self, parsed: &ParsedFile, node: Node) -> Option<String> {
        docstring::for_definition(parsed, node)
    }

    fn extract(
        &self,
        parsed: &ParsedFile,
        config: &AnalyzerConfig,
    ) -> Result<Outline, AnalysisError> {
        let outline = extract::Extractor::new(self, parsed, config).run()?;
        tracing::debug!(
            path = %parsed.path,
            classes = outline.classes.len(),
            functions = outline.functions.len(),
            imports = outline.imports.len(),
            "extracted declarations"
        );
        Ok(outline)
    }
}
