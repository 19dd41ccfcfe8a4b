//! Declaration extraction: one walk over the module producing classes,
//! top-level functions and imports.
//!
//! The enclosing context is passed down as a [`Scope`] value. Only direct
//! class-body statements become members; function bodies are searched for
//! imports and nothing else.

use tree_sitter::Node;

use super::PythonAnalyzer;
use crate::analysis::{
    AnalysisError, ClassInfo, Constructor, FunctionInfo, ImportInfo, LanguageAnalyzer, Location,
    Method, Outline, Parameter, ParsedFile, Property,
};
use crate::config::{AnalyzerConfig, ConstructorPolicy};

/// Name of the class initializer.
const CONSTRUCTOR_NAME: &str = "__init__";

/// Statements whose blocks continue the enclosing scope.
const COMPOUND_STATEMENTS: &[&str] = &[
    "if_statement",
    "for_statement",
    "while_statement",
    "try_statement",
    "with_statement",
    "match_statement",
    "case_clause",
];

/// Clauses that carry their own block inside a compound statement.
const CLAUSES: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Module level, including blocks of module-level compound statements.
    Module,
    /// Directly inside the body of `Outline::classes[index]`.
    Class(usize),
    /// Function bodies and anything else: imports only.
    Nested,
}

/// Statement shapes the extractor tells apart.
enum Statement<'t> {
    Class {
        node: Node<'t>,
        decorators: Vec<Node<'t>>,
    },
    Function {
        node: Node<'t>,
        decorators: Vec<Node<'t>>,
    },
    Import(Node<'t>),
    ImportFrom(Node<'t>),
    /// The `assignment` node of `name: type [= value]`.
    AnnotatedAssignment(Node<'t>),
    Compound(Vec<Node<'t>>),
    Other,
}

impl<'t> Statement<'t> {
    fn classify(node: Node<'t>) -> Result<Self, AnalysisError> {
        let stmt = match node.kind() {
            "class_definition" => Statement::Class {
                node,
                decorators: Vec::new(),
            },
            "function_definition" => Statement::Function {
                node,
                decorators: Vec::new(),
            },
            "decorated_definition" => {
                let mut cursor = node.walk();
                let decorators = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "decorator")
                    .collect();
                let definition = required(node, "definition")?;
                match definition.kind() {
                    "class_definition" => Statement::Class {
                        node: definition,
                        decorators,
                    },
                    "function_definition" => Statement::Function {
                        node: definition,
                        decorators,
                    },
                    other => return Err(unsupported(definition, other)),
                }
            }
            "import_statement" => Statement::Import(node),
            "import_from_statement" | "future_import_statement" => Statement::ImportFrom(node),
            "expression_statement" => match annotated_assignment(node) {
                Some(assignment) => Statement::AnnotatedAssignment(assignment),
                None => Statement::Other,
            },
            kind if COMPOUND_STATEMENTS.contains(&kind) => Statement::Compound(nested_blocks(node)),
            _ => Statement::Other,
        };
        Ok(stmt)
    }
}

fn required<'t>(node: Node<'t>, field: &str) -> Result<Node<'t>, AnalysisError> {
    node.child_by_field_name(field).ok_or_else(|| {
        AnalysisError::analysis(format!(
            "{} at line {} has no {}",
            node.kind(),
            node.start_position().row + 1,
            field
        ))
    })
}

fn unsupported(node: Node, what: &str) -> AnalysisError {
    AnalysisError::analysis(format!(
        "unsupported {} at line {}",
        what,
        node.start_position().row + 1
    ))
}

fn annotated_assignment(stmt: Node) -> Option<Node> {
    if stmt.named_child_count() != 1 {
        return None;
    }
    let assignment = stmt.named_child(0)?;
    (assignment.kind() == "assignment" && assignment.child_by_field_name("type").is_some())
        .then_some(assignment)
}

fn nested_blocks(node: Node) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "block" {
            blocks.push(child);
        } else if CLAUSES.contains(&child.kind()) {
            blocks.extend(nested_blocks(child));
        }
    }
    blocks
}

fn is_async(func: Node) -> bool {
    let mut cursor = func.walk();
    let found = func.children(&mut cursor).any(|child| child.kind() == "async");
    found
}

/// Drop the receiver: members always lose their first declared parameter,
/// whatever its kind or decorator.
fn strip_receiver(params: &mut Vec<Parameter>) {
    if !params.is_empty() {
        params.remove(0);
    }
}

pub(super) struct Extractor<'a> {
    analyzer: &'a PythonAnalyzer,
    parsed: &'a ParsedFile,
    config: &'a AnalyzerConfig,
    outline: Outline,
}

impl<'a> Extractor<'a> {
    pub(super) fn new(
        analyzer: &'a PythonAnalyzer,
        parsed: &'a ParsedFile,
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self {
            analyzer,
            parsed,
            config,
            outline: Outline::default(),
        }
    }

    pub(super) fn run(mut self) -> Result<Outline, AnalysisError> {
        let parsed = self.parsed;
        self.visit_block(parsed.tree.root_node(), Scope::Module)?;
        Ok(self.outline)
    }

    fn text(&self, node: Node) -> String {
        self.parsed.node_text(node).to_string()
    }

    fn unparse(&self, node: Node) -> String {
        self.analyzer.unparse(self.parsed, node)
    }

    fn visit_block(&mut self, block: Node<'a>, scope: Scope) -> Result<(), AnalysisError> {
        let mut cursor = block.walk();
        let statements: Vec<Node<'a>> = block.named_children(&mut cursor).collect();
        for stmt in statements {
            self.visit_statement(stmt, scope)?;
        }
        Ok(())
    }

    fn visit_body(&mut self, definition: Node<'a>, scope: Scope) -> Result<(), AnalysisError> {
        let body = required(definition, "body")?;
        self.visit_block(body, scope)
    }

    fn visit_statement(&mut self, node: Node<'a>, scope: Scope) -> Result<(), AnalysisError> {
        match Statement::classify(node)? {
            Statement::Class { node, decorators } => match scope {
                Scope::Module | Scope::Class(_) => self.visit_class(node, &decorators),
                Scope::Nested => self.visit_body(node, Scope::Nested),
            },
            Statement::Function { node, decorators } => {
                match scope {
                    Scope::Module => {
                        let func = self.function_info(node, &decorators)?;
                        self.outline.functions.push(func);
                    }
                    Scope::Class(index) => self.add_member(index, node, &decorators)?,
                    Scope::Nested => {}
                }
                self.visit_body(node, Scope::Nested)
            }
            Statement::Import(node) => {
                let imports = self.import_infos(node)?;
                self.outline.imports.extend(imports);
                Ok(())
            }
            Statement::ImportFrom(node) => {
                let import = self.import_from_info(node)?;
                self.outline.imports.push(import);
                Ok(())
            }
            Statement::AnnotatedAssignment(assignment) => {
                if let Scope::Class(index) = scope {
                    if let Some(prop) = self.property(assignment) {
                        self.outline.classes[index].properties.push(prop);
                    }
                }
                Ok(())
            }
            Statement::Compound(blocks) => {
                let inner = match scope {
                    Scope::Module => Scope::Module,
                    Scope::Class(_) | Scope::Nested => Scope::Nested,
                };
                for block in blocks {
                    self.visit_block(block, inner)?;
                }
                Ok(())
            }
            Statement::Other => Ok(()),
        }
    }

    fn visit_class(&mut self, node: Node<'a>, decorators: &[Node<'a>]) -> Result<(), AnalysisError> {
        let name = self.text(required(node, "name")?);
        let class = ClassInfo {
            documentation: self.analyzer.docstring(self.parsed, node),
            is_exported: self.config.exports.is_exported(&name),
            location: Location::from_node(node),
            decorators: self.decorators(decorators),
            base_classes: self.base_classes(node),
            name,
            methods: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
        };

        let index = self.outline.classes.len();
        self.outline.classes.push(class);
        self.visit_body(node, Scope::Class(index))
    }

    fn function_info(
        &self,
        node: Node<'a>,
        decorators: &[Node<'a>],
    ) -> Result<FunctionInfo, AnalysisError> {
        let name = self.text(required(node, "name")?);
        Ok(FunctionInfo {
            documentation: self.analyzer.docstring(self.parsed, node),
            is_exported: self.config.exports.is_exported(&name),
            is_async: is_async(node),
            decorators: self.decorators(decorators),
            location: Location::from_node(node),
            parameters: self.parameters(node)?,
            return_type: self.return_type(node),
            name,
        })
    }

    fn add_member(
        &mut self,
        index: usize,
        node: Node<'a>,
        decorators: &[Node<'a>],
    ) -> Result<(), AnalysisError> {
        let name = self.text(required(node, "name")?);
        let is_static = decorators.iter().any(|d| {
            self.decorator_expression(*d)
                .is_some_and(|e| e.kind() == "identifier" && self.parsed.node_text(e) == "staticmethod")
        });

        let mut parameters = self.parameters(node)?;
        strip_receiver(&mut parameters);
        let documentation = self.analyzer.docstring(self.parsed, node);
        let location = Location::from_node(node);

        if name == CONSTRUCTOR_NAME {
            let policy = self.config.constructors;
            let class = &mut self.outline.classes[index];
            let ctor = Constructor {
                documentation,
                location,
                parameters,
            };
            if class.constructors.is_empty() {
                class.constructors.push(ctor);
            } else if policy == ConstructorPolicy::Last {
                class.constructors[0] = ctor;
            } else {
                tracing::debug!(class = %class.name, %location, "ignoring redefined __init__");
            }
            return Ok(());
        }

        let method = Method {
            name,
            documentation,
            location,
            is_static,
            is_async: is_async(node),
            decorators: self.decorators(decorators),
            parameters,
            return_type: self.return_type(node),
        };
        self.outline.classes[index].methods.push(method);
        Ok(())
    }

    fn decorator_expression(&self, decorator: Node<'a>) -> Option<Node<'a>> {
        let mut cursor = decorator.walk();
        let expr = decorator
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        expr
    }

    /// Decorator display names: the identifier for `@name` and `@name(...)`,
    /// the source text for anything else.
    fn decorators(&self, decorators: &[Node<'a>]) -> Vec<String> {
        decorators
            .iter()
            .map(|decorator| match self.decorator_expression(*decorator) {
                Some(expr) if expr.kind() == "identifier" => self.text(expr),
                Some(expr) if expr.kind() == "call" => match expr.child_by_field_name("function") {
                    Some(func) if func.kind() == "identifier" => self.text(func),
                    _ => self.unparse(expr),
                },
                Some(expr) => self.unparse(expr),
                None => self.unparse(*decorator).trim_start_matches('@').trim().to_string(),
            })
            .collect()
    }

    fn base_classes(&self, class: Node<'a>) -> Vec<String> {
        let Some(args) = class.child_by_field_name("superclasses") else {
            return Vec::new();
        };
        let mut cursor = args.walk();
        let bases = args
            .named_children(&mut cursor)
            .filter(|arg| !matches!(arg.kind(), "keyword_argument" | "comment"))
            .map(|arg| self.unparse(arg))
            .collect();
        bases
    }

    fn return_type(&self, func: Node<'a>) -> Option<String> {
        func.child_by_field_name("return_type")
            .map(|ty| self.unparse(ty))
    }

    fn parameter(&self, name: String, ty: Option<Node<'a>>, default: Option<Node<'a>>) -> Parameter {
        Parameter {
            name,
            type_annotation: ty.map(|t| self.unparse(t)),
            is_optional: default.is_some(),
            default_value: default.map(|d| self.unparse(d)),
        }
    }

    /// `*args` / `**kwargs`, always optional and never defaulted.
    fn variadic(&self, marker: &str, pattern: Node<'a>, ty: Option<Node<'a>>) -> Parameter {
        let name = pattern
            .named_child(0)
            .map(|inner| self.text(inner))
            .unwrap_or_default();
        Parameter {
            name: format!("{}{}", marker, name),
            type_annotation: ty.map(|t| self.unparse(t)),
            is_optional: true,
            default_value: None,
        }
    }

    /// Parameters in declaration order.
    fn parameters(&self, func: Node<'a>) -> Result<Vec<Parameter>, AnalysisError> {
        let list = required(func, "parameters")?;
        let mut params = Vec::new();

        let mut cursor = list.walk();
        let children: Vec<Node<'a>> = list.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "identifier" => params.push(self.parameter(self.text(child), None, None)),
                "default_parameter" => {
                    let name = self.text(required(child, "name")?);
                    let value = required(child, "value")?;
                    params.push(self.parameter(name, None, Some(value)));
                }
                "typed_default_parameter" => {
                    let name = self.text(required(child, "name")?);
                    let ty = required(child, "type")?;
                    let value = required(child, "value")?;
                    params.push(self.parameter(name, Some(ty), Some(value)));
                }
                "typed_parameter" => {
                    let ty = child.child_by_field_name("type");
                    let inner = child
                        .named_child(0)
                        .ok_or_else(|| unsupported(child, "typed parameter"))?;
                    match inner.kind() {
                        "identifier" => params.push(self.parameter(self.text(inner), ty, None)),
                        "list_splat_pattern" => params.push(self.variadic("*", inner, ty)),
                        "dictionary_splat_pattern" => params.push(self.variadic("**", inner, ty)),
                        other => return Err(unsupported(inner, other)),
                    }
                }
                "list_splat_pattern" => params.push(self.variadic("*", child, None)),
                "dictionary_splat_pattern" => params.push(self.variadic("**", child, None)),
                "keyword_separator" | "positional_separator" | "comment" => {}
                other => return Err(unsupported(child, &format!("parameter kind `{}`", other))),
            }
        }

        Ok(params)
    }

    fn property(&self, assignment: Node<'a>) -> Option<Property> {
        let target = assignment.child_by_field_name("left")?;
        if target.kind() != "identifier" {
            return None;
        }
        Some(Property {
            name: self.text(target),
            type_annotation: assignment
                .child_by_field_name("type")
                .map(|ty| self.unparse(ty)),
            location: Location::from_node(assignment),
        })
    }

    /// Module path with whitespace between segments normalized away.
    fn dotted_name(&self, node: Node<'a>) -> String {
        if node.kind() != "dotted_name" {
            return self.text(node);
        }
        let mut cursor = node.walk();
        let parts: Vec<String> = node
            .named_children(&mut cursor)
            .filter(|part| part.kind() != "comment")
            .map(|part| self.text(part))
            .collect();
        parts.join(".")
    }

    /// `import a, b.c as d`: one record per imported module.
    fn import_infos(&self, node: Node<'a>) -> Result<Vec<ImportInfo>, AnalysisError> {
        let mut cursor = node.walk();
        let names: Vec<Node<'a>> = node.children_by_field_name("name", &mut cursor).collect();

        let mut imports = Vec::with_capacity(names.len());
        for name in names {
            let info = if name.kind() == "aliased_import" {
                let module = self.dotted_name(required(name, "name")?);
                let alias = self.text(required(name, "alias")?);
                ImportInfo {
                    imported_names: vec![alias.clone()],
                    module_specifier: module,
                    default_import: None,
                    namespace_import: Some(alias),
                }
            } else {
                let module = self.dotted_name(name);
                ImportInfo {
                    imported_names: vec![module.clone()],
                    module_specifier: module,
                    default_import: None,
                    namespace_import: None,
                }
            };
            imports.push(info);
        }
        Ok(imports)
    }

    /// `from module import a, b as c`: a single record with the bound names.
    fn import_from_info(&self, node: Node<'a>) -> Result<ImportInfo, AnalysisError> {
        let module_specifier = if node.kind() == "future_import_statement" {
            "__future__".to_string()
        } else {
            let module = required(node, "module_name")?;
            if module.kind() == "relative_import" {
                let mut cursor = module.walk();
                let dotted = module
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "dotted_name");
                dotted.map(|d| self.dotted_name(d)).unwrap_or_default()
            } else {
                self.dotted_name(module)
            }
        };

        let mut imported_names = Vec::new();
        let mut cursor = node.walk();
        let names: Vec<Node<'a>> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            if name.kind() == "aliased_import" {
                imported_names.push(self.text(required(name, "alias")?));
            } else {
                imported_names.push(self.dotted_name(name));
            }
        }

        let mut cursor = node.walk();
        let wildcard = node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import");
        if wildcard {
            imported_names.push("*".to_string());
        }

        Ok(ImportInfo {
            imported_names,
            module_specifier,
            default_import: None,
            namespace_import: None,
        })
    }
}
