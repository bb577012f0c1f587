// AST (Abstract Syntax Tree) definitions for the script grammar

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Which keyword (if any) introduced an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    /// `x = ...` without a declaration keyword
    Plain,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Plain => "plain",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Comparison operators, only valid inside a `while` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq, // ==
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub location: SourceLocation,
}

/// Loop condition of a `while` statement.
///
/// The grammar only knows three shapes, distinguished by how many operand
/// and operator tokens they span.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `x`
    Bare(String),
    /// `x + y`
    Arithmetic {
        left: String,
        op: ArithOp,
        right: String,
    },
    /// `x + y > z`
    Comparison {
        left: String,
        op: ArithOp,
        right: String,
        comparator: Comparator,
        rhs: String,
    },
}

impl Condition {
    /// Number of operand/operator groups in the condition: 1, 3 or 5.
    pub fn arity(&self) -> usize {
        match self {
            Condition::Bare(_) => 1,
            Condition::Arithmetic { .. } => 3,
            Condition::Comparison { .. } => 5,
        }
    }
}

/// One link of the handler chain that follows a `try` block
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    Catch {
        binding: Option<String>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    /// Always the last element of a chain
    Finally {
        body: Vec<AstNode>,
        location: SourceLocation,
    },
}

impl Handler {
    pub fn body(&self) -> &[AstNode] {
        match self {
            Handler::Catch { body, .. } | Handler::Finally { body, .. } => body,
        }
    }

    pub fn binding(&self) -> Option<&str> {
        match self {
            Handler::Catch { binding, .. } => binding.as_deref(),
            Handler::Finally { .. } => None,
        }
    }

    pub fn is_finally(&self) -> bool {
        matches!(self, Handler::Finally { .. })
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Handler::Catch { location, .. } | Handler::Finally { location, .. } => location,
        }
    }
}

/// `key: value` inside an object declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    pub value: ObjectValue,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectValue {
    Expression(Box<AstNode>),
    Object(Vec<ObjectEntry>),
}

/// AST nodes representing declarations, statements and expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Goal-level declarations
    FunctionDeclaration {
        name: String,
        params: Vec<Param>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    While {
        condition: Condition,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    TryCatch {
        body: Vec<AstNode>,
        handlers: Vec<Handler>,
        location: SourceLocation,
    },
    ObjectDeclaration {
        name: String,
        entries: Vec<ObjectEntry>,
        location: SourceLocation,
    },

    // Statements
    Return {
        value: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    Assignment {
        binding: BindingKind,
        target: String,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    BinaryOp {
        left: String,
        op: ArithOp,
        right: String,
        continuation: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Literal {
        kind: LiteralKind,
        value: String,
        location: SourceLocation,
    },
    Identifier(String, SourceLocation),
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::FunctionDeclaration { location, .. } => location,
            AstNode::While { location, .. } => location,
            AstNode::TryCatch { location, .. } => location,
            AstNode::ObjectDeclaration { location, .. } => location,
            AstNode::Return { location, .. } => location,
            AstNode::Assignment { location, .. } => location,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::Literal { location, .. } => location,
            AstNode::Identifier(_, loc) => loc,
        }
    }

    /// Short tag naming the node kind, as used by the s-expression form.
    pub fn tag(&self) -> &'static str {
        match self {
            AstNode::FunctionDeclaration { .. } => "function-declaration",
            AstNode::While { .. } => "while",
            AstNode::TryCatch { .. } => "try-catch",
            AstNode::ObjectDeclaration { .. } => "object-declaration",
            AstNode::Return { .. } => "return",
            AstNode::Assignment { .. } => "assignment",
            AstNode::BinaryOp { .. } => "operation",
            AstNode::Literal {
                kind: LiteralKind::Number,
                ..
            } => "number",
            AstNode::Literal {
                kind: LiteralKind::String,
                ..
            } => "string",
            AstNode::Identifier(..) => "identifier",
        }
    }

    /// Catch clauses of a `TryCatch`, in source order. Empty for other nodes.
    pub fn catch_clauses(&self) -> impl Iterator<Item = &Handler> {
        let handlers: &[Handler] = match self {
            AstNode::TryCatch { handlers, .. } => handlers,
            _ => &[],
        };
        handlers.iter().filter(|h| !h.is_finally())
    }

    /// Body of the trailing `finally` block of a `TryCatch`, if any.
    pub fn finally_body(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::TryCatch { handlers, .. } => handlers
                .last()
                .filter(|h| h.is_finally())
                .map(|h| h.body()),
            _ => None,
        }
    }
}

// Expression chains and nested objects may be thousands of levels deep;
// teardown walks them with a worklist.
impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl AstNode {
    /// Move every child node into `out`, leaving `self` without descendants.
    fn detach_children(&mut self, out: &mut Vec<AstNode>) {
        match self {
            AstNode::FunctionDeclaration { body, .. } | AstNode::While { body, .. } => {
                out.append(body)
            }
            AstNode::TryCatch { body, handlers, .. } => {
                out.append(body);
                for handler in handlers {
                    match handler {
                        Handler::Catch { body, .. } | Handler::Finally { body, .. } => {
                            out.append(body)
                        }
                    }
                }
            }
            AstNode::ObjectDeclaration { entries, .. } => {
                let mut open = std::mem::take(entries);
                while let Some(mut entry) = open.pop() {
                    match &mut entry.value {
                        ObjectValue::Expression(expr) => out.push(take_node(expr)),
                        ObjectValue::Object(nested) => open.append(nested),
                    }
                }
            }
            AstNode::Return { value, .. } | AstNode::Assignment { value, .. } => {
                out.push(take_node(value))
            }
            AstNode::BinaryOp { continuation, .. } => {
                if let Some(next) = continuation.take() {
                    out.push(*next);
                }
            }
            AstNode::Literal { .. } | AstNode::Identifier(..) => {}
        }
    }
}

fn take_node(slot: &mut AstNode) -> AstNode {
    std::mem::replace(slot, AstNode::Identifier(String::new(), SourceLocation::default()))
}

// ===== s-expression rendering =====

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut each: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        each(f, item)?;
    }
    write!(f, ")")
}

fn write_body(f: &mut fmt::Formatter<'_>, body: &[AstNode]) -> fmt::Result {
    write_list(f, body, |f, node| write!(f, "{}", node))
}

/// Write nested entry lists with an explicit stack of open levels.
fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[ObjectEntry]) -> fmt::Result {
    let mut levels = vec![(entries.iter(), true)];
    f.write_str("(")?;

    loop {
        let Some((iter, first)) = levels.last_mut() else {
            return Ok(());
        };
        let Some(entry) = iter.next() else {
            levels.pop();
            // the list, then the `object-items` form around it
            f.write_str(if levels.is_empty() { ")" } else { "))" })?;
            continue;
        };
        if !std::mem::replace(first, false) {
            f.write_str(" ")?;
        }

        match &entry.value {
            ObjectValue::Expression(expr) => {
                write!(f, "({} ", entry.key)?;
                write_expression(f, expr)?;
                f.write_str(")")?;
            }
            ObjectValue::Object(nested) => {
                write!(f, "(object-items {} (", entry.key)?;
                levels.push((nested.iter(), true));
            }
        }
    }
}

/// Write an assignment or operation chain without recursing per link.
fn write_expression(f: &mut fmt::Formatter<'_>, mut node: &AstNode) -> fmt::Result {
    let mut open = 0;
    loop {
        match node {
            AstNode::Assignment {
                binding,
                target,
                value,
                ..
            } => {
                write!(f, "(assignment {} {} ", binding.as_str(), target)?;
                open += 1;
                node = value;
            }
            AstNode::BinaryOp {
                left,
                op,
                right,
                continuation,
                ..
            } => {
                write!(f, "(operation {} {} {}", left, op.symbol(), right)?;
                open += 1;
                match continuation {
                    Some(next) => {
                        f.write_str(" ")?;
                        node = next;
                    }
                    None => break,
                }
            }
            leaf => {
                write!(f, "{}", leaf)?;
                break;
            }
        }
    }
    for _ in 0..open {
        f.write_str(")")?;
    }
    Ok(())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Bare(name) => write!(f, "(conditions {})", name),
            Condition::Arithmetic { left, op, right } => {
                write!(f, "(conditions {} {} {})", left, op.symbol(), right)
            }
            Condition::Comparison {
                left,
                op,
                right,
                comparator,
                rhs,
            } => write!(
                f,
                "(conditions {} {} {} {} {})",
                left,
                op.symbol(),
                right,
                comparator.symbol(),
                rhs
            ),
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Catch {
                binding: Some(name),
                body,
                ..
            } => {
                write!(f, "(catch {} ", name)?;
                write_body(f, body)?;
                write!(f, ")")
            }
            Handler::Catch {
                binding: None,
                body,
                ..
            } => {
                write!(f, "(catch ")?;
                write_body(f, body)?;
                write!(f, ")")
            }
            Handler::Finally { body, .. } => {
                write!(f, "(finally ")?;
                write_body(f, body)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::FunctionDeclaration {
                name, params, body, ..
            } => {
                write!(f, "(function-declaration {} ", name)?;
                write_list(f, params, |f, p| write!(f, "{}", p.name))?;
                write!(f, " ")?;
                write_body(f, body)?;
                write!(f, ")")
            }
            AstNode::While {
                condition, body, ..
            } => {
                write!(f, "(while {} ", condition)?;
                write_body(f, body)?;
                write!(f, ")")
            }
            AstNode::TryCatch { body, handlers, .. } => {
                write!(f, "(try-catch ")?;
                write_body(f, body)?;
                for handler in handlers {
                    write!(f, " {}", handler)?;
                }
                write!(f, ")")
            }
            AstNode::ObjectDeclaration { name, entries, .. } => {
                write!(f, "(object-declaration {} ", name)?;
                write_entries(f, entries)?;
                write!(f, ")")
            }
            AstNode::Return { value, .. } => {
                write!(f, "(return ")?;
                write_expression(f, value)?;
                write!(f, ")")
            }
            AstNode::Assignment { .. } | AstNode::BinaryOp { .. } => write_expression(f, self),
            AstNode::Literal {
                kind: LiteralKind::Number,
                value,
                ..
            } => write!(f, "(number {})", value),
            AstNode::Literal {
                kind: LiteralKind::String,
                value,
                ..
            } => write!(f, "(string \"{}\")", value),
            AstNode::Identifier(name, _) => write!(f, "{}", name),
        }
    }
}
