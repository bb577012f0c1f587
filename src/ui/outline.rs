//! Flattening of an AST into indented rows for the tree pane

use crate::parser::ast::*;

/// Visual category of an outline row, used to pick a color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Declaration,
    Statement,
    Expression,
    Literal,
    Handler,
    Entry,
    Condition,
    Param,
}

/// One line of the tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub depth: usize,
    pub label: String,
    pub kind: RowKind,
    /// Source line the row points at
    pub line: usize,
}

/// Pending work for the outline walk
enum Item<'a> {
    Node(&'a AstNode, usize),
    Entry(&'a ObjectEntry, usize),
    Row(OutlineRow),
}

/// Flatten `root` into pre-order rows, children indented one level deeper
/// than their parent.
pub fn outline(root: &AstNode) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    let mut pending = vec![Item::Node(root, 0)];

    while let Some(item) = pending.pop() {
        let children = match item {
            Item::Row(row) => {
                rows.push(row);
                continue;
            }
            Item::Node(node, depth) => expand_node(&mut rows, node, depth),
            Item::Entry(entry, depth) => expand_entry(&mut rows, entry, depth),
        };
        pending.extend(children.into_iter().rev());
    }

    rows
}

fn row(depth: usize, kind: RowKind, line: usize, label: String) -> OutlineRow {
    OutlineRow {
        depth,
        label,
        kind,
        line,
    }
}

fn body_items(body: &[AstNode], depth: usize) -> impl Iterator<Item = Item<'_>> {
    body.iter().map(move |statement| Item::Node(statement, depth))
}

/// Emit the row for `node` and return its children in source order.
fn expand_node<'a>(rows: &mut Vec<OutlineRow>, node: &'a AstNode, depth: usize) -> Vec<Item<'a>> {
    let line = node.location().line;
    let mut children = Vec::new();
    match node {
        AstNode::FunctionDeclaration {
            name, params, body, ..
        } => {
            rows.push(row(depth, RowKind::Declaration, line, format!("function {}", name)));
            for param in params {
                rows.push(row(
                    depth + 1,
                    RowKind::Param,
                    param.location.line,
                    format!("param {}", param.name),
                ));
            }
            children.extend(body_items(body, depth + 1));
        }
        AstNode::While {
            condition, body, ..
        } => {
            rows.push(row(depth, RowKind::Declaration, line, "while".to_string()));
            rows.push(row(depth + 1, RowKind::Condition, line, condition_label(condition)));
            children.extend(body_items(body, depth + 1));
        }
        AstNode::TryCatch { body, handlers, .. } => {
            rows.push(row(depth, RowKind::Declaration, line, "try".to_string()));
            children.extend(body_items(body, depth + 1));
            for handler in handlers {
                let label = match handler {
                    Handler::Catch {
                        binding: Some(name),
                        ..
                    } => format!("catch ({})", name),
                    Handler::Catch { binding: None, .. } => "catch".to_string(),
                    Handler::Finally { .. } => "finally".to_string(),
                };
                children.push(Item::Row(row(
                    depth,
                    RowKind::Handler,
                    handler.location().line,
                    label,
                )));
                children.extend(body_items(handler.body(), depth + 1));
            }
        }
        AstNode::ObjectDeclaration { name, entries, .. } => {
            rows.push(row(depth, RowKind::Declaration, line, format!("object {}", name)));
            children.extend(entries.iter().map(|entry| Item::Entry(entry, depth + 1)));
        }
        AstNode::Return { value, .. } => {
            rows.push(row(depth, RowKind::Statement, line, "return".to_string()));
            children.push(Item::Node(value, depth + 1));
        }
        AstNode::Assignment {
            binding,
            target,
            value,
            ..
        } => {
            let label = match binding {
                BindingKind::Plain => format!("{} =", target),
                kind => format!("{} {} =", kind.as_str(), target),
            };
            rows.push(row(depth, RowKind::Statement, line, label));
            children.push(Item::Node(value, depth + 1));
        }
        AstNode::BinaryOp {
            left,
            op,
            right,
            continuation,
            ..
        } => {
            rows.push(row(
                depth,
                RowKind::Expression,
                line,
                format!("{} {} {}", left, op.symbol(), right),
            ));
            if let Some(next) = continuation {
                children.push(Item::Node(next, depth + 1));
            }
        }
        AstNode::Literal {
            kind: LiteralKind::Number,
            value,
            ..
        } => rows.push(row(depth, RowKind::Literal, line, value.clone())),
        AstNode::Literal {
            kind: LiteralKind::String,
            value,
            ..
        } => rows.push(row(depth, RowKind::Literal, line, format!("\"{}\"", value))),
        AstNode::Identifier(name, _) => {
            rows.push(row(depth, RowKind::Expression, line, name.clone()))
        }
    }
    children
}

fn expand_entry<'a>(
    rows: &mut Vec<OutlineRow>,
    entry: &'a ObjectEntry,
    depth: usize,
) -> Vec<Item<'a>> {
    let line = entry.location.line;
    match &entry.value {
        ObjectValue::Expression(expr) => {
            rows.push(row(depth, RowKind::Entry, line, format!("{}:", entry.key)));
            vec![Item::Node(expr, depth + 1)]
        }
        ObjectValue::Object(nested) => {
            rows.push(row(depth, RowKind::Entry, line, format!("{}: {{}}", entry.key)));
            nested
                .iter()
                .map(|child| Item::Entry(child, depth + 1))
                .collect()
        }
    }
}

fn condition_label(condition: &Condition) -> String {
    match condition {
        Condition::Bare(name) => format!("cond {}", name),
        Condition::Arithmetic { left, op, right } => {
            format!("cond {} {} {}", left, op.symbol(), right)
        }
        Condition::Comparison {
            left,
            op,
            right,
            comparator,
            rhs,
        } => format!(
            "cond {} {} {} {} {}",
            left,
            op.symbol(),
            right,
            comparator.symbol(),
            rhs
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Goal};

    fn labels(rows: &[OutlineRow]) -> Vec<(usize, &str)> {
        rows.iter().map(|r| (r.depth, r.label.as_str())).collect()
    }

    #[test]
    fn test_function_outline() {
        let node = parse(
            "function add(x, y) {\n  var s = x + y;\n  return s;\n}",
            Goal::FunctionDeclaration,
        )
        .result
        .unwrap();
        let rows = outline(&node);

        assert_eq!(
            labels(&rows),
            vec![
                (0, "function add"),
                (1, "param x"),
                (1, "param y"),
                (1, "var s ="),
                (2, "x + y"),
                (1, "return"),
                (2, "s"),
            ]
        );
        assert_eq!(rows[3].line, 2);
        assert_eq!(rows[5].line, 3);
        assert_eq!(rows[0].kind, RowKind::Declaration);
    }

    #[test]
    fn test_try_outline_keeps_handler_order() {
        let node = parse(
            "try { a; } catch (e) { b; } finally { c; }",
            Goal::TryCatch,
        )
        .result
        .unwrap();
        let rows = outline(&node);

        assert_eq!(
            labels(&rows),
            vec![
                (0, "try"),
                (1, "a"),
                (0, "catch (e)"),
                (1, "b"),
                (0, "finally"),
                (1, "c"),
            ]
        );
    }

    #[test]
    fn test_long_chain_outline() {
        let links = 5000;
        let source = format!("function f(p) {{ {}; }}", vec!["p * q"; links].join(" "));
        let node = parse(&source, Goal::FunctionDeclaration).result.unwrap();
        let rows = outline(&node);

        assert_eq!(rows.len(), 2 + links);
        let last = rows.last().unwrap();
        assert_eq!(last.depth, links);
        assert_eq!(last.label, "p * q");
    }

    #[test]
    fn test_object_outline_nests_entries() {
        let node = parse(
            "const o = { a: { b: 1 }, c: \"x\" }",
            Goal::ObjectDeclaration,
        )
        .result
        .unwrap();
        let rows = outline(&node);

        assert_eq!(
            labels(&rows),
            vec![
                (0, "object o"),
                (1, "a: {}"),
                (2, "b:"),
                (3, "1"),
                (1, "c:"),
                (2, "\"x\""),
            ]
        );
    }
}
