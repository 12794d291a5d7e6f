//! # Address-Tree Dumper
//!
//! Prints a value and, depth first, every field nested inside it:
//!
//! ```text
//! point (Point): 0x7fff0000
//!     x (int): 0x7fff0000
//!     y (int): 0x7fff0004
//! ```
//!
//! One line per visited value, `4 * depth` spaces of indentation, then
//! `name (type): address`. Arrays are reported as a single line and never
//! expanded element by element.
//!
//! The walk uses an explicit `(value, depth)` stack rather than recursion,
//! so deeply nested host graphs cannot exhaust the call stack.

use std::fmt::{self, Write};

use tracing::{debug, trace, warn};

use crate::value::{DebugType, DebugValue};

/// Spaces of indentation per tree depth level
pub const INDENT_WIDTH: usize = 4;

/// Rendered in place of an address for values without a memory location
pub const NO_ADDRESS: &str = "<no address>";

const TYPEDEF_PREFIX: &str = "typedef ";

/// Format a type for display, resolving typedefs
///
/// A typedef's display name loses its leading `typedef ` and gains the
/// underlying type's name in brackets.
///
/// ## Example
///
/// ```rust
/// use offsets_core::dump::format_type;
/// use offsets_core::snapshot::TypeInfo;
///
/// let alias = TypeInfo::typedef("typedef Foo", TypeInfo::scalar("Bar"));
/// assert_eq!(format_type(&&alias), "Foo [Bar]");
/// assert_eq!(format_type(&&TypeInfo::scalar("int")), "int");
/// ```
pub fn format_type<T: DebugType>(ty: &T) -> String
{
    let name = ty.display_name();
    if !ty.is_typedef() {
        return name;
    }

    let alias = name.strip_prefix(TYPEDEF_PREFIX).unwrap_or(&name);
    match ty.underlying_type() {
        Some(underlying) => format!("{alias} [{}]", underlying.display_name()),
        None => alias.to_string(),
    }
}

/// Format the line for `value` at `depth`, without a trailing newline
pub fn format_line<V: DebugValue>(value: &V, depth: usize) -> String
{
    let indent = depth * INDENT_WIDTH;
    let ty = format_type(&value.value_type());
    let name = value.name();
    match value.address() {
        Some(address) => format!("{:indent$}{name} ({ty}): {address}", ""),
        None => format!("{:indent$}{name} ({ty}): {NO_ADDRESS}", ""),
    }
}

/// Depth-first iterator over the formatted lines of an address tree
///
/// Yields lines without their trailing newline. Built by [`lines`].
#[derive(Debug)]
pub struct Lines<V>
{
    stack: Vec<(V, usize)>,
}

/// Lines describing `root` and its descendants, starting at `depth`
///
/// - A value with no children produces one line.
/// - An array produces one line, whatever its child count.
/// - Any other composite produces its own line followed by each child's
///   lines at `depth + 1`, in the order the host reports the children.
pub fn lines<V: DebugValue>(root: V, depth: usize) -> Lines<V>
{
    Lines {
        stack: vec![(root, depth)],
    }
}

impl<V: DebugValue> Iterator for Lines<V>
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item>
    {
        let (value, depth) = self.stack.pop()?;
        let line = format_line(&value, depth);

        let count = value.child_count();
        if count > 0 && value.value_type().is_array() {
            trace!(name = %value.name(), count, "not expanding array elements");
        } else {
            // Reverse push so the first child is popped first.
            for index in (0..count).rev() {
                match value.child_at_index(index) {
                    Some(child) => self.stack.push((child, depth + 1)),
                    None => warn!(parent = %value.name(), index, "host reported a child it could not materialize"),
                }
            }
        }

        Some(line)
    }
}

/// Dump `root` and its descendants into `out`, starting at `depth`
///
/// Returns the number of lines written. See [`lines`] for the shape of
/// the output.
///
/// ## Errors
///
/// Returns any error raised by `out`.
pub fn dump<V, W>(root: V, depth: usize, out: &mut W) -> Result<usize, fmt::Error>
where
    V: DebugValue,
    W: Write,
{
    let root_name = root.name();
    let mut count = 0_usize;

    for line in lines(root, depth) {
        writeln!(out, "{line}")?;
        count += 1;
    }

    debug!(root = %root_name, lines = count, "dumped address tree");
    Ok(count)
}

/// Dump `root` from depth 0 into a fresh `String`
pub fn dump_to_string<V: DebugValue>(root: V) -> String
{
    lines(root, 0).map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::snapshot::{TypeInfo, Variable};

    fn point() -> Variable
    {
        Variable::new("point", TypeInfo::structure("Point"), 0x7fff_0000).with_children(vec![
            Variable::new("x", TypeInfo::scalar("int"), 0x7fff_0000),
            Variable::new("y", TypeInfo::scalar("int"), 0x7fff_0004),
        ])
    }

    #[test]
    fn test_struct_fields_are_indented_under_parent()
    {
        let out = dump_to_string(&point());
        assert_eq!(
            out,
            "point (Point): 0x7fff0000\n    x (int): 0x7fff0000\n    y (int): 0x7fff0004\n"
        );
    }

    #[test]
    fn test_array_is_not_expanded()
    {
        let arr = Variable::new("arr", TypeInfo::array("int [3]"), 0x7fff_1000).with_children(vec![
            Variable::new("[0]", TypeInfo::scalar("int"), 0x7fff_1000),
            Variable::new("[1]", TypeInfo::scalar("int"), 0x7fff_1004),
            Variable::new("[2]", TypeInfo::scalar("int"), 0x7fff_1008),
        ]);

        let mut out = String::new();
        let lines = dump(&arr, 0, &mut out).unwrap();
        assert_eq!(lines, 1);
        assert_eq!(out, "arr (int [3]): 0x7fff1000\n");
    }

    #[test]
    fn test_array_nested_in_struct_is_reported_once()
    {
        let buf = Variable::new("buf", TypeInfo::array("char [2]"), 0x2008).with_children(vec![
            Variable::new("[0]", TypeInfo::scalar("char"), 0x2008),
            Variable::new("[1]", TypeInfo::scalar("char"), 0x2009),
        ]);
        let root = Variable::new("msg", TypeInfo::structure("Message"), 0x2000).with_children(vec![
            Variable::new("len", TypeInfo::scalar("unsigned long"), 0x2000),
            buf,
        ]);

        let out = dump_to_string(&root);
        assert_eq!(
            out,
            "msg (Message): 0x2000\n    len (unsigned long): 0x2000\n    buf (char [2]): 0x2008\n"
        );
    }

    #[test]
    fn test_typedef_is_resolved()
    {
        let ty = TypeInfo::typedef("typedef Foo", TypeInfo::structure("Bar"));
        let value = Variable::new("foo", ty, 0x10);
        assert_eq!(format_line(&&value, 0), "foo (Foo [Bar]): 0x10");
    }

    #[test]
    fn test_typedef_without_prefix_keeps_name()
    {
        let ty = TypeInfo::typedef("pid_t", TypeInfo::scalar("int"));
        assert_eq!(format_type(&&ty), "pid_t [int]");
    }

    #[test]
    fn test_typedef_without_underlying_type()
    {
        let ty = TypeInfo {
            name: "typedef Opaque".to_string(),
            kind: crate::snapshot::TypeKind::Typedef,
            underlying: None,
        };
        assert_eq!(format_type(&&ty), "Opaque");
    }

    #[test]
    fn test_missing_address_placeholder()
    {
        let value = Variable::in_register("counter", TypeInfo::scalar("int"));
        assert_eq!(format_line(&&value, 2), "        counter (int): <no address>");
    }

    #[test]
    fn test_depth_offset_applies_to_whole_tree()
    {
        let mut out = String::new();
        dump(&point(), 1, &mut out).unwrap();
        let indents: Vec<usize> = out.lines().map(|l| l.len() - l.trim_start().len()).collect();
        assert_eq!(indents, vec![4, 8, 8]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse()
    {
        let mut value = Variable::new("leaf", TypeInfo::scalar("int"), 0x0);
        for level in 0..10_000 {
            value = Variable::new(format!("n{level}"), TypeInfo::structure("Node"), 0x0).with_children(vec![value]);
        }

        let mut out = String::new();
        let lines = dump(&value, 0, &mut out).unwrap();
        assert_eq!(lines, 10_001);
        // Nested `Variable`s drop recursively; leak the tree rather than overflow in Drop.
        std::mem::forget(value);
    }

    #[test]
    fn test_dump_is_idempotent()
    {
        let root = point();
        assert_eq!(dump_to_string(&root), dump_to_string(&root));
    }

    #[test]
    fn test_typedef_of_array_is_not_expanded()
    {
        let ty = TypeInfo::typedef("typedef vec3", TypeInfo::array("int [3]"));
        let v = Variable::new("v", ty, 0x10).with_children(vec![
            Variable::new("[0]", TypeInfo::scalar("int"), 0x10),
            Variable::new("[1]", TypeInfo::scalar("int"), 0x14),
            Variable::new("[2]", TypeInfo::scalar("int"), 0x18),
        ]);

        let mut out = String::new();
        assert_eq!(dump(&v, 0, &mut out).unwrap(), 1);
        assert_eq!(out, "v (vec3 [int [3]]): 0x10\n");
    }

    #[test]
    fn test_lines_yield_in_depth_first_order()
    {
        let rendered: Vec<String> = lines(&point(), 0).collect();
        assert_eq!(
            rendered,
            vec![
                "point (Point): 0x7fff0000",
                "    x (int): 0x7fff0000",
                "    y (int): 0x7fff0004",
            ]
        );
    }
}
