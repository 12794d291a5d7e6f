//! End-to-end tests for the `offsets` command through a command interpreter

use std::rc::Rc;

use offsets_core::command::{NO_FRAME_MESSAGE, OPTION_PARSING_FAILED};
use offsets_core::prelude::*;
use offsets_core::snapshot::{FrameSnapshot, ProcessState, SessionSnapshot, TypeInfo, TypeKind, Variable};

fn point() -> Variable
{
    Variable::new("point", TypeInfo::structure("Point"), 0x7fff_0000).with_children(vec![
        Variable::new("x", TypeInfo::scalar("int"), 0x7fff_0000),
        Variable::new("y", TypeInfo::scalar("int"), 0x7fff_0004),
    ])
}

fn arr() -> Variable
{
    Variable::new("arr", TypeInfo::array("int [3]"), 0x7fff_1000).with_children(vec![
        Variable::new("[0]", TypeInfo::scalar("int"), 0x7fff_1000),
        Variable::new("[1]", TypeInfo::scalar("int"), 0x7fff_1004),
        Variable::new("[2]", TypeInfo::scalar("int"), 0x7fff_1008),
    ])
}

fn stopped_session() -> SessionSnapshot
{
    SessionSnapshot::single_frame(
        ProcessState::Stopped,
        FrameSnapshot::new("main").with_variable(point()).with_variable(arr()),
    )
}

fn interpreter<'a>() -> CommandInterpreter<&'a SessionSnapshot>
{
    let mut interpreter = CommandInterpreter::new();
    init_module(&mut interpreter).unwrap();
    interpreter
}

#[test]
fn test_struct_dump_scenario()
{
    let session = stopped_session();
    let result = interpreter().handle_command(&&session, "offsets point");

    assert!(result.succeeded());
    assert_eq!(
        result.output(),
        "point (Point): 0x7fff0000\n    x (int): 0x7fff0000\n    y (int): 0x7fff0004\n"
    );
}

#[test]
fn test_array_dump_scenario()
{
    let session = stopped_session();
    let result = interpreter().handle_command(&&session, "offsets arr");

    assert!(result.succeeded());
    assert_eq!(result.output(), "arr (int [3]): 0x7fff1000\n");
}

#[test]
fn test_missing_argument_scenario()
{
    let session = stopped_session();
    let result = interpreter().handle_command(&&session, "offsets");

    assert_eq!(result.error(), Some(OPTION_PARSING_FAILED));
    assert!(result.output().is_empty());
}

#[test]
fn test_running_process_scenario()
{
    let mut session = stopped_session();
    session.targets[0].process.as_mut().unwrap().state = ProcessState::Running;
    let result = interpreter().handle_command(&&session, "offsets point");

    assert!(result.succeeded());
    assert_eq!(result.output().trim_end(), NO_FRAME_MESSAGE);
}

#[test]
fn test_unknown_variable_is_reported_before_traversal()
{
    let session = stopped_session();
    let result = interpreter().handle_command(&&session, "offsets missing");

    assert_eq!(result.error(), Some("no variable named 'missing' in the current frame"));
    assert!(result.output().is_empty());
}

#[test]
fn test_help_offsets_prints_usage()
{
    let session = stopped_session();
    let result = interpreter().handle_command(&&session, "help offsets");

    assert!(result.succeeded());
    assert!(result.output().contains("Usage: offsets <struct_name>"));
    assert!(result.output().contains("Dump the offsets of all members of a struct"));

    let listing = interpreter().handle_command(&&session, "help");
    assert!(listing.output().contains("offsets -- Dump the offsets of all members of a struct"));
}

#[test]
fn test_invocations_carry_no_state()
{
    let session = stopped_session();
    let interpreter = interpreter();

    let failed = interpreter.handle_command(&&session, "offsets");
    assert!(!failed.succeeded());

    let first = interpreter.handle_command(&&session, "offsets point");
    let second = interpreter.handle_command(&&session, "offsets point");
    assert!(first.succeeded());
    assert_eq!(first, second);
}

#[test]
fn test_typedef_resolution_in_dump()
{
    let value = Variable::new(
        "handle",
        TypeInfo::typedef("typedef Foo", TypeInfo::structure("Bar")),
        0x4000,
    );
    assert_eq!(dump_to_string(&value), "handle (Foo [Bar]): 0x4000\n");
}

/// Build a tree of `depth` levels with `fanout` children per struct, with an
/// array hanging off every struct.
fn tree(depth: usize, fanout: usize, next: &mut u64) -> Variable
{
    let address = *next;
    *next += 8;
    if depth == 0 {
        return Variable::new(format!("leaf{address}"), TypeInfo::scalar("long"), address);
    }

    let mut children: Vec<Variable> = (0..fanout).map(|_| tree(depth - 1, fanout, next)).collect();
    children.push(arr());
    Variable::new(format!("node{address}"), TypeInfo::structure("Node"), address).with_children(children)
}

/// Lines a dump of `value` must produce
fn expected_lines(value: &Variable) -> usize
{
    if value.children.is_empty() || value.ty.kind == TypeKind::Array {
        1
    } else {
        1 + value.children.iter().map(expected_lines).sum::<usize>()
    }
}

#[test]
fn test_line_count_and_indentation_follow_tree_shape()
{
    let mut next = 0x1000;
    let root = tree(3, 3, &mut next);

    let mut out = String::new();
    let lines = dump(&root, 0, &mut out).unwrap();
    assert_eq!(lines, expected_lines(&root));
    assert_eq!(out.lines().count(), lines);

    // Each line is at most one level deeper than the line before it.
    let mut previous = 0;
    for line in out.lines() {
        let indent = line.len() - line.trim_start().len();
        assert_eq!(indent % 4, 0);
        assert!(indent <= previous + 4, "jumped two levels at {line:?}");
        previous = indent;
    }

    // Array elements never appear.
    assert!(!out.contains("[0]"));
}

/// A host whose handles are reference-counted owned values, and whose
/// failed lookups return an invalid handle rather than `None`.
mod rc_host
{
    use super::*;

    pub struct Node
    {
        pub name: String,
        pub ty: Rc<Ty>,
        pub address: Option<Address>,
        pub children: Vec<Rc<Node>>,
    }

    pub struct Ty
    {
        pub name: String,
        pub alias_of: Option<Rc<Ty>>,
        pub array: bool,
    }

    #[derive(Clone)]
    pub struct TyHandle(pub Rc<Ty>);

    #[derive(Clone)]
    pub struct ValueHandle(pub Option<Rc<Node>>);

    impl DebugType for TyHandle
    {
        fn display_name(&self) -> String
        {
            self.0.name.clone()
        }

        fn is_typedef(&self) -> bool
        {
            self.0.alias_of.is_some()
        }

        fn is_array(&self) -> bool
        {
            self.0.array
        }

        fn underlying_type(&self) -> Option<Self>
        {
            self.0.alias_of.clone().map(TyHandle)
        }
    }

    impl DebugValue for ValueHandle
    {
        type Type = TyHandle;

        fn is_valid(&self) -> bool
        {
            self.0.is_some()
        }

        fn name(&self) -> String
        {
            self.0.as_ref().map(|n| n.name.clone()).unwrap_or_default()
        }

        fn value_type(&self) -> Self::Type
        {
            let ty = self.0.as_ref().map_or_else(
                || {
                    Rc::new(Ty {
                        name: String::new(),
                        alias_of: None,
                        array: false,
                    })
                },
                |n| n.ty.clone(),
            );
            TyHandle(ty)
        }

        fn address(&self) -> Option<Address>
        {
            self.0.as_ref().and_then(|n| n.address)
        }

        fn child_count(&self) -> usize
        {
            self.0.as_ref().map_or(0, |n| n.children.len())
        }

        fn child_at_index(&self, index: usize) -> Option<Self>
        {
            let node = self.0.as_ref()?;
            node.children.get(index).cloned().map(|c| ValueHandle(Some(c)))
        }
    }

    pub struct Session
    {
        pub stopped: bool,
        pub locals: Vec<Rc<Node>>,
    }

    #[derive(Clone, Copy)]
    pub struct Handle<'a>(pub &'a Session);

    impl<'a> Debugger for Handle<'a>
    {
        type Target = Handle<'a>;

        fn selected_target(&self) -> Option<Self::Target>
        {
            Some(*self)
        }
    }

    impl<'a> Target for Handle<'a>
    {
        type Process = Handle<'a>;

        fn process(&self) -> Option<Self::Process>
        {
            Some(*self)
        }
    }

    impl<'a> Process for Handle<'a>
    {
        type Thread = Handle<'a>;

        fn selected_thread(&self) -> Option<Self::Thread>
        {
            Some(*self)
        }
    }

    impl<'a> Thread for Handle<'a>
    {
        type Frame = Handle<'a>;

        fn selected_frame(&self) -> Option<Self::Frame>
        {
            Some(*self)
        }
    }

    impl<'a> Frame for Handle<'a>
    {
        type Value = ValueHandle;

        fn is_valid(&self) -> bool
        {
            self.0.stopped
        }

        fn find_variable(&self, name: &str) -> Option<Self::Value>
        {
            // Permissive host: a failed lookup still yields a handle.
            Some(ValueHandle(self.0.locals.iter().find(|n| n.name == name).cloned()))
        }
    }
}

fn rc_session(stopped: bool) -> rc_host::Session
{
    use rc_host::{Node, Ty};

    let int = Rc::new(Ty {
        name: "int".to_string(),
        alias_of: None,
        array: false,
    });
    let counter = Rc::new(Ty {
        name: "typedef counter_t".to_string(),
        alias_of: Some(int.clone()),
        array: false,
    });
    let stats = Rc::new(Node {
        name: "stats".to_string(),
        ty: Rc::new(Ty {
            name: "Stats".to_string(),
            alias_of: None,
            array: false,
        }),
        address: Some(Address::new(0x7fff_2000)),
        children: vec![
            Rc::new(Node {
                name: "hits".to_string(),
                ty: counter,
                address: Some(Address::new(0x7fff_2000)),
                children: Vec::new(),
            }),
            Rc::new(Node {
                name: "cached".to_string(),
                ty: int,
                address: None,
                children: Vec::new(),
            }),
        ],
    });

    rc_host::Session {
        stopped,
        locals: vec![stats],
    }
}

#[test]
fn test_owned_handle_host()
{
    let session = rc_session(true);
    let mut interpreter = CommandInterpreter::new();
    init_module(&mut interpreter).unwrap();

    let result = interpreter.handle_command(&rc_host::Handle(&session), "offsets stats");
    assert!(result.succeeded());
    assert_eq!(
        result.output(),
        "stats (Stats): 0x7fff2000\n    hits (counter_t [int]): 0x7fff2000\n    cached (int): <no address>\n"
    );
}

#[test]
fn test_invalid_handle_is_not_traversed()
{
    let session = rc_session(true);
    let mut interpreter = CommandInterpreter::new();
    init_module(&mut interpreter).unwrap();

    let result = interpreter.handle_command(&rc_host::Handle(&session), "offsets nothing");
    assert_eq!(result.error(), Some("no variable named 'nothing' in the current frame"));
    assert!(result.output().is_empty());
}

#[test]
fn test_invalid_frame_reports_no_frame()
{
    let session = rc_session(false);
    let mut interpreter = CommandInterpreter::new();
    init_module(&mut interpreter).unwrap();

    let result = interpreter.handle_command(&rc_host::Handle(&session), "offsets stats");
    assert!(result.succeeded());
    assert_eq!(result.output(), "no frame here\n");
}
