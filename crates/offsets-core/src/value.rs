//! # Value Introspection
//!
//! The narrow capability interface the dumper walks.
//!
//! A host integration layer (an LLDB bridge, a DWARF reader, the in-memory
//! [`snapshot`](crate::snapshot) model) adapts its own value and type handles
//! to these two traits. The dumper never sees a concrete host type.
//!
//! Handles are borrowed from the host for a single command invocation. Both
//! traits hand out children and underlying types *by value* so that hosts
//! whose handles are cheap owned proxies (reference-counted pointers, `&T`,
//! small ids) can implement them without lifetimes leaking into the trait.

use crate::types::Address;

/// Static type metadata of a [`DebugValue`]
pub trait DebugType: Sized
{
    /// The type's name as the host displays it (e.g. `int [3]`, `typedef Foo`)
    fn display_name(&self) -> String;

    /// Whether this type is an alias for another type
    fn is_typedef(&self) -> bool;

    /// Whether this type is a fixed-size array
    fn is_array(&self) -> bool;

    /// The aliased type, for typedefs
    ///
    /// Returns `None` for non-typedef types, or when the host cannot
    /// resolve the alias.
    fn underlying_type(&self) -> Option<Self>;
}

/// A handle to a named, typed, addressed entity in the inspected process
///
/// This covers local variables, struct and union fields, and array
/// elements alike.
pub trait DebugValue: Sized
{
    /// Type handle produced by [`DebugValue::value_type`]
    type Type: DebugType;

    /// Whether the host considers this handle usable
    ///
    /// Hosts with permissive handle semantics return an invalid handle from
    /// a failed lookup instead of an error; callers check this before
    /// walking the value.
    fn is_valid(&self) -> bool
    {
        true
    }

    /// The value's name (variable or field name)
    fn name(&self) -> String;

    /// The value's declared type
    fn value_type(&self) -> Self::Type;

    /// Where the value lives in memory
    ///
    /// `None` for values without a memory location, such as a variable the
    /// compiler keeps in a register.
    fn address(&self) -> Option<Address>;

    /// Number of children (fields of a composite, elements of an array)
    fn child_count(&self) -> usize;

    /// The child at `index`, in host order
    ///
    /// Returns `None` when `index >= child_count()` or when the host fails to
    /// materialize the child.
    fn child_at_index(&self, index: usize) -> Option<Self>;
}
