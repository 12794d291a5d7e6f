//! Memory address type.

use std::fmt;
use std::num::ParseIntError;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Strongly typed memory address of a value inside the inspected process
///
/// The address is what the `offsets` command ultimately reports, so its
/// [`Display`](fmt::Display) form is the one users see: `0x` followed by
/// lowercase hex digits, without zero padding.
///
/// ## Parsing
///
/// [`Address::from_str`] accepts both `0x`-prefixed hex and plain decimal,
/// the two forms a debugger prints addresses in.
///
/// ## Example
///
/// ```rust
/// use offsets_core::types::Address;
///
/// let base: Address = "0x7fff0000".parse()?;
/// assert_eq!((base + 4).to_string(), "0x7fff0004");
/// # Ok::<(), std::num::ParseIntError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// Usable in const contexts, unlike `Address::from(value)`.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Address
{
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let s = s.trim();
        let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16)?,
            None => s.parse::<u64>()?,
        };
        Ok(Address(value))
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

/// On-disk forms an address may take in a snapshot file.
#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr
{
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Address
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AddressRepr::deserialize(deserializer)? {
            AddressRepr::Number(value) => Ok(Address(value)),
            AddressRepr::Text(text) => text
                .parse()
                .map_err(|e| serde::de::Error::custom(format!("invalid address '{text}': {e}"))),
        }
    }
}
