//! Borrowed view over the three kinds of network, for operations that accept
//! more than one of them.

use crate::error::{Error, Result};
use crate::oneport::OnePort;
use crate::threeport::ThreePort;
use crate::twoport::TwoPort;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NetworkRef<'a> {
    One(&'a OnePort),
    Two(&'a TwoPort),
    Three(&'a ThreePort),
}

impl NetworkRef<'_> {
    pub fn nports(&self) -> usize {
        match self {
            NetworkRef::One(_) => 1,
            NetworkRef::Two(_) => 2,
            NetworkRef::Three(_) => 3,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            NetworkRef::One(_) => "one-port",
            NetworkRef::Two(_) => "two-port",
            NetworkRef::Three(_) => "three-port",
        }
    }
}

impl<'a> From<&'a OnePort> for NetworkRef<'a> {
    fn from(x: &'a OnePort) -> Self {
        NetworkRef::One(x)
    }
}

impl<'a> From<&'a TwoPort> for NetworkRef<'a> {
    fn from(x: &'a TwoPort) -> Self {
        NetworkRef::Two(x)
    }
}

impl<'a> From<&'a ThreePort> for NetworkRef<'a> {
    fn from(x: &'a ThreePort) -> Self {
        NetworkRef::Three(x)
    }
}

impl fmt::Display for NetworkRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Zero based index of a one based port number
pub(crate) fn port_index(port: usize, nports: usize) -> Result<usize> {
    match port >= 1 && port <= nports {
        true => Ok(port - 1),
        false => Err(Error::InvalidPort(port)),
    }
}
