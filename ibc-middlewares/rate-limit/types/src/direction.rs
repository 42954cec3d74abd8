use core::fmt::{Display, Error as FmtError, Formatter};

use crate::error::RateLimitError;

/// Direction of a transfer relative to this chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PacketDirection {
    /// Sent from this chain; counted as outflow.
    Send,
    /// Received by this chain; counted as inflow.
    Recv,
}

impl PacketDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Send => "PACKET_SEND",
            Self::Recv => "PACKET_RECV",
        }
    }
}

impl Display for PacketDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for PacketDirection {
    type Error = RateLimitError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Send),
            1 => Ok(Self::Recv),
            other => Err(RateLimitError::InvalidDirection(other)),
        }
    }
}

impl From<PacketDirection> for i32 {
    fn from(direction: PacketDirection) -> Self {
        match direction {
            PacketDirection::Send => 0,
            PacketDirection::Recv => 1,
        }
    }
}
