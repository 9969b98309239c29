//! Common error types for link and protocol operations

/// A common error type for link and protocol operations.
///
/// This enum defines the failures that can occur inside the client. It is
/// designed to be simple and portable for `no_std` environments. Protocol
/// operations mostly log these and degrade to a safe default; they only reach
/// the caller where noted on the operation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a link that is not configured.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// An encoded line or field did not fit its fixed-size buffer.
    BufferOverflow,
    /// A fixed-size table (such as the subscription registry) is full.
    CapacityExceeded,
    /// Configuration could not be parsed or is inconsistent.
    InvalidConfig,
    /// The resource is already in use by the caller.
    Busy,
}

/// Error code recorded when an inbound line exceeds the line buffer.
pub const OVERFLOW_ERROR_CODE: i32 = 71;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let message = match self {
            Error::NotOpen => "link not open",
            Error::WriteError => "write failed",
            Error::ReadError => "read failed",
            Error::BufferOverflow => "buffer overflow",
            Error::CapacityExceeded => "capacity exceeded",
            Error::InvalidConfig => "invalid configuration",
            Error::Busy => "busy",
        };
        f.write_str(message)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::CapacityExceeded => defmt::write!(f, "CapacityExceeded"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
            Error::Busy => defmt::write!(f, "Busy"),
        }
    }
}
