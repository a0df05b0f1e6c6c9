//! The request/response port the decoder drives.
//!
//! The controller speaks regular Modbus RTU over its RJ12 jack, but nothing
//! in this crate cares about framing or CRCs. A [`Transport`] is anything
//! that can move `count` holding-register words for a single request and
//! classify whatever went wrong on the way.

/// Classified link-layer failures.
///
/// The first four variants correspond to exception responses sent by the
/// controller itself; the rest are produced by the transport while
/// validating a response against its request.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    #[error("illegal data address")]
    IllegalDataAddress,
    #[error("illegal data value")]
    IllegalDataValue,
    #[error("illegal function")]
    IllegalFunction,
    #[error("slave device failure")]
    SlaveDeviceFailure,
    #[error("the slave ID in the response does not match that of the request")]
    InvalidSlaveId,
    #[error("the function code in the response does not match that of the request")]
    InvalidFunction,
    #[error("response timed out")]
    ResponseTimedOut,
    #[error("response CRC check failed")]
    InvalidChecksum,
    #[error("unknown link error")]
    Unknown,
}

impl ErrorKind {
    /// Classify an on-wire Modbus exception code.
    pub fn from_exception_code(code: u8) -> Self {
        match code {
            1 => Self::IllegalFunction,
            2 => Self::IllegalDataAddress,
            3 => Self::IllegalDataValue,
            4 => Self::SlaveDeviceFailure,
            _ => Self::Unknown,
        }
    }
}

/// A single-exchange Modbus-style link to one controller.
///
/// Implementations own addressing (slave ID), framing, timeouts and any
/// retry policy. The decoder never retries and never issues more than one
/// request at a time through a given handle; whether a handle may be shared
/// across threads is entirely up to the implementation.
#[async_trait::async_trait]
pub trait Transport {
    /// Read `count` holding registers starting at `address`.
    ///
    /// A successful result contains exactly `count` words in address order.
    async fn read_words(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ErrorKind>;

    /// Write a single holding register.
    async fn write_word(&mut self, address: u16, value: u16) -> Result<(), ErrorKind>;
}
