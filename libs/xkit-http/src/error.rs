use thiserror::Error;

/// Error reported by a [`ResponseWriter`](crate::ResponseWriter) when writing body bytes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SinkError {
    /// The handler ran past its deadline and the timeout layer has already
    /// answered the client. Writers treat this as handled.
    #[error("http: Handler timeout")]
    HandlerTimeout,

    /// Any other transport failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a single response write.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WriteError {
    /// The value could not be encoded as JSON
    #[error("marshal json failed, error: {0}")]
    MarshalJson(#[source] serde_json::Error),

    /// The value could not be encoded as XML
    #[error("marshal xml failed, error: {0}")]
    MarshalXml(#[source] quick_xml::SeError),

    /// The sink rejected the body
    #[error("write response failed, error: {0}")]
    Write(#[source] SinkError),

    /// The sink accepted fewer bytes than the encoded body holds
    #[error("actual bytes: {expected}, written bytes: {written}")]
    ShortWrite { expected: usize, written: usize },
}

impl WriteError {
    /// `true` for failures that happened before anything but the error
    /// response reached the sink.
    #[must_use]
    pub fn is_marshal(&self) -> bool {
        matches!(self, Self::MarshalJson(_) | Self::MarshalXml(_))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn short_write_message_names_both_counts() {
        let err = WriteError::ShortWrite {
            expected: 10,
            written: 9,
        };
        assert_eq!(err.to_string(), "actual bytes: 10, written bytes: 9");
        assert!(!err.is_marshal());
    }

    #[test]
    fn write_error_wraps_sink_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "foo");
        let err = WriteError::Write(SinkError::from(io));
        assert_eq!(err.to_string(), "write response failed, error: foo");
        assert!(std::error::Error::source(&err).is_some());
    }
}
