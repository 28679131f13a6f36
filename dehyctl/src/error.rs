/// Analog acquisition failures.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SampleError {
    /// The conversion did not complete in time.
    #[error("conversion timed out")]
    Timeout,

    /// The converter reported an error.
    #[error("converter fault")]
    Fault,
}

/// Persistent storage failures.
#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum StorageError {
    /// A previous write cycle is still in progress.
    #[error("storage busy")]
    Busy,

    /// Read back data does not match the written data.
    #[error("storage verify failed at offset {0}")]
    Verify(usize),
}

// vim: ts=4 sw=4 expandtab
