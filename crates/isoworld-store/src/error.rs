use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Persistence failures. A missing section file is not an error; everything
/// here means the resident world can no longer be trusted.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("section file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt section file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error("failed writing section file {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}
