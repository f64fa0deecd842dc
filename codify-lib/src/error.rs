use thiserror::Error;

/// Failure surface of [`Runner::execute`](crate::Runner::execute) and
/// [`Runner::convert`](crate::Runner::convert).
///
/// `NotAvailable` and `UnexpectedExit` are the contract; `Io` carries any
/// other spawn-time OS failure as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// The external program could not be located or spawned.
    #[error("the `{program}` program is not available")]
    NotAvailable { program: String },

    /// The external program ran but exited with a non-zero code.
    #[error("the `{program}` program exited with code {code}: {stderr}")]
    UnexpectedExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
