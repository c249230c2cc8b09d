use thiserror::Error;

/// Structural misuse of the tree. These fail fast at the mutation site;
/// transient teardown races are absorbed by handle re-resolution instead and
/// never surface as errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("container '{parent}' does not accept child '{child}'")]
    IncompatibleChild { parent: String, child: String },

    #[error("'{0}' is not a container")]
    NotAContainer(String),

    #[error("a surface cannot be attached to another container")]
    SurfaceReparented,

    #[error("cannot attach '{0}' above or onto itself")]
    CyclicAttach(String),
}

pub type Result<T> = std::result::Result<T, UiError>;
