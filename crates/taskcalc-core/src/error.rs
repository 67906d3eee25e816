use thiserror::Error;

/// Lookup failures inside a form. Never surfaced to the user; callers that
/// recalculate treat these as "field absent" and skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no element with id `{id}`")]
    MissingElement { id: String },
    #[error("element `{id}` is not an input field")]
    NotAnInput { id: String },
    #[error("element was removed from its document")]
    DetachedElement,
}
