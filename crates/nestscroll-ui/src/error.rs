use crate::view::ViewId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedScrollError {
    /// No view matched the configured header source.
    HeaderNotFound { id: Option<ViewId> },
    /// No view matched the configured scroll-child source.
    ScrollChildNotFound { id: Option<ViewId> },
    /// Header and scroll child resolved to the same view.
    HeaderIsScrollChild,
    /// The paged capability was given a view that is not a pager.
    NotAPager,
}

impl std::fmt::Display for NestedScrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NestedScrollError::HeaderNotFound { id: Some(id) } => {
                write!(f, "can't find header with id {id}")
            }
            NestedScrollError::HeaderNotFound { id: None } => {
                write!(f, "can't find header: container has no children")
            }
            NestedScrollError::ScrollChildNotFound { id: Some(id) } => {
                write!(f, "can't find scroll child with id {id}")
            }
            NestedScrollError::ScrollChildNotFound { id: None } => {
                write!(f, "can't find any scroll child: container needs a second child")
            }
            NestedScrollError::HeaderIsScrollChild => {
                write!(f, "header and scroll child must be different views")
            }
            NestedScrollError::NotAPager => write!(f, "paged scroll helper needs a pager view"),
        }
    }
}

impl std::error::Error for NestedScrollError {}
