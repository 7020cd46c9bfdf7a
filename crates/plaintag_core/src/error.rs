//! Lifecycle error types

use plaintag_dom::DomError;
use thiserror::Error;

/// Everything the lifecycle manager can report.
///
/// None of these abort an operation; they are handed to the diagnostic sink
/// and the operation continues with whatever steps remain possible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The component name is not in the registry
    #[error("<PlainTag> Component of tag {0} couldn't load because it isn't registered.")]
    ComponentObjectMissing(String),

    /// The builder ran but produced no usable root element
    #[error("<PlainTag> Component of tag {0} couldn't load because element is undefined.")]
    ComponentElementMissing(String),

    /// The parent selector matched no live element
    #[error("<PlainTag> Component of tag {0} couldn't load because parent can not be found.")]
    ParentMissing(String),

    /// The style builder returned nothing
    #[error("<Minor PlainTag Error> Your CSS Style builder function in a component is empty (undefined).")]
    StyleMissing(String),

    /// A value had the wrong shape
    #[error("Invalid {what} type. Expected {expected} got {found}")]
    InvalidArgumentType {
        what: &'static str,
        expected: &'static str,
        found: String,
    },

    /// The mount root did not appear within the configured timeout
    #[error("<PlainTag> Component of tag {0} couldn't load because the mount root never appeared.")]
    MountTimeout(String),

    /// A document operation failed
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl LifecycleError {
    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ComponentObjectMissing(_) => "component_object_missing",
            Self::ComponentElementMissing(_) => "component_element_missing",
            Self::ParentMissing(_) => "parent_missing",
            Self::StyleMissing(_) => "style_missing",
            Self::InvalidArgumentType { .. } => "invalid_argument_type",
            Self::MountTimeout(_) => "mount_timeout",
            Self::Dom(_) => "dom",
        }
    }
}
