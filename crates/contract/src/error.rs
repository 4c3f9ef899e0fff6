//! # Contract Errors
//!
//! [`ConfigError`] is returned while a contract is being defined and aborts the
//! definition. [`ContractError`] reports misuse of a built contract's accessors.
//! Validation failures are neither: they are collected in [`crate::Errors`].

pub use access::{ContractError, ContractErrorExt};
pub use config::{ConfigError, ConfigErrorExt};

mod config {
    use std::borrow::Cow;

    /// Failures raised while declaring or compiling a schema.
    #[formwork_derive::formwork_error]
    pub enum ConfigError {
        /// The property name collides with an accessor owned by every contract.
        #[error(
            "The property name '{name}' is reserved{}, please consider something else using `as`",
            format_context(.context)
        )]
        ReservedName { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

        /// An option is missing, contradictory or refers to something undeclared.
        #[error("Invalid property option{}: {message}", format_context(.context))]
        InvalidOption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

        /// A definition names a feature no catalog provides.
        #[error("Unknown feature{}: {name}", format_context(.context))]
        UnknownFeature { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

        /// A `format` rule carries an invalid regular expression.
        #[error("Invalid format pattern{}: {source}", format_context(.context))]
        Pattern { source: regex::Error, context: Option<Cow<'static, str>> },
    }

    impl ConfigError {
        pub(crate) fn invalid(message: impl Into<Cow<'static, str>>, property: &str) -> Self {
            Self::InvalidOption {
                message: message.into(),
                context: Some(property.to_owned().into()),
            }
        }
    }
}

mod access {
    use std::borrow::Cow;

    /// Failures raised by accessor calls on a built contract.
    #[formwork_derive::formwork_error]
    pub enum ContractError {
        /// No property with this public name is declared.
        #[error("Unknown property{}: {name}", format_context(.context))]
        UnknownProperty { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

        /// The value does not fit the property's shape.
        #[error("Type mismatch{}: {message}", format_context(.context))]
        TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    }

    impl ContractError {
        pub(crate) fn unknown(name: &str) -> Self {
            Self::UnknownProperty { name: name.to_owned().into(), context: None }
        }
    }
}
