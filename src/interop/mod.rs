//! Interoperability with surrounding systems.
//!
//! - [`graphql`]: builds schemas from remote input-type metadata.
//! - [`form_resolver`]: translates reports into the `{values, errors}`
//!   contract of form libraries.

#[cfg(feature = "form-resolver")]
pub mod form_resolver;
#[cfg(feature = "graphql")]
pub mod graphql;
