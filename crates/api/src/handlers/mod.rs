//! Request handlers. Each submodule is wired up by its counterpart in
//! [`crate::routes`].

pub mod compile;
pub mod index;
