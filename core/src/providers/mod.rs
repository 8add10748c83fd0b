pub mod builtin;
pub mod factory;

pub use builtin::BuiltinProvider;
pub use factory::{BUILTIN_PROVIDERS, build_registry, create_builtin_provider};
