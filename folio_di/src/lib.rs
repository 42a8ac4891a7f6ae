//! Compile-time dependency injection.
//!
//! A provider owns the leaf dependencies (configuration values, connections)
//! and a cache of everything built from them. Services derive [`Build`] and
//! are assembled recursively by [`Provide::provide`]; every built value is
//! cached, so each service type exists once per provider.

pub use folio_di_derive::Build;
pub use typemap::TypeMap;

mod macros;
mod typemap;

#[cfg(test)]
extern crate self as folio_di;

pub trait Provider: Sized {
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}
