//! extbuild-lib: just-in-time native extensions
//!
//! Compiles C++ and CUDA sources into a shared library with Ninja and binds
//! it into the running process:
//! - `BuildSpec`: a validated request (name, sources, flags, includes)
//! - `ninja`: incremental build description synthesis
//! - `invoke`: running Ninja and reporting its log
//! - `artifact`: loading the built library and calling its entry point
//! - `load`: the whole pipeline behind one call

pub mod artifact;
pub mod consts;
pub mod error;
pub mod headers;
pub mod invoke;
pub mod load;
pub mod ninja;
pub mod platform;
pub mod source;
pub mod spec;
pub mod toolchain;
pub mod util;
pub mod workspace;

pub use artifact::{Extension, loaded};
pub use error::{BuildError, ConfigError, Error, LoadError, Result};
pub use load::{BuildOutput, build, load};
pub use spec::{BuildSpec, LoadOptions};
