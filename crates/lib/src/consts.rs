/// Subdirectory of the temp directory holding all extension workspaces.
pub const EXTENSIONS_DIR_NAME: &str = "extbuild_extensions";

/// File name of the Ninja description emitted into every workspace.
pub const BUILD_FILE_NAME: &str = "build.ninja";

/// Prefix of the entry point every artifact exports, followed by its name.
pub const ENTRY_SYMBOL_PREFIX: &str = "extbuild_init_";

// Environment variables
pub const ENV_CUDA_HOME: &str = "CUDA_HOME";
pub const ENV_CUDA_PATH: &str = "CUDA_PATH";
pub const ENV_CXX: &str = "CXX";
pub const ENV_EXTENSIONS_DIR: &str = "EXTBUILD_EXTENSIONS_DIR";
pub const ENV_NINJA: &str = "EXTBUILD_NINJA";
pub const ENV_RUNTIME_INCLUDE: &str = "EXTBUILD_RUNTIME_INCLUDE";

pub const DEFAULT_CXX: &str = "c++";
pub const DEFAULT_NINJA: &str = "ninja";

/// `deps = gcc` needs Ninja 1.3.
pub const NINJA_REQUIRED_VERSION: &str = "1.3";

pub const CXX_STANDARD_FLAG: &str = "-std=c++17";

/// Oldest GCC whose libstdc++ ABI is known to work with prebuilt binaries.
pub const MINIMUM_GCC_VERSION: (u32, u32) = (4, 9);
