pub mod catalog;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod manifest;
pub mod model;
pub mod path;
pub mod resolver;
pub mod synth;

pub use config::ResolverConfig;
pub use error::{ResolveError, Result};
pub use model::{DeploymentTree, ResolvedDeployment};
pub use resolver::{ResolutionContext, Resolver, ResolverBuilder};
