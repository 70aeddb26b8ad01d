pub mod analyzer;
pub mod config;
pub mod context;
pub mod embedded;
pub mod error;
pub mod extract;
pub mod factory;
pub mod frontmatter;
pub mod generator;
pub mod guides;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod profile;
pub mod prompts;
pub mod readme;
pub mod recommend;
pub mod sanitize;
pub mod templates;

pub use error::{InitError, Result};
pub use pipeline::{Pipeline, PipelineReport, StageSelection};
pub use profile::{ProjectOrigin, ProjectProfile};
pub use recommend::Recommendation;
