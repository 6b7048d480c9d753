pub mod app_config;
pub mod app_name;
pub mod common;
pub mod render;

pub use app_config::{NewAppConfig, NewAppConfigBuilder, Toolchain};
pub use app_name::{AppName, FORBIDDEN_NAMES};
pub use common::{PathEscapeError, RelativePath};
pub use render::RenderContext;
