//! Configuration section definitions.
//!
//! Each module corresponds to a section in `catalog.toml`:
//!
//! | Module    | TOML Section | Purpose                                   |
//! |-----------|--------------|-------------------------------------------|
//! | `site`    | `[site]`     | Locales, default locale, locale cookie    |
//! | `route`   | `[route]`    | Exempt prefixes for the router            |
//! | `content` | `[content]`  | Content exports and repository cache      |
//! | `synth`   | `[synth]`    | Artifact synthesis and verification       |
//! | `repair`  | `[repair]`   | Slug repair policy and audit log          |
//! | `serve`   | `[serve]`    | Edge preview server                       |

mod content;
mod repair;
mod route;
mod serve;
mod site;
mod synth;

pub use content::{CacheConfig, ContentConfig};
pub use repair::RepairConfig;
pub use route::RouteConfig;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
pub use synth::SynthConfig;
