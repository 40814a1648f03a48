//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `synth` - Fallback shell page written by the synthesizer
//! - `serve` - Preview server pages (not_found.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::synth::{SHELL_HTML, ShellVars};
//!
//! let html = SHELL_HTML.render(&ShellVars { title: "Catalog" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

use crate::utils::html::escape;

pub mod synth {
    use super::{Template, TemplateVars, escape};

    /// Variables for shell.html template.
    pub struct ShellVars<'a> {
        pub title: &'a str,
    }

    impl TemplateVars for ShellVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__TITLE__", &escape(self.title))
        }
    }

    /// Minimal client-rendered shell used when no exported page can serve
    /// as the template artifact.
    pub const SHELL_HTML: Template<ShellVars<'static>> =
        Template::new(include_str!("synth/shell.html"));
}

pub mod serve {
    use super::{Template, TemplateVars, escape};

    /// Variables for not_found.html template.
    pub struct NotFoundVars<'a> {
        pub path: &'a str,
        pub home: &'a str,
    }

    impl TemplateVars for NotFoundVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__PATH__", &escape(self.path))
                .replace("__HOME__", &escape(self.home))
        }
    }

    /// Generic 404 page when the output tree has no `404.html`.
    pub const NOT_FOUND_HTML: Template<NotFoundVars<'static>> =
        Template::new(include_str!("serve/not_found.html"));
}
