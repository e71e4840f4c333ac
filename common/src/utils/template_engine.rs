pub use minijinja::{path_loader, Environment, Value};
pub use minijinja_autoreload::AutoReloader;
pub use minijinja_contrib;
pub use minijinja_embed;
use std::sync::Arc;

pub trait ProvidesTemplateEngine {
    fn template_engine(&self) -> &Arc<TemplateEngine>;
}

/// Templates are read from disk and hot-reloaded in debug builds, and embedded
/// into the binary in release builds.
#[derive(Clone)]
pub enum TemplateEngine {
    #[cfg(debug_assertions)]
    AutoReload(Arc<AutoReloader>),
    #[cfg(not(debug_assertions))]
    Embedded(Arc<Environment<'static>>),
}

/// Builds a [`TemplateEngine`] for the calling crate.
///
/// Takes the templates directory relative to the calling crate's manifest.
/// Release builds expect the calling crate's `build.rs` to have run
/// `minijinja_embed::embed_templates!` over the same directory.
#[macro_export]
macro_rules! create_template_engine {
    ($relative_path:expr) => {{
        #[cfg(debug_assertions)]
        {
            let crate_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            let template_path = crate_dir.join($relative_path);
            let reloader = $crate::utils::template_engine::AutoReloader::new(move |notifier| {
                let mut env = $crate::utils::template_engine::Environment::new();
                env.set_loader($crate::utils::template_engine::path_loader(&template_path));
                notifier.set_fast_reload(true);
                notifier.watch_path(&template_path, true);
                $crate::utils::template_engine::minijinja_contrib::add_to_environment(&mut env);
                Ok(env)
            });
            $crate::utils::template_engine::TemplateEngine::AutoReload(std::sync::Arc::new(
                reloader,
            ))
        }
        #[cfg(not(debug_assertions))]
        {
            let mut env = $crate::utils::template_engine::Environment::new();
            $crate::utils::template_engine::minijinja_embed::load_templates!(&mut env);
            $crate::utils::template_engine::minijinja_contrib::add_to_environment(&mut env);
            $crate::utils::template_engine::TemplateEngine::Embedded(std::sync::Arc::new(env))
        }
    }};
}

impl TemplateEngine {
    fn with_template<R>(
        &self,
        name: &str,
        f: impl FnOnce(minijinja::Template<'_, '_>) -> Result<R, minijinja::Error>,
    ) -> Result<R, minijinja::Error> {
        match self {
            #[cfg(debug_assertions)]
            Self::AutoReload(reloader) => {
                let env = reloader.acquire_env()?;
                f(env.get_template(name)?)
            }
            #[cfg(not(debug_assertions))]
            Self::Embedded(env) => f(env.get_template(name)?),
        }
    }

    pub fn render(&self, name: &str, ctx: &Value) -> Result<String, minijinja::Error> {
        self.with_template(name, |template| template.render(ctx))
    }

    /// Renders one block of a template, for htmx partial swaps.
    pub fn render_block(
        &self,
        template_name: &str,
        block_name: &str,
        ctx: &Value,
    ) -> Result<String, minijinja::Error> {
        self.with_template(template_name, |template| {
            template
                .render_captured(ctx)?
                .with_state_mut(|state| state.render_block(block_name))
        })
    }
}
