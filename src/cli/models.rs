//! `chatvault models` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::providers::{ModelDescriptor, ProviderCatalog};
use std::fmt::Write;

/// Run the models command.
///
/// Lists models usable with the configured API keys, or every known model
/// with `all`.
///
/// # Errors
///
/// Currently infallible; returns `Result` for consistency with other
/// commands.
pub fn run(config: &Config, all: bool) -> Result<()> {
    let catalog = ProviderCatalog::new(config.providers.clone());

    let models: Vec<ModelDescriptor> = if all {
        catalog.all_models().to_vec()
    } else {
        catalog.available_models()
    };

    if models.is_empty() {
        println!("No models available.");
        println!("\nSet OPENAI_API_KEY or ANTHROPIC_API_KEY to enable a provider.");
        return Ok(());
    }

    print!("{}", render_models(&models, &catalog));
    Ok(())
}

fn render_models(models: &[ModelDescriptor], catalog: &ProviderCatalog) -> String {
    let mut out = format!("{:<28} {:<8} {:<16} Ready\n", "Model", "Provider", "Label");
    for model in models {
        let ready = if catalog.is_configured(model.family) {
            "yes"
        } else {
            "no key"
        };
        let _ = writeln!(
            out,
            "{:<28} {:<8} {:<16} {}",
            model.id,
            model.family.as_str(),
            model.label,
            ready
        );
    }
    out
}
