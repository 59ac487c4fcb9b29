//! Static catalog of supported AI models.
//!
//! Which models are offered depends only on which provider credentials are
//! configured; nothing here talks to the network.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// API style a model is served through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    /// Chat completions API (`openai`).
    OpenAi,
    /// Anthropic messages API.
    Claude,
}

impl ProviderFamily {
    /// Short lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Provider family serving the model.
    pub family: ProviderFamily,

    /// Model identifier sent to the provider.
    pub id: &'static str,

    /// Human-readable name.
    pub label: &'static str,
}

/// Every model the application knows about, in display order.
const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        family: ProviderFamily::OpenAi,
        id: "gpt-4o",
        label: "GPT-4o",
    },
    ModelDescriptor {
        family: ProviderFamily::OpenAi,
        id: "gpt-3.5-turbo",
        label: "GPT-3.5 Turbo",
    },
    ModelDescriptor {
        family: ProviderFamily::Claude,
        id: "claude-sonnet-4-20250514",
        label: "Claude Sonnet 4",
    },
];

/// API keys for each provider family.
///
/// Empty strings are treated as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    /// API key for the `openai` family.
    pub openai_api_key: Option<String>,

    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,
}

impl ProviderCredentials {
    /// Whether a usable key is set for `family`.
    #[must_use]
    pub fn has(&self, family: ProviderFamily) -> bool {
        let key = match family {
            ProviderFamily::OpenAi => &self.openai_api_key,
            ProviderFamily::Claude => &self.anthropic_api_key,
        };
        key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Models available under a set of credentials.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    credentials: ProviderCredentials,
}

impl ProviderCatalog {
    /// Create a catalog for the given credentials.
    #[must_use]
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self { credentials }
    }

    /// Models whose provider has credentials configured, in catalog order.
    ///
    /// Empty if no provider is configured.
    #[must_use]
    pub fn available_models(&self) -> Vec<ModelDescriptor> {
        MODELS
            .iter()
            .filter(|m| self.credentials.has(m.family))
            .copied()
            .collect()
    }

    /// Every known model regardless of credentials.
    #[must_use]
    pub fn all_models(&self) -> &'static [ModelDescriptor] {
        MODELS
    }

    /// Available models grouped by provider family.
    #[must_use]
    pub fn grouped(&self) -> BTreeMap<ProviderFamily, Vec<ModelDescriptor>> {
        let mut groups: BTreeMap<ProviderFamily, Vec<ModelDescriptor>> = BTreeMap::new();
        for model in self.available_models() {
            groups.entry(model.family).or_default().push(model);
        }
        groups
    }

    /// Whether `family` has credentials configured.
    #[must_use]
    pub fn is_configured(&self, family: ProviderFamily) -> bool {
        self.credentials.has(family)
    }
}

/// Provider family for a model ID.
///
/// Unknown models are routed to [`ProviderFamily::OpenAi`].
#[must_use]
pub fn family_for_model(model_id: &str) -> ProviderFamily {
    MODELS
        .iter()
        .find(|m| m.id == model_id)
        .map_or(ProviderFamily::OpenAi, |m| m.family)
}
