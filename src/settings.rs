//! Static plugin parameters: stringly-typed option maps resolved once at
//! load time, with per-patch defaults and logged fallbacks.
//!
//! Parameters arrive as strings (`"true"`/`"false"` booleans) the way the
//! host's plugin manager hands them over. Each patch normalizes the options
//! it recognizes into a typed struct at install time; nothing parses at call
//! time.

use std::collections::HashMap;
use std::path::Path;

use eyre::WrapErr;

/// All patches' options: patch name -> option name -> raw value.
#[derive(Default)]
pub struct PluginParams {
    patches: HashMap<String, HashMap<String, String>>,
}

impl PluginParams {
    pub fn empty() -> PluginParams {
        PluginParams::default()
    }

    pub fn from_json(text: &str) -> eyre::Result<PluginParams> {
        let patches = serde_json::from_str(text).wrap_err("failed to parse plugin parameters")?;
        Ok(PluginParams { patches })
    }

    pub fn load(path: &Path) -> eyre::Result<PluginParams> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Loads parameters, falling back to an empty set (every patch on its
    /// defaults) if the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> PluginParams {
        Self::load(path).unwrap_or_else(|err| {
            log::error!("failed to load plugin parameters: {:?}", err);
            log::info!("using default values instead");
            PluginParams::empty()
        })
    }

    /// Builder used by hosts that configure in code rather than from disk.
    pub fn with(mut self, patch: &str, option: &str, value: &str) -> PluginParams {
        self.patches
            .entry(patch.to_string())
            .or_default()
            .insert(option.to_string(), value.to_string());
        self
    }

    /// The options for one patch. Unknown patch names resolve to an empty
    /// set, which makes every option take its default.
    pub fn of(&self, patch: &'static str) -> Params<'_> {
        Params {
            patch,
            options: self.patches.get(patch),
        }
    }
}

/// One patch's view of its own options.
pub struct Params<'a> {
    patch: &'static str,
    options: Option<&'a HashMap<String, String>>,
}

impl Params<'_> {
    fn raw(&self, option: &str) -> Option<&str> {
        self.options
            .and_then(|options| options.get(option))
            .map(String::as_str)
    }

    /// A `"true"`/`"false"` option. Anything else is logged and treated as
    /// the default.
    pub fn flag(&self, option: &str, default: bool) -> bool {
        match self.raw(option) {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                log::warn!(
                    "{}: option '{}' has malformed value '{}'; using default",
                    self.patch,
                    option,
                    other
                );
                default
            }
        }
    }

    pub fn string(&self, option: &str, default: &str) -> String {
        self.raw(option).unwrap_or(default).to_string()
    }
}
