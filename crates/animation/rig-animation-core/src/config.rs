//! Core configuration for rig-animation-core.

use serde::{Deserialize, Serialize};

/// Defaults applied by the animation state controller and loaders.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crossfade duration in seconds used when no explicit (from, to) mix is set.
    /// Zero means switching animations is a hard cut.
    pub default_mix: f32,

    /// Run structural validation on animations as they are registered.
    pub validate_on_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mix: 0.0,
            validate_on_load: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "default_mix": 0.25 }"#).unwrap();
        assert_eq!(cfg.default_mix, 0.25);
        assert!(cfg.validate_on_load);
    }
}
