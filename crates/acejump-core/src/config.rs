//! Settings — the TOML settings file and `:set`-style overrides.
//!
//! A [`Config`] is read once per session. Every key has a default, so an
//! empty (or missing) settings file is valid:
//!
//! | Key                           | Type     | Default            |
//! |-------------------------------|----------|--------------------|
//! | `labels`                      | string   | `a`–`z` then `A`–`Z` |
//! | `double_char_label`           | bool     | false              |
//! | `jump_to_boundary`            | bool     | true               |
//! | `search_case_sensitivity`     | bool     | true               |
//! | `jump_behind_last_characters` | bool     | false              |
//! | `save_files_after_jump`       | bool     | false              |
//! | `labels_scope`                | string   | `"invalid"`        |
//! | `view_settings`               | [string] | `[]`               |
//! | `selection_modes`             | bool     | false              |
//!
//! # Overrides
//!
//! [`parse_set`] accepts the same small grammar as an editor's `:set`:
//!
//! | Syntax          | Effect                          |
//! |-----------------|---------------------------------|
//! | `option`        | Enable boolean                  |
//! | `nooption`      | Disable boolean                 |
//! | `option!`       | Toggle boolean                  |
//! | `option=value`  | Assign (lists are comma-separated) |

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::labels::Alphabet;

/// The default label alphabet.
pub const DEFAULT_LABELS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Jump settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label alphabet; order is priority.
    pub labels: String,
    /// Label with two-character labels (`|labels|²` per batch).
    pub double_char_label: bool,
    /// Snap the cursor onto a word boundary when the target is one char
    /// before it.
    pub jump_to_boundary: bool,
    /// Match the pattern case-sensitively.
    pub search_case_sensitivity: bool,
    /// Char jumps onto a line's last character land behind it.
    pub jump_behind_last_characters: bool,
    /// Save touched, clean, writable files after a jump.
    pub save_files_after_jump: bool,
    /// Highlight scope for labeled regions.
    pub labels_scope: String,
    /// View settings to snapshot and re-apply around the label overlay.
    pub view_settings: Vec<String>,
    /// Allow the select and add-cursor mode toggles.
    pub selection_modes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.to_string(),
            double_char_label: false,
            jump_to_boundary: true,
            search_case_sensitivity: true,
            jump_behind_last_characters: false,
            save_files_after_jump: false,
            labels_scope: "invalid".to_string(),
            view_settings: Vec::new(),
            selection_modes: false,
        }
    }
}

impl Config {
    /// Parse and validate settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or an invalid alphabet.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or doesn't validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check invariants serde can't express.
    ///
    /// # Errors
    ///
    /// Returns an error if the alphabet is empty or repeats a character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.alphabet().map(|_| ())
    }

    /// The validated label alphabet.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn alphabet(&self) -> Result<Alphabet, ConfigError> {
        Alphabet::new(&self.labels)
    }

    /// Apply one override. On error the settings are left as they were.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown options, booleans used as strings (or the
    /// reverse), and values that don't parse or validate.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match directive {
            SetDirective::On(name) => *next.bool_mut(name)? = true,
            SetDirective::Off(name) => *next.bool_mut(name)? = false,
            SetDirective::Toggle(name) => {
                let flag = next.bool_mut(name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => next.assign(name, value)?,
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn bool_mut(&mut self, name: &str) -> Result<&mut bool, ConfigError> {
        Ok(match name {
            "double_char_label" => &mut self.double_char_label,
            "jump_to_boundary" => &mut self.jump_to_boundary,
            "search_case_sensitivity" => &mut self.search_case_sensitivity,
            "jump_behind_last_characters" => &mut self.jump_behind_last_characters,
            "save_files_after_jump" => &mut self.save_files_after_jump,
            "selection_modes" => &mut self.selection_modes,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        })
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "labels" => self.labels = value.to_string(),
            "labels_scope" => self.labels_scope = value.to_string(),
            "view_settings" => {
                self.view_settings = value
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {
                let parsed = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => {
                        // Surface unknown names before bad values.
                        self.bool_mut(name)?;
                        return Err(ConfigError::InvalidValue {
                            option: name.to_string(),
                            value: value.to_string(),
                        });
                    }
                };
                *self.bool_mut(name)? = parsed;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// A parsed override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option` — enable a boolean option.
    On(String),

    /// `nooption` — disable a boolean option.
    Off(String),

    /// `option!` — toggle a boolean option.
    Toggle(String),

    /// `option=value` — assign a value.
    Assign(String, String),
}

/// Returns `true` if `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(
        name,
        "double_char_label"
            | "jump_to_boundary"
            | "search_case_sensitivity"
            | "jump_behind_last_characters"
            | "save_files_after_jump"
            | "selection_modes"
    )
}

/// Parse whitespace-separated overrides.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single override.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Only strip "no" when the remainder is a known boolean.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
