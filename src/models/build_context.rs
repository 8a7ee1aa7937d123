use regex::Regex;
use std::sync::OnceLock;

use crate::error::BuildError;

/// Build variables of the firmware project the tools run for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Explicit app name; falls back to the `APP_NAME` build flag
    pub app_name: Option<String>,
    pub board: String,
    /// Build environment name (e.g. the PlatformIO env)
    pub env_name: String,
    /// Compiler flags, e.g. `-D APP_NAME=\"Thingy\" -DCORE_DEBUG_LEVEL=0`
    pub build_flags: String,
}

fn define_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"-D\s*([A-Za-z_][A-Za-z0-9_]*)(?:=(\\?"[^"]*?\\?"|'[^']*'|\S+))?"#)
            .expect("define pattern is valid")
    })
}

/// Strip one level of shell quoting from a define value.
fn unquote(value: &str) -> String {
    let value = value.replace("\\\"", "\"");
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    value.to_string()
}

impl BuildContext {
    /// Value of the preprocessor define `name` in the build flags.
    ///
    /// `-D NAME=value` and `-DNAME=value` are recognized; surrounding quotes
    /// are removed. A define without value yields an empty string. The last
    /// definition wins, as it does for the compiler.
    pub fn read_flag(&self, name: &str) -> Option<String> {
        define_pattern()
            .captures_iter(&self.build_flags)
            .filter(|caps| &caps[1] == name)
            .last()
            .map(|caps| caps.get(2).map(|v| unquote(v.as_str())).unwrap_or_default())
    }

    /// The app name: explicit override, else the `APP_NAME` build flag.
    pub fn app_name(&self) -> Result<String, BuildError> {
        match &self.app_name {
            Some(name) if !name.is_empty() => Ok(name.clone()),
            _ => self
                .read_flag("APP_NAME")
                .filter(|name| !name.is_empty())
                .ok_or(BuildError::MissingFlag("APP_NAME")),
        }
    }
}
