use crate::error::ConfigError;
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

/// Environment variable manager that loads from the process and `.env` files
/// and expands `${VAR}` references in job files.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Manager seeded only with `vars`, ignoring the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file. File values override process values.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Replaces every `${VAR}` in `text` with its value.
    pub fn expand(&self, text: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| ConfigError::Invalid(format!("unterminated '${{' in: {text}")))?;
            let key = after[..end].trim();
            let value = self
                .get(key)
                .ok_or_else(|| ConfigError::UndefinedVariable(key.to_string()))?;

            debug!(var = key, value = %self.display_value(key, value), "Expanded variable");
            out.push_str(value);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn display_value<'a>(&self, key: &str, value: &'a str) -> &'a str {
        if self.is_sensitive(key) { "****" } else { value }
    }

    fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), ConfigError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::EnvFile(format!(
                    "malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::EnvFile(format!(
                    "empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        if quoted {
            return value[1..value.len() - 1].to_string();
        }

        value.to_string()
    }

    /// Default patterns for sensitive variable detection
    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "key", "auth", "credential", "private"]
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
