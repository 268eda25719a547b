//! String-keyed variable bag used for template rendering.

use crate::packager::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Variables available to templates, and typed values passed between phases.
///
/// Keys are unique and kept sorted. There is no removal: once a phase has set a
/// value, later phases can only overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Sets `key` to the display form of `path`.
    pub fn set_path(&mut self, key: impl Into<String>, path: &Path) {
        self.set(key, path.display().to_string());
    }

    /// Whether `key` has been set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw string value of `key`.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingKey {
                key: key.to_string(),
            })
    }

    /// Value of `key` parsed as `T`, e.g. a `PathBuf`.
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_str(key)?
            .parse()
            .map_err(|e: T::Err| Error::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether `key` is absent or holds only whitespace.
    pub fn is_blank(&self, key: &str) -> bool {
        self.values
            .get(key)
            .is_none_or(|value| value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn set_then_get() {
        let mut ctx = TemplateContext::new();
        ctx.set("packageName", "foo");
        assert!(ctx.contains("packageName"));
        assert_eq!(ctx.get_str("packageName").unwrap(), "foo");

        ctx.set("packageName", "bar");
        assert_eq!(ctx.get_str("packageName").unwrap(), "bar");
    }

    #[test]
    fn missing_key_fails() {
        let ctx = TemplateContext::new();
        assert!(!ctx.contains("nope"));
        match ctx.get_str("nope") {
            Err(Error::MissingKey { key }) => assert_eq!(key, "nope"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn typed_values_round_trip_through_strings() {
        let mut ctx = TemplateContext::new();
        ctx.set_path("dir", Path::new("/out/package"));
        ctx.set("count", "3");

        let dir: PathBuf = ctx.get("dir").unwrap();
        assert_eq!(dir, PathBuf::from("/out/package"));
        assert_eq!(ctx.get::<u32>("count").unwrap(), 3);
        assert!(matches!(
            ctx.get::<u32>("dir"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn blank_detection() {
        let mut ctx = TemplateContext::new();
        assert!(ctx.is_blank("url"));
        ctx.set("url", "  ");
        assert!(ctx.is_blank("url"));
        ctx.set("url", "https://example.com");
        assert!(!ctx.is_blank("url"));
    }
}
