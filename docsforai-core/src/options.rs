//! Caller-supplied, per-framework build options.
//!
//! Keys are free-form; each adapter reads the ones it understands (for example
//! `npm_build_args` or `gitbook_config_file`) and ignores the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildOption {
    Args(Vec<String>),
    Value(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildOptions(BTreeMap<String, BuildOption>);

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args<I, S>(mut self, key: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.insert(
            key.to_string(),
            BuildOption::Args(args.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(key.to_string(), BuildOption::Value(value.into()));
        self
    }

    /// Extra arguments for `key`. A plain string is split on whitespace.
    pub fn args(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(BuildOption::Args(args)) => args.clone(),
            Some(BuildOption::Value(v)) => v.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    /// Single string value for `key`, if set as one.
    pub fn value(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(BuildOption::Value(v)) if !v.trim().is_empty() => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
