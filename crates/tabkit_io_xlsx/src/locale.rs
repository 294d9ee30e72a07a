//! Localized message catalog used to render validation text.

use std::collections::BTreeMap;

/// Key/template message catalog with positional `{0}`-style substitution.
///
/// The decode pipeline treats `lookup` as a pure function; unknown keys echo
/// the key so a missing catalog entry stays visible instead of vanishing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleCatalog {
    dict_messages: BTreeMap<String, String>,
}

impl LocaleCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog from `(key, template)` pairs.
    pub fn from_pairs(l_pairs: &[(&str, &str)]) -> Self {
        let mut catalog = Self::new();
        for (c_key, c_template) in l_pairs {
            catalog.insert(c_key, c_template);
        }
        catalog
    }

    /// Insert or replace one message template.
    pub fn insert(&mut self, c_key: &str, c_template: &str) {
        self.dict_messages
            .insert(c_key.to_string(), c_template.to_string());
    }

    /// Render the message for `c_key`, substituting `{0}`, `{1}`, ... with
    /// `l_args` in order.
    pub fn lookup(&self, c_key: &str, l_args: &[&str]) -> String {
        let Some(c_template) = self.dict_messages.get(c_key) else {
            return c_key.to_string();
        };

        let mut c_message = c_template.clone();
        for (n_idx, c_arg) in l_args.iter().enumerate() {
            c_message = c_message.replace(&format!("{{{n_idx}}}"), c_arg);
        }
        c_message
    }
}
