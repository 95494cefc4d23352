use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::ConfigError;

/// A tracked artist and the spellings under which the venue may list them.
///
/// Surface forms are matched as exact substrings: casing and script are
/// significant, so `"Tuna"`, `"tuna"` and `"טונה"` are three separate forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistAlias {
    pub canonical_name: String,
    pub surface_forms: Vec<String>,
}

/// Validated artist alias table, in the order the configuration declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<ArtistAlias>,
}

impl AliasTable {
    /// Build a table from already-constructed aliases.
    ///
    /// Repeated surface forms within one artist are collapsed, keeping the
    /// first occurrence in place.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a canonical name is blank or
    /// duplicated, or an artist has no non-blank surface forms.
    pub fn new(entries: Vec<ArtistAlias>) -> Result<Self, ConfigError> {
        let mut seen_names = HashSet::new();
        let mut validated = Vec::with_capacity(entries.len());

        for alias in entries {
            let name = alias.canonical_name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "artist name must be non-empty".to_string(),
                ));
            }

            if !seen_names.insert(name.to_string()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate artist name: '{name}'"
                )));
            }

            if alias.surface_forms.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "artist '{name}' has no surface forms"
                )));
            }

            let mut seen_forms = HashSet::new();
            let mut forms = Vec::with_capacity(alias.surface_forms.len());
            for form in alias.surface_forms {
                // A blank form is a substring of every show name.
                if form.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "artist '{name}' has a blank surface form"
                    )));
                }
                if seen_forms.insert(form.clone()) {
                    forms.push(form);
                }
            }

            validated.push(ArtistAlias {
                canonical_name: name.to_string(),
                surface_forms: forms,
            });
        }

        Ok(Self { entries: validated })
    }

    /// Parse and validate an artists document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML cannot be parsed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ArtistsFile = serde_yaml::from_str(content)?;
        Self::new(file.artists.0)
    }

    #[must_use]
    pub fn entries(&self) -> &[ArtistAlias] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load and validate the artist alias table from a YAML file.
///
/// The file holds a top-level `artists` mapping from canonical name to a list
/// of surface forms:
///
/// ```yaml
/// artists:
///   Tuna: [tuna, טונה, Tuna]
/// ```
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_artists(path: &Path) -> Result<AliasTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ArtistsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    AliasTable::from_yaml_str(&content)
}

#[derive(Debug, Deserialize)]
struct ArtistsFile {
    artists: OrderedAliases,
}

/// The `artists` mapping, read entry by entry so that declaration order is
/// kept and duplicate keys reach validation instead of being merged.
#[derive(Debug)]
struct OrderedAliases(Vec<ArtistAlias>);

impl<'de> Deserialize<'de> for OrderedAliases {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AliasesVisitor;

        impl<'de> Visitor<'de> for AliasesVisitor {
            type Value = OrderedAliases;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of artist name to a list of surface forms")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((canonical_name, surface_forms)) =
                    map.next_entry::<String, Vec<String>>()?
                {
                    entries.push(ArtistAlias {
                        canonical_name,
                        surface_forms,
                    });
                }
                Ok(OrderedAliases(entries))
            }
        }

        deserializer.deserialize_map(AliasesVisitor)
    }
}
