//! Name-keyed property registry.
//!
//! Built once when a camera opens: walks the native property list, decodes
//! each type tag, and binds a [`Property`] per entry. Some cameras report
//! names with a `"(0)"` instance suffix; the registry strips it on insert
//! and on lookup, so `"Gain(0)"` and `"Gain"` address the same property.
//! The stripped spelling is a key only: every native query and accessor
//! binds with the name exactly as reported.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::properties::{self, Property, PropertyKind};
use crate::sdk::{limits, Handle, SdkContext};

const INSTANCE_SUFFIX: &str = "(0)";

fn strip_suffix(name: &str) -> &str {
    name.strip_suffix(INSTANCE_SUFFIX).unwrap_or(name)
}

/// All properties of one open camera, addressable by name.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    ordered: Vec<Property>,
    by_name: HashMap<String, usize>,
}

impl PropertyRegistry {
    /// Walk the native property list of `handle` and bind every entry.
    ///
    /// Entries whose base type this binding does not know are skipped with a
    /// warning rather than failing the whole open.
    pub(crate) fn populate(sdk: &Arc<SdkContext>, handle: Handle) -> Result<Self> {
        let backend = sdk.backend();
        let count = backend.property_count(handle);
        let mut registry = Self {
            ordered: Vec::with_capacity(count as usize),
            by_name: HashMap::with_capacity(count as usize),
        };
        for index in 0..count {
            let mut raw_name = String::new();
            sdk.check(backend.property_name(
                handle,
                index,
                &mut raw_name,
                limits::MAX_PROPERTY_NAME_LEN,
            ))?;
            // The native layer only answers to the reported spelling; the
            // stripped one is purely a registry key.
            let name = strip_suffix(&raw_name).to_owned();

            let mut tag = 0u32;
            sdk.check(backend.property_type(handle, &raw_name, &mut tag))?;
            let Some(kind) = PropertyKind::from_tag(tag) else {
                warn!(property = %name, "unknown property type tag {tag:#x}, skipping");
                continue;
            };

            let mut category = String::new();
            sdk.check(backend.property_category(
                handle,
                &raw_name,
                &mut category,
                limits::MAX_PROPERTY_CATEGORY_LEN,
            ))?;
            let mut unit = String::new();
            sdk.check(backend.property_unit(
                handle,
                &raw_name,
                &mut unit,
                limits::MAX_PROPERTY_UNIT_LEN,
            ))?;
            let entries = if kind == PropertyKind::Enumerated {
                properties::fetch_enum_entries(sdk, handle, &raw_name)?
            } else {
                Vec::new()
            };

            let slot = registry.ordered.len();
            registry.ordered.push(Property::new(
                Arc::clone(sdk),
                handle,
                raw_name,
                name.clone(),
                tag,
                kind,
                category,
                unit,
                entries,
            ));
            registry.by_name.insert(name, slot);
        }
        debug!(
            bound = registry.ordered.len(),
            reported = count,
            "property registry built"
        );
        Ok(registry)
    }

    /// Look up a property. The `"(0)"` suffix is ignored, so both spellings
    /// of a suffixed name resolve.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.by_name
            .get(strip_suffix(name))
            .map(|&slot| &self.ordered[slot])
    }

    /// Look up a property, failing with [`Error::InvalidProperty`] when no
    /// entry exists.
    pub fn require(&self, name: &str) -> Result<&Property> {
        self.get(name)
            .ok_or_else(|| Error::InvalidProperty(strip_suffix(name).to_owned()))
    }

    /// Whether a property exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(strip_suffix(name))
    }

    /// Number of bound properties.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Property names in native enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|p| p.name())
    }

    /// Properties in native enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.ordered.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_strips_only_at_end() {
        assert_eq!(strip_suffix("Gain(0)"), "Gain");
        assert_eq!(strip_suffix("Gain"), "Gain");
        assert_eq!(strip_suffix("Ga(0)in"), "Ga(0)in");
    }
}
