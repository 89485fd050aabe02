//! Typed camera properties.
//!
//! The native layer exposes every camera setting through one name-keyed
//! API with a handful of accessor families (string, integer, float, enum,
//! blob). A property's raw type tag carries its base type in the low byte
//! and access bits above it; [`PropertyKind`] decodes the base type and
//! [`Property`] picks the right accessor family for it.
//!
//! Access bits are enforced here, before any native call: reading a
//! write-only property or writing a read-only one fails with
//! [`Error::AccessViolation`] without touching the device.

use std::sync::Arc;

use tracing::trace;

use crate::error::{codes, Error, PropertyAccess, Result};
use crate::sdk::{limits, Handle, SdkContext};

mod tag {
    pub const BASE_MASK: u32 = 0xFF;
    pub const NUMBER: u32 = 0x01;
    pub const ENUM: u32 = 0x02;
    pub const BOOL: u32 = 0x04;
    pub const BLOB: u32 = 0x08;
    pub const STRING: u32 = 0x10;
    pub const ACTION: u32 = 0x20;
    pub const READABLE: u32 = 0x100;
    pub const WRITABLE: u32 = 0x200;
    pub const READ_ONCE: u32 = 0x1000;
}

/// Base type of a property, decoded from the low byte of its raw tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Integer or floating-point value with a min/max range.
    Numeric,
    /// One of a camera-defined list of named choices.
    Enumerated,
    /// On/off toggle carried over the integer accessors.
    Boolean,
    /// Opaque binary content, sized through the integer accessor.
    Blob,
    /// Free-form text.
    Text,
    /// Side-effecting trigger with no persistent value.
    Action,
}

impl PropertyKind {
    /// Decode a raw type tag. Returns `None` for base types this binding
    /// does not know about.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag & tag::BASE_MASK {
            tag::NUMBER => Some(PropertyKind::Numeric),
            tag::ENUM => Some(PropertyKind::Enumerated),
            tag::BOOL => Some(PropertyKind::Boolean),
            tag::BLOB => Some(PropertyKind::Blob),
            tag::STRING => Some(PropertyKind::Text),
            tag::ACTION => Some(PropertyKind::Action),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Numeric => "numeric",
            PropertyKind::Enumerated => "enumerated",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Blob => "blob",
            PropertyKind::Text => "text",
            PropertyKind::Action => "action",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of an enumerated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    /// Programmatic name, the token the accessors speak.
    pub name: String,
    /// Human-readable label.
    pub display: String,
}

/// A property value read through the accessor matching its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Numeric(f64),
    Enumerated(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Text(String),
    /// Actions have no persistent value to read.
    Action,
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Numeric(v) => write!(f, "{v}"),
            PropertyValue::Enumerated(v) => f.write_str(v),
            PropertyValue::Boolean(v) => write!(f, "{v}"),
            PropertyValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
            PropertyValue::Text(v) => f.write_str(v),
            PropertyValue::Action => f.write_str("<action>"),
        }
    }
}

/// One camera property, bound to an open connection.
///
/// Construction happens in [`crate::registry::PropertyRegistry`]; this type
/// only holds what was learned there (names, tag, category, unit, and for
/// enumerated properties the legal choices) plus the handle to act on.
#[derive(Debug, Clone)]
pub struct Property {
    sdk: Arc<SdkContext>,
    handle: Handle,
    /// Name exactly as the native layer reported it, suffix and all. Every
    /// native call binds with this spelling; the stripped one is unknown to
    /// the library on suffix-reporting cameras.
    raw_name: String,
    name: String,
    tag: u32,
    kind: PropertyKind,
    category: String,
    unit: String,
    entries: Vec<EnumEntry>,
}

impl Property {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        sdk: Arc<SdkContext>,
        handle: Handle,
        raw_name: String,
        name: String,
        tag: u32,
        kind: PropertyKind,
        category: String,
        unit: String,
        entries: Vec<EnumEntry>,
    ) -> Self {
        Self {
            sdk,
            handle,
            raw_name,
            name,
            tag,
            kind,
            category,
            unit,
            entries,
        }
    }

    /// Property name, with any `"(0)"` suffix stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property name exactly as the native layer reported it.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// Decoded base type.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Category path, slash-separated.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unit string, often empty.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Raw type tag, base type plus access bits.
    pub fn raw_tag(&self) -> u32 {
        self.tag
    }

    /// Whether the value can be read repeatedly.
    pub fn is_readable(&self) -> bool {
        self.tag & tag::READABLE != 0
    }

    /// Whether the value can be written.
    pub fn is_writable(&self) -> bool {
        self.tag & tag::WRITABLE != 0
    }

    /// Whether the value is only valid when read once, at startup.
    pub fn is_read_once(&self) -> bool {
        self.tag & tag::READ_ONCE != 0
    }

    fn check_readable(&self) -> Result<()> {
        if self.is_readable() || self.is_read_once() {
            Ok(())
        } else {
            Err(Error::AccessViolation {
                property: self.name.clone(),
                access: PropertyAccess::Read,
            })
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(Error::AccessViolation {
                property: self.name.clone(),
                access: PropertyAccess::Write,
            })
        }
    }

    // --- generic ----------------------------------------------------------

    /// Read the value through the accessor matching the property's kind.
    pub fn value(&self) -> Result<PropertyValue> {
        Ok(match self.kind {
            PropertyKind::Numeric => PropertyValue::Numeric(self.get_f64()?),
            PropertyKind::Enumerated => PropertyValue::Enumerated(self.get_enum()?),
            PropertyKind::Boolean => PropertyValue::Boolean(self.get_bool()?),
            PropertyKind::Blob => PropertyValue::Blob(self.get_blob()?),
            PropertyKind::Text => PropertyValue::Text(self.get_text()?),
            PropertyKind::Action => PropertyValue::Action,
        })
    }

    // --- numeric ----------------------------------------------------------

    /// Numeric value as a float.
    pub fn get_f64(&self) -> Result<f64> {
        self.check_readable()?;
        let mut value = 0.0;
        self.sdk.check(self.sdk.backend().get_property_value_f64(
            self.handle,
            &self.raw_name,
            &mut value,
        ))?;
        Ok(value)
    }

    /// Numeric value as an integer.
    pub fn get_long(&self) -> Result<i32> {
        self.check_readable()?;
        let mut value = 0i32;
        self.sdk.check(self.sdk.backend().get_property_value_long(
            self.handle,
            &self.raw_name,
            &mut value,
        ))?;
        Ok(value)
    }

    /// Write a numeric value as a float.
    pub fn set_f64(&self, value: f64) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, value, "set");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_value_f64(self.handle, &self.raw_name, value),
        )
    }

    /// Write a numeric value as an integer.
    pub fn set_long(&self, value: i32) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, value, "set");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_value_long(self.handle, &self.raw_name, value),
        )
    }

    /// Raw range text of a numeric property, `"lo>hi"`.
    pub fn raw_range(&self) -> Result<String> {
        let mut text = String::new();
        self.sdk.check(self.sdk.backend().property_range(
            self.handle,
            &self.raw_name,
            &mut text,
            limits::CAMERA_RANGE_LEN,
        ))?;
        Ok(text)
    }

    /// Minimum and maximum of a numeric property.
    pub fn range(&self) -> Result<(f64, f64)> {
        let mut min = 0.0;
        let mut max = 0.0;
        self.sdk.check(self.sdk.backend().property_range_f64(
            self.handle,
            &self.raw_name,
            &mut min,
            &mut max,
        ))?;
        Ok((min, max))
    }

    // --- enumerated -------------------------------------------------------

    /// Programmatic name of the current choice.
    pub fn get_enum(&self) -> Result<String> {
        self.check_readable()?;
        let mut value = String::new();
        self.sdk.check(self.sdk.backend().get_property_value_enum(
            self.handle,
            &self.raw_name,
            &mut value,
            limits::MAX_PROPERTY_VALUE_LEN,
        ))?;
        Ok(value)
    }

    /// Select a choice by programmatic name.
    ///
    /// The name is validated against [`Property::entries`] first; an unknown
    /// name fails with [`Error::InvalidValue`] without any native call.
    pub fn set_enum(&self, value: &str) -> Result<()> {
        self.check_writable()?;
        if !self.entries.iter().any(|e| e.name == value) {
            return Err(Error::InvalidValue {
                property: self.name.clone(),
                value: value.to_owned(),
            });
        }
        trace!(property = %self.name, value, "set");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_value_enum(self.handle, &self.raw_name, value),
        )
    }

    /// The legal choices of an enumerated property, captured once when the
    /// registry bound it. Empty for non-enumerated kinds.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    // --- boolean ----------------------------------------------------------

    /// Toggle state, read through the integer accessor.
    pub fn get_bool(&self) -> Result<bool> {
        self.check_readable()?;
        let mut value = 0i32;
        self.sdk.check(self.sdk.backend().get_property_value_long(
            self.handle,
            &self.raw_name,
            &mut value,
        ))?;
        Ok(value != 0)
    }

    /// Write a toggle state through the integer accessor.
    pub fn set_bool(&self, value: bool) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, value, "set");
        self.sdk.check(self.sdk.backend().set_property_value_long(
            self.handle,
            &self.raw_name,
            i32::from(value),
        ))
    }

    // --- blob -------------------------------------------------------------

    /// Binary content.
    ///
    /// The integer accessor reports the size first; a zero-size blob returns
    /// empty without a native content call, which the library would reject.
    pub fn get_blob(&self) -> Result<Vec<u8>> {
        self.check_readable()?;
        let mut size = 0i32;
        self.sdk.check(self.sdk.backend().get_property_value_long(
            self.handle,
            &self.raw_name,
            &mut size,
        ))?;
        if size <= 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; size as usize];
        self.sdk.check(
            self.sdk
                .backend()
                .get_property_blob(self.handle, &self.raw_name, &mut buf),
        )?;
        Ok(buf)
    }

    /// Replace binary content.
    pub fn set_blob(&self, value: &[u8]) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, bytes = value.len(), "set blob");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_blob(self.handle, &self.raw_name, value),
        )
    }

    // --- text -------------------------------------------------------------

    /// Text value through the string accessor.
    pub fn get_text(&self) -> Result<String> {
        self.check_readable()?;
        let mut value = String::new();
        self.sdk.check(self.sdk.backend().get_property_value(
            self.handle,
            &self.raw_name,
            &mut value,
            limits::MAX_PROPERTY_VALUE_LEN,
        ))?;
        Ok(value)
    }

    /// Write a text value through the string accessor.
    pub fn set_text(&self, value: &str) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, value, "set");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_value(self.handle, &self.raw_name, value),
        )
    }

    // --- action -----------------------------------------------------------

    /// Fire an action property. Writes `1` through the integer accessor.
    pub fn trigger(&self) -> Result<()> {
        self.check_writable()?;
        trace!(property = %self.name, "trigger");
        self.sdk.check(
            self.sdk
                .backend()
                .set_property_value_long(self.handle, &self.raw_name, 1),
        )
    }
}

/// Fetch the legal choices of an enumerated property from the native layer.
///
/// The native range query refuses to truncate, so the buffer starts at a
/// reasonable guess and doubles on every size-mismatch answer until the
/// text fits.
pub(crate) fn fetch_enum_entries(
    sdk: &SdkContext,
    handle: Handle,
    raw_name: &str,
) -> Result<Vec<EnumEntry>> {
    let mut capacity = limits::ENUM_RANGE_INITIAL_LEN;
    loop {
        let mut text = String::new();
        let code = sdk
            .backend()
            .property_range_enum(handle, raw_name, &mut text, capacity);
        if code == codes::E_MISMATCHED {
            capacity *= 2;
            continue;
        }
        sdk.check(code)?;
        return Ok(parse_enum_range(&text));
    }
}

/// Parse `"name=Display,name2=Display 2"` into entries. Tokens without an
/// `=` stand for themselves.
fn parse_enum_range(raw: &str) -> Vec<EnumEntry> {
    raw.split(',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((name, display)) => EnumEntry {
                name: name.to_owned(),
                display: display.to_owned(),
            },
            None => EnumEntry {
                name: token.to_owned(),
                display: token.to_owned(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_decodes_base_types() {
        assert_eq!(PropertyKind::from_tag(0x301), Some(PropertyKind::Numeric));
        assert_eq!(
            PropertyKind::from_tag(0x102),
            Some(PropertyKind::Enumerated)
        );
        assert_eq!(PropertyKind::from_tag(0x304), Some(PropertyKind::Boolean));
        assert_eq!(PropertyKind::from_tag(0x108), Some(PropertyKind::Blob));
        assert_eq!(PropertyKind::from_tag(0x110), Some(PropertyKind::Text));
        assert_eq!(PropertyKind::from_tag(0x220), Some(PropertyKind::Action));
        assert_eq!(PropertyKind::from_tag(0x140), None);
    }

    #[test]
    fn enum_range_parses_pairs_and_bare_tokens() {
        let entries = parse_enum_range("off=Disabled,on=Enabled,auto");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "off");
        assert_eq!(entries[0].display, "Disabled");
        assert_eq!(entries[2].name, "auto");
        assert_eq!(entries[2].display, "auto");
    }

    #[test]
    fn enum_range_of_empty_text_is_empty() {
        assert!(parse_enum_range("").is_empty());
    }
}
