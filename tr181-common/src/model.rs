//! Data-model definition loading
//!
//! A definition file is flattened into a list of [`ParameterEntry`] values, one per named
//! parameter. The expected shape is:
//!
//! ```xml
//! <model>
//!   <object name="Device.WiFi.">
//!     <parameter name="Enable" access="readWrite"/>
//!     <parameter name="Status" access="readOnly"/>
//!   </object>
//!   <object name="Device.WiFi.Radio.{i}."/>
//! </model>
//! ```
//!
//! which loads to `Device.WiFi.Enable` (read-write), `Device.WiFi.Status` (read-only) and
//! `Device.WiFi.Radio.{i}.` (any). Objects and parameters are matched by local tag name anywhere
//! below the root element, so the enclosing elements and any namespace prefixes are ignored. No
//! schema is enforced beyond well-formedness.
//!
//! Files are decoded using their byte order mark, or else the `encoding` of the XML declaration,
//! falling back to UTF-8.
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use log::{debug, warn};
use roxmltree::{Document, Node, ParsingOptions};
use serde::Deserialize;
use snafu::{ResultExt as _, Snafu};

use crate::access::AccessKind;

const OBJECT_TAG: &str = "object";
const PARAMETER_TAG: &str = "parameter";
const NAME_ATTR: &str = "name";
const ACCESS_ATTR: &str = "access";

/// Error returned when loading a definition file fails
///
/// A failed load never produces a partial model.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    /// The path does not resolve to a readable file
    #[snafu(display("Cannot read {}: {source}", path.display()))]
    NotFound {
        /// The path which was requested
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },
    /// The content is not well-formed XML
    #[snafu(display("Invalid XML in {origin}: {reason}"))]
    Malformed {
        /// Where the document came from (a file path, or `<string>`)
        origin: String,
        /// Parser message, including the position of the error when known
        reason: String,
    },
}

/// How an object name and a parameter name are joined into a qualified name
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameJoin {
    /// Insert a `.` unless the object name already ends with one
    ///
    /// TR-181 object paths end with `.` (e.g. `Device.WiFi.`), in which case this is the same as
    /// [`NameJoin::Concat`].
    #[default]
    Auto,
    /// Concatenate the two names as written in the file
    Concat,
}

impl NameJoin {
    /// Build the qualified name for a parameter of an object
    pub fn join(&self, object: &str, parameter: &str) -> String {
        let mut name = String::with_capacity(object.len() + parameter.len() + 1);
        name.push_str(object);
        if *self == NameJoin::Auto && !object.ends_with('.') {
            name.push('.');
        }
        name.push_str(parameter);
        name
    }
}

/// A single flattened parameter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterEntry {
    qualified_name: String,
    access: AccessKind,
}

impl ParameterEntry {
    /// Create a new entry
    pub fn new(qualified_name: impl Into<String>, access: AccessKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            access,
        }
    }

    /// The fully qualified, dotted name of the parameter
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The declared access kind of the parameter
    pub fn access(&self) -> AccessKind {
        self.access
    }
}

/// The flattened contents of one definition file
#[derive(Clone, Debug, Default)]
pub struct DataModel {
    source: String,
    entries: Vec<ParameterEntry>,
}

impl DataModel {
    /// Load a definition file, joining names with [`NameJoin::Auto`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataModel, LoadError> {
        Self::load_with(path, NameJoin::default())
    }

    /// Load a definition file using the given name join policy
    pub fn load_with<P: AsRef<Path>>(path: P, join: NameJoin) -> Result<DataModel, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).context(NotFoundSnafu {
            path: path.to_path_buf(),
        })?;
        let origin = path.display().to_string();
        let text = decode(&bytes).map_err(|reason| {
            MalformedSnafu {
                origin: origin.clone(),
                reason,
            }
            .build()
        })?;
        Self::parse(&text, origin, join)
    }

    /// Read a definition from a &str, joining names with [`NameJoin::Auto`]
    pub fn load_from_str(text: &str) -> Result<DataModel, LoadError> {
        Self::load_from_str_with(text, NameJoin::default())
    }

    /// Read a definition from a &str using the given name join policy
    pub fn load_from_str_with(text: &str, join: NameJoin) -> Result<DataModel, LoadError> {
        Self::parse(text, "<string>".to_string(), join)
    }

    fn parse(text: &str, origin: String, join: NameJoin) -> Result<DataModel, LoadError> {
        let mut options = ParsingOptions::default();
        // Published data-model files may carry a DOCTYPE
        options.allow_dtd = true;
        let doc = Document::parse_with_options(text, options).map_err(|e| {
            MalformedSnafu {
                origin: origin.clone(),
                reason: e.to_string(),
            }
            .build()
        })?;

        let entries = flatten(&doc, join);
        debug!("Loaded {} parameter entries from {}", entries.len(), origin);
        Ok(DataModel {
            source: origin,
            entries,
        })
    }

    /// Where this model was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All entries, in document order
    pub fn entries(&self) -> &[ParameterEntry] {
        &self.entries
    }

    /// The number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the model has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries for each access kind, in [`AccessKind::ALL`] order
    pub fn count_by_access(&self) -> [(AccessKind, usize); 4] {
        AccessKind::ALL.map(|kind| {
            let count = self.entries.iter().filter(|e| e.access == kind).count();
            (kind, count)
        })
    }
}

/// Decode file content using its byte order mark, or else the encoding named in the XML
/// declaration. Content with neither is read as UTF-8.
fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (sniff_encoding(bytes)?, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| format!("content is not valid {}", encoding.name()))
}

fn sniff_encoding(bytes: &[u8]) -> Result<&'static Encoding, String> {
    // UTF-16 without a byte order mark, recognized by the leading "<?"
    if bytes.starts_with(&[0x3C, 0x00, 0x3F, 0x00]) {
        return Ok(UTF_16LE);
    }
    if bytes.starts_with(&[0x00, 0x3C, 0x00, 0x3F]) {
        return Ok(UTF_16BE);
    }
    let Some(label) = declared_encoding(bytes) else {
        return Ok(UTF_8);
    };
    match Encoding::for_label(label) {
        // A UTF-16 label read from single-byte text cannot be right
        Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Ok(UTF_8),
        Some(encoding) => Ok(encoding),
        None => Err(format!(
            "unsupported encoding '{}'",
            String::from_utf8_lossy(label)
        )),
    }
}

/// The `encoding` value of an ASCII-compatible `<?xml ...?>` declaration
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = &decl[..end];
    let start = decl.windows(8).position(|w| w == b"encoding")? + 8;
    let value = decl[start..]
        .trim_ascii_start()
        .strip_prefix(b"=")?
        .trim_ascii_start();
    let (&quote, value) = value.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = value.iter().position(|&b| b == quote)?;
    Some(&value[..len])
}

fn is_element(node: &Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Get a non-empty `name` attribute
fn name_of<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute(NAME_ATTR).filter(|name| !name.is_empty())
}

fn access_of(parameter: &Node, qualified_name: &str) -> AccessKind {
    let Some(value) = parameter.attribute(ACCESS_ATTR) else {
        return AccessKind::Any;
    };
    AccessKind::from_attribute(value).unwrap_or_else(|| {
        warn!("Unrecognized access '{value}' on {qualified_name}; treating as any");
        AccessKind::Any
    })
}

fn flatten(doc: &Document, join: NameJoin) -> Vec<ParameterEntry> {
    let mut entries = Vec::new();
    // The root element is the document container, never an object itself
    let objects = doc
        .root_element()
        .descendants()
        .skip(1)
        .filter(|n| is_element(n, OBJECT_TAG));
    for object in objects {
        let Some(object_name) = name_of(&object) else {
            debug!(
                "Skipping object without a name at {}",
                doc.text_pos_at(object.range().start)
            );
            continue;
        };

        let first = entries.len();
        for parameter in object.descendants().filter(|n| is_element(n, PARAMETER_TAG)) {
            let Some(parameter_name) = name_of(&parameter) else {
                debug!(
                    "Skipping parameter without a name in {object_name} at {}",
                    doc.text_pos_at(parameter.range().start)
                );
                continue;
            };
            let qualified_name = join.join(object_name, parameter_name);
            let access = access_of(&parameter, &qualified_name);
            entries.push(ParameterEntry::new(qualified_name, access));
        }

        // An object with no usable parameters is still listed by its own path
        if entries.len() == first {
            entries.push(ParameterEntry::new(object_name, AccessKind::Any));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(model: &DataModel) -> Vec<&str> {
        model.entries().iter().map(|e| e.qualified_name()).collect()
    }

    #[test]
    fn test_single_parameter() {
        let model = DataModel::load_from_str(
            r#"<model><object name="Device.">  <parameter name="Enable" access="readWrite"/></object></model>"#,
        )
        .unwrap();
        assert_eq!(
            model.entries(),
            &[ParameterEntry::new("Device.Enable", AccessKind::ReadWrite)]
        );
    }

    #[test]
    fn test_object_without_parameters() {
        let model =
            DataModel::load_from_str(r#"<model><object name="Device.WiFi."/></model>"#).unwrap();
        assert_eq!(
            model.entries(),
            &[ParameterEntry::new("Device.WiFi.", AccessKind::Any)]
        );
    }

    #[test]
    fn test_unnamed_nodes_are_skipped() {
        const XML: &str = r#"
            <model>
                <object>
                    <parameter name="Orphan" access="readOnly"/>
                </object>
                <object name="Device.DeviceInfo.">
                    <parameter access="readOnly"/>
                    <parameter name="Manufacturer" access="readOnly"/>
                    <parameter name=""/>
                    <parameter name="ProvisioningCode" access="readWrite"/>
                </object>
            </model>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        assert_eq!(
            names(&model),
            vec![
                "Device.DeviceInfo.Manufacturer",
                "Device.DeviceInfo.ProvisioningCode"
            ]
        );
    }

    #[test]
    fn test_object_with_only_unnamed_parameters() {
        let model = DataModel::load_from_str(
            r#"<model><object name="Device.Hosts."><parameter access="readOnly"/></object></model>"#,
        )
        .unwrap();
        assert_eq!(
            model.entries(),
            &[ParameterEntry::new("Device.Hosts.", AccessKind::Any)]
        );
    }

    #[test]
    fn test_access_attribute_mapping() {
        const XML: &str = r#"
            <model>
                <object name="Device.Test.">
                    <parameter name="A" access="readOnly"/>
                    <parameter name="B" access="readWrite"/>
                    <parameter name="C" access="writeOnceReadOnly"/>
                    <parameter name="D"/>
                    <parameter name="E" access="READONLY"/>
                </object>
            </model>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        let access: Vec<_> = model.entries().iter().map(|e| e.access()).collect();
        assert_eq!(
            access,
            vec![
                AccessKind::ReadOnly,
                AccessKind::ReadWrite,
                AccessKind::WriteOnceReadOnly,
                AccessKind::Any,
                AccessKind::Any,
            ]
        );
    }

    #[test]
    fn test_name_join() {
        assert_eq!(NameJoin::Auto.join("Device.", "Enable"), "Device.Enable");
        assert_eq!(NameJoin::Auto.join("Device", "Enable"), "Device.Enable");
        assert_eq!(NameJoin::Concat.join("Device", "Enable"), "DeviceEnable");
        assert_eq!(NameJoin::Concat.join("Device.", "Enable"), "Device.Enable");

        let model = DataModel::load_from_str_with(
            r#"<model><object name="Device"><parameter name="Enable"/></object></model>"#,
            NameJoin::Concat,
        )
        .unwrap();
        assert_eq!(names(&model), vec!["DeviceEnable"]);
    }

    #[test]
    fn test_nested_objects_and_duplicates() {
        // Parameters are collected from all descendants, so a nested object's parameters also
        // appear under its parent
        const XML: &str = r#"
            <model>
                <object name="Device.">
                    <parameter name="RootDataModelVersion" access="readOnly"/>
                    <object name="Device.Time.">
                        <parameter name="Enable" access="readWrite"/>
                    </object>
                </object>
                <object name="Device.Time."/>
            </model>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        assert_eq!(
            names(&model),
            vec![
                "Device.RootDataModelVersion",
                "Device.Enable",
                "Device.Time.Enable",
                "Device.Time.",
            ]
        );
    }

    #[test]
    fn test_namespaced_document_with_doctype() {
        const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
            <!DOCTYPE dm:document>
            <dm:document xmlns:dm="urn:broadband-forum-org:cwmp:datamodel-1-8">
                <model name="Device:2.16">
                    <object name="Device.Ethernet." access="readOnly">
                        <parameter name="InterfaceNumberOfEntries" access="readOnly"/>
                    </object>
                </model>
            </dm:document>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        assert_eq!(names(&model), vec!["Device.Ethernet.InterfaceNumberOfEntries"]);
    }

    #[test]
    fn test_malformed() {
        let result = DataModel::load_from_str("<model><object name=\"Device.\"></model>");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));

        let result = DataModel::load_from_str("");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_count_by_access() {
        const XML: &str = r#"
            <model>
                <object name="Device.A.">
                    <parameter name="X" access="readOnly"/>
                    <parameter name="Y" access="readOnly"/>
                    <parameter name="Z" access="readWrite"/>
                </object>
                <object name="Device.B."/>
            </model>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        assert_eq!(model.len(), 4);
        assert_eq!(
            model.count_by_access(),
            [
                (AccessKind::ReadOnly, 2),
                (AccessKind::ReadWrite, 1),
                (AccessKind::WriteOnceReadOnly, 0),
                (AccessKind::Any, 1),
            ]
        );
    }

    #[test]
    fn test_root_element_is_not_an_object() {
        const XML: &str = r#"
            <object name="Device.">
                <parameter name="Enable"/>
                <object name="Device.Time.">
                    <parameter name="NTPServer1" access="readWrite"/>
                </object>
            </object>
        "#;
        let model = DataModel::load_from_str(XML).unwrap();
        assert_eq!(
            model.entries(),
            &[ParameterEntry::new("Device.Time.NTPServer1", AccessKind::ReadWrite)]
        );

        let model = DataModel::load_from_str(r#"<object name="Device."/>"#).unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><model/>"),
            Some(&b"ISO-8859-1"[..])
        );
        assert_eq!(
            declared_encoding(b"<?xml version='1.0' encoding = 'windows-1252' ?><model/>"),
            Some(&b"windows-1252"[..])
        );
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><model/>"), None);
        assert_eq!(declared_encoding(b"<model/>"), None);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"<model/>").unwrap(), "<model/>");
        assert_eq!(decode(b"\xEF\xBB\xBF<model/>").unwrap(), "<model/>");
        assert_eq!(
            decode(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><m a=\"\xE9\"/>").unwrap(),
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><m a=\"\u{e9}\"/>"
        );
        // A UTF-16 label on single-byte text is read as UTF-8
        assert_eq!(
            decode(b"<?xml version=\"1.0\" encoding=\"UTF-16\"?><m/>").unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-16\"?><m/>"
        );

        let text = "<?xml version=\"1.0\"?><m/>";
        let utf16: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode(&utf16).unwrap(), text);

        assert!(decode(b"<m a=\"\xFF\"/>").is_err());
        assert!(decode(b"<?xml version=\"1.0\" encoding=\"klingon\"?><m/>").is_err());
    }
}
