//! Flat Kubernetes `Secret` manifests.

use std::collections::BTreeMap;

use serde_yaml_ng::Value;

use super::RenderedManifest;
use super::encode::encode_fields;
use crate::error::RenderError;

const MAX_SUBDOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// An `Opaque` secret with base64-encoded data.
///
/// Construction validates the name, namespace, and data keys, and encodes
/// every value, so a `SecretManifest` always renders to a document the API
/// server accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretManifest {
    name: String,
    namespace: Option<String>,
    data: BTreeMap<String, String>,
}

impl SecretManifest {
    /// Build a secret from plaintext values.
    ///
    /// An empty `namespace` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidName`] when the name is not an RFC 1123
    /// subdomain, the namespace is not an RFC 1123 label, or a key contains
    /// characters Kubernetes rejects. Returns [`RenderError::EmptyData`] when
    /// `plaintext` is empty.
    pub fn from_plaintext<K, V>(
        name: &str,
        namespace: Option<&str>,
        plaintext: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, RenderError>
    where
        K: Into<String>,
        V: AsRef<[u8]>,
    {
        check_subdomain("secret name", name)?;
        let given_namespace = namespace.filter(|ns| !ns.is_empty());
        if let Some(ns) = given_namespace {
            check_label("namespace", ns)?;
        }

        let mut fields = BTreeMap::new();
        for (key, value) in plaintext {
            let data_key: String = key.into();
            check_data_key(&data_key)?;
            fields.insert(data_key, value);
        }
        if fields.is_empty() {
            return Err(RenderError::EmptyData {
                name: name.to_owned(),
            });
        }

        Ok(Self {
            name: name.to_owned(),
            namespace: given_namespace.map(str::to_owned),
            data: encode_fields(&fields),
        })
    }

    /// `metadata.name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `metadata.namespace`, if set.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Encoded `data` entries in key order.
    #[must_use]
    pub const fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// `<name>.yaml`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.name)
    }

    /// Render the manifest as YAML.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            String::from("apiVersion: v1"),
            String::from("kind: Secret"),
            String::from("metadata:"),
            format!("  name: {}", yaml_scalar(&self.name)),
        ];
        if let Some(ns) = &self.namespace {
            lines.push(format!("  namespace: {}", yaml_scalar(ns)));
        }
        lines.push(String::from("type: Opaque"));
        lines.push(String::from("data:"));
        lines.extend(
            self.data
                .iter()
                .map(|(key, value)| format!("  {}: {}", yaml_scalar(key), yaml_scalar(value))),
        );

        let mut document = lines.join("\n");
        document.push('\n');
        document
    }

    /// Pair the rendered document with its file name.
    #[must_use]
    pub fn to_rendered(&self) -> RenderedManifest {
        RenderedManifest {
            file_name: self.file_name(),
            contents: self.render(),
        }
    }
}

/// Booleans and nulls of YAML 1.1, which kubectl's parser still honours.
const YAML11_RESERVED: &[&str] = &["y", "n", "yes", "no", "on", "off", "true", "false", "null"];

/// Emit `value` plain unless YAML would read it as something other than that
/// string, in which case double-quote it.
///
/// Both YAML 1.2 and the YAML 1.1 spellings of booleans, nulls, and
/// underscore-separated numbers are quoted. Only called with names, keys, and
/// base64 text, none of which contain characters that need escaping inside
/// double quotes.
fn yaml_scalar(value: &str) -> String {
    if is_plain_string(value) && !is_yaml11_scalar(value) {
        value.to_owned()
    } else {
        format!("\"{value}\"")
    }
}

fn is_plain_string(value: &str) -> bool {
    matches!(
        serde_yaml_ng::from_str::<Value>(value),
        Ok(Value::String(parsed)) if parsed == value
    )
}

fn is_yaml11_scalar(value: &str) -> bool {
    if YAML11_RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(value))
    {
        return true;
    }
    value.contains('_')
        && matches!(
            serde_yaml_ng::from_str::<Value>(&value.replace('_', "")),
            Ok(Value::Number(_))
        )
}

fn invalid(kind: &'static str, value: &str, reason: impl Into<String>) -> RenderError {
    RenderError::InvalidName {
        kind,
        value: value.to_owned(),
        reason: reason.into(),
    }
}

const fn is_label_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn label_reason(label: &str) -> Option<&'static str> {
    if label.is_empty() {
        return Some("must not be empty");
    }
    if !label.chars().all(is_label_char) {
        return Some("may only contain lowercase letters, digits and '-'");
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Some("must start and end with a letter or digit");
    }
    None
}

fn check_label(kind: &'static str, value: &str) -> Result<(), RenderError> {
    if value.len() > MAX_LABEL_LEN {
        return Err(invalid(
            kind,
            value,
            format!("must be at most {MAX_LABEL_LEN} characters"),
        ));
    }
    label_reason(value).map_or(Ok(()), |reason| Err(invalid(kind, value, reason)))
}

fn check_subdomain(kind: &'static str, value: &str) -> Result<(), RenderError> {
    if value.len() > MAX_SUBDOMAIN_LEN {
        return Err(invalid(
            kind,
            value,
            format!("must be at most {MAX_SUBDOMAIN_LEN} characters"),
        ));
    }
    value
        .split('.')
        .find_map(label_reason)
        .map_or(Ok(()), |reason| Err(invalid(kind, value, reason)))
}

fn check_data_key(key: &str) -> Result<(), RenderError> {
    const KIND: &str = "data key";
    if key.is_empty() || key == "." || key == ".." {
        return Err(invalid(KIND, key, "must be a non-empty file name"));
    }
    if key.len() > MAX_SUBDOMAIN_LEN {
        return Err(invalid(
            KIND,
            key,
            format!("must be at most {MAX_SUBDOMAIN_LEN} characters"),
        ));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid(
            KIND,
            key,
            "may only contain letters, digits, '-', '_' and '.'",
        ));
    }
    Ok(())
}
