//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// The line that opens and closes a front-matter block
pub const DELIMITER: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<serde_yaml::Value>()? {
                match scalar_to_string(item) {
                    Some(s) => vec.push(s),
                    None => return Err(de::Error::custom("tags must be scalars")),
                }
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Accept any YAML scalar as a string (`date: 2024` is still a date)
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        value => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar value")),
    }
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Front-matter data of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout: Option<String>,
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(deserialize_with = "string_or_vec", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,

    /// Additional custom fields, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split `content` into the raw YAML block and the body that follows it.
    ///
    /// The first line must be exactly `---` (a UTF-8 BOM and trailing
    /// whitespace are tolerated) and the block ends at the next line that is
    /// exactly `---`.
    pub fn split(content: &str) -> Result<(&str, &str), &'static str> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        let first = lines.next().ok_or("document is empty")?;
        if first.trim_end() != DELIMITER {
            return Err("document must begin with a `---` line");
        }

        let yaml_start = first.len();
        let mut offset = yaml_start;
        for line in lines {
            if line.trim_end() == DELIMITER {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                return Ok((yaml, body));
            }
            offset += line.len();
        }

        Err("missing closing `---` line")
    }

    /// Parse the YAML block of a front matter
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Serialize back into YAML (without delimiters)
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        if self == &FrontMatter::default() {
            return Ok(String::new());
        }
        serde_yaml::to_string(self)
    }

    /// Parse the date string into a date-time
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in various formats.
///
/// Offsets are dropped: the wall-clock time written in the file is kept so
/// that output paths never depend on the machine's time zone.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // `2014-03-02 10:00:00 -0800`
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.naive_local());
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - logging
---

This is the content.
"#;

        let (yaml, body) = FrontMatter::split(content).unwrap();
        let fm = FrontMatter::from_yaml(yaml).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.tags, vec!["rust", "logging"]);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let fm = FrontMatter::from_yaml("title: Single Tag\ndate: 2024-01-15\ntags: ruby\n").unwrap();
        assert_eq!(fm.tags, vec!["ruby"]);
    }

    #[test]
    fn test_numeric_scalars_become_strings() {
        let fm = FrontMatter::from_yaml("title: 1984\ntags: [go, 2]\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.tags, vec!["go", "2"]);
    }

    #[test]
    fn test_extra_fields_preserved_in_order() {
        let fm = FrontMatter::from_yaml("title: T\nzeta: 1\nalpha: two\n").unwrap();
        let keys: Vec<_> = fm.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_split_missing_closing_delimiter() {
        let content = "---\ntitle: Oops\ndate: 2024-01-01\n\nBody without end.\n";
        assert_eq!(
            FrontMatter::split(content).unwrap_err(),
            "missing closing `---` line"
        );
    }

    #[test]
    fn test_split_missing_opening_delimiter() {
        assert!(FrontMatter::split("title: nope\n---\n").is_err());
        assert!(FrontMatter::split("").is_err());
    }

    #[test]
    fn test_split_ignores_dashes_inside_lines() {
        let content = "---\ntitle: a --- b\n---\nbody --- here\n---\n";
        let (yaml, body) = FrontMatter::split(content).unwrap();
        assert_eq!(yaml, "title: a --- b\n");
        assert_eq!(body, "body --- here\n---\n");
    }

    #[test]
    fn test_split_crlf() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (yaml, body) = FrontMatter::split(content).unwrap();
        assert_eq!(yaml, "title: Windows\r\n");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_empty_block_is_default() {
        let (yaml, _) = FrontMatter::split("---\n---\nbody").unwrap();
        assert_eq!(FrontMatter::from_yaml(yaml).unwrap(), FrontMatter::default());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_date_string("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024/01/15 10:30"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15 10:30:00 -0800"), Some(expected));
        assert_eq!(parse_date_string("2024-01-15T10:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_date_string("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_date_string("last tuesday"), None);
    }
}
