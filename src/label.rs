// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! An interface for retrieving an encoding or a configuration from a string label.

use thiserror::Error;

use crate::all;
use crate::charset::{ConfigError, Iso2022Config, Variant};
use crate::types::EncodingRef;

/// Returns an encoding from given label, if any.
/// Labels are case-insensitive and surrounding whitespace is ignored.
pub fn encoding_from_label(label: &str) -> Option<EncodingRef> {
    match &label.trim_matches(&[' ', '\n', '\r', '\t', '\x0C'][..]).to_ascii_lowercase()[..] {
        "csiso2022jp" |
        "iso-2022-jp" =>
            Some(all::ISO_2022_JP as EncodingRef),
        "iso-2022-jp-1" =>
            Some(all::ISO_2022_JP_1 as EncodingRef),
        "csiso2022jp2" |
        "iso-2022-jp-2" =>
            Some(all::ISO_2022_JP_2 as EncodingRef),
        "jis7" =>
            Some(all::JIS7 as EncodingRef),
        "jis8" =>
            Some(all::JIS8 as EncodingRef),
        _ => {
            log::debug!("unknown encoding label {:?}", label);
            None
        }
    }
}

/// Errors from parsing a converter name.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum LabelError {
    #[error("{0:?} is not an ISO_2022 converter name")]
    NotIso2022(String),
    #[error("missing locale option")]
    MissingLocale,
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
    #[error("invalid version {0:?}")]
    InvalidVersion(String),
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parses a converter name like `ISO_2022,locale=ja,version=2`.
///
/// The locale picks the variant by its language (`ja`, `ko`, and `zh` or `cn`),
/// so `ja_JP` works as well. The version defaults to 0.
pub fn config_from_name(name: &str) -> Result<Iso2022Config, LabelError> {
    let mut parts = name.trim().split(',');
    let family = parts.next().unwrap_or("").trim();
    if !family.eq_ignore_ascii_case("iso_2022") && !family.eq_ignore_ascii_case("iso-2022") {
        return Err(LabelError::NotIso2022(name.to_string()));
    }

    let mut variant = None;
    let mut version = 0;
    for option in parts {
        let (key, value) = match option.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => return Err(LabelError::UnknownOption(option.to_string())),
        };
        if key.eq_ignore_ascii_case("locale") {
            let language = value.get(..2).map(|l| l.to_ascii_lowercase());
            variant = match language.as_deref() {
                Some("ja") => Some(Variant::Jp),
                Some("ko") => Some(Variant::Kr),
                Some("zh") | Some("cn") => Some(Variant::Cn),
                _ => return Err(LabelError::UnknownLocale(value.to_string())),
            };
        } else if key.eq_ignore_ascii_case("version") {
            version = value.parse().map_err(|_| LabelError::InvalidVersion(value.to_string()))?;
        } else {
            return Err(LabelError::UnknownOption(option.to_string()));
        }
    }

    let variant = variant.ok_or(LabelError::MissingLocale)?;
    Ok(Iso2022Config::new(variant, version)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_from_label() {
        assert_eq!(encoding_from_label("iso-2022-jp").map(|e| e.name()), Some("iso-2022-jp"));
        assert_eq!(encoding_from_label(" CSISO2022JP\n").map(|e| e.name()), Some("iso-2022-jp"));
        assert_eq!(encoding_from_label("ISO-2022-JP-2").map(|e| e.name()), Some("iso-2022-jp-2"));
        assert_eq!(encoding_from_label("csiso2022jp2").map(|e| e.name()), Some("iso-2022-jp-2"));
        assert_eq!(encoding_from_label("iso-2022-jp-1").map(|e| e.name()), Some("iso-2022-jp-1"));
        assert_eq!(encoding_from_label("Jis7").map(|e| e.name()), Some("jis7"));
        assert_eq!(encoding_from_label("jis8").map(|e| e.name()), Some("jis8"));
        assert!(encoding_from_label("iso-2022-kr").is_none());
        assert!(encoding_from_label("iso-2022-jp-3").is_none());
    }

    #[test]
    fn test_config_from_name() {
        assert_eq!(config_from_name("ISO_2022,locale=ja,version=2"),
                   Ok(Iso2022Config::new(Variant::Jp, 2).unwrap()));
        assert_eq!(config_from_name("iso-2022, locale=ja_JP"),
                   Ok(Iso2022Config::new(Variant::Jp, 0).unwrap()));
        assert_eq!(config_from_name("ISO_2022,locale=ko,version=1"),
                   Ok(Iso2022Config::new(Variant::Kr, 1).unwrap()));
        assert_eq!(config_from_name("ISO_2022,locale=zh"),
                   Ok(Iso2022Config::new(Variant::Cn, 0).unwrap()));
        assert_eq!(config_from_name("ISO_2022,locale=cn,version=1").map(|c| c.variant),
                   Ok(Variant::Cn));
    }

    #[test]
    fn test_config_from_name_errors() {
        assert_eq!(config_from_name("UTF-8"), Err(LabelError::NotIso2022("UTF-8".to_string())));
        assert_eq!(config_from_name("ISO_2022"), Err(LabelError::MissingLocale));
        assert_eq!(config_from_name("ISO_2022,locale=fr"),
                   Err(LabelError::UnknownLocale("fr".to_string())));
        assert_eq!(config_from_name("ISO_2022,locale=ja,version=x"),
                   Err(LabelError::InvalidVersion("x".to_string())));
        assert_eq!(config_from_name("ISO_2022,locale=ja,swaplfnl"),
                   Err(LabelError::UnknownOption("swaplfnl".to_string())));
        assert_eq!(config_from_name("ISO_2022,locale=ko,version=2"),
                   Err(LabelError::Config(ConfigError { variant: Variant::Kr, version: 2 })));
        assert!(config_from_name("ISO_2022,locale=ja,version=5").is_err());
    }
}
