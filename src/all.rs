// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! A list of all supported encodings. Useful for encodings fixed in the compile time.

use crate::charset::{Iso2022Config, Variant};
use crate::codec::iso2022::Iso2022Encoding;
use crate::index::INDEX_TABLES;

macro_rules! iso2022 {
    (var=$var:ident, name=$name:expr, version=$version:expr) => (
        iso2022!(var=$var, name=$name, whatwg=None, version=$version);
    );
    (var=$var:ident, name=$name:expr, whatwg=$whatwg:expr, version=$version:expr) => (
        pub static $var: &'static Iso2022Encoding = &Iso2022Encoding {
            name: $name,
            whatwg_name: $whatwg,
            config: Iso2022Config { variant: Variant::Jp, version: $version, use_fallback: false },
            tables: &INDEX_TABLES,
        };
    );
}

iso2022!(var=ISO_2022_JP, name="iso-2022-jp", whatwg=Some("iso-2022-jp"), version=0);
iso2022!(var=ISO_2022_JP_1, name="iso-2022-jp-1", version=1);
iso2022!(var=ISO_2022_JP_2, name="iso-2022-jp-2", version=2);
iso2022!(var=JIS7, name="jis7", version=3);
iso2022!(var=JIS8, name="jis8", version=4);

/// Returns references to all the encodings above.
pub fn encodings() -> [&'static Iso2022Encoding; 5] {
    [ISO_2022_JP, ISO_2022_JP_1, ISO_2022_JP_2, JIS7, JIS8]
}
