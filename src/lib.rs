// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

/*!

# encoding-iso2022

Streaming ISO-2022 character encodings for Rust:
ISO-2022-JP with its extensions ISO-2022-JP-1 and ISO-2022-JP-2,
the 7-bit and 8-bit JIS profiles, and basic ISO-2022-KR and ISO-2022-CN.
Character set tables come from the [WHATWG Encoding Standard](http://encoding.spec.whatwg.org/)
indices, and the error detection and recovery interface follows rust-encoding.

## Simple Usage

To encode a string:

```rust
use encoding_iso2022::{Encoding, EncoderTrap};
use encoding_iso2022::all::ISO_2022_JP;

assert_eq!(ISO_2022_JP.encode("A\u{3042}", EncoderTrap::Strict),
           Ok(b"A\x1b$B\x24\x22\x1b(B".to_vec()));
```

To encode a string with unrepresentable characters:

```rust
use encoding_iso2022::{Encoding, EncoderTrap};
use encoding_iso2022::all::ISO_2022_JP;

assert!(ISO_2022_JP.encode("caf\u{e9}", EncoderTrap::Strict).is_err());
assert_eq!(ISO_2022_JP.encode("caf\u{e9}", EncoderTrap::Replace), Ok(b"caf\x1a".to_vec()));
assert_eq!(ISO_2022_JP.encode("caf\u{e9}", EncoderTrap::Ignore), Ok(b"caf".to_vec()));
assert_eq!(ISO_2022_JP.encode("caf\u{e9}", EncoderTrap::NcrEscape), Ok(b"caf&#233;".to_vec()));
```

To decode a byte sequence, possibly with invalid sequences:

```rust
use encoding_iso2022::{Encoding, DecoderTrap};
use encoding_iso2022::all::ISO_2022_JP_2;

assert_eq!(ISO_2022_JP_2.decode(b"caf\x1b.A\x1bNi", DecoderTrap::Strict),
           Ok("caf\u{e9}".to_string()));
assert!(ISO_2022_JP_2.decode(b"caf\x1bNi", DecoderTrap::Strict).is_err());
assert_eq!(ISO_2022_JP_2.decode(b"caf\x1bNi", DecoderTrap::Replace),
           Ok("caf\u{fffd}i".to_string()));
```

Streaming goes through `RawEncoder` and `RawDecoder`, which convert between
caller-supplied buffers and stop at `Underflow` (more input needed) or
`Overflow` (more output room needed) without losing any state:

```rust
use encoding_iso2022::{Encoding, CoderResult};
use encoding_iso2022::types::{ByteCursor, Utf16Buffer};
use encoding_iso2022::all::ISO_2022_JP;

let mut decoder = ISO_2022_JP.raw_decoder();
let mut buf = [0u16; 8];
let mut output = Utf16Buffer::new(&mut buf);

let mut input = ByteCursor::new(b"\x1b$B\x24\x22\x24");
assert_eq!(decoder.raw_feed(&mut input, &mut output, false), CoderResult::Underflow);
assert_eq!(input.position(), 5); // the lone lead byte is left unread

// so the next call starts from it
let mut input = ByteCursor::new(b"\x24\x24\x1b(B");
assert_eq!(decoder.raw_feed(&mut input, &mut output, true), CoderResult::Underflow);
assert_eq!(output.written(), &[0x3042, 0x3044]);
```

Other configurations are available by name:

```rust
use encoding_iso2022::{Encoding, EncoderTrap};
use encoding_iso2022::codec::iso2022::Iso2022Encoding;
use encoding_iso2022::label::config_from_name;

let config = config_from_name("ISO_2022,locale=ko,version=0").unwrap();
let encoding = Iso2022Encoding::new("iso-2022-kr", config);
assert_eq!(encoding.encode("\u{ac00}", EncoderTrap::Strict),
           Ok(b"\x1b$)C\x0e\x30\x21\x0f".to_vec()));
```

*/

pub use self::types::{CodecError, CoderResult, DecoderTrap, EncoderTrap,
                      Encoding, EncodingRef, RawDecoder, RawEncoder}; // reexport
pub use self::charset::{ConfigError, Iso2022Config, SubCharset, Variant};
pub use self::label::{config_from_name, encoding_from_label, LabelError};

mod util;
#[cfg(test)] #[macro_use] mod testutils;

pub mod types;
pub mod charset;

/// Conversion tables of the individual character sets. Semi-internal.
pub mod index;

/// Codec implementations.
pub mod codec {
    pub mod escape;
    pub mod state;
    pub mod variant;
    pub mod decoder;
    pub mod encoder;
    pub mod iso2022;
}

pub mod all;
pub mod label;
