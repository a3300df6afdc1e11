//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format of `.torrent` files. The info-hash of
//! a torrent is the SHA-1 of the canonical bencoding of its `info`
//! dictionary, so the encoder here must be the exact inverse of the decoder.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Canonical form
//!
//! Decoding accepts dictionaries whose keys are out of order, because some
//! torrent producers do not sort them. A decoded [`Dict`] keeps the order it
//! saw. Encoding always sorts keys by raw bytes, which makes the output unique
//! for a given value:
//!
//! ```
//! use webseed2torznab::bencode::{decode, encode};
//!
//! let unsorted = decode(b"d1:bi2e1:ai1ee").unwrap();
//! let sorted = decode(b"d1:ai1e1:bi2ee").unwrap();
//! assert_eq!(unsorted, sorted);
//! assert_eq!(encode(&unsorted), b"d1:ai1e1:bi2ee");
//! ```
//!
//! # Error Handling
//!
//! Every [`BencodeError`] carries the byte offset where decoding failed:
//!
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::InvalidInteger`] - Malformed integer (e.g., leading zeros, `-0`)
//! - [`BencodeError::InvalidStringLength`] - Malformed length prefix
//! - [`BencodeError::UnexpectedChar`] - Unexpected character in input
//! - [`BencodeError::NonStringKey`] / [`BencodeError::DuplicateKey`] - Bad dictionary key
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded
//! - [`BencodeError::TrailingData`] - Extra data after the value ([`decode`] only)
//! - [`BencodeError::NotADictionary`] - [`decode_dict`] got a non-dictionary
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_dict};
pub use encode::encode;
pub use error::BencodeError;
pub use value::{Dict, Value};
