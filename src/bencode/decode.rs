use super::error::BencodeError;
use super::value::{Dict, Value};
use crate::constants::BENCODE_MAX_DEPTH;
use bytes::Bytes;
use tracing::debug;

/// Decodes a single bencode value occupying the whole of `data`.
///
/// # Errors
///
/// Fails on truncated input, malformed integers or length prefixes,
/// unterminated containers, non-string or duplicate dictionary keys, and any
/// bytes left over after the value.
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut pos = 0;
    let value = decode_value(data, &mut pos, 0)?;

    if pos != data.len() {
        return Err(BencodeError::TrailingData { offset: pos });
    }

    Ok(value)
}

/// Decodes a document whose top-level value must be a dictionary.
///
/// This is the entry point for `.torrent` files. Bytes after the closing
/// `e` of the dictionary, such as a trailing newline, are ignored.
///
/// # Examples
///
/// ```
/// use webseed2torznab::bencode::{decode_dict, BencodeError};
///
/// let dict = decode_dict(b"d4:spami1ee").unwrap();
/// assert_eq!(dict.get(b"spam").and_then(|v| v.as_integer()), Some(1));
///
/// assert_eq!(decode_dict(b"d4:spami1ee\n").unwrap().len(), 1);
/// assert_eq!(decode_dict(b"i1e"), Err(BencodeError::NotADictionary));
/// ```
pub fn decode_dict(data: &[u8]) -> Result<Dict, BencodeError> {
    let mut pos = 0;
    let dict = decode_value(data, &mut pos, 0)?
        .into_dict()
        .ok_or(BencodeError::NotADictionary)?;

    if pos != data.len() {
        debug!("Ignoring {} bytes after top-level dictionary", data.len() - pos);
    }

    Ok(dict)
}

fn decode_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    if depth > BENCODE_MAX_DEPTH {
        return Err(BencodeError::NestingTooDeep { offset: *pos });
    }

    let Some(&c) = data.get(*pos) else {
        return Err(BencodeError::UnexpectedEof { offset: *pos });
    };

    match c {
        b'i' => decode_integer(data, pos),
        b'l' => decode_list(data, pos, depth),
        b'd' => decode_dict_value(data, pos, depth),
        b'0'..=b'9' => decode_bytes(data, pos),
        c => Err(BencodeError::UnexpectedChar {
            offset: *pos,
            found: c as char,
        }),
    }
}

fn decode_integer(data: &[u8], pos: &mut usize) -> Result<Value, BencodeError> {
    *pos += 1;

    let start = *pos;
    while *pos < data.len() && data[*pos] != b'e' {
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof { offset: *pos });
    }

    let raw = &data[start..*pos];
    let digits = raw.strip_prefix(b"-").unwrap_or(raw);

    let invalid = |reason| BencodeError::InvalidInteger {
        offset: start,
        reason,
    };

    if digits.is_empty() {
        return Err(invalid("empty"));
    }
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid("not a decimal number"));
    }
    if digits[0] == b'0' && (digits.len() > 1 || raw.len() != digits.len()) {
        return Err(invalid("leading zeros"));
    }

    // Validated as ASCII above.
    let text = std::str::from_utf8(raw).map_err(|_| invalid("not a decimal number"))?;
    let value: i64 = text.parse().map_err(|_| invalid("out of range"))?;

    *pos += 1;
    Ok(Value::Integer(value))
}

fn decode_bytes(data: &[u8], pos: &mut usize) -> Result<Value, BencodeError> {
    let start = *pos;
    while *pos < data.len() && data[*pos] != b':' {
        if !data[*pos].is_ascii_digit() {
            return Err(BencodeError::InvalidStringLength { offset: start });
        }
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof { offset: *pos });
    }

    let len_digits = &data[start..*pos];
    if len_digits.len() > 1 && len_digits[0] == b'0' {
        return Err(BencodeError::InvalidStringLength { offset: start });
    }

    let len = std::str::from_utf8(len_digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or(BencodeError::InvalidStringLength { offset: start })?;

    *pos += 1;

    let end = pos
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(BencodeError::UnexpectedEof { offset: data.len() })?;

    let bytes = Bytes::copy_from_slice(&data[*pos..end]);
    *pos = end;

    Ok(Value::Bytes(bytes))
}

fn decode_list(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    *pos += 1;
    let mut list = Vec::new();

    while *pos < data.len() && data[*pos] != b'e' {
        list.push(decode_value(data, pos, depth + 1)?);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof { offset: *pos });
    }

    *pos += 1;
    Ok(Value::List(list))
}

fn decode_dict_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, BencodeError> {
    *pos += 1;
    let mut dict = Dict::new();

    while *pos < data.len() && data[*pos] != b'e' {
        let key_offset = *pos;
        if !data[key_offset].is_ascii_digit() {
            return Err(BencodeError::NonStringKey { offset: key_offset });
        }

        let key = match decode_bytes(data, pos)? {
            Value::Bytes(b) => b,
            _ => return Err(BencodeError::NonStringKey { offset: key_offset }),
        };

        if dict.contains_key(&key) {
            return Err(BencodeError::DuplicateKey { offset: key_offset });
        }

        let value = decode_value(data, pos, depth + 1)?;
        dict.insert(key, value);
    }

    if *pos >= data.len() {
        return Err(BencodeError::UnexpectedEof { offset: *pos });
    }

    *pos += 1;
    Ok(Value::Dict(dict))
}
