use super::*;
use crate::bencode::{encode, Dict, Value};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

fn pieces() -> Value {
    Value::Bytes(Bytes::from((0u8..20).collect::<Vec<u8>>()))
}

fn single_file_info() -> Dict {
    let mut info = Dict::new();
    info.insert("name", Value::string("a.txt"));
    info.insert("length", Value::Integer(5));
    info.insert("piece length", Value::Integer(5));
    info.insert("pieces", pieces());
    info
}

fn torrent_with(info: Dict, extra: Vec<(&'static str, Value)>) -> Vec<u8> {
    let mut top = Dict::new();
    top.insert("announce", Value::string("x"));
    top.insert("info", Value::Dict(info));
    for (k, v) in extra {
        top.insert(k, v);
    }
    encode(&Value::Dict(top))
}

fn multi_file_info() -> Dict {
    let file = |len: i64, name: &str| {
        let mut d = Dict::new();
        d.insert("length", Value::Integer(len));
        d.insert("path", Value::List(vec![Value::string(name)]));
        Value::Dict(d)
    };

    let mut info = Dict::new();
    info.insert("name", Value::string("dir"));
    info.insert("piece length", Value::Integer(16));
    info.insert("pieces", Value::Bytes(Bytes::from_static(&[b'x'; 20])));
    info.insert("files", Value::List(vec![file(3, "a"), file(7, "b")]));
    info
}

#[test]
fn test_info_hash_single_file() {
    let data = torrent_with(single_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();

    assert_eq!(
        record.info_hash.to_hex(),
        "d62b660b44d5548ca116b89efafd25622c26d802"
    );
}

#[test]
fn test_info_hash_matches_independent_digest() {
    let mut canonical_info = b"d6:lengthi5e4:name5:a.txt12:piece lengthi5e6:pieces20:".to_vec();
    canonical_info.extend(0u8..20);
    canonical_info.push(b'e');

    let mut hasher = Sha1::new();
    hasher.update(&canonical_info);
    let expected: [u8; 20] = hasher.finalize().into();

    let data = torrent_with(single_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(record.info_hash.as_bytes(), &expected);
    assert_eq!(record.info_hash.to_hex().len(), 40);
}

#[test]
fn test_info_hash_ignores_key_order_in_file() {
    // Same info dictionary written with unsorted keys.
    let mut raw = b"d8:announce1:x4:infod4:name5:a.txt6:pieces20:".to_vec();
    raw.extend(0u8..20);
    raw.extend_from_slice(b"6:lengthi5e12:piece lengthi5eee");

    let record = TorrentRecord::from_bytes(&raw, "a.torrent").unwrap();
    assert_eq!(
        record.info_hash.to_hex(),
        "d62b660b44d5548ca116b89efafd25622c26d802"
    );
}

#[test]
fn test_info_hash_independent_of_other_fields() {
    let plain = torrent_with(single_file_info(), vec![]);
    let decorated = torrent_with(
        single_file_info(),
        vec![
            ("comment", Value::string("hello")),
            ("url-list", Value::string("http://x")),
            ("creation date", Value::Integer(1_700_000_000)),
        ],
    );

    let a = TorrentRecord::from_bytes(&plain, "a.torrent").unwrap();
    let b = TorrentRecord::from_bytes(&decorated, "b.torrent").unwrap();
    assert_eq!(a.info_hash, b.info_hash);
}

#[test]
fn test_single_file_record() {
    let data = torrent_with(single_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "dir/a.torrent").unwrap();

    assert_eq!(record.name, "a.txt");
    assert_eq!(record.total_size, 5);
    assert_eq!(
        record.files,
        vec![File {
            path: vec!["a.txt".to_string()],
            length: 5
        }]
    );
    assert_eq!(record.source_path, PathBuf::from("dir/a.torrent"));
    assert_eq!(record.file_name(), Some("a.torrent"));
}

#[test]
fn test_zero_length_single_file() {
    let mut info = single_file_info();
    info.insert("length", Value::Integer(0));
    let record = TorrentRecord::from_bytes(&torrent_with(info, vec![]), "a.torrent").unwrap();
    assert_eq!(record.total_size, 0);
    assert_eq!(record.files.len(), 1);
}

#[test]
fn test_multi_file_aggregation() {
    let data = torrent_with(multi_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "dir.torrent").unwrap();

    assert_eq!(record.total_size, 10);
    assert_eq!(
        record.files,
        vec![
            File {
                path: vec!["a".to_string()],
                length: 3
            },
            File {
                path: vec!["b".to_string()],
                length: 7
            },
        ]
    );
    assert_eq!(
        record.info_hash.to_hex(),
        "2549e368a4b9ba02c0e3a5e5621e2797a9d6c3b4"
    );
}

#[test]
fn test_multi_file_prefers_utf8_path() {
    let mut file = Dict::new();
    file.insert("length", Value::Integer(1));
    file.insert(
        "path",
        Value::List(vec![Value::Bytes(Bytes::from_static(&[0xe9]))]),
    );
    file.insert("path.utf-8", Value::List(vec![Value::string("é")]));

    let mut info = multi_file_info();
    info.insert("files", Value::List(vec![Value::Dict(file)]));

    let record = TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent").unwrap();
    assert_eq!(record.files[0].path, vec!["é".to_string()]);
}

#[test]
fn test_name_utf8_variant() {
    let mut info = single_file_info();
    info.insert("name.utf-8", Value::string("Ünïcode"));
    let record = TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent").unwrap();
    assert_eq!(record.name, "Ünïcode");
}

#[test]
fn test_missing_info() {
    let mut top = Dict::new();
    top.insert("announce", Value::string("x"));
    let data = encode(&Value::Dict(top));

    assert!(matches!(
        TorrentRecord::from_bytes(&data, "x.torrent"),
        Err(MetainfoError::MissingField("info"))
    ));
}

#[test]
fn test_info_not_a_dict() {
    let data = b"d4:infoli1eee";
    assert!(matches!(
        TorrentRecord::from_bytes(data, "x.torrent"),
        Err(MetainfoError::InvalidField("info"))
    ));
}

#[test]
fn test_top_level_not_a_dict() {
    let err = TorrentRecord::from_bytes(b"l4:infoe", "x.torrent").unwrap_err();
    assert!(matches!(
        err,
        MetainfoError::Bencode(crate::bencode::BencodeError::NotADictionary)
    ));
    assert!(err.is_malformed());
}

#[test]
fn test_truncated_file() {
    let data = torrent_with(single_file_info(), vec![]);
    let err = TorrentRecord::from_bytes(&data[..data.len() / 2], "x.torrent").unwrap_err();
    assert!(matches!(err, MetainfoError::Bencode(_)));
}

#[test]
fn test_missing_length_and_files() {
    let mut info = Dict::new();
    info.insert("name", Value::string("a"));
    assert!(matches!(
        TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent"),
        Err(MetainfoError::MissingField("length or files"))
    ));
}

#[test]
fn test_missing_name_builds_empty_name() {
    let mut info = Dict::new();
    info.insert("length", Value::Integer(5));
    info.insert("piece length", Value::Integer(5));
    info.insert("pieces", pieces());

    let record = TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent").unwrap();
    assert_eq!(record.name, "");
    assert_eq!(record.total_size, 5);
    assert_eq!(
        record.files,
        vec![File {
            path: vec![String::new()],
            length: 5
        }]
    );

    let mut canonical_info = b"d6:lengthi5e12:piece lengthi5e6:pieces20:".to_vec();
    canonical_info.extend(0u8..20);
    canonical_info.push(b'e');
    let expected: [u8; 20] = Sha1::digest(&canonical_info).into();
    assert_eq!(record.info_hash.as_bytes(), &expected);
}

#[test]
fn test_trailing_newline_after_torrent() {
    let mut data = torrent_with(single_file_info(), vec![]);
    data.push(b'\n');

    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(record.name, "a.txt");
    assert_eq!(
        record.info_hash.to_hex(),
        "d62b660b44d5548ca116b89efafd25622c26d802"
    );
}

#[test]
fn test_negative_lengths_rejected() {
    let mut info = single_file_info();
    info.insert("length", Value::Integer(-1));
    assert!(matches!(
        TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent"),
        Err(MetainfoError::InvalidField("length"))
    ));

    let mut file = Dict::new();
    file.insert("length", Value::Integer(-3));
    file.insert("path", Value::List(vec![Value::string("a")]));
    let mut info = multi_file_info();
    info.insert("files", Value::List(vec![Value::Dict(file)]));
    assert!(matches!(
        TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent"),
        Err(MetainfoError::InvalidField("file length"))
    ));
}

#[test]
fn test_bad_file_entries_rejected() {
    let mut info = multi_file_info();
    info.insert("files", Value::List(vec![Value::Integer(1)]));
    assert!(matches!(
        TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent"),
        Err(MetainfoError::InvalidField("files"))
    ));

    let mut file = Dict::new();
    file.insert("length", Value::Integer(3));
    file.insert("path", Value::List(vec![Value::Integer(9)]));
    let mut info = multi_file_info();
    info.insert("files", Value::List(vec![Value::Dict(file)]));
    assert!(matches!(
        TorrentRecord::from_bytes(&torrent_with(info, vec![]), "x.torrent"),
        Err(MetainfoError::InvalidField("file path"))
    ));
}

#[test]
fn test_web_seeds_absent() {
    let data = torrent_with(single_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert!(record.web_seeds.is_empty());
    assert_eq!(record.magnet_uri(), None);
}

#[test]
fn test_web_seeds_single_string() {
    let data = torrent_with(
        single_file_info(),
        vec![("url-list", Value::string("http://x"))],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(record.web_seeds, vec!["http://x".to_string()]);
}

#[test]
fn test_web_seeds_list() {
    let data = torrent_with(
        single_file_info(),
        vec![(
            "url-list",
            Value::List(vec![
                Value::string("http://x"),
                Value::Integer(4),
                Value::string("http://y"),
            ]),
        )],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(
        record.web_seeds,
        vec!["http://x".to_string(), "http://y".to_string()]
    );
}

#[test]
fn test_web_seeds_other_shapes_are_empty() {
    for shape in [Value::Integer(1), Value::Dict(Dict::new())] {
        let data = torrent_with(single_file_info(), vec![("url-list", shape)]);
        let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
        assert!(record.web_seeds.is_empty());
    }
}

#[test]
fn test_optional_text_fields() {
    let data = torrent_with(
        single_file_info(),
        vec![
            ("comment", Value::string("a comment")),
            ("created by", Value::string("mktorrent 1.1")),
            ("creation date", Value::Integer(1_700_000_000)),
        ],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(record.comment, "a comment");
    assert_eq!(record.created_by, "mktorrent 1.1");
    assert_eq!(record.creation_date, Some(1_700_000_000));
    assert_eq!(
        record.created_at().map(|d| d.timestamp()),
        Some(1_700_000_000)
    );
}

#[test]
fn test_irregular_optional_fields_degrade() {
    let data = torrent_with(
        single_file_info(),
        vec![
            ("comment", Value::Integer(3)),
            ("created by", Value::Bytes(Bytes::from_static(&[0xff, 0xfe]))),
            ("creation date", Value::string("yesterday")),
        ],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    assert_eq!(record.comment, "");
    assert_eq!(record.created_by, "");
    assert_eq!(record.creation_date, None);
    assert_eq!(record.created_at(), None);
}

#[test]
fn test_from_file_missing() {
    let err = TorrentRecord::from_file("/nonexistent/dir/x.torrent").unwrap_err();
    assert!(matches!(err, MetainfoError::Io(_)));
    assert!(!err.is_malformed());
}

#[test]
fn test_magnet_uri_uses_first_web_seed() {
    let data = torrent_with(
        single_file_info(),
        vec![(
            "url-list",
            Value::List(vec![
                Value::string("http://x/a b"),
                Value::string("http://y"),
            ]),
        )],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();

    assert_eq!(
        record.magnet_uri().unwrap(),
        "magnet:?xt=urn:btih:d62b660b44d5548ca116b89efafd25622c26d802\
         &dn=a.txt&ws=http%3A%2F%2Fx%2Fa%20b"
    );
}

#[test]
fn test_url_encode() {
    assert_eq!(url_encode("Movie.2023"), "Movie.2023");
    assert_eq!(url_encode("a b&c=d"), "a%20b%26c%3Dd");
    assert_eq!(url_encode("é"), "%C3%A9");
}

#[test]
fn test_json_shape() {
    let data = torrent_with(
        single_file_info(),
        vec![
            ("url-list", Value::string("http://x")),
            ("creation date", Value::Integer(0)),
        ],
    );
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["name"], "a.txt");
    assert_eq!(json["info_hash"], "d62b660b44d5548ca116b89efafd25622c26d802");
    assert_eq!(json["size"], 5);
    assert_eq!(json["files"][0]["path"][0], "a.txt");
    assert_eq!(json["files"][0]["length"], 5);
    assert_eq!(json["web_seeds"][0], "http://x");
    assert_eq!(json["created_date"], "1970-01-01T00:00:00Z");
    assert_eq!(json["file_path"], "a.torrent");
    assert!(json.get("comment").is_none());
    assert!(json.get("created_by").is_none());
}

#[test]
fn test_json_absent_creation_date_is_null() {
    let data = torrent_with(single_file_info(), vec![]);
    let record = TorrentRecord::from_bytes(&data, "a.torrent").unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert!(json["created_date"].is_null());
}
