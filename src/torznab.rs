//! Torznab feed rendering.
//!
//! Torznab is the RSS 2.0 dialect that media automation tools use to query
//! indexers. This module renders the capabilities document (`t=caps`) and
//! search results (`t=search`) for a set of [`TorrentRecord`]s.
//!
//! XML is produced with `format!`; every piece of text taken from a torrent
//! goes through [`xml_escape`].

use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::constants::{
    CATEGORIES, DEFAULT_CATEGORY, INDEXER_DESCRIPTION, INDEXER_TITLE, RESULT_LIMIT, TORRENT_MIME,
    TORZNAB_NAMESPACE,
};
use crate::metainfo::{url_encode, TorrentRecord};

/// One `<item>` of a Torznab search feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorznabItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub pub_date: Option<String>,
    pub size: u64,
    pub attributes: Vec<(&'static str, String)>,
}

impl TorznabItem {
    pub fn from_record(record: &TorrentRecord, base_url: &str) -> Self {
        let mut attributes = vec![
            ("category", DEFAULT_CATEGORY.to_string()),
            ("size", record.total_size.to_string()),
            ("seeders", "1".to_string()),
            ("peers", "1".to_string()),
        ];

        if let Some(magnet) = record.magnet_uri() {
            attributes.push(("magneturl", magnet));
        }

        Self {
            title: record.name.clone(),
            description: record.comment.clone(),
            link: download_url(base_url, record),
            guid: record.info_hash.to_hex(),
            pub_date: record.created_at().map(rfc1123),
            size: record.total_size,
            attributes,
        }
    }

    fn write_xml(&self, out: &mut String) {
        let _ = writeln!(out, "    <item>");
        let _ = writeln!(out, "      <title>{}</title>", xml_escape(&self.title));
        let _ = writeln!(
            out,
            "      <description>{}</description>",
            xml_escape(&self.description)
        );
        let _ = writeln!(out, "      <link>{}</link>", xml_escape(&self.link));
        let _ = writeln!(out, "      <guid>{}</guid>", xml_escape(&self.guid));
        if let Some(ref date) = self.pub_date {
            let _ = writeln!(out, "      <pubDate>{}</pubDate>", date);
        }
        let _ = writeln!(out, "      <size>{}</size>", self.size);
        let _ = writeln!(
            out,
            r#"      <enclosure url="{}" length="{}" type="{}"></enclosure>"#,
            xml_escape(&self.link),
            self.size,
            TORRENT_MIME
        );
        for (name, value) in &self.attributes {
            let _ = writeln!(
                out,
                r#"      <torznab:attr name="{}" value="{}"></torznab:attr>"#,
                name,
                xml_escape(value)
            );
        }
        let _ = writeln!(out, "    </item>");
    }
}

/// Renders a search result feed.
///
/// # Examples
///
/// ```
/// use webseed2torznab::torznab::render_search;
///
/// let xml = render_search("http://localhost:8080", &[]);
/// assert!(xml.contains(r#"<rss version="2.0""#));
/// assert!(!xml.contains("<item>"));
/// ```
pub fn render_search(base_url: &str, records: &[Arc<TorrentRecord>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<rss version="2.0" xmlns:torznab="{}">"#,
        TORZNAB_NAMESPACE
    );
    let _ = writeln!(out, "  <channel>");
    let _ = writeln!(out, "    <title>{}</title>", INDEXER_TITLE);
    let _ = writeln!(
        out,
        "    <description>{}</description>",
        INDEXER_DESCRIPTION
    );
    let _ = writeln!(out, "    <link>{}</link>", xml_escape(base_url));

    for record in records {
        TorznabItem::from_record(record, base_url).write_xml(&mut out);
    }

    let _ = writeln!(out, "  </channel>");
    let _ = writeln!(out, "</rss>");
    out
}

/// Renders the capabilities document.
pub fn render_caps(base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(out, "<caps>");
    let _ = writeln!(
        out,
        r#"  <server version="1.0" title="{}" strapline="{}" email="admin@localhost" url="{}" image=""/>"#,
        INDEXER_TITLE,
        INDEXER_DESCRIPTION,
        xml_escape(base_url)
    );
    let _ = writeln!(
        out,
        r#"  <limits max="{0}" default="{0}"/>"#,
        RESULT_LIMIT
    );
    let _ = writeln!(out, r#"  <registration available="no" open="no"/>"#);
    let _ = writeln!(out, "  <searching>");
    let _ = writeln!(out, r#"    <search available="yes" supportedParams="q"/>"#);
    let _ = writeln!(out, "  </searching>");
    let _ = writeln!(out, "  <categories>");
    for (id, name) in CATEGORIES {
        let _ = writeln!(out, r#"    <category id="{}" name="{}"/>"#, id, name);
    }
    let _ = writeln!(out, "  </categories>");
    let _ = writeln!(out, "</caps>");
    out
}

/// Download link for a record: `{base}/torrent/{file name}`.
pub fn download_url(base_url: &str, record: &TorrentRecord) -> String {
    format!(
        "{}/torrent/{}",
        base_url,
        url_encode(record.file_name().unwrap_or_default())
    )
}

/// RFC 1123 date with a numeric zone, e.g. `Tue, 14 Nov 2023 22:13:20 +0000`.
pub fn rfc1123(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

/// Escapes the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
