use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, fs, path::Path};

/// Attribute holding the machine-readable instant.
pub const DATETIME_ATTR: &str = "datetime";
/// Attribute receiving the absolute rendering.
pub const TITLE_ATTR: &str = "title";

/// Something on a page that carries an instant and can show text about it.
pub trait TimeElement {
    fn instant(&self) -> Option<&str>;
    fn set_text(&mut self, text: String);
    fn set_title(&mut self, title: String);
}

/// A node of a page snapshot.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Element {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, k: &str, v: &str) -> Element {
        self.attrs.insert(k.to_string(), v.to_string());
        self
    }

    pub fn text(mut self, t: &str) -> Element {
        self.text = t.to_string();
        self
    }

    pub fn child(mut self, c: Element) -> Element {
        self.children.push(c);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.attrs.get(TITLE_ATTR).map(String::as_str)
    }

    /// Visit this element and all its descendants, depth first in document order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for c in self.children.iter_mut() {
            c.walk_mut(f);
        }
    }

    /// Visit every descendant (or self) with the given tag, in document order.
    pub fn for_each_tag_mut(&mut self, tag: &str, mut f: impl FnMut(&mut Element)) {
        self.walk_mut(&mut |e| {
            if e.tag.eq_ignore_ascii_case(tag) {
                f(e)
            }
        })
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_by_id_mut(id))
    }
}

impl TimeElement for Element {
    fn instant(&self) -> Option<&str> {
        self.attrs.get(DATETIME_ATTR).map(String::as_str)
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn set_title(&mut self, title: String) {
        self.attrs.insert(TITLE_ATTR.to_string(), title);
    }
}

fn escape(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

// renders as HTML; text comes before children
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (k, v) in &self.attrs {
            write!(f, " {}=\"", k)?;
            escape(v, f)?;
            f.write_str("\"")?;
        }
        f.write_str(">")?;
        escape(&self.text, f)?;
        for c in &self.children {
            write!(f, "{}", c)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// A whole page snapshot.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Document {
        Document { root }
    }

    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}\n", self.root)
    }

    pub fn load(path: &Path) -> Result<Document, Error> {
        let s = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }

    /// Write the snapshot as JSON, and as rendered HTML if `html` is given.
    pub fn store(&self, path: &Path, html: Option<&Path>) -> Result<(), Error> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        if let Some(html) = html {
            fs::write(html, self.to_html())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_sparse_snapshot() {
        let doc: Document = serde_json::from_value(json!({
            "root": {
                "tag": "body",
                "children": [
                    { "tag": "time", "attrs": { "datetime": "2024-01-01T00:00:00Z" }, "text": "2024-01-01" }
                ]
            }
        }))
        .unwrap();
        assert_eq!(doc.root.children.len(), 1);
        assert_eq!(doc.root.children[0].instant(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(doc.root.children[0].text, "2024-01-01");
    }

    #[test]
    fn finds_by_tag_and_id() {
        let mut root = Element::new("body")
            .child(Element::new("p").child(Element::new("time").attr("datetime", "a")))
            .child(Element::new("table").attr("id", "t"))
            .child(Element::new("TIME").attr("datetime", "b"));
        let mut seen = Vec::new();
        root.for_each_tag_mut("time", |e| seen.push(e.instant().unwrap_or("").to_string()));
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(root.find_by_id_mut("t").map(|e| e.tag.clone()), Some("table".to_string()));
        assert!(root.find_by_id_mut("missing").is_none());
    }

    #[test]
    fn stores_and_loads_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("page.json");
        let html = dir.path().join("page.html");
        let doc = Document::new(
            Element::new("body").child(Element::new("time").attr("datetime", "2024-01-01").text("x")),
        );
        doc.store(&json, Some(html.as_path())).unwrap();
        assert_eq!(Document::load(&json).unwrap(), doc);
        assert_eq!(
            fs::read_to_string(&html).unwrap(),
            "<!DOCTYPE html>\n<body><time datetime=\"2024-01-01\">x</time></body>\n"
        );
    }

    #[test]
    fn loading_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("page.json");
        fs::write(&json, "<html>").unwrap();
        assert!(matches!(Document::load(&json), Err(Error::Json(_))));
        assert!(matches!(
            Document::load(&dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn renders_escaped_html() {
        let mut e = Element::new("time").attr("datetime", "2024-01-01");
        e.set_text("<soon> & \"later\"".to_string());
        e.set_title("January 1, 2024 12:00 AM".to_string());
        assert_eq!(
            e.to_string(),
            "<time datetime=\"2024-01-01\" title=\"January 1, 2024 12:00 AM\">&lt;soon&gt; &amp; &quot;later&quot;</time>"
        );
    }
}
