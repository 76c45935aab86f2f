//! Render output: a small element tree that can be queried by test id and
//! serialized to HTML.

use serde::Serialize;

/// Attribute that carries an element's test id in HTML output.
pub const TEST_ID_ATTR: &str = "data-testid";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            test_id: None,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All descendants (and self) tagged `id`, in document order.
    pub fn find_all_by_test_id(&self, id: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_test_id(id, &mut found);
        found
    }

    fn collect_by_test_id<'a>(&'a self, id: &str, found: &mut Vec<&'a Element>) {
        if self.test_id.as_deref() == Some(id) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_test_id(id, found);
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.test_id {
            out.push_str(&format!(r#" {TEST_ID_ATTR}="{}""#, html_escape(id)));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(r#" {}="{}""#, name, html_escape(value)));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&html_escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        if !is_void(&self.tag) {
            out.push_str(&format!("</{}>", self.tag));
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "meta" | "link" | "input")
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap a rendered body in a full HTML document.
pub fn render_document(title: &str, body: &Element) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape(title),
        body.to_html()
    )
}
