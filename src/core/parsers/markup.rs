//! Tolerant parser for component markup.
//!
//! Produces a tree of [`Node`]s with a line/column position for every node
//! and attribute. Tag and attribute names are lowercased. Character
//! references in text and attribute values are decoded, while `script`/`style`
//! contents are raw text.
//! Unclosed elements are closed at end of input and stray end tags are
//! dropped. Only an unterminated start tag or comment is an error.

use anyhow::{Result, bail};
use enum_dispatch::enum_dispatch;
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Position in a source document. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Static HTML serialization of a node.
///
/// Comments produce no output and attributes bound to component state
/// (`:x`, `@x`, `v-x`, `#x`) are dropped since they have no static value.
/// Text and attribute values are escaped again, raw text is written as is.
#[enum_dispatch]
pub trait ToHtml {
    fn write_html(&self, out: &mut String);
}

#[enum_dispatch(ToHtml)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(Text),
    Element(Element),
    Comment(Comment),
}

impl Node {
    pub fn start(&self) -> Position {
        match self {
            Node::Text(text) => text.start,
            Node::Element(element) => element.start,
            Node::Comment(comment) => comment.start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub value: String,
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub start: Position,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Raw text content of a `script`/`style` element.
    pub fn raw_text(&self) -> Option<&Text> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }
}

/// Whether an attribute name is a binding, event handler or directive.
pub fn is_dynamic_attribute(name: &str) -> bool {
    name.starts_with(':') || name.starts_with('@') || name.starts_with('#') || name.starts_with("v-")
}

impl ToHtml for Text {
    fn write_html(&self, out: &mut String) {
        out.push_str(&encode_text(&self.value));
    }
}

impl ToHtml for Comment {
    fn write_html(&self, _out: &mut String) {}
}

impl ToHtml for Element {
    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in self
            .attrs
            .iter()
            .filter(|attr| !is_dynamic_attribute(&attr.name))
        {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(&attr.value));
            out.push('"');
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&self.name.as_str()) {
            if let Some(text) = self.raw_text() {
                out.push_str(&text.value);
            }
        } else {
            for child in &self.children {
                child.write_html(out);
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Parse a markup document or fragment.
pub fn parse_markup(source: &str) -> Result<Vec<Node>> {
    MarkupParser::new(source).parse()
}

struct MarkupParser<'a> {
    source: &'a str,
    pos: Position,
    stack: Vec<Element>,
    roots: Vec<Node>,
}

impl<'a> MarkupParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position::default(),
            stack: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Node>> {
        while !self.rest().is_empty() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.parse_comment()?;
            } else if rest.starts_with("</") && starts_name(&rest[2..]) {
                self.parse_end_tag();
            } else if rest.starts_with('<') && starts_name(&rest[1..]) {
                self.parse_start_tag()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") || rest.starts_with("</") {
                self.skip_declaration();
            } else {
                self.parse_text();
            }
        }

        while let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
        Ok(self.roots)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.pos.offset..self.pos.offset + len];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.pos.line += 1;
                self.pos.column = 1;
            } else {
                self.pos.column += 1;
            }
        }
        self.pos.offset += len;
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let len = rest.len() - rest.trim_start().len();
        self.advance(len);
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn parse_text(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .char_indices()
            .skip(1)
            .find(|&(i, ch)| ch == '<' && starts_markup(&rest[i..]))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.advance(len);
        self.append(Node::Text(Text {
            value: decode_html_entities(&rest[..len]).into_owned(),
            start,
        }));
    }

    fn parse_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let rest = self.rest();
        let Some(end) = rest[4..].find("-->") else {
            bail!("Unterminated comment at line {}", start.line);
        };
        let value = rest[4..4 + end].to_string();
        self.advance(4 + end + 3);
        self.append(Node::Comment(Comment { value, start }));
        Ok(())
    }

    fn skip_declaration(&mut self) {
        let rest = self.rest();
        let len = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
        self.advance(len);
    }

    fn parse_end_tag(&mut self) {
        self.advance(2);
        let name = self.take_name();
        self.skip_declaration();

        if let Some(index) = self.stack.iter().rposition(|element| element.name == name) {
            while self.stack.len() > index {
                if let Some(element) = self.stack.pop() {
                    self.append(Node::Element(element));
                }
            }
        }
    }

    fn take_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|ch: char| ch.is_whitespace() || ch == '/' || ch == '>')
            .unwrap_or(rest.len());
        self.advance(len);
        rest[..len].to_ascii_lowercase()
    }

    fn parse_start_tag(&mut self) -> Result<()> {
        let start = self.pos;
        self.advance(1);
        let name = self.take_name();
        let mut attrs = Vec::new();
        let self_closing;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                bail!("Unterminated start tag <{}> at line {}", name, start.line);
            }
            if rest.starts_with("/>") {
                self.advance(2);
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.advance(1);
                self_closing = false;
                break;
            }
            if let Some(attr) = self.parse_attribute(&name)? {
                attrs.push(attr);
            }
        }

        let mut element = Element {
            name,
            attrs,
            children: Vec::new(),
            start,
        };

        if element.is_void() || self_closing {
            self.append(Node::Element(element));
        } else if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            element.children.push(Node::Text(self.take_raw_text(&element.name)));
            self.append(Node::Element(element));
        } else {
            self.stack.push(element);
        }
        Ok(())
    }

    fn parse_attribute(&mut self, tag: &str) -> Result<Option<Attribute>> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(i, ch)| {
                ch.is_whitespace() || ch == '=' || ch == '>' || rest[i..].starts_with("/>")
            })
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        if len == 0 {
            // Stray `=` or `/` inside a tag.
            let skip = rest.chars().next().map(char::len_utf8).unwrap_or(0);
            self.advance(skip);
            return Ok(None);
        }

        let name = rest[..len].to_ascii_lowercase();
        self.advance(len);
        self.skip_whitespace();

        if !self.rest().starts_with('=') {
            return Ok(Some(Attribute {
                name,
                value: String::new(),
                start,
            }));
        }
        self.advance(1);
        self.skip_whitespace();

        let rest = self.rest();
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let Some(end) = rest[1..].find(quote) else {
                    bail!(
                        "Unterminated attribute value in <{}> at line {}",
                        tag,
                        start.line
                    );
                };
                self.advance(end + 2);
                decode_html_entities(&rest[1..1 + end]).into_owned()
            }
            _ => {
                let len = rest
                    .find(|ch: char| ch.is_whitespace() || ch == '>')
                    .unwrap_or(rest.len());
                self.advance(len);
                decode_html_entities(&rest[..len]).into_owned()
            }
        };

        Ok(Some(Attribute { name, value, start }))
    }

    fn take_raw_text(&mut self, name: &str) -> Text {
        let start = self.pos;
        let rest = self.rest();
        let closing = format!("</{}", name);
        let len = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        self.advance(len);
        if !self.rest().is_empty() {
            self.skip_declaration();
        }
        Text {
            value: rest[..len].to_string(),
            start,
        }
    }
}

fn starts_name(rest: &str) -> bool {
    rest.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic())
}

fn starts_markup(rest: &str) -> bool {
    rest.starts_with("<!")
        || rest.starts_with("<?")
        || rest.starts_with("</")
        || starts_name(&rest[1..])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn render(nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            node.write_html(&mut out);
        }
        out
    }

    #[test]
    fn test_parse_nested_elements_with_positions() {
        let nodes = parse_markup("<div id=\"app\">\n  <span>{{ msg }}</span>\n</div>").unwrap();

        assert_eq!(nodes.len(), 1);
        let div = element(&nodes[0]);
        assert_eq!(div.name, "div");
        assert_eq!(div.attr("id").unwrap().value, "app");
        assert_eq!(div.start.line, 1);

        let span = element(&div.children[1]);
        assert_eq!(span.name, "span");
        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.column, 3);
        match &span.children[0] {
            Node::Text(text) => {
                assert_eq!(text.value, "{{ msg }}");
                assert_eq!(text.start.line, 2);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_forms() {
        let nodes =
            parse_markup("<input disabled :value='a > b' @click=go v-model=\"x\"/>").unwrap();
        let input = element(&nodes[0]);
        let names: Vec<_> = input.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["disabled", ":value", "@click", "v-model"]);
        assert_eq!(input.attr("disabled").unwrap().value, "");
        assert_eq!(input.attr(":value").unwrap().value, "a > b");
        assert_eq!(input.attr("@click").unwrap().value, "go");
    }

    #[test]
    fn test_attribute_lines() {
        let nodes = parse_markup("<p\n  title=\"a\"\n  :alt=\"b\">x</p>").unwrap();
        let p = element(&nodes[0]);
        assert_eq!(p.attr("title").unwrap().start.line, 2);
        assert_eq!(p.attr(":alt").unwrap().start.line, 3);
    }

    #[test]
    fn test_script_is_raw_text() {
        let source = "<template><p>a</p></template>\n<script>\nif (a < b) { x('</p>') }\n</script>";
        let nodes = parse_markup(source).unwrap();
        let script = element(&nodes[2]);
        assert_eq!(script.name, "script");
        let text = script.raw_text().unwrap();
        assert_eq!(text.value, "\nif (a < b) { x('</p>') }\n");
        assert_eq!(text.start.line, 2);
    }

    #[test]
    fn test_unclosed_and_stray_tags() {
        let nodes = parse_markup("<div><p>one</span><br>two").unwrap();
        let div = element(&nodes[0]);
        let p = element(&div.children[0]);
        assert_eq!(p.children.len(), 3);
        assert_eq!(element(&p.children[1]).name, "br");
    }

    #[test]
    fn test_end_tag_closes_inner_elements() {
        let nodes = parse_markup("<div><p>one</div>after").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(element(&nodes[0]).children.len(), 1);
    }

    #[test]
    fn test_lone_less_than_is_text() {
        let nodes = parse_markup("<p>1 < 2</p>").unwrap();
        let p = element(&nodes[0]);
        assert_eq!(render(&p.children), "1 < 2");
    }

    #[test]
    fn test_unterminated_start_tag_fails() {
        assert!(parse_markup("<div class=\"a\"").is_err());
        assert!(parse_markup("<!-- open").is_err());
    }

    #[test]
    fn test_to_html_drops_dynamic_attributes_and_comments() {
        let nodes = parse_markup(
            "<b class=\"x\" :title=\"t\" v-if=\"ok\">Hi<!-- note --></b><br><my-comp/>",
        )
        .unwrap();
        assert_eq!(render(&nodes), "<b class=\"x\">Hi</b><br><my-comp></my-comp>");
    }

    #[test]
    fn test_character_references_are_decoded() {
        let nodes = parse_markup(
            "<p title=\"Tom &amp; Jerry\" alt=&quot;x&quot;>a &lt; b &#169; &#x41;</p>",
        )
        .unwrap();
        let Node::Element(p) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(p.attr("title").unwrap().value, "Tom & Jerry");
        assert_eq!(p.attr("alt").unwrap().value, "\"x\"");
        let Node::Text(text) = &p.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.value, "a < b \u{a9} A");
    }

    #[test]
    fn test_raw_text_is_not_decoded() {
        let nodes = parse_markup("<script>if (a &amp;&amp; b < c) {}</script>").unwrap();
        let Node::Element(script) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(script.raw_text().unwrap().value, "if (a &amp;&amp; b < c) {}");
        assert_eq!(render(&nodes), "<script>if (a &amp;&amp; b < c) {}</script>");
    }

    #[test]
    fn test_to_html_escapes_decoded_values() {
        let nodes = parse_markup("<b title=\"say &quot;hi&quot;\">Tom &amp; Jerry &lt;3</b>").unwrap();
        assert_eq!(
            render(&nodes),
            "<b title=\"say &quot;hi&quot;\">Tom &amp; Jerry &lt;3</b>"
        );
    }
}
