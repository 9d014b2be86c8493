//! HTML document generation.
//!
//! Uses `quick-xml`'s writer API so every piece of user-supplied text and
//! every attribute value is escaped on the way out.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

type W = Writer<Cursor<Vec<u8>>>;

const STYLESHEET: &str = "
body { font-family: sans-serif; margin: 0; background: #fff7ef; color: #3b1d05; }
header { background: #f5700c; padding: 0.75em 1.5em; }
header a { color: #fff; margin-right: 1em; text-decoration: none; font-weight: bold; }
main { padding: 1.5em; }
.notice { background: #ffe1c7; border-left: 4px solid #f5700c; padding: 0.5em 1em; margin: 0 0 1em; }
table { border-collapse: collapse; }
td, th { padding: 0.3em 0.8em; border-bottom: 1px solid #f0c8a8; text-align: left; }
label { display: block; margin: 0.5em 0; }
";

// ─── Page chrome ─────────────────────────────────────────────────────────────

/// The parts of every page that depend on the session: who is logged in and
/// which notices are waiting to be shown.
#[derive(Debug, Default, Clone)]
pub struct Chrome {
  pub user_name: Option<String>,
  pub notices:   Vec<String>,
}

// ─── Form fields ─────────────────────────────────────────────────────────────

pub struct Field<'a> {
  pub label:      &'a str,
  pub name:       &'a str,
  pub input_type: &'a str,
}

impl<'a> Field<'a> {
  pub const fn new(label: &'a str, name: &'a str, input_type: &'a str) -> Self {
    Self { label, name, input_type }
  }
}

/// A table cell: plain text or a link.
pub enum Cell {
  Text(String),
  Link { href: String, text: String },
}

// ─── Builder ─────────────────────────────────────────────────────────────────

pub struct PageBuilder {
  writer: W,
}

impl PageBuilder {
  /// Open `<html>`, write the head, navigation and notices, and open
  /// `<main>`.
  pub fn new(title: &str, chrome: &Chrome) -> Self {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
      .write_event(Event::DocType(BytesText::from_escaped("html")))
      .unwrap();
    write_start_with_attr(&mut writer, "html", &[("lang", "en")]);

    write_start(&mut writer, "head");
    write_empty_with_attr(&mut writer, "meta", &[("charset", "utf-8")]);
    write_text_elem(&mut writer, "title", &format!("{title} · Terrarium"));
    write_text_elem(&mut writer, "style", STYLESHEET);
    write_end(&mut writer, "head");

    write_start(&mut writer, "body");
    write_start(&mut writer, "header");
    write_link(&mut writer, "/", "Terrarium");
    match &chrome.user_name {
      Some(name) => {
        write_link(&mut writer, "/snakes", "My snakes");
        write_link(&mut writer, "/logout", &format!("Log out ({name})"));
      }
      None => {
        write_link(&mut writer, "/login", "Log in");
        write_link(&mut writer, "/register", "Register");
      }
    }
    write_end(&mut writer, "header");

    write_start(&mut writer, "main");
    for notice in &chrome.notices {
      write_text_elem_with_attr(&mut writer, "p", &[("class", "notice")], notice);
    }

    Self { writer }
  }

  pub fn heading(&mut self, text: &str) -> &mut Self {
    write_text_elem(&mut self.writer, "h1", text);
    self
  }

  pub fn paragraph(&mut self, text: &str) -> &mut Self {
    write_text_elem(&mut self.writer, "p", text);
    self
  }

  pub fn link_paragraph(&mut self, href: &str, text: &str) -> &mut Self {
    write_start(&mut self.writer, "p");
    write_link(&mut self.writer, href, text);
    write_end(&mut self.writer, "p");
    self
  }

  pub fn image(&mut self, src: &str, alt: &str) -> &mut Self {
    write_empty_with_attr(&mut self.writer, "img", &[("src", src), ("alt", alt)]);
    self
  }

  pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<Cell>>) -> &mut Self {
    let w = &mut self.writer;
    write_start(w, "table");
    write_start(w, "tr");
    for h in headers {
      write_text_elem(w, "th", h);
    }
    write_end(w, "tr");
    for row in rows {
      write_start(w, "tr");
      for cell in row {
        match cell {
          Cell::Text(text) => write_text_elem(w, "td", &text),
          Cell::Link { href, text } => {
            write_start(w, "td");
            write_link(w, &href, &text);
            write_end(w, "td");
          }
        }
      }
      write_end(w, "tr");
    }
    write_end(w, "table");
    self
  }

  /// A POST form with one labelled input per field.
  pub fn form(&mut self, action: &str, fields: &[Field<'_>], submit: &str) -> &mut Self {
    let w = &mut self.writer;
    write_start_with_attr(w, "form", &[("method", "post"), ("action", action)]);
    for field in fields {
      write_start(w, "label");
      w.write_event(Event::Text(BytesText::new(field.label))).unwrap();
      write_empty_with_attr(w, "input", &[
        ("type", field.input_type),
        ("name", field.name),
        ("required", "required"),
      ]);
      write_end(w, "label");
    }
    write_text_elem_with_attr(w, "button", &[("type", "submit")], submit);
    write_end(w, "form");
    self
  }

  /// Close the open elements and return the document.
  pub fn finish(mut self) -> String {
    write_end(&mut self.writer, "main");
    write_end(&mut self.writer, "body");
    write_end(&mut self.writer, "html");
    let bytes = self.writer.into_inner().into_inner();
    String::from_utf8_lossy(&bytes).into_owned()
  }
}

// ─── Writer helpers ──────────────────────────────────────────────────────────

fn write_start(w: &mut W, tag: &str) {
  w.write_event(Event::Start(BytesStart::new(tag))).unwrap();
}

fn write_start_with_attr(w: &mut W, tag: &str, attrs: &[(&str, &str)]) {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  w.write_event(Event::Start(el)).unwrap();
}

fn write_end(w: &mut W, tag: &str) {
  w.write_event(Event::End(BytesEnd::new(tag))).unwrap();
}

fn write_text_elem(w: &mut W, tag: &str, text: &str) {
  write_start(w, tag);
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
  write_end(w, tag);
}

fn write_text_elem_with_attr(w: &mut W, tag: &str, attrs: &[(&str, &str)], text: &str) {
  write_start_with_attr(w, tag, attrs);
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
  write_end(w, tag);
}

fn write_empty_with_attr(w: &mut W, tag: &str, attrs: &[(&str, &str)]) {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  w.write_event(Event::Empty(el)).unwrap();
}

fn write_link(w: &mut W, href: &str, text: &str) {
  write_text_elem_with_attr(w, "a", &[("href", href)], text);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn user_text_is_escaped() {
    let chrome = Chrome {
      user_name: Some("<b>Eve</b>".into()),
      notices:   vec!["a & b".into()],
    };
    let mut page = PageBuilder::new("x", &chrome);
    page.paragraph("<script>alert(1)</script>");
    let html = page.finish();

    assert!(!html.contains("<script>"), "{html}");
    assert!(html.contains("&lt;script&gt;"), "{html}");
    assert!(html.contains("a &amp; b"), "{html}");
    assert!(!html.contains("<b>Eve</b>"), "{html}");
  }

  #[test]
  fn document_is_well_formed_html() {
    let html = PageBuilder::new("Home", &Chrome::default()).finish();
    assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    assert!(html.ends_with("</main></body></html>"), "{html}");
    assert!(html.contains("<title>Home · Terrarium</title>"), "{html}");
  }

  #[test]
  fn anonymous_chrome_offers_login() {
    let html = PageBuilder::new("Home", &Chrome::default()).finish();
    assert!(html.contains("href=\"/login\""));
    assert!(!html.contains("/logout"));
  }
}
