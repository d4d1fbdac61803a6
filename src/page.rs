//! In-memory page model.
//!
//! Renderers never build a whole document. They mutate named elements here, the
//! same way a script mutates the DOM by id, and the page is turned into HTML once
//! at the end of a request.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageError {
    #[error("no element with id `{0}` on the page")]
    MissingElement(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub classes: Vec<String>,
    pub visible: bool,
    pub html: String,
    /// Current value of a form input; empty for everything else.
    pub value: String,
}

impl Element {
    fn new(classes: &[&str], visible: bool) -> Self {
        Element {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            visible,
            html: String::new(),
            value: String::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

/// Pending smooth scroll, replayed once the document loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: String,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: BTreeMap<String, Element>,
    scroll: Option<ScrollRequest>,
}

impl Page {
    pub fn new() -> Self {
        Page::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, classes: &[&str], visible: bool) {
        self.elements.insert(id.into(), Element::new(classes, visible));
    }

    pub fn insert_input(&mut self, id: impl Into<String>, value: &str) {
        let mut element = Element::new(&[], true);
        element.value = value.to_string();
        self.elements.insert(id.into(), element);
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| PageError::MissingElement(id.to_string()))
    }

    pub fn html(&self, id: &str) -> &str {
        self.element(id).map(|e| e.html.as_str()).unwrap_or("")
    }

    pub fn set_html(&mut self, id: &str, html: impl Into<String>) -> Result<(), PageError> {
        self.element_mut(id)?.html = html.into();
        Ok(())
    }

    // textContent semantics: the value is escaped before it lands in the element.
    pub fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError> {
        self.element_mut(id)?.html = escape_html(text);
        Ok(())
    }

    pub fn set_classes(&mut self, id: &str, classes: &[&str]) -> Result<(), PageError> {
        self.element_mut(id)?.classes = classes.iter().map(|c| c.to_string()).collect();
        Ok(())
    }

    pub fn add_class(&mut self, id: &str, class: &str) -> Result<(), PageError> {
        let element = self.element_mut(id)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Remove `class` from every element that carries `marker`.
    pub fn remove_class_where(&mut self, marker: &str, class: &str) {
        for element in self.elements.values_mut().filter(|e| e.has_class(marker)) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn value(&self, id: &str) -> &str {
        self.element(id).map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: &str, value: &str) -> Result<(), PageError> {
        self.element_mut(id)?.value = value.to_string();
        Ok(())
    }

    pub fn show(&mut self, id: &str) -> Result<(), PageError> {
        self.element_mut(id)?.visible = true;
        Ok(())
    }

    pub fn scroll_into_view(&mut self, id: &str) -> Result<(), PageError> {
        if !self.contains(id) {
            return Err(PageError::MissingElement(id.to_string()));
        }
        self.scroll = Some(ScrollRequest { target: id.to_string() });
        Ok(())
    }

    pub fn scroll_request(&self) -> Option<&ScrollRequest> {
        self.scroll.as_ref()
    }

    pub fn ids_with_class(&self, class: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|(_, e)| e.has_class(class))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
