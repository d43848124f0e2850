//! Interactive-target detection for the cursor trail's hover state.
//!
//! An element counts as interactive if it, or any ancestor, is a link,
//! button, text input, carries the `cursor-pointer` class, or has
//! `role="button"`.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "textarea"];
const CLICKABLE_CLASS: &str = "cursor-pointer";
const BUTTON_ROLE: &str = "button";

/// The parts of an element the hover check looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    /// Tag name in any case (`"A"` from the DOM, `"a"` from markup).
    pub tag_name: String,
    pub role: Option<String>,
    pub classes: Vec<String>,
}

impl ElementInfo {
    /// Describe an element from its tag name and raw `role` / `class`
    /// attributes. Reading the attribute works for SVG elements too, whose
    /// `className` property is not a string.
    #[must_use]
    pub fn from_attributes(tag_name: String, role: Option<String>, class_attr: Option<&str>) -> Self {
        let classes = class_attr.map(|c| c.split_whitespace().map(str::to_owned).collect()).unwrap_or_default();
        Self { tag_name, role, classes }
    }

    #[must_use]
    pub fn tag(tag_name: &str) -> Self {
        Self { tag_name: tag_name.to_owned(), ..Self::default() }
    }

    #[must_use]
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }
}

/// Whether this single element is interactive.
#[must_use]
pub fn is_interactive_element(el: &ElementInfo) -> bool {
    INTERACTIVE_TAGS.iter().any(|t| el.tag_name.eq_ignore_ascii_case(t))
        || el.classes.iter().any(|c| c == CLICKABLE_CLASS)
        || el.role.as_deref() == Some(BUTTON_ROLE)
}

/// Whether any element in `chain` (target first, then its ancestors) is
/// interactive. An empty chain means nothing is under the pointer.
#[must_use]
pub fn is_interactive<'a>(chain: impl IntoIterator<Item = &'a ElementInfo>) -> bool {
    chain.into_iter().any(is_interactive_element)
}
