use std::fmt;

/// Backend-neutral description of the elements an operation targets.
///
/// The engine only ever hands selectors to a `PortalPage` implementation;
/// how a backend realizes them (CSS query, XPath, ...) is its own
/// business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A raw CSS selector.
    Css(String),
    /// A button carrying a class fragment and exact label text.
    ButtonText { class: String, label: String },
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css(css.into())
    }

    pub fn button_text(class: impl Into<String>, label: impl Into<String>) -> Self {
        Selector::ButtonText {
            class: class.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => f.write_str(css),
            Selector::ButtonText { class, label } => {
                write!(f, "button.{class}[text={label}]")
            }
        }
    }
}
