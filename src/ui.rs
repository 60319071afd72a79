//! Terminal-independent state for the page surfaces: status lines, tabs,
//! the popup and the confetti burst.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Text shown in a panel's message region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub text: String,
    pub class: StatusClass,
}

impl StatusMessage {
    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: StatusClass::Neutral,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: StatusClass::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: StatusClass::Error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Keeps exactly one tab active.
#[derive(Debug, Clone)]
pub struct TabController {
    keys: Vec<String>,
    active: usize,
}

impl TabController {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            active: 0,
        }
    }

    /// Activates `key` and returns the id of the pane that is now shown.
    /// Unknown keys leave the current tab in place.
    pub fn activate(&mut self, key: &str) -> Option<String> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.active = index;
        Some(pane_id(key))
    }

    pub fn active_key(&self) -> Option<&str> {
        self.keys.get(self.active).map(String::as_str)
    }

    pub fn active_pane(&self) -> Option<String> {
        self.active_key().map(pane_id)
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active_key() == Some(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

fn pane_id(key: &str) -> String {
    format!("tab-{}", key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Default)]
pub struct Popup {
    text: String,
    visible: bool,
}

impl Popup {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Only a click on the backdrop itself closes the popup.
    pub fn click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.dismiss();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub const CONFETTI_PIECES: usize = 60;
const CONFETTI_COLORS: [(u8, u8, u8); 2] = [(0xfb, 0xbf, 0x24), (0x38, 0xbd, 0xf8)];
const CONFETTI_GLYPHS: [char; 4] = ['*', '+', '~', 'o'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfettiPiece {
    pub glyph: char,
    pub color: (u8, u8, u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfettiBurst {
    pub pieces: Vec<ConfettiPiece>,
}

impl ConfettiBurst {
    pub fn new(count: usize) -> Self {
        let pieces = (0..count)
            .map(|i| ConfettiPiece {
                glyph: CONFETTI_GLYPHS[(i * 7 + i / 3) % CONFETTI_GLYPHS.len()],
                color: CONFETTI_COLORS[i % CONFETTI_COLORS.len()],
            })
            .collect();
        Self { pieces }
    }
}
