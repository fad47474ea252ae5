use serde::Serialize;

/// A Block Kit layout block. Serializes to the JSON Slack expects in `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Actions {
        block_id: String,
        elements: Vec<Element>,
    },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

/// Interactive element usable as a section accessory or inside an actions block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        action_id: String,
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
    RadioButtons {
        options: Vec<SelectOption>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub text: TextObject,
    pub value: String,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText {
            text: text.into(),
            emoji: true,
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        match self {
            TextObject::PlainText { text, .. } | TextObject::Mrkdwn { text } => text,
        }
    }
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::plain(text),
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory: None,
        }
    }

    pub fn section_with(text: impl Into<String>, accessory: Option<Element>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
            accessory,
        }
    }

    /// Visible text of headers and sections.
    #[cfg(test)]
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Header { text } | Block::Section { text, .. } => Some(text.as_str()),
            Block::Actions { .. } | Block::Divider => None,
        }
    }

    #[cfg(test)]
    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider)
    }
}

impl Element {
    pub fn button(action_id: &str, text: &str) -> Self {
        Element::Button {
            action_id: action_id.to_string(),
            text: TextObject::plain(text),
            value: None,
            style: None,
        }
    }

    pub fn with_style(self, style: ButtonStyle) -> Self {
        match self {
            Element::Button {
                action_id,
                text,
                value,
                ..
            } => Element::Button {
                action_id,
                text,
                value,
                style: Some(style),
            },
            other => other,
        }
    }

    pub fn with_value(self, value: String) -> Self {
        match self {
            Element::Button {
                action_id,
                text,
                style,
                ..
            } => Element::Button {
                action_id,
                text,
                value: Some(value),
                style,
            },
            other => other,
        }
    }
}
