//! # Message Schema
//!
//! | Message          | Direction          | Payload                  |
//! |------------------|--------------------|--------------------------|
//! | `SET_EDIT_MODE`  | controller→runtime | `bool`                   |
//! | `ADD_ELEMENT`    | controller→runtime | `{tag, text, classes}`   |
//! | `UPDATE_STYLE`   | controller→runtime | `{property, value}`      |
//! | `DELETE_ELEMENT` | controller→runtime | none                     |
//! | `ELEMENT_SELECTED` | runtime→controller | `{tag, text, colors}`  |
//! | `SYNC_SNAPSHOT`  | runtime→controller | canonical markup string  |
//!
//! On the wire every message is `{"type": "...", "payload": ...}`.

use serde::{Deserialize, Serialize};

/// Commands sent from the host controller into the sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerMessage {
    SetEditMode(bool),
    AddElement(NewElement),
    UpdateStyle(StyleUpdate),
    DeleteElement,
}

impl ControllerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerMessage::SetEditMode(_) => "SET_EDIT_MODE",
            ControllerMessage::AddElement(_) => "ADD_ELEMENT",
            ControllerMessage::UpdateStyle(_) => "UPDATE_STYLE",
            ControllerMessage::DeleteElement => "DELETE_ELEMENT",
        }
    }
}

/// Reports sent from the sandbox back to the host controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeMessage {
    ElementSelected(SelectionInfo),
    SyncSnapshot(String),
}

impl RuntimeMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeMessage::ElementSelected(_) => "ELEMENT_SELECTED",
            RuntimeMessage::SyncSnapshot(_) => "SYNC_SNAPSHOT",
        }
    }
}

/// Element to create inside the sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElement {
    pub tag: String,
    #[serde(default)]
    pub text: String,
    /// Space separated class list
    #[serde(default)]
    pub classes: String,
}

impl NewElement {
    pub fn new(tag: impl Into<String>, text: impl Into<String>, classes: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            classes: classes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleUpdate {
    pub property: String,
    pub value: String,
}

impl StyleUpdate {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Description of the element the user clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionInfo {
    /// Upper-case tag name (`P`, `DIV`)
    pub tag: String,
    pub text: String,
    pub colors: ElementColors,
}

/// Resolved colors in computed-style form (`rgb(r, g, b)`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementColors {
    pub background: String,
    pub text: String,
}
