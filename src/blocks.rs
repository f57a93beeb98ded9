//! Rich-content block builders.
//!
//! Helper constructors for the structured-formatting units a chat platform
//! renders (headers, sections, buttons, inputs). The dispatch core treats the
//! produced values as opaque; they travel inside `ResponseContent::Blocks`.

use serde_json::{json, Value};

/// Header block (plain text only).
pub fn header(text: &str) -> Value {
    json!({
        "type": "header",
        "text": {
            "type": "plain_text",
            "text": text,
        },
    })
}

/// Markdown section block.
pub fn section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text,
        },
    })
}

/// Markdown section block with column fields.
pub fn section_with_fields(text: &str, fields: &[String]) -> Value {
    let field_objects: Vec<Value> = fields
        .iter()
        .map(|field| json!({"type": "mrkdwn", "text": field}))
        .collect();
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text,
        },
        "fields": field_objects,
    })
}

/// Divider block.
pub fn divider() -> Value {
    json!({"type": "divider"})
}

/// Context block with markdown text elements.
pub fn context(elements: &[String]) -> Value {
    let element_objects: Vec<Value> = elements
        .iter()
        .map(|element| json!({"type": "mrkdwn", "text": element}))
        .collect();
    json!({
        "type": "context",
        "elements": element_objects,
    })
}

/// Image block.
pub fn image(image_url: &str, alt_text: &str, title: Option<&str>) -> Value {
    let mut block = json!({
        "type": "image",
        "image_url": image_url,
        "alt_text": alt_text,
    });
    if let Some(title) = title {
        block["title"] = json!({"type": "plain_text", "text": title});
    }
    block
}

/// Actions block wrapping interactive elements.
pub fn actions(elements: Vec<Value>) -> Value {
    json!({
        "type": "actions",
        "elements": elements,
    })
}

/// Button element. `style` accepts "primary" or "danger"; anything else is the
/// platform default.
pub fn button(text: &str, action_id: &str, value: Option<&str>, style: Option<&str>) -> Value {
    let mut block = json!({
        "type": "button",
        "text": {
            "type": "plain_text",
            "text": text,
        },
        "action_id": action_id,
    });
    if let Some(value) = value {
        block["value"] = json!(value);
    }
    if let Some(style) = style {
        if style == "primary" || style == "danger" {
            block["style"] = json!(style);
        }
    }
    block
}

/// Option object for select menus.
pub fn option(text: &str, value: &str, description: Option<&str>) -> Value {
    let mut block = json!({
        "text": {
            "type": "plain_text",
            "text": text,
        },
        "value": value,
    });
    if let Some(description) = description {
        block["description"] = json!({"type": "plain_text", "text": description});
    }
    block
}

/// Static select menu element.
pub fn select_menu(placeholder: &str, action_id: &str, options: Vec<Value>) -> Value {
    json!({
        "type": "static_select",
        "placeholder": {
            "type": "plain_text",
            "text": placeholder,
        },
        "action_id": action_id,
        "options": options,
    })
}

/// Input block wrapping an input element.
pub fn input_block(
    label: &str,
    element: Value,
    block_id: Option<&str>,
    hint: Option<&str>,
    optional: bool,
) -> Value {
    let mut block = json!({
        "type": "input",
        "label": {
            "type": "plain_text",
            "text": label,
        },
        "element": element,
        "optional": optional,
    });
    if let Some(block_id) = block_id {
        block["block_id"] = json!(block_id);
    }
    if let Some(hint) = hint {
        block["hint"] = json!({"type": "plain_text", "text": hint});
    }
    block
}

/// Plain text input element.
pub fn plain_text_input(
    action_id: &str,
    placeholder: Option<&str>,
    initial_value: Option<&str>,
    multiline: bool,
) -> Value {
    let mut element = json!({
        "type": "plain_text_input",
        "action_id": action_id,
        "multiline": multiline,
    });
    if let Some(placeholder) = placeholder {
        element["placeholder"] = json!({"type": "plain_text", "text": placeholder});
    }
    if let Some(initial_value) = initial_value {
        element["initial_value"] = json!(initial_value);
    }
    element
}

/// Confirmation dialog object for destructive actions.
pub fn confirmation_dialog(title: &str, text: &str, confirm: &str, deny: &str) -> Value {
    json!({
        "title": {"type": "plain_text", "text": title},
        "text": {"type": "plain_text", "text": text},
        "confirm": {"type": "plain_text", "text": confirm},
        "deny": {"type": "plain_text", "text": deny},
    })
}

/// Assemble a message from common components: optional header, sections, and
/// context, with dividers between groups when requested.
pub fn message_template(
    header_text: Option<&str>,
    sections: &[String],
    context_elements: &[String],
    include_dividers: bool,
) -> Vec<Value> {
    let mut blocks = Vec::new();

    if let Some(header_text) = header_text {
        blocks.push(header(header_text));
        if include_dividers {
            blocks.push(divider());
        }
    }

    for (i, section_text) in sections.iter().enumerate() {
        blocks.push(section(section_text));
        if include_dividers && i < sections.len() - 1 {
            blocks.push(divider());
        }
    }

    if !context_elements.is_empty() {
        if !blocks.is_empty() && include_dividers {
            blocks.push(divider());
        }
        blocks.push(context(context_elements));
    }

    blocks
}
