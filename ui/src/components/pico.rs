//! Small lifetime-free wrappers around Pico.css markup.
//! The stylesheet itself is linked once, in `App`.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;

//=============================================================================
// Content Components
//=============================================================================

/// A card for grouping related content.
/// Wraps content in an `<article>` element.
#[component]
pub fn Card(children: Element) -> Element {
    rsx! { article { {children} } }
}

//=============================================================================
// Interactive Components
//=============================================================================

#[derive(PartialEq, Clone, Copy, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
    Contrast,
}

impl ButtonType {
    fn class(&self, outline: bool) -> &'static str {
        match (self, outline) {
            (ButtonType::Primary, false) => "",
            (ButtonType::Primary, true) => "outline",
            (ButtonType::Secondary, false) => "secondary",
            (ButtonType::Secondary, true) => "secondary outline",
            (ButtonType::Contrast, false) => "contrast",
            (ButtonType::Contrast, true) => "contrast outline",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
    #[props(default = false)]
    disabled: bool,
    /// Shows Pico's spinner and blocks clicks.
    #[props(default = false)]
    busy: bool,
}

/// A versatile button component.
pub fn Button(props: ButtonProps) -> Element {
    rsx! {
        button {
            class: props.button_type.class(props.outline),
            disabled: props.disabled || props.busy,
            "aria-busy": if props.busy { "true" } else { "false" },
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct TextFieldProps {
    label: String,
    value: String,
    on_input: EventHandler<String>,
    #[props(default = "text".to_string())]
    input_type: String,
    /// Rendered under the field when non-empty; also marks the input invalid.
    #[props(default)]
    error: String,
    #[props(default = false)]
    disabled: bool,
}

/// A labeled form input that reports every keystroke.
pub fn TextField(props: TextFieldProps) -> Element {
    let invalid = !props.error.is_empty();
    rsx! {
        label {
            "{props.label}"
            input {
                r#type: "{props.input_type}",
                value: "{props.value}",
                disabled: props.disabled,
                "aria-invalid": if invalid { "true" } else { "" },
                oninput: move |evt| props.on_input.call(evt.value()),
            }
            if invalid {
                small { "{props.error}" }
            }
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ModalProps {
    title: String,
    on_close: EventHandler<()>,
    children: Element,
}

/// A dialog that closes on its close link, a backdrop click, or Escape.
pub fn Modal(props: ModalProps) -> Element {
    rsx! {
        dialog {
            open: true,
            autofocus: true,
            onclick: move |_| props.on_close.call(()),
            onkeydown: move |evt| {
                if evt.key() == Key::Escape {
                    props.on_close.call(());
                }
            },
            // stops clicks inside the card from reaching the backdrop
            article {
                onclick: |evt| evt.stop_propagation(),
                header {
                    a {
                        href: "#",
                        "aria-label": "Close",
                        class: "close",
                        onclick: move |evt| {
                            evt.prevent_default();
                            props.on_close.call(());
                        },
                    }
                    h3 { style: "margin-bottom: 0;", "{props.title}" }
                }
                {props.children}
            }
        }
    }
}
