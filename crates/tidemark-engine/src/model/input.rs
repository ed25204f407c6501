/// A form input extracted from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub value: Option<String>,
    pub content: InputContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputContent {
    /// Carries a value into the form without rendering.
    Hidden,
    /// A pressable button labelled by the element body.
    Button { label: String },
    /// A status line; `ready` flips once the element's close tag arrived.
    Appearance {
        text: String,
        run_immediately: bool,
        ready: bool,
    },
}
