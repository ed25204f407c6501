/// Page-level options folded out of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub page: PageOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageOptions {
    pub control: Option<PageControl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Submit,
}

impl PageControl {
    /// Known control values; anything else is inert.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }
}
