use std::fmt::Display;

/// Format whole seconds as `MM:SS`. Minutes keep counting past 59, there is
/// no hour field.
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed time as the device reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Elapsed {
    pub seconds: u32,
}

impl From<u32> for Elapsed {
    fn from(seconds: u32) -> Self {
        Self { seconds }
    }
}

impl Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_elapsed(self.seconds))
    }
}
