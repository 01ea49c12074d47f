use std::fmt;

/// Editor input mode. The host decodes keys and requests transitions; the
/// core stores the mode and applies the selection side effects of entering
/// and leaving visual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    Command,
    Search,
}

impl Mode {
    /// Stable numeric code used across the host boundary.
    pub fn code(self) -> u8 {
        match self {
            Mode::Normal => 0,
            Mode::Insert => 1,
            Mode::Visual => 2,
            Mode::Command => 3,
            Mode::Search => 4,
        }
    }

    /// Mode for a host-side code, if valid.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Mode::Normal),
            1 => Some(Mode::Insert),
            2 => Some(Mode::Visual),
            3 => Some(Mode::Command),
            4 => Some(Mode::Search),
            _ => None,
        }
    }

    /// Uppercase display name, as status lines show it.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in 0..=4 {
            assert_eq!(Mode::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Mode::from_code(5), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Mode::Normal.name(), "NORMAL");
        assert_eq!(Mode::Search.to_string(), "SEARCH");
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
