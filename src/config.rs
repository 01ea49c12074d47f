use serde::{Deserialize, Serialize};

/// Engine tuning knobs the embedding host can override.
///
/// Every field has a default; hosts usually ship a partial JSON object and
/// rely on the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Initial capacity of the append-only add storage, in bytes.
    #[serde(default = "default_add_capacity")]
    pub add_capacity: usize,

    /// Initial capacity of the piece list.
    #[serde(default = "default_piece_capacity")]
    pub piece_capacity: usize,

    /// Initial capacity of the line-start index.
    #[serde(default = "default_line_capacity")]
    pub line_capacity: usize,

    /// Byte budget for the search register; longer patterns are truncated.
    #[serde(default = "default_search_pattern_bytes")]
    pub max_search_pattern: usize,
}

fn default_add_capacity() -> usize {
    4096
}

fn default_piece_capacity() -> usize {
    64
}

fn default_line_capacity() -> usize {
    1024
}

fn default_search_pattern_bytes() -> usize {
    255
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            add_capacity: default_add_capacity(),
            piece_capacity: default_piece_capacity(),
            line_capacity: default_line_capacity(),
            max_search_pattern: default_search_pattern_bytes(),
        }
    }
}

impl CoreConfig {
    /// Parse a host-supplied JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.add_capacity, 4096);
        assert_eq!(config.piece_capacity, 64);
        assert_eq!(config.line_capacity, 1024);
        assert_eq!(config.max_search_pattern, 255);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = CoreConfig::from_json(r#"{"max_search_pattern": 64}"#).unwrap();
        assert_eq!(config.max_search_pattern, 64);
        assert_eq!(config.add_capacity, 4096);
    }

    #[test]
    fn test_empty_json_is_all_defaults() {
        let config = CoreConfig::from_json("{}").unwrap();
        assert_eq!(config.piece_capacity, CoreConfig::default().piece_capacity);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CoreConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_serializes_and_reparses() {
        let mut config = CoreConfig::default();
        config.line_capacity = 16;
        let json = serde_json::to_string(&config).unwrap();
        let parsed = CoreConfig::from_json(&json).unwrap();
        assert_eq!(parsed.line_capacity, 16);
    }
}
