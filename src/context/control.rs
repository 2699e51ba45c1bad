//! Who controls each side.

use serde::{Deserialize, Serialize};

/// Controller of one side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControlMode {
    /// Moves come from the user interface.
    #[default]
    Human,
    /// Moves come from a background search.
    Computer,
    /// Nobody moves for this side; the game idles on its turn.
    None,
}

impl ControlMode {
    /// True for [`ControlMode::Computer`].
    pub fn is_computer(self) -> bool {
        matches!(self, ControlMode::Computer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("computer".parse::<ControlMode>(), Ok(ControlMode::Computer));
        assert_eq!("none".parse::<ControlMode>(), Ok(ControlMode::None));
        assert!("robot".parse::<ControlMode>().is_err());
        assert_eq!(ControlMode::Human.to_string(), "human");
    }
}
