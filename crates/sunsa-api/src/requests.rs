//! Request bodies for the API

use serde::{Deserialize, Serialize};

use crate::device::Position;

/// Body of `PUT devices/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub position: Position,
}

impl PositionUpdate {
    #[must_use]
    pub fn new(position: impl Into<Position>) -> Self {
        Self {
            position: position.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_update_body() {
        let body = serde_json::to_value(PositionUpdate::new(-30)).unwrap();
        assert_eq!(body, json!({ "position": -30 }));
    }

    #[test]
    fn test_out_of_range_position_is_forwarded() {
        let body = serde_json::to_value(PositionUpdate::new(250)).unwrap();
        assert_eq!(body, json!({ "position": 250 }));
    }
}
