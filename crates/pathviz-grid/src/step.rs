//! [`Step`]: one frame of solver progress.

use pathviz_core::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// A snapshot of the solver's open and closed sets after expanding
/// `current_node`. The final step of a successful search is complete and
/// carries the path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub current_node: Point,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub open_set: Vec<Point>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub closed_set: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Point>>,
    #[serde(default)]
    pub is_complete: bool,
}

impl Step {
    /// The path to draw for this step: present only on a complete step.
    pub fn final_path(&self) -> Option<&[Point]> {
        if self.is_complete {
            self.path.as_deref()
        } else {
            None
        }
    }
}

/// Decode a JSON array that may also be `null` (a nil slice on the server).
pub fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(d).map(Option::unwrap_or_default)
}
