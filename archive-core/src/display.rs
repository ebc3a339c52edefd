//! Human-readable rendering of location metadata.

use std::fmt;

use crate::model::LocationMetadata;

impl fmt::Display for LocationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coordinates {}°N {}°E", self.latitude, self.longitude)?;
        writeln!(f, "Elevation {} m asl", self.elevation)?;
        writeln!(f, "Timezone {} {}", self.timezone, self.timezone_abbreviation)?;
        write!(f, "Timezone difference to GMT+0 {} s", self.utc_offset_seconds)
    }
}
