//! Rule-based per-criterion scorers and the weighted blend.
//!
//! Each criterion is scaled to its own maximum (proficiency 5.0, time 3.0,
//! location 1.0) and the blend weights them without re-normalizing; the
//! 0.5/0.3/0.1/0.1 weights double as scale compression. That asymmetry is a
//! deliberate characteristic of the scoring design.

pub mod combined;
pub mod location;
pub mod proficiency;
pub mod time;


pub use combined::{combine_scores, rank_descending};
pub use location::score_location;
pub use proficiency::{proficiency_level_weight, score_proficiency};
pub use time::{TemporalKeyword, parse_weekly_hours, score_time};
