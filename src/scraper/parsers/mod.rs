//! HTML parsers for basketball-reference.com pages.

pub mod extract;
pub mod player;
pub mod players_index;
pub mod team;

pub use player::{PlayerParser, PlayerRecord, SeasonStatRow};
pub use players_index::{IndexEntry, PlayersIndexParser};
pub use team::{TeamParser, TeamRecord};
