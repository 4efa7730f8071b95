// Supported competitions.
// League codes, display metadata, qualification/relegation zones and status labels.

use serde::Serialize;

use crate::football::MatchStatus;

/// A competition the application follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum League {
    #[default]
    PremierLeague,
    Bundesliga,
    SerieA,
    LaLiga,
    Ligue1,
    ChampionsLeague,
}

/// Display metadata for a league, as served by the API.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub emblem: String,
}

/// Table zone a position falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Champions,
    Europa,
    Conference,
    RelegationPlayoff,
    Relegation,
}

/// Positions belonging to each zone for one league.
#[derive(Debug, Clone, Copy)]
pub struct PositionZones {
    pub champions: &'static [u32],
    pub europa: &'static [u32],
    pub conference: &'static [u32],
    pub relegation_playoff: &'static [u32],
    pub relegation: &'static [u32],
}

impl PositionZones {
    pub fn zone_for(&self, position: u32) -> Option<Zone> {
        if self.champions.contains(&position) {
            Some(Zone::Champions)
        } else if self.europa.contains(&position) {
            Some(Zone::Europa)
        } else if self.conference.contains(&position) {
            Some(Zone::Conference)
        } else if self.relegation_playoff.contains(&position) {
            Some(Zone::RelegationPlayoff)
        } else if self.relegation.contains(&position) {
            Some(Zone::Relegation)
        } else {
            None
        }
    }
}

// 2025-26 season rules
const PL_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3, 4],
    europa: &[5],
    conference: &[6],
    relegation_playoff: &[],
    relegation: &[18, 19, 20],
};

const BL1_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3, 4],
    europa: &[5],
    conference: &[6],
    relegation_playoff: &[16],
    relegation: &[17, 18],
};

const SA_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3, 4],
    europa: &[5],
    conference: &[6],
    relegation_playoff: &[],
    relegation: &[18, 19, 20],
};

const PD_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3, 4],
    europa: &[5, 6],
    conference: &[7],
    relegation_playoff: &[],
    relegation: &[18, 19, 20],
};

const FL1_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3],
    europa: &[4],
    conference: &[5],
    relegation_playoff: &[16],
    relegation: &[17, 18],
};

// League phase: 1-8 straight to the round of 16, 9-24 knockout play-offs, 25-36 out
const CL_ZONES: PositionZones = PositionZones {
    champions: &[1, 2, 3, 4, 5, 6, 7, 8],
    europa: &[
        9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
    ],
    conference: &[],
    relegation_playoff: &[],
    relegation: &[
        25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36,
    ],
};

impl League {
    pub const ALL: [League; 6] = [
        League::PremierLeague,
        League::Bundesliga,
        League::SerieA,
        League::LaLiga,
        League::Ligue1,
        League::ChampionsLeague,
    ];

    /// football-data.org competition code.
    pub fn code(&self) -> &'static str {
        match self {
            League::PremierLeague => "PL",
            League::Bundesliga => "BL1",
            League::SerieA => "SA",
            League::LaLiga => "PD",
            League::Ligue1 => "FL1",
            League::ChampionsLeague => "CL",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            League::PremierLeague => "Premier League",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie A",
            League::LaLiga => "La Liga",
            League::Ligue1 => "Ligue 1",
            League::ChampionsLeague => "UEFA Champions League",
        }
    }

    pub fn country(&self) -> &'static str {
        match self {
            League::PremierLeague => "England",
            League::Bundesliga => "Germany",
            League::SerieA => "Italy",
            League::LaLiga => "Spain",
            League::Ligue1 => "France",
            League::ChampionsLeague => "Europe",
        }
    }

    pub fn emblem(&self) -> String {
        format!("https://crests.football-data.org/{}.png", self.code())
    }

    pub fn info(&self) -> LeagueInfo {
        LeagueInfo {
            code: self.code(),
            name: self.name(),
            country: self.country(),
            emblem: self.emblem(),
        }
    }

    pub fn from_code(code: &str) -> Option<League> {
        League::ALL.into_iter().find(|league| league.code() == code)
    }

    /// Whether the table is a single-round league phase rather than a domestic season.
    pub fn is_league_phase(&self) -> bool {
        matches!(self, League::ChampionsLeague)
    }

    pub fn zones(&self) -> &'static PositionZones {
        match self {
            League::PremierLeague => &PL_ZONES,
            League::Bundesliga => &BL1_ZONES,
            League::SerieA => &SA_ZONES,
            League::LaLiga => &PD_ZONES,
            League::Ligue1 => &FL1_ZONES,
            League::ChampionsLeague => &CL_ZONES,
        }
    }

    /// Human-readable zone description for a table position, if it is in one.
    pub fn zone_label(&self, position: u32) -> Option<&'static str> {
        let zone = self.zones().zone_for(position)?;
        let label = if self.is_league_phase() {
            match zone {
                Zone::Champions => "direct round-of-16 place",
                Zone::Europa => "knockout play-off place",
                _ => "elimination zone",
            }
        } else {
            match zone {
                Zone::Champions => "Champions League place",
                Zone::Europa => "Europa League place",
                Zone::Conference => "Conference League place",
                Zone::RelegationPlayoff => "relegation play-off place",
                Zone::Relegation => "relegation zone",
            }
        };
        Some(label)
    }
}

pub fn is_valid_league_code(code: &str) -> bool {
    League::from_code(code).is_some()
}

/// Resolve a league code, falling back to the default league when missing or unknown.
pub fn validate_league_code(code: Option<&str>) -> League {
    code.and_then(League::from_code).unwrap_or_default()
}

/// Short display label for a match status.
pub fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Scheduled | MatchStatus::Timed => "Scheduled",
        MatchStatus::InPlay => "Live",
        MatchStatus::Paused => "HT",
        MatchStatus::Finished => "FT",
        MatchStatus::Suspended => "Suspended",
        MatchStatus::Postponed => "Postponed",
        MatchStatus::Cancelled => "Cancelled",
        MatchStatus::Awarded => "Awarded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for league in League::ALL {
            assert_eq!(League::from_code(league.code()), Some(league));
        }
        assert_eq!(League::from_code("pl"), None);
        assert!(is_valid_league_code("FL1"));
        assert!(!is_valid_league_code("MLS"));
    }

    #[test]
    fn test_validate_falls_back_to_default() {
        assert_eq!(validate_league_code(None), League::PremierLeague);
        assert_eq!(validate_league_code(Some("XYZ")), League::PremierLeague);
        assert_eq!(validate_league_code(Some("SA")), League::SerieA);
    }

    #[test]
    fn test_zones() {
        let pl = League::PremierLeague.zones();
        assert_eq!(pl.zone_for(4), Some(Zone::Champions));
        assert_eq!(pl.zone_for(6), Some(Zone::Conference));
        assert_eq!(pl.zone_for(10), None);
        assert_eq!(pl.zone_for(18), Some(Zone::Relegation));

        assert_eq!(
            League::Bundesliga.zones().zone_for(16),
            Some(Zone::RelegationPlayoff)
        );
        assert_eq!(League::LaLiga.zones().zone_for(6), Some(Zone::Europa));
    }

    #[test]
    fn test_zone_labels() {
        assert_eq!(
            League::ChampionsLeague.zone_label(8),
            Some("direct round-of-16 place")
        );
        assert_eq!(
            League::ChampionsLeague.zone_label(24),
            Some("knockout play-off place")
        );
        assert_eq!(League::ChampionsLeague.zone_label(25), Some("elimination zone"));
        assert_eq!(League::Ligue1.zone_label(17), Some("relegation zone"));
        assert_eq!(League::SerieA.zone_label(12), None);
    }

    #[test]
    fn test_info() {
        let info = League::ChampionsLeague.info();
        assert_eq!(info.code, "CL");
        assert_eq!(info.emblem, "https://crests.football-data.org/CL.png");
        assert_eq!(status_label(MatchStatus::Paused), "HT");
    }
}
