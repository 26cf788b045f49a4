use std::fmt;

use serde::Serialize;

use super::patterns::{EXTERIOR_TOKEN, INTERIOR_TOKEN, SCENE_HEADER};

/// Interior or exterior, written as a single fixed token in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocationKind {
    Interior,
    Exterior,
}

impl LocationKind {
    /// Both legal kinds, interior first.
    pub const ALL: [LocationKind; 2] = [LocationKind::Interior, LocationKind::Exterior];

    pub fn token(self) -> &'static str {
        match self {
            LocationKind::Interior => INTERIOR_TOKEN,
            LocationKind::Exterior => EXTERIOR_TOKEN,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            INTERIOR_TOKEN => Some(LocationKind::Interior),
            EXTERIOR_TOKEN => Some(LocationKind::Exterior),
            _ => None,
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A parsed scene header line: `1-2 日 内 客厅`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneHeader {
    pub episode: u32,
    pub scene: u32,
    pub time: String,
    pub location_kind: LocationKind,
    pub location: String,
}

impl SceneHeader {
    /// The `(episode, scene)` key.
    pub fn number(&self) -> SceneNumber {
        SceneNumber {
            episode: self.episode,
            scene: self.scene,
        }
    }
}

/// Formats back into the canonical header line. For headers whose time has no
/// whitespace and whose location is trimmed, `parse_header` inverts this.
impl fmt::Display for SceneHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} {} {}",
            self.episode, self.scene, self.time, self.location_kind, self.location
        )
    }
}

/// An `(episode, scene)` pair, ordered episode first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SceneNumber {
    pub episode: u32,
    pub scene: u32,
}

impl SceneNumber {
    pub fn new(episode: u32, scene: u32) -> Self {
        Self { episode, scene }
    }
}

impl fmt::Display for SceneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.episode, self.scene)
    }
}

/// Parses a full scene header, or `None` when the line does not match the
/// grammar. Numbers too large for `u32` are treated as not matching.
pub fn parse_header(line: &str) -> Option<SceneHeader> {
    let caps = SCENE_HEADER.captures(line.trim())?;

    Some(SceneHeader {
        episode: caps[1].parse().ok()?,
        scene: caps[2].parse().ok()?,
        time: caps[3].to_string(),
        location_kind: LocationKind::from_token(&caps[4])?,
        location: caps[5].trim().to_string(),
    })
}

/// Replaces the number pair at the start of a header line, keeping the rest
/// of the line byte for byte. Returns `None` if the line has no number pair.
pub fn with_scene_number(line: &str, number: SceneNumber) -> Option<String> {
    let start = line.len() - line.trim_start().len();
    let caps = super::patterns::SCENE_NUMBER_PREFIX.captures(&line[start..])?;
    let end = start + caps.get(0)?.end();
    Some(format!("{}{}{}", &line[..start], number, &line[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_header_fields() {
        let header = parse_header("1-2 日 内 客厅").unwrap();
        assert_eq!(
            header,
            SceneHeader {
                episode: 1,
                scene: 2,
                time: "日".to_string(),
                location_kind: LocationKind::Interior,
                location: "客厅".to_string(),
            }
        );
    }

    #[test]
    fn test_location_runs_to_end_of_line() {
        let header = parse_header("  3-14 黄昏 外 老街 拐角处  ").unwrap();
        assert_eq!(header.location, "老街 拐角处");
        assert_eq!(header.location_kind, LocationKind::Exterior);
    }

    #[test]
    fn test_numbers_keep_decimal_value() {
        let header = parse_header("007-010 夜 内 密室").unwrap();
        assert_eq!(header.number(), SceneNumber::new(7, 10));
    }

    #[rstest]
    #[case("")]
    #[case("3-2")]
    #[case("3-2 日")]
    #[case("3-2 日 内")]
    #[case("3-2 日 中 客厅")]
    #[case("-1-2 日 内 客厅")]
    #[case("a-2 日 内 客厅")]
    #[case("99999999999-1 日 内 客厅")]
    fn test_parse_header_rejects(#[case] line: &str) {
        assert_eq!(parse_header(line), None);
    }

    #[rstest]
    #[case(1, 1, "日", LocationKind::Interior, "客厅")]
    #[case(12, 40, "清晨", LocationKind::Exterior, "海边 礁石")]
    #[case(3, 7, "夜", LocationKind::Exterior, "城门（远景）")]
    fn test_format_then_parse_round_trips(
        #[case] episode: u32,
        #[case] scene: u32,
        #[case] time: &str,
        #[case] location_kind: LocationKind,
        #[case] location: &str,
    ) {
        let header = SceneHeader {
            episode,
            scene,
            time: time.to_string(),
            location_kind,
            location: location.to_string(),
        };
        assert_eq!(parse_header(&header.to_string()), Some(header));
    }

    #[test]
    fn test_with_scene_number_preserves_rest_of_line() {
        assert_eq!(
            with_scene_number("  1-2  日 内 客厅", SceneNumber::new(1, 3)).as_deref(),
            Some("  1-3  日 内 客厅")
        );
        assert_eq!(with_scene_number("客厅", SceneNumber::new(1, 3)), None);
    }
}
