use serde::{Deserialize, Serialize};

/// Episode metadata extracted from a release-group file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFilename {
    /// Release group from the leading bracket tag (e.g., "SubsPlease").
    pub group: String,
    /// Series title with separators and season marker removed.
    pub title: String,
    /// Season marker as written (e.g., "S2", "Season 2", "S01").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    /// Episode number with any version suffix discarded.
    pub episode_number: u32,
    /// Episode digits exactly as they appear in the name (e.g., "07").
    pub padded_episode_number: String,
}

impl ParsedFilename {
    /// Title as it identifies the series on disk, season marker included.
    ///
    /// Two seasons released under the same title stay distinguishable, which
    /// matters once the value is remembered as a file binding.
    pub fn search_title(&self) -> String {
        match &self.season {
            Some(season) => format!("{} {}", self.title, season),
            None => self.title.clone(),
        }
    }

    /// Render the episode number with the padding observed in the file name.
    pub fn render_episode(&self) -> String {
        format!(
            "{:0width$}",
            self.episode_number,
            width = self.padded_episode_number.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_omitted_when_absent() {
        let parsed = ParsedFilename {
            group: "Erai-raws".into(),
            title: "Dungeon Meshi".into(),
            season: None,
            episode_number: 3,
            padded_episode_number: "03".into(),
        };
        let json = serde_json::to_value(&parsed).unwrap();
        assert!(json.get("season").is_none());
        assert_eq!(json["episode_number"], 3);
        assert_eq!(parsed.search_title(), "Dungeon Meshi");
    }
}
