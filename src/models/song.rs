//! 歌曲数据模型

use serde::{Deserialize, Serialize};

/// 歌曲
///
/// 对应歌曲目录 JSON 中的一项。`lyrics` 每个元素是一行歌词，可以为空行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    pub lyrics: Vec<String>,
}

impl Song {
    /// 有效的歌手名（`None` 或空白视为没有）
    pub fn valid_artist(&self) -> Option<&str> {
        valid_artist(self.artist.as_deref())
    }

    /// 列表中显示的名称：`标题 - 歌手` 或 `标题`
    pub fn display_name(&self) -> String {
        match self.valid_artist() {
            Some(artist) => format!("{} - {}", self.title, artist),
            None => self.title.clone(),
        }
    }

    /// 标题或歌手是否包含查询词（不区分大小写）
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        if self.title.to_lowercase().contains(&query) {
            return true;
        }
        self.valid_artist()
            .map(|artist| artist.to_lowercase().contains(&query))
            .unwrap_or(false)
    }
}

/// 歌手名为 `None` 或空白时返回 `None`
pub fn valid_artist(artist: Option<&str>) -> Option<&str> {
    artist.filter(|a| !a.trim().is_empty())
}

/// 按查询词过滤歌曲列表，空查询返回全部
pub fn filter_songs<'a>(songs: &'a [Song], query: &str) -> Vec<&'a Song> {
    songs.iter().filter(|song| song.matches(query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: Option<&str>) -> Song {
        Song {
            id: title.to_lowercase(),
            title: title.to_string(),
            artist: artist.map(str::to_string),
            lyrics: vec!["la".to_string()],
        }
    }

    #[test]
    fn display_name_with_and_without_artist() {
        assert_eq!(
            song("Amazing Grace", Some("John Newton")).display_name(),
            "Amazing Grace - John Newton"
        );
        assert_eq!(song("Amazing Grace", Some("   ")).display_name(), "Amazing Grace");
        assert_eq!(song("Amazing Grace", None).display_name(), "Amazing Grace");
    }

    #[test]
    fn filter_matches_title_or_artist_case_insensitive() {
        let songs = vec![
            song("Amazing Grace", Some("John Newton")),
            song("Be Thou My Vision", None),
            song("Holy, Holy, Holy", Some("Reginald Heber")),
        ];

        let by_title = filter_songs(&songs, "  GRACE ");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Amazing Grace");

        let by_artist = filter_songs(&songs, "heber");
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].title, "Holy, Holy, Holy");

        assert_eq!(filter_songs(&songs, "").len(), 3);
        assert!(filter_songs(&songs, "nothing here").is_empty());
    }

    #[test]
    fn deserialize_without_artist_field() {
        let json = r#"{"id":"1","title":"T","lyrics":["a",""]}"#;
        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.artist, None);
        assert_eq!(song.lyrics.len(), 2);
    }
}
