use crate::models::episode::Episode;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

/// Ordered episode collection with unique ids. Array order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    episodes: Vec<Episode>,
    ids: HashSet<String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of every id; later duplicates are logged and dropped.
    pub fn from_episodes(episodes: impl IntoIterator<Item = Episode>) -> Self {
        let mut catalog = Self::new();
        for episode in episodes {
            if let Err(duplicate) = catalog.insert(episode) {
                warn!(
                    episode_id = %duplicate.id,
                    "Duplicate episode id, keeping the first occurrence"
                );
            }
        }
        catalog
    }

    /// Appends an episode, handing it back when its id is already present.
    pub fn insert(&mut self, episode: Episode) -> Result<(), Episode> {
        if self.ids.contains(&episode.id) {
            return Err(episode);
        }
        self.ids.insert(episode.id.clone());
        self.episodes.push(episode);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    #[must_use]
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    #[must_use]
    pub fn into_episodes(self) -> Vec<Episode> {
        self.episodes
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    /// First hero-flagged record in array order.
    #[must_use]
    pub fn hero(&self) -> Option<&Episode> {
        self.heroes().next()
    }

    pub fn heroes(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.is_hero())
    }

    pub fn featured(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.is_featured())
    }

    /// Oldest first. An undated record takes the date of the closest dated
    /// record before it, so it stays beside its array neighbours.
    #[must_use]
    pub fn chronological(&self) -> Vec<&Episode> {
        let mut carried: Option<NaiveDate> = None;
        let mut keyed: Vec<(Option<NaiveDate>, &Episode)> = self
            .episodes
            .iter()
            .map(|episode| {
                if let Some(date) = episode.published_on() {
                    carried = Some(date);
                }
                (carried, episode)
            })
            .collect();

        keyed.sort_by_key(|(date, _)| *date);
        keyed.into_iter().map(|(_, episode)| episode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str, date: Option<&str>) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("Title {id}"),
            premise: "Premise.".to_string(),
            video_url: "dQw4w9WgXcQ".to_string(),
            publish_date: date.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut second = episode("a", None);
        second.title = "Second".to_string();

        let catalog = Catalog::from_episodes(vec![episode("a", None), episode("b", None), second]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().title, "Title a");
    }

    #[test]
    fn test_hero_first_found_wins() {
        let mut first = episode("a", None);
        first.hero = Some(true);
        let mut second = episode("b", None);
        second.hero = Some(true);

        let catalog = Catalog::from_episodes(vec![episode("z", None), first, second]);
        assert_eq!(catalog.hero().map(|e| e.id.as_str()), Some("a"));
        assert_eq!(catalog.heroes().count(), 2);
    }

    #[test]
    fn test_featured_in_array_order() {
        let mut a = episode("a", None);
        a.featured = Some(true);
        let mut b = episode("b", None);
        b.featured = Some(false);
        let mut c = episode("c", None);
        c.featured = Some(true);

        let catalog = Catalog::from_episodes(vec![a, b, c]);
        let ids: Vec<&str> = catalog.featured().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_chronological_keeps_undated_with_neighbours() {
        let catalog = Catalog::from_episodes(vec![
            episode("march", Some("2024-03-01")),
            episode("undated", None),
            episode("january", Some("2024-01-01")),
            episode("broken", Some("not a date")),
        ]);

        let ids: Vec<&str> = catalog
            .chronological()
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["january", "broken", "march", "undated"]);
    }
}
