//! Parse and serialize behaviour of the catalog text format.

use reelsync::models::episode::Episode;
use reelsync::parser::{RecordParser, parse, serialize};

fn clean_episodes() -> Vec<Episode> {
    vec![
        Episode {
            id: "grid-down".to_string(),
            title: "Grid Down".to_string(),
            premise: "The regional grid fails for a week. Who keeps the lights on?".to_string(),
            runtime: Some("15:33".to_string()),
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string()),
            publish_date: Some("2024-01-15".to_string()),
            key_insight: Some("Local storage beats long supply chains.".to_string()),
            featured: Some(true),
            hero: Some(true),
            category: Some("Energy".to_string()),
        },
        Episode {
            id: "dry-taps".to_string(),
            title: "Dry Taps".to_string(),
            premise: "Water stops flowing in a city of two million.".to_string(),
            video_url: "https://youtu.be/M7lc1UVf-VE".to_string(),
            featured: Some(false),
            ..Default::default()
        },
        Episode {
            id: "cold-chain".to_string(),
            title: "Cold Chain".to_string(),
            premise: "Refrigerated trucks stop at the border.".to_string(),
            runtime: Some("1:02:03".to_string()),
            video_url: "https://youtu.be/kJQP7kiw5Fk".to_string(),
            publish_date: Some("2024-03-02T09:30:00Z".to_string()),
            ..Default::default()
        },
    ]
}

#[test]
fn test_round_trip_preserves_clean_records() {
    let episodes = clean_episodes();
    let text = serialize(&episodes);

    assert_eq!(parse(&text).unwrap(), episodes);
}

#[test]
fn test_serialize_parse_serialize_is_fixed_point() {
    let first = serialize(&clean_episodes());
    let second = serialize(&parse(&first).unwrap());

    assert_eq!(first, second);
}

#[test]
fn test_escaping_recovers_exact_text() {
    let tricky = "C:\\temp\\new 'quoted' line\nnext\tcolumn\r\nend \\' mixed";
    let episodes = vec![Episode {
        key_insight: Some(tricky.to_string()),
        category: Some("it's \\n literal".to_string()),
        ..clean_episodes().remove(1)
    }];

    let text = serialize(&episodes);
    let parsed = RecordParser::default().without_repair().parse(&text).unwrap();

    assert_eq!(parsed[0].key_insight.as_deref(), Some(tricky));
    assert_eq!(parsed[0].category.as_deref(), Some("it's \\n literal"));
}

#[test]
fn test_record_without_title_is_dropped() {
    let mut episodes = clean_episodes();
    episodes[1].title = String::new();
    let candidates = episodes.len();

    let parsed = parse(&serialize(&episodes)).unwrap();

    assert_eq!(parsed.len(), candidates - 1);
    assert!(parsed.iter().all(|episode| episode.id != "dry-taps"));
}

#[test]
fn test_legacy_corruption_repaired_on_parse() {
    let text = r"export const scenarios = [
  {
    id: 'echo',
    title: 'Alpha Beta Alpha Beta',
    premise: 'The system will fail when power drops. This is tested further. But',
    videoUrl: 'https://youtu.be/9bZkp7q19f0',
  },
];";

    let episodes = parse(text).unwrap();

    assert_eq!(episodes[0].title, "Alpha Beta");
    assert_eq!(
        episodes[0].premise,
        "The system will fail when power drops. This is tested further."
    );
}

#[test]
fn test_hand_edited_file_with_comments() {
    let text = r#"// Catalog maintained by hand
import type { Scenario } from './types';

export const scenarios: Scenario[] = [
  // newest first
  {
    id: "grid-down", // keep this id stable
    title: "Grid Down",
    premise: "Brackets ] and braces } inside strings are fine.",
    videoUrl: "https://youtu.be/dQw4w9WgXcQ",
    /* hero: true, */
  },
];
"#;

    let episodes = parse(text).unwrap();

    assert_eq!(episodes.len(), 1);
    assert_eq!(
        episodes[0].premise,
        "Brackets ] and braces } inside strings are fine."
    );
    assert_eq!(episodes[0].hero, None);
}

#[test]
fn test_braces_and_id_key_inside_string_stay_in_record() {
    let episodes = vec![Episode {
        key_insight: Some("Pin it like {name, id: 42} everywhere.".to_string()),
        featured: Some(true),
        category: Some("Infra".to_string()),
        ..clean_episodes().remove(1)
    }];

    let parsed = parse(&serialize(&episodes)).unwrap();

    assert_eq!(parsed, episodes);
}

#[test]
fn test_commented_out_record_is_ignored() {
    let text = r"export const scenarios = [
  // { id: 'retired', title: 'Retired', premise: 'Gone.', videoUrl: 'dQw4w9WgXcQ' },
  { id: 'live', title: 'Live', premise: 'Still here.', videoUrl: 'kJQP7kiw5Fk' },
];";

    let episodes = parse(text).unwrap();

    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].id, "live");
}
