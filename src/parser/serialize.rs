//! Canonical rendering of the catalog module.

use super::Layout;
use crate::models::episode::Episode;

const BANNER: &str = "// This file is generated by reelsync. Edit records through the catalog\n// source and run `reelsync sync` to refresh it.\n";

/// Renders with the default layout.
#[must_use]
pub fn serialize(episodes: &[Episode]) -> String {
    serialize_with(episodes, &Layout::default())
}

/// Renders the full module: interface, record array and derived exports.
/// Output depends only on the input, in input order.
#[must_use]
pub fn serialize_with(episodes: &[Episode], layout: &Layout) -> String {
    let mut out = String::from(BANNER);
    out.push('\n');
    push_interface(&mut out, layout);
    out.push('\n');

    let declaration = format!(
        "export const {}: {}[] = [",
        layout.array_name, layout.type_name
    );
    if episodes.is_empty() {
        out.push_str(&format!("{declaration}];\n"));
    } else {
        out.push_str(&declaration);
        out.push('\n');
        for episode in episodes {
            push_record(&mut out, episode);
        }
        out.push_str("];\n");
    }

    out.push('\n');
    out.push_str(&format!(
        "export const {featured}: {ty}[] = {array}.filter((entry) => entry.featured);\n",
        featured = layout.featured_name(),
        ty = layout.type_name,
        array = layout.array_name,
    ));
    out.push('\n');
    out.push_str(&format!(
        "export const {hero}: {ty} | undefined = {array}.find((entry) => entry.hero);\n",
        hero = layout.hero_name(),
        ty = layout.type_name,
        array = layout.array_name,
    ));

    out
}

/// Escapes a value for a single-quoted literal. Backslash goes first so the
/// escapes added afterwards are not escaped again.
#[must_use]
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn push_interface(out: &mut String, layout: &Layout) {
    out.push_str(&format!("export interface {} {{\n", layout.type_name));
    for (name, ty) in [
        ("id", "string"),
        ("title", "string"),
        ("premise", "string"),
        ("runtime?", "string"),
        ("videoUrl", "string"),
        ("thumbnailUrl?", "string"),
        ("publishDate?", "string"),
        ("keyInsight?", "string"),
        ("featured?", "boolean"),
        ("hero?", "boolean"),
        ("category?", "string"),
    ] {
        out.push_str(&format!("  {name}: {ty};\n"));
    }
    out.push_str("}\n");
}

fn push_record(out: &mut String, episode: &Episode) {
    out.push_str("  {\n");
    push_text(out, "id", Some(episode.id.as_str()));
    push_text(out, "title", Some(episode.title.as_str()));
    push_text(out, "premise", Some(episode.premise.as_str()));
    push_text(out, "runtime", episode.runtime.as_deref());
    push_text(out, "videoUrl", Some(episode.video_url.as_str()));
    push_text(out, "thumbnailUrl", episode.thumbnail_url.as_deref());
    push_text(out, "publishDate", episode.publish_date.as_deref());
    push_text(out, "keyInsight", episode.key_insight.as_deref());
    push_flag(out, "featured", episode.featured);
    push_flag(out, "hero", episode.hero);
    push_text(out, "category", episode.category.as_deref());
    out.push_str("  },\n");
}

fn push_text(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("    {key}: '{}',\n", escape(value)));
    }
}

fn push_flag(out: &mut String, key: &str, value: Option<bool>) {
    if let Some(value) = value {
        out.push_str(&format!("    {key}: {value},\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Episode {
        Episode {
            id: "grid-down".to_string(),
            title: "Grid Down".to_string(),
            premise: "The regional grid fails for a week.".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            featured: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(escape(r"a\'b"), r"a\\\'b");
        assert_eq!(escape("line\nnext\r\tend"), r"line\nnext\r\tend");
        assert_eq!(escape(r"\n"), r"\\n");
    }

    #[test]
    fn test_record_omits_absent_fields() {
        let out = serialize(&[episode()]);
        assert!(out.contains("    id: 'grid-down',\n"));
        assert!(out.contains("    featured: false,\n"));
        assert!(!out.contains("    runtime:"));
        assert!(!out.contains("    hero:"));
        assert!(!out.contains("null"));
    }

    #[test]
    fn test_module_shape() {
        let out = serialize(&[episode()]);
        assert!(out.starts_with("// This file is generated by reelsync."));
        assert!(out.contains("export interface Scenario {\n"));
        assert!(out.contains("export const scenarios: Scenario[] = [\n  {\n"));
        assert!(out.contains(
            "export const featuredScenarios: Scenario[] = scenarios.filter((entry) => entry.featured);"
        ));
        assert!(out.contains(
            "export const heroScenario: Scenario | undefined = scenarios.find((entry) => entry.hero);"
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let out = serialize(&[]);
        assert!(out.contains("export const scenarios: Scenario[] = [];\n"));
    }

    #[test]
    fn test_deterministic() {
        let episodes = vec![episode(), Episode { id: "b".to_string(), ..episode() }];
        assert_eq!(serialize(&episodes), serialize(&episodes));
    }
}
