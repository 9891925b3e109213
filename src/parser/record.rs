//! Decoding episode records out of the catalog text.
//!
//! Record bodies are read with the object grammar first. Bodies that do not
//! follow it (hand edits, half-applied replacements) are salvaged field by
//! field instead, so a single damaged record never fails the whole file.

use super::lexer::{self, LexError, Token};
use super::repair::repair_text;
use super::{Layout, ParseError, scan};
use crate::models::catalog::Catalog;
use crate::models::episode::Episode;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Result of decoding a catalog text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Complete records, first occurrence of each id, in array order.
    pub episodes: Vec<Episode>,
    /// Ids (or `#index` when the id itself is missing) of dropped incomplete records.
    pub incomplete: Vec<String>,
    /// Ids seen more than once; only the first occurrence is kept.
    pub duplicates: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecordParser {
    layout: Layout,
    repair: bool,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl RecordParser {
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self {
            layout,
            repair: true,
        }
    }

    /// Keeps title and premise exactly as written.
    #[must_use]
    pub fn without_repair(mut self) -> Self {
        self.repair = false;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Episode>, ParseError> {
        Ok(self.decode(text)?.episodes)
    }

    pub fn decode(&self, text: &str) -> Result<Decoded, ParseError> {
        let range = scan::locate_array(text, &self.layout.array_name)?;
        let content = &text[range];

        let mut catalog = Catalog::new();
        let mut decoded = Decoded::default();

        for (index, span) in scan::record_spans(content).into_iter().enumerate() {
            let episode = decode_fields(&content[span]).into_episode(self.repair);

            if !episode.is_complete() {
                debug!(index, episode_id = %episode.id, "Dropping incomplete record");
                decoded.incomplete.push(if episode.id.trim().is_empty() {
                    format!("#{index}")
                } else {
                    episode.id
                });
                continue;
            }

            if let Err(duplicate) = catalog.insert(episode) {
                warn!(
                    episode_id = %duplicate.id,
                    "Duplicate episode id, keeping the first occurrence"
                );
                decoded.duplicates.push(duplicate.id);
            }
        }

        decoded.episodes = catalog.into_episodes();
        Ok(decoded)
    }
}

/// Parses with the default layout, repairing title and premise.
pub fn parse(text: &str) -> Result<Vec<Episode>, ParseError> {
    RecordParser::default().parse(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    Id,
    Title,
    Premise,
    Runtime,
    VideoUrl,
    ThumbnailUrl,
    PublishDate,
    KeyInsight,
    Featured,
    Hero,
    Category,
}

impl FieldKey {
    fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "id" => Self::Id,
            "title" => Self::Title,
            "premise" => Self::Premise,
            "runtime" | "duration" => Self::Runtime,
            "videoUrl" | "url" | "youtubeUrl" => Self::VideoUrl,
            "thumbnailUrl" | "thumbnail" => Self::ThumbnailUrl,
            "publishDate" | "publishedAt" | "date" => Self::PublishDate,
            "keyInsight" => Self::KeyInsight,
            "featured" => Self::Featured,
            "hero" => Self::Hero,
            "category" => Self::Category,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Str(String),
    Number(String),
    Bool(bool),
    Null,
    /// Nested literal or expression; never mapped onto a field.
    Other,
}

impl Value {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Str(text) | Self::Number(text) => Some(text),
            Self::Bool(_) | Self::Null | Self::Other => None,
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Str(text) => text.parse().ok(),
            Self::Number(_) | Self::Null | Self::Other => None,
        }
    }
}

#[derive(Debug, Default)]
struct Fields {
    id: Option<String>,
    title: Option<String>,
    premise: Option<String>,
    runtime: Option<String>,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    publish_date: Option<String>,
    key_insight: Option<String>,
    featured: Option<bool>,
    hero: Option<bool>,
    category: Option<String>,
}

impl Fields {
    fn assign(&mut self, key: FieldKey, value: Value) {
        match key {
            FieldKey::Id => self.id = value.into_text(),
            FieldKey::Title => self.title = value.into_text(),
            FieldKey::Premise => self.premise = value.into_text(),
            FieldKey::Runtime => self.runtime = value.into_text(),
            FieldKey::VideoUrl => self.video_url = value.into_text(),
            FieldKey::ThumbnailUrl => self.thumbnail_url = value.into_text(),
            FieldKey::PublishDate => self.publish_date = value.into_text(),
            FieldKey::KeyInsight => self.key_insight = value.into_text(),
            FieldKey::Featured => self.featured = value.as_flag(),
            FieldKey::Hero => self.hero = value.as_flag(),
            FieldKey::Category => self.category = value.into_text(),
        }
    }

    fn is_set(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::Id => self.id.is_some(),
            FieldKey::Title => self.title.is_some(),
            FieldKey::Premise => self.premise.is_some(),
            FieldKey::Runtime => self.runtime.is_some(),
            FieldKey::VideoUrl => self.video_url.is_some(),
            FieldKey::ThumbnailUrl => self.thumbnail_url.is_some(),
            FieldKey::PublishDate => self.publish_date.is_some(),
            FieldKey::KeyInsight => self.key_insight.is_some(),
            FieldKey::Featured => self.featured.is_some(),
            FieldKey::Hero => self.hero.is_some(),
            FieldKey::Category => self.category.is_some(),
        }
    }

    fn into_episode(self, repair: bool) -> Episode {
        let clean = |text: String| if repair { repair_text(&text) } else { text };

        Episode {
            id: self.id.unwrap_or_default(),
            title: self.title.map(clean).unwrap_or_default(),
            premise: self.premise.map(clean).unwrap_or_default(),
            runtime: self.runtime,
            video_url: self.video_url.unwrap_or_default(),
            thumbnail_url: self.thumbnail_url,
            publish_date: self.publish_date,
            key_insight: self.key_insight,
            featured: self.featured,
            hero: self.hero,
            category: self.category,
        }
    }
}

fn decode_fields(body: &str) -> Fields {
    match decode_grammar(body) {
        Ok(fields) => fields,
        Err(err) => {
            debug!(error = %err, "Record does not follow the object grammar, salvaging fields");
            decode_salvage(body)
        }
    }
}

#[derive(Debug, Error)]
enum GrammarError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
}

fn unexpected(expected: &'static str, found: Option<&Token<'_>>) -> GrammarError {
    GrammarError::Unexpected {
        expected,
        found: found.map_or_else(|| "end of record".to_string(), |token| format!("{token:?}")),
    }
}

fn decode_grammar(body: &str) -> Result<Fields, GrammarError> {
    let tokens = lexer::tokenize(body)?;
    let mut stream = TokenStream { tokens: &tokens, pos: 0 };

    let pairs = stream.object()?;
    if let Some(extra) = stream.next() {
        return Err(unexpected("end of record", Some(extra)));
    }

    let mut fields = Fields::default();
    for (key, value) in pairs {
        if let Some(field) = FieldKey::from_key(&key) {
            fields.assign(field, value);
        }
    }
    Ok(fields)
}

/// Recursive-descent reader over a record's tokens.
struct TokenStream<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> TokenStream<'t, 'a> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, wanted: &Token<'a>, label: &'static str) -> Result<(), GrammarError> {
        match self.next() {
            Some(token) if token == wanted => Ok(()),
            other => Err(unexpected(label, other)),
        }
    }

    fn object(&mut self) -> Result<Vec<(String, Value)>, GrammarError> {
        self.expect(&Token::LBrace, "`{`")?;
        let mut pairs = Vec::new();

        loop {
            if self.peek() == Some(&Token::RBrace) {
                self.pos += 1;
                return Ok(pairs);
            }

            let key = match self.next() {
                Some(Token::Ident(key)) => (*key).to_string(),
                Some(Token::Str(key)) => key.clone(),
                other => return Err(unexpected("property name", other)),
            };
            self.expect(&Token::Colon, "`:`")?;
            pairs.push((key, self.value()?));

            match self.next() {
                Some(Token::Comma) => {}
                Some(Token::RBrace) => return Ok(pairs),
                other => return Err(unexpected("`,` or `}`", other)),
            }
        }
    }

    fn array(&mut self) -> Result<(), GrammarError> {
        self.expect(&Token::LBracket, "`[`")?;

        loop {
            if self.peek() == Some(&Token::RBracket) {
                self.pos += 1;
                return Ok(());
            }

            self.value()?;

            match self.next() {
                Some(Token::Comma) => {}
                Some(Token::RBracket) => return Ok(()),
                other => return Err(unexpected("`,` or `]`", other)),
            }
        }
    }

    fn value(&mut self) -> Result<Value, GrammarError> {
        match self.peek() {
            Some(Token::LBrace) => {
                self.object()?;
                return Ok(Value::Other);
            }
            Some(Token::LBracket) => {
                self.array()?;
                return Ok(Value::Other);
            }
            _ => {}
        }

        match self.next() {
            Some(Token::Str(text)) => Ok(Value::Str(text.clone())),
            Some(Token::Number(number)) => Ok(Value::Number((*number).to_string())),
            Some(Token::Ident("true")) => Ok(Value::Bool(true)),
            Some(Token::Ident("false")) => Ok(Value::Bool(false)),
            Some(Token::Ident("null" | "undefined")) => Ok(Value::Null),
            other => Err(unexpected("value", other)),
        }
    }
}

/// Field-by-field extraction for bodies the grammar rejects. The first
/// occurrence of each field wins.
fn decode_salvage(body: &str) -> Fields {
    static KEY: OnceLock<Regex> = OnceLock::new();
    let key_re = KEY.get_or_init(|| {
        Regex::new(r#"(?m)(?:^|[{,\s])["']?(?P<key>[A-Za-z_$][A-Za-z0-9_$]*)["']?\s*:[ \t]*"#)
            .expect("Invalid regex pattern defined in code")
    });

    let literal = scan::literal_mask(body.as_bytes());
    let mut fields = Fields::default();
    for caps in key_re.captures_iter(body) {
        let (Some(key), Some(whole)) = (caps.name("key"), caps.get(0)) else {
            continue;
        };
        if literal[whole.start()] {
            continue;
        }
        let Some(field) = FieldKey::from_key(key.as_str()) else {
            continue;
        };
        if fields.is_set(field) {
            continue;
        }
        if let Some(value) = salvage_value(&body[whole.end()..]) {
            fields.assign(field, value);
        }
    }
    fields
}

fn salvage_value(rest: &str) -> Option<Value> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let token_re = TOKEN.get_or_init(|| {
        Regex::new(r"^(?:(?P<flag>true|false)|(?P<null>null|undefined)|(?P<number>-?\d+(?:\.\d+)?)|(?P<plain>[A-Za-z0-9_.:/?=&%#-]+))")
            .expect("Invalid regex pattern defined in code")
    });

    if rest.starts_with(['\'', '"', '`']) {
        let multiline = rest.starts_with('`');
        let text = lexer::scan_quoted(rest)
            .filter(|(_, consumed)| multiline || !rest[..*consumed].contains('\n'))
            .map_or_else(|| unterminated_string(rest), |(text, _)| text);
        return Some(Value::Str(text));
    }

    let caps = token_re.captures(rest)?;
    if let Some(flag) = caps.name("flag") {
        Some(Value::Bool(flag.as_str() == "true"))
    } else if caps.name("null").is_some() {
        Some(Value::Null)
    } else if let Some(number) = caps.name("number") {
        Some(Value::Number(number.as_str().to_string()))
    } else {
        caps.name("plain").map(|_| Value::Other)
    }
}

/// A string whose closing quote is missing runs to the end of its line.
fn unterminated_string(rest: &str) -> String {
    let line = rest[1..].lines().next().unwrap_or_default();
    line.trim_end()
        .trim_end_matches(',')
        .trim_end_matches(['\'', '"', '`'])
        .to_string()
}
