//! URL and output-path templates (`article/{date:%Y}-{date:%m}/{slug}/`).
//!
//! The syntax is a small subset of Python's `str.format`: literal text,
//! `{field}` placeholders, `{date:<strftime>}` and `{{`/`}}` escapes.

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Rendering used for a bare `{date}` placeholder.
const DEFAULT_DATE_SPEC: &str = "%Y-%m-%d %H:%M:%S";

#[obs_derive::obs_error]
pub enum TemplateError {
    #[error("Malformed template `{template}`{}: {message}", format_context(.context))]
    Syntax { template: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown placeholder `{{{field}}}`{}", format_context(.context))]
    UnknownField { field: String, context: Option<Cow<'static, str>> },

    #[error("Invalid format `{spec}` for `{field}`{}", format_context(.context))]
    FormatSpec { field: Field, spec: String, context: Option<Cow<'static, str>> },

    #[error("No value for `{{{field}}}`{}", format_context(.context))]
    MissingValue { field: Field, context: Option<Cow<'static, str>> },

    #[error("Rendering failed{}: {source}", format_context(.context))]
    Render { source: fmt::Error, context: Option<Cow<'static, str>> },
}

/// Metadata a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Slug,
    Lang,
    Category,
    Author,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { field: Field, spec: Option<String> },
}

/// A parsed template. Parsing checks every placeholder up front, so rendering
/// can only fail on missing context values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlContext<'a> {
    pub slug: Option<&'a str>,
    pub lang: Option<&'a str>,
    pub category: Option<&'a str>,
    pub author: Option<&'a str>,
    pub date: Option<NaiveDateTime>,
}

impl<'a> UrlContext<'a> {
    #[must_use]
    pub fn with_slug(slug: &'a str) -> Self {
        Self { slug: Some(slug), ..Self::default() }
    }

    #[must_use]
    pub const fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub const fn lang(mut self, lang: &'a str) -> Self {
        self.lang = Some(lang);
        self
    }

    fn text(&self, field: Field) -> Option<&'a str> {
        match field {
            Field::Slug => self.slug,
            Field::Lang => self.lang,
            Field::Category => self.category,
            Field::Author => self.author,
            Field::Date => None,
        }
    }
}

impl UrlTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    /// [`TemplateError::Syntax`] for unbalanced braces or empty placeholders,
    /// [`TemplateError::UnknownField`] and [`TemplateError::FormatSpec`] for bad placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let syntax = |message: &'static str| TemplateError::Syntax {
            template: template.to_owned(),
            message: message.into(),
            context: None,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                },
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                },
                '}' => return Err(syntax("single `}` outside a placeholder")),
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(syntax("nested `{` inside a placeholder")),
                            Some(c) => body.push(c),
                            None => return Err(syntax("unclosed placeholder")),
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body, &syntax)?);
                },
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source: template.to_owned(), segments })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholders in order of appearance, repeats included.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { field, .. } => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    #[must_use]
    pub fn uses(&self, field: Field) -> bool {
        self.fields().any(|f| f == field)
    }

    /// Substitutes `ctx` into the template.
    ///
    /// # Errors
    /// [`TemplateError::MissingValue`] when a referenced value is absent from `ctx`.
    pub fn render(&self, ctx: &UrlContext<'_>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 16);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { field: Field::Date, spec } => {
                    let date = ctx
                        .date
                        .ok_or(TemplateError::MissingValue { field: Field::Date, context: None })?;
                    let spec = spec.as_deref().unwrap_or(DEFAULT_DATE_SPEC);
                    write!(out, "{}", date.format_with_items(StrftimeItems::new(spec)))?;
                },
                Segment::Placeholder { field, .. } => {
                    let value = ctx
                        .text(*field)
                        .ok_or(TemplateError::MissingValue { field: *field, context: None })?;
                    out.push_str(value);
                },
            }
        }

        Ok(out)
    }
}

impl FromStr for UrlTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Whether chrono understands every directive in `spec`.
#[must_use]
pub fn is_valid_strftime(spec: &str) -> bool {
    !StrftimeItems::new(spec).any(|item| matches!(item, Item::Error))
}

fn parse_placeholder(
    body: &str,
    syntax: &dyn Fn(&'static str) -> TemplateError,
) -> Result<Segment, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    if name.is_empty() {
        return Err(syntax("empty placeholder"));
    }

    let field = Field::from_str(name)
        .map_err(|_| TemplateError::UnknownField { field: name.to_owned(), context: None })?;

    match (field, spec) {
        (Field::Date, Some(spec)) if !is_valid_strftime(spec) => {
            Err(TemplateError::FormatSpec { field, spec: spec.to_owned(), context: None })
        },
        (Field::Date, spec) => Ok(Segment::Placeholder { field, spec: spec.map(str::to_owned) }),
        (_, Some(spec)) => {
            Err(TemplateError::FormatSpec { field, spec: spec.to_owned(), context: None })
        },
        (_, None) => Ok(Segment::Placeholder { field, spec: None }),
    }
}
