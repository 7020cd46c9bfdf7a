//! Selector parsing and matching
//!
//! Supports the subset of CSS selectors that mount-point lookups need:
//!
//! - type selectors and the universal selector: `body`, `section`, `*`
//! - id and class parts, freely combined: `div#main.card.wide`
//! - descendant (whitespace) and child (`>`) combinators
//!
//! ```
//! use plaintag_dom::Document;
//!
//! let mut doc = Document::new();
//! let body = doc.body().unwrap();
//! let panel = doc.create_element("section").unwrap();
//! doc.set_id(panel, "panel").unwrap();
//! doc.append_child(body, panel).unwrap();
//!
//! assert_eq!(doc.query_selector("body > section#panel").unwrap(), Some(panel));
//! ```

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    error::{context, VerboseError},
    multi::many0,
    sequence::{delimited, preceded},
    Finish, IResult,
};

use crate::document::{Document, ElementId};
use crate::error::{DomError, Result};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// One simple selector part inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    /// `div`
    Tag(String),
    /// `*`
    Universal,
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
}

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// Simple selector parts with no combinator, e.g. `div.card#main`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SelectorPart>,
}

impl CompoundSelector {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        let Some(el) = doc.get(id) else {
            return false;
        };
        self.parts.iter().all(|part| match part {
            SelectorPart::Tag(tag) => el.tag_name().eq_ignore_ascii_case(tag),
            SelectorPart::Universal => true,
            SelectorPart::Id(value) => el.id() == Some(value.as_str()),
            SelectorPart::Class(class) => el.has_class(class),
        })
    }
}

/// A full selector: compounds joined by combinators, target last.
///
/// `segments[i].1` is the combinator linking segment `i` to segment `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub segments: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl Selector {
    /// Parse selector text
    pub fn parse(input: &str) -> Result<Self> {
        all_consuming(delimited(multispace0, complex_selector, multispace0))(input)
            .finish()
            .map(|(_, selector)| selector)
            .map_err(|err| {
                let reason = err
                    .errors
                    .iter()
                    .find_map(|(_, kind)| match kind {
                        nom::error::VerboseErrorKind::Context(ctx) => Some(format!("expected {ctx}")),
                        _ => None,
                    })
                    .unwrap_or_else(|| "unexpected input".to_string());
                tracing::debug!("selector parse failed for {:?}: {}", input, reason);
                DomError::InvalidSelector {
                    selector: input.to_string(),
                    reason,
                }
            })
    }

    /// Check whether `id` matches, walking ancestors for combinators
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        let Some(((target, _), rest)) = self.segments.split_last() else {
            return false;
        };
        target.matches(doc, id) && match_ancestors(doc, id, rest)
    }
}

/// Match the remaining (leftward) segments against ancestors of `id`
fn match_ancestors(
    doc: &Document,
    id: ElementId,
    segments: &[(CompoundSelector, Option<Combinator>)],
) -> bool {
    let Some(((compound, combinator), rest)) = segments.split_last() else {
        return true;
    };

    let mut parent = doc.get(id).and_then(|el| el.parent());
    match combinator {
        Some(Combinator::Child) => parent
            .is_some_and(|p| compound.matches(doc, p) && match_ancestors(doc, p, rest)),
        _ => {
            while let Some(p) = parent {
                if compound.matches(doc, p) && match_ancestors(doc, p, rest) {
                    return true;
                }
                parent = doc.get(p).and_then(|el| el.parent());
            }
            false
        }
    }
}

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn selector_part(input: &str) -> ParseResult<'_, SelectorPart> {
    alt((
        map(preceded(char('#'), context("id", identifier)), |id| {
            SelectorPart::Id(id.to_string())
        }),
        map(preceded(char('.'), context("class name", identifier)), |class| {
            SelectorPart::Class(class.to_string())
        }),
    ))(input)
}

/// `tag`, `*`, or nothing, followed by id/class parts
fn compound_selector(input: &str) -> ParseResult<'_, CompoundSelector> {
    let (input, head) = opt(alt((
        value(SelectorPart::Universal, char('*')),
        map(identifier, |tag: &str| SelectorPart::Tag(tag.to_string())),
    )))(input)?;
    let (rest, tail) = many0(selector_part)(input)?;

    let mut parts: Vec<SelectorPart> = head.into_iter().collect();
    parts.extend(tail);
    if parts.is_empty() {
        return Err(nom::Err::Error(VerboseError {
            errors: vec![(
                input,
                nom::error::VerboseErrorKind::Context("selector"),
            )],
        }));
    }

    Ok((rest, CompoundSelector { parts }))
}

fn combinator(input: &str) -> ParseResult<'_, Combinator> {
    alt((
        value(
            Combinator::Child,
            delimited(multispace0, char('>'), multispace0),
        ),
        value(Combinator::Descendant, multispace1),
    ))(input)
}

fn complex_selector(input: &str) -> ParseResult<'_, Selector> {
    let (mut input, first) = compound_selector(input)?;
    let mut segments = vec![(first, None)];

    loop {
        let Ok((rest, comb)) = combinator(input) else {
            break;
        };
        // Trailing whitespace is not a combinator
        let Ok((rest, next)) = compound_selector(rest) else {
            if comb == Combinator::Child {
                return Err(nom::Err::Failure(VerboseError {
                    errors: vec![(rest, nom::error::VerboseErrorKind::Context("selector after '>'"))],
                }));
            }
            break;
        };
        if let Some(last) = segments.last_mut() {
            last.1 = Some(comb);
        }
        segments.push((next, None));
        input = rest;
    }

    Ok((input, Selector { segments }))
}

impl Document {
    /// First connected element matching `selector` in document order
    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .walk()
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    /// Every connected element matching `selector` in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .walk()
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }
}
