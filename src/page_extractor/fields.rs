//! Declarative field map for product detail pages
//!
//! Each product field is a row of [`PRODUCT_FIELDS`]: where to look, what to
//! read and how to clean it. Extraction rules live here and nowhere else.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::transforms::{Transform, raw_text, stripped_text, text_without};
use crate::utils::constants::product;

/// DOM-derived product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    ItemPrice,
    OfferPrice,
    UnitPrice,
    AverageRating,
    ReviewCount,
    Tags,
    Categories,
    ImageUrl,
}

/// Whether a locator is evaluated inside the product region or the whole page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Region,
    Document,
}

/// How the element carrying a field is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// First element matching the selector
    First(&'static str),
    /// The `index`-th element child of the first `container` match
    NthChild {
        container: &'static str,
        index: usize,
    },
    /// Among `section` matches, the one whose first element child reads
    /// exactly `heading`; yields that section's second element child
    Section {
        section: &'static str,
        heading: &'static str,
    },
}

/// What is read from the located element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Stripped text
    Text,
    /// Attribute value
    Attr(&'static str),
    /// Stripped text with matching descendants removed first
    TextWithout(&'static str),
    /// Text of every `item` descendant, joined with `separator`
    Join {
        item: &'static str,
        separator: &'static str,
        strip: bool,
    },
}

/// One row of the field map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub scope: Scope,
    pub locator: Locator,
    pub read: Read,
    pub transform: Transform,
}

pub const PRODUCT_FIELDS: &[FieldRule] = &[
    FieldRule {
        field: Field::Title,
        scope: Scope::Region,
        locator: Locator::First(product::TITLE),
        read: Read::Text,
        transform: Transform::Passthrough,
    },
    FieldRule {
        field: Field::ImageUrl,
        scope: Scope::Document,
        locator: Locator::First(product::IMAGE),
        read: Read::Attr("srcset"),
        transform: Transform::Passthrough,
    },
    FieldRule {
        field: Field::Categories,
        scope: Scope::Document,
        locator: Locator::First(product::BREADCRUMB),
        read: Read::Join {
            item: "a",
            separator: "",
            strip: false,
        },
        transform: Transform::RemoveToken("breadcrumb"),
    },
    FieldRule {
        field: Field::Tags,
        scope: Scope::Region,
        locator: Locator::First(product::TAGS),
        read: Read::Join {
            item: "li",
            separator: ",",
            strip: true,
        },
        transform: Transform::Passthrough,
    },
    FieldRule {
        field: Field::ReviewCount,
        scope: Scope::Region,
        locator: Locator::First(product::REVIEW_COUNT),
        read: Read::Text,
        transform: Transform::Unwrap,
    },
    FieldRule {
        field: Field::AverageRating,
        scope: Scope::Region,
        locator: Locator::First(product::RATING),
        read: Read::Attr("aria-label"),
        transform: Transform::BeforeToken("star"),
    },
    FieldRule {
        field: Field::UnitPrice,
        scope: Scope::Region,
        locator: Locator::First(product::UNIT_PRICE),
        read: Read::Text,
        transform: Transform::Unwrap,
    },
    FieldRule {
        field: Field::ItemPrice,
        scope: Scope::Region,
        locator: Locator::NthChild {
            container: product::PRICE_CONTAINER,
            index: 0,
        },
        read: Read::TextWithout(product::PRICE_NOISE),
        transform: Transform::Passthrough,
    },
    FieldRule {
        field: Field::OfferPrice,
        scope: Scope::Region,
        locator: Locator::NthChild {
            container: product::PRICE_CONTAINER,
            index: 1,
        },
        read: Read::TextWithout(product::PRICE_NOISE),
        transform: Transform::Passthrough,
    },
    FieldRule {
        field: Field::Description,
        scope: Scope::Region,
        locator: Locator::Section {
            section: product::DESCRIPTION_SECTION,
            heading: product::DESCRIPTION_HEADING,
        },
        read: Read::Text,
        transform: Transform::Passthrough,
    },
];

pub(crate) static REGION_SELECTOR: Lazy<Selector> = Lazy::new(|| selector(product::REGION));

static COMPILED_FIELDS: Lazy<Vec<CompiledRule>> =
    Lazy::new(|| PRODUCT_FIELDS.iter().map(CompiledRule::new).collect());

/// Compiled rows of [`PRODUCT_FIELDS`]
pub(crate) fn compiled_fields() -> &'static [CompiledRule] {
    &COMPILED_FIELDS
}

/// Parse a built-in selector
///
/// All selectors passed here are compile-time constants covered by tests.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector '{css}': {e}"))
}

enum CompiledLocator {
    First(Selector),
    NthChild(Selector, usize),
    Section(Selector, &'static str),
}

enum CompiledRead {
    Text,
    Attr(&'static str),
    TextWithout(Selector),
    Join {
        item: Selector,
        separator: &'static str,
        strip: bool,
    },
}

pub(crate) struct CompiledRule {
    pub(crate) rule: &'static FieldRule,
    locator: CompiledLocator,
    read: CompiledRead,
}

impl CompiledRule {
    fn new(rule: &'static FieldRule) -> Self {
        let locator = match rule.locator {
            Locator::First(css) => CompiledLocator::First(selector(css)),
            Locator::NthChild { container, index } => {
                CompiledLocator::NthChild(selector(container), index)
            }
            Locator::Section { section, heading } => {
                CompiledLocator::Section(selector(section), heading)
            }
        };

        let read = match rule.read {
            Read::Text => CompiledRead::Text,
            Read::Attr(name) => CompiledRead::Attr(name),
            Read::TextWithout(noise) => CompiledRead::TextWithout(selector(noise)),
            Read::Join {
                item,
                separator,
                strip,
            } => CompiledRead::Join {
                item: selector(item),
                separator,
                strip,
            },
        };

        Self {
            rule,
            locator,
            read,
        }
    }

    /// Evaluate this rule; `None` when the element or attribute is absent
    pub(crate) fn evaluate(&self, document: &Html, region: ElementRef<'_>) -> Option<String> {
        let element = match self.rule.scope {
            Scope::Region => self.locate(region),
            Scope::Document => self.locate(document.root_element()),
        }?;

        let value = match &self.read {
            CompiledRead::Text => stripped_text(element),
            CompiledRead::Attr(name) => element.value().attr(name)?.to_string(),
            CompiledRead::TextWithout(noise) => text_without(element, noise),
            CompiledRead::Join {
                item,
                separator,
                strip,
            } => element
                .select(item)
                .map(|e| if *strip { stripped_text(e) } else { raw_text(e) })
                .collect::<Vec<_>>()
                .join(separator),
        };

        Some(self.rule.transform.apply(&value))
    }

    fn locate<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match &self.locator {
            CompiledLocator::First(sel) => scope.select(sel).next(),
            CompiledLocator::NthChild(container, index) => scope
                .select(container)
                .next()?
                .children()
                .filter_map(ElementRef::wrap)
                .nth(*index),
            CompiledLocator::Section(section, heading) => scope.select(section).find_map(|s| {
                let mut children = s.children().filter_map(ElementRef::wrap);
                let first = children.next()?;
                if stripped_text(first) == *heading {
                    children.next()
                } else {
                    None
                }
            }),
        }
    }
}
