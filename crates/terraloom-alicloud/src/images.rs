//! Base machine image lookup

use crate::error::{Result, TopologyError};
use crate::kinds;
use terraloom_graph::{Attributes, Reference, ResourceGraph, Value};

/// Ownership scope of the images to search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageOwnership {
    /// Images owned by this account
    #[default]
    SelfOwned,
    /// Images shared by other accounts
    Others,
}

impl ImageOwnership {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageOwnership::SelfOwned => "self",
            ImageOwnership::Others => "others",
        }
    }
}

impl std::str::FromStr for ImageOwnership {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "self" => Ok(ImageOwnership::SelfOwned),
            "others" => Ok(ImageOwnership::Others),
            other => Err(format!("unknown image ownership: {}", other)),
        }
    }
}

impl std::fmt::Display for ImageOwnership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name pattern and ownership scope of the base image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFilter {
    pub name_regex: String,
    pub owners: ImageOwnership,
}

impl ImageFilter {
    pub fn new(name_regex: impl Into<String>, owners: ImageOwnership) -> Self {
        Self {
            name_regex: name_regex.into(),
            owners,
        }
    }

    /// Identifier-safe form of the pattern (`^debian-10$` -> `debian-10`)
    pub fn slug(&self) -> String {
        let slug = slugify(&self.name_regex);
        if slug.is_empty() {
            "any".to_string()
        } else {
            slug
        }
    }
}

/// Lowercase alphanumeric runs joined by `-`
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new("^debian-10$", ImageOwnership::SelfOwned)
    }
}

/// Ordered images matching a filter
#[derive(Debug, Clone, PartialEq)]
pub enum ImageList {
    /// List resolved by the apply engine (the `images` output of a lookup)
    Deferred(Reference),
    /// Image ids known up front
    Known(Vec<String>),
}

impl ImageList {
    /// Id of the first match
    pub fn first(&self) -> Result<Value> {
        match self {
            ImageList::Deferred(images) => Ok(images.clone().index(0).field("id").into()),
            ImageList::Known(ids) => ids
                .first()
                .map(Value::from)
                .ok_or_else(|| TopologyError::NoImageMatch("the static image list".to_string())),
        }
    }
}

/// Source of base machine images
pub trait ImageLookup {
    fn find_images(&self, graph: &mut ResourceGraph, filter: &ImageFilter) -> Result<ImageList>;
}

/// Declares an `alicloud_images` lookup in the graph
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSourceImages;

impl ImageLookup for DataSourceImages {
    fn find_images(&self, graph: &mut ResourceGraph, filter: &ImageFilter) -> Result<ImageList> {
        let handle = graph.declare(
            kinds::IMAGES,
            format!("images-{}", filter.slug()),
            Attributes::new()
                .with("owners", filter.owners.as_str())
                .with("name_regex", filter.name_regex.as_str()),
        )?;
        Ok(ImageList::Deferred(handle.output("images")?))
    }
}

/// Pre-resolved image ids, ignoring the filter
#[derive(Debug, Clone, Default)]
pub struct StaticImages(pub Vec<String>);

impl ImageLookup for StaticImages {
    fn find_images(&self, _graph: &mut ResourceGraph, filter: &ImageFilter) -> Result<ImageList> {
        if self.0.is_empty() {
            return Err(TopologyError::NoImageMatch(filter.name_regex.clone()));
        }
        Ok(ImageList::Known(self.0.clone()))
    }
}
