//! Shop-duty categories and keyword-based category inference.

use super::{Job, JobDomainError, ParseJobCategoryError};
use serde::{Deserialize, Serialize};

/// Shop-duty category used to generate opening and closing checklists on
/// demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    /// Duties performed when the shop opens.
    OpenShop,
    /// Duties performed when the shop closes.
    CloseShop,
}

impl JobCategory {
    /// Every known category.
    pub const ALL: [Self; 2] = [Self::OpenShop, Self::CloseShop];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenShop => "open_shop",
            Self::CloseShop => "close_shop",
        }
    }
}

impl TryFrom<&str> for JobCategory {
    type Error = ParseJobCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open_shop" => Ok(Self::OpenShop),
            "close_shop" => Ok(Self::CloseShop),
            _ => Err(ParseJobCategoryError(value.to_owned())),
        }
    }
}

/// Keyword table used to infer a category from a job name when the job
/// does not declare one.
///
/// Matching is a case-insensitive substring test. A job whose name matches
/// the keywords of both categories belongs to both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryKeywords {
    open_shop: Vec<String>,
    close_shop: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self {
            open_shop: to_owned_keywords(&["open shop", "open", "start"]),
            close_shop: to_owned_keywords(&[
                "close shop",
                "close up shop",
                "close",
                "end",
                "shutdown",
            ]),
        }
    }
}

fn to_owned_keywords(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|keyword| (*keyword).to_owned()).collect()
}

impl CategoryKeywords {
    /// Creates a validated keyword table.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyCategoryKeywords`] when a category has
    /// no non-blank keyword.
    pub fn new(
        open_shop: impl IntoIterator<Item = String>,
        close_shop: impl IntoIterator<Item = String>,
    ) -> Result<Self, JobDomainError> {
        Self {
            open_shop: open_shop.into_iter().collect(),
            close_shop: close_shop.into_iter().collect(),
        }
        .normalized()
    }

    /// Lowercases and trims every keyword, dropping blanks.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyCategoryKeywords`] when a category is
    /// left without keywords.
    pub fn normalized(self) -> Result<Self, JobDomainError> {
        Ok(Self {
            open_shop: normalize_keywords(JobCategory::OpenShop, self.open_shop)?,
            close_shop: normalize_keywords(JobCategory::CloseShop, self.close_shop)?,
        })
    }

    /// Returns the keywords configured for `category`.
    #[must_use]
    pub fn keywords(&self, category: JobCategory) -> &[String] {
        match category {
            JobCategory::OpenShop => &self.open_shop,
            JobCategory::CloseShop => &self.close_shop,
        }
    }

    /// Returns `true` when `name` contains any keyword of `category`.
    #[must_use]
    pub fn name_matches(&self, name: &str, category: JobCategory) -> bool {
        let lowered = name.to_lowercase();
        self.keywords(category)
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }

    /// Returns `true` when `job` belongs to `category`.
    ///
    /// A declared category is authoritative; otherwise the job name decides.
    #[must_use]
    pub fn matches(&self, job: &Job, category: JobCategory) -> bool {
        job.category().map_or_else(
            || self.name_matches(job.name(), category),
            |declared| declared == category,
        )
    }

    /// Returns `true` when `job` belongs to at least one category.
    #[must_use]
    pub fn is_categorized(&self, job: &Job) -> bool {
        JobCategory::ALL
            .iter()
            .any(|category| self.matches(job, *category))
    }

    /// Returns `true` when an undeclared job name matches every category.
    #[must_use]
    pub fn is_ambiguous(&self, job: &Job) -> bool {
        job.category().is_none()
            && JobCategory::ALL
                .iter()
                .all(|category| self.name_matches(job.name(), *category))
    }
}

fn normalize_keywords(
    category: JobCategory,
    keywords: Vec<String>,
) -> Result<Vec<String>, JobDomainError> {
    let normalized: Vec<String> = keywords
        .into_iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    if normalized.is_empty() {
        return Err(JobDomainError::EmptyCategoryKeywords(
            category.as_str().to_owned(),
        ));
    }
    Ok(normalized)
}
