//! Tests for shop-duty category inference.

use crate::job::domain::{CategoryKeywords, Job, JobCategory, JobDomainError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn keywords() -> CategoryKeywords {
    CategoryKeywords::default()
}

fn job_named(name: &str) -> Job {
    Job::new(name, 1, &DefaultClock).expect("valid job")
}

#[rstest]
#[case("Open Shop Checklist", JobCategory::OpenShop, true)]
#[case("Open Shop Checklist", JobCategory::CloseShop, false)]
#[case("Close Up Shop", JobCategory::CloseShop, true)]
#[case("Start of day walkthrough", JobCategory::OpenShop, true)]
#[case("System SHUTDOWN", JobCategory::CloseShop, true)]
#[case("Evening Feed", JobCategory::OpenShop, false)]
#[case("Evening Feed", JobCategory::CloseShop, false)]
fn job_names_match_keywords_case_insensitively(
    keywords: CategoryKeywords,
    #[case] name: &str,
    #[case] category: JobCategory,
    #[case] expected: bool,
) {
    assert_eq!(keywords.matches(&job_named(name), category), expected);
}

#[rstest]
fn declared_category_overrides_name_inference(keywords: CategoryKeywords) {
    let job = job_named("Open the sump lid").with_category(JobCategory::CloseShop);

    assert!(keywords.matches(&job, JobCategory::CloseShop));
    assert!(!keywords.matches(&job, JobCategory::OpenShop));
    assert!(!keywords.is_ambiguous(&job));
}

#[rstest]
fn name_matching_both_categories_is_ambiguous(keywords: CategoryKeywords) {
    let job = job_named("Open and close checks");

    assert!(keywords.matches(&job, JobCategory::OpenShop));
    assert!(keywords.matches(&job, JobCategory::CloseShop));
    assert!(keywords.is_ambiguous(&job));
}

#[rstest]
fn uncategorized_job_is_regular(keywords: CategoryKeywords) {
    assert!(!keywords.is_categorized(&job_named("Evening Feed")));
    assert!(keywords.is_categorized(&job_named("Open Shop Checklist")));
}

#[rstest]
fn custom_keywords_are_normalized() {
    let keywords = CategoryKeywords::new(
        vec!["  Sunrise ".to_owned(), String::new()],
        vec!["LIGHTS OUT".to_owned()],
    )
    .expect("valid keyword table");

    assert_eq!(keywords.keywords(JobCategory::OpenShop), ["sunrise".to_owned()]);
    assert!(keywords.matches(&job_named("Lights out round"), JobCategory::CloseShop));
}

#[rstest]
fn blank_keyword_list_is_rejected() {
    let result = CategoryKeywords::new(vec!["  ".to_owned()], vec!["close".to_owned()]);
    assert_eq!(
        result,
        Err(JobDomainError::EmptyCategoryKeywords("open_shop".to_owned()))
    );
}

#[rstest]
#[case("open_shop", JobCategory::OpenShop)]
#[case("CLOSE_SHOP", JobCategory::CloseShop)]
fn category_parses_storage_values(#[case] raw: &str, #[case] expected: JobCategory) {
    assert_eq!(JobCategory::try_from(raw), Ok(expected));
}
