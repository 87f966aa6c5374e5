use crate::importer::application::domain::entities::{CsvRow, TopicCsvRecord};
use crate::tests::support::fake_platform::FakePlatform;

pub const ASKER_EMAIL: &str = "asker@example.com";
pub const HELPER_EMAIL: &str = "helper@example.com";
pub const CATEGORY_ID: i64 = 4;

/// Two known users and one category.
pub fn seeded_platform() -> FakePlatform {
    FakePlatform::new()
        .with_user(ASKER_EMAIL, "asker")
        .with_user(HELPER_EMAIL, "helper")
        .with_category(CATEGORY_ID)
}

pub fn full_record(title: &str) -> TopicCsvRecord {
    TopicCsvRecord {
        title: Some(title.to_string()),
        main_post: Some(format!("Opening post for {title}")),
        main_post_user_email: Some(ASKER_EMAIL.to_string()),
        category_id: Some(CATEGORY_ID.to_string()),
        tags: Some("rust|async".to_string()),
        main_post_datetime: Some("01/03/2024 09:30".to_string()),
        post_answer: Some(format!("Answer for {title}")),
        post_answer_user_email: Some(HELPER_EMAIL.to_string()),
        post_answer_datetime: Some("01/03/2024 10:05".to_string()),
    }
}

pub fn row(number: usize, record: TopicCsvRecord) -> CsvRow {
    CsvRow { number, record }
}
